use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::Error;
use crate::models::user::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
}

/// Identity carried by a token and attached to authenticated requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Invalid token")]
    Invalid,
    #[error("Token expired")]
    Expired,
}

impl From<TokenError> for Error {
    fn from(err: TokenError) -> Self {
        Error::Unauthorized(err.to_string())
    }
}

#[derive(Clone)]
struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

#[derive(Clone)]
pub struct TokenService {
    keys: Arc<Keys>,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
            }),
            ttl,
        }
    }

    pub fn issue(&self, identity: Identity) -> Result<String, Error> {
        self.issue_at(identity, Utc::now())
    }

    pub fn issue_at(&self, identity: Identity, issued_at: DateTime<Utc>) -> Result<String, Error> {
        let exp = issued_at + self.ttl;
        let claims = Claims {
            sub: identity.user_id,
            role: identity.role,
            iat: issued_at.timestamp().max(0) as usize,
            exp: exp.timestamp().max(0) as usize,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(|e| {
                tracing::error!(error = %e, "jwt encode failed");
                Error::Internal("Failed to issue token".to_string())
            })?;
        tracing::debug!(user_id = %identity.user_id, role = %identity.role, "token issued");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Checks the signature, then `exp` against `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.keys.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;
        if now.timestamp() >= data.claims.exp as i64 {
            return Err(TokenError::Expired);
        }
        Ok(Identity {
            user_id: data.claims.sub,
            role: data.claims.role,
        })
    }
}
