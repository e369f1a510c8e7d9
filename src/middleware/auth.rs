use axum::{
    extract::{MatchedPath, Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{
    error::Error,
    models::user::Role,
    services::token_service::{Identity, TokenError},
    AppState,
};

/// Authenticated caller, inserted into request extensions by [`require_auth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: Role,
}

impl From<Identity> for AuthUser {
    fn from(identity: Identity) -> Self {
        Self {
            user_id: identity.user_id,
            role: identity.role,
        }
    }
}

fn bearer_token(req: &Request) -> Result<&str, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::Unauthorized("No token provided".to_string()))?;
    let value = header
        .to_str()
        .map_err(|_| Error::Unauthorized("Invalid authorization header".to_string()))?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::Unauthorized("Invalid authorization header".to_string()))
}

/// Verifies the bearer token, then checks the caller's role against the
/// access table for the matched route. Must be installed with
/// `Router::route_layer` so that `MatchedPath` is available.
pub async fn require_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let token = match bearer_token(&req) {
        Ok(token) => token,
        Err(err) => return err.into_response(),
    };

    let identity = match state.tokens.verify_at(token, state.clock.now()) {
        Ok(identity) => identity,
        Err(err) => {
            match err {
                TokenError::Expired => tracing::debug!("rejected expired token"),
                TokenError::Invalid => tracing::warn!("rejected invalid token"),
            }
            return Error::from(err).into_response();
        }
    };

    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    if !state.policy.permits(req.method(), &route, identity.role) {
        tracing::warn!(
            user_id = %identity.user_id,
            role = %identity.role,
            method = %req.method(),
            route = %route,
            "role not permitted"
        );
        return Error::Forbidden("Permission denied".to_string()).into_response();
    }

    req.extensions_mut().insert(AuthUser::from(identity));
    next.run(req).await
}
