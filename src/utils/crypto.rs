use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::{Error, Result};

pub fn hash_password(plain: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            tracing::error!(error = %e, "argon2 hash_password failed");
            Error::Internal("Failed to hash password".to_string())
        })?
        .to_string();
    Ok(password_hash)
}

pub fn verify_password(plain: &str, hashed: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hashed).map_err(|e| {
        tracing::error!(error = %e, "stored password hash is malformed");
        Error::Internal("Failed to verify password".to_string())
    })?;
    let ok = Argon2::default()
        .verify_password(plain.as_bytes(), &parsed_hash)
        .is_ok();
    Ok(ok)
}

/// Hex SHA-256 of a one-time code; only the digest is persisted.
pub fn digest_otp(otp: &str) -> String {
    hex::encode(Sha256::digest(otp.trim().as_bytes()))
}

pub fn otp_matches(otp: &str, stored_digest: &str) -> bool {
    let candidate = digest_otp(otp);
    candidate.as_bytes().ct_eq(stored_digest.as_bytes()).into()
}
