//! Token creation and verification.
//!
//! Every function takes the [`JwtConfig`] explicitly; nothing here reads the
//! environment. The `*_at` variants accept the issue time so tests can mint
//! tokens that are already expired.
//!
//! Verification uses HS256 only and zero leeway: a token whose `exp` lies in
//! the past is rejected even when its signature is correct.

use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

use sessionvault_config::JwtConfig;

use crate::claims::{AccessTokenClaims, RefreshTokenClaims};

/// Why a token could not be created or accepted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Signature and structure are fine but `exp` has passed.
    #[error("token has expired")]
    Expired,

    /// Bad signature, malformed token, wrong algorithm or missing claims.
    #[error("token is invalid")]
    Invalid,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation
}

fn sign<T: serde::Serialize>(claims: &T, secret: &str) -> Result<String, TokenError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

fn verify<T: DeserializeOwned>(token: &str, secret: &str) -> Result<T, TokenError> {
    decode::<T>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })
}

fn now() -> i64 {
    Utc::now().timestamp()
}

/// Creates an access token for the given user, issued now.
pub fn create_access_token(
    user_id: Uuid,
    username: &str,
    email: &str,
    full_name: &str,
    jwt_config: &JwtConfig,
) -> Result<String, TokenError> {
    create_access_token_at(user_id, username, email, full_name, jwt_config, now())
}

/// Creates an access token as if issued at `issued_at` (Unix seconds).
pub fn create_access_token_at(
    user_id: Uuid,
    username: &str,
    email: &str,
    full_name: &str,
    jwt_config: &JwtConfig,
    issued_at: i64,
) -> Result<String, TokenError> {
    let claims = AccessTokenClaims {
        sub: user_id.to_string(),
        username: username.to_string(),
        email: email.to_string(),
        full_name: full_name.to_string(),
        exp: (issued_at + jwt_config.access_token_expiry).max(0) as usize,
        iat: issued_at.max(0) as usize,
    };

    sign(&claims, &jwt_config.access_secret)
}

/// Verifies an access token against the access secret.
pub fn verify_access_token(
    token: &str,
    jwt_config: &JwtConfig,
) -> Result<AccessTokenClaims, TokenError> {
    verify(token, &jwt_config.access_secret)
}

/// Creates a refresh token for the given user, issued now.
pub fn create_refresh_token(user_id: Uuid, jwt_config: &JwtConfig) -> Result<String, TokenError> {
    create_refresh_token_at(user_id, jwt_config, now())
}

/// Creates a refresh token as if issued at `issued_at` (Unix seconds).
pub fn create_refresh_token_at(
    user_id: Uuid,
    jwt_config: &JwtConfig,
    issued_at: i64,
) -> Result<String, TokenError> {
    let claims = RefreshTokenClaims {
        sub: user_id.to_string(),
        exp: (issued_at + jwt_config.refresh_token_expiry).max(0) as usize,
        iat: issued_at.max(0) as usize,
        jti: Uuid::new_v4().to_string(),
    };

    sign(&claims, &jwt_config.refresh_secret)
}

/// Verifies a refresh token against the refresh secret.
///
/// A valid result only proves the token was issued by this service and has
/// not expired. Whether it is still the user's current refresh token is a
/// separate check against the stored value.
pub fn verify_refresh_token(
    token: &str,
    jwt_config: &JwtConfig,
) -> Result<RefreshTokenClaims, TokenError> {
    verify(token, &jwt_config.refresh_secret)
}
