//! JWT minting and verification.
//!
//! Tokens are self-contained HS256 JWTs carrying the user's email as the
//! subject claim. There is no server-side session state and no revocation
//! list: a token stays valid until its encoded expiry. Access and refresh
//! tokens share the same claim shape and differ only in the expiry policy
//! used to mint them.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use thiserror::Error;

use crate::config::jwt::JwtConfig;
use crate::modules::auth::model::Claims;
use crate::utils::errors::AppError;

/// Why a token failed to decode.
///
/// Expiry is distinguished from everything else because an expired access
/// token is the expected trigger for the refresh flow, while a malformed or
/// tampered token is a hard authentication failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,
    #[error("Invalid token")]
    Malformed,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed,
        }
    }
}

pub fn create_access_token(email: &str, jwt_config: &JwtConfig) -> Result<String, AppError> {
    mint(email, jwt_config.access_token_expiry, jwt_config)
}

pub fn create_refresh_token(email: &str, jwt_config: &JwtConfig) -> Result<String, AppError> {
    mint(email, jwt_config.refresh_token_expiry, jwt_config)
}

fn mint(email: &str, expiry_secs: i64, jwt_config: &JwtConfig) -> Result<String, AppError> {
    let now = Utc::now().timestamp();

    let claims = Claims {
        sub: email.to_string(),
        iat: now as usize,
        exp: (now + expiry_secs) as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to create token: {}", e)))
}

/// Decodes the claims after checking signature and expiry. No subject
/// comparison; callers that need one use [`verify_subject`].
pub fn decode_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, TokenError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(TokenError::from)
}

/// True only when the token is intact, unexpired, and minted for
/// `expected_email`. Any failure mode answers false rather than erroring.
pub fn verify_subject(token: &str, expected_email: &str, jwt_config: &JwtConfig) -> bool {
    match decode_token(token, jwt_config) {
        Ok(claims) => claims.sub == expected_email,
        Err(_) => false,
    }
}
