//! Token payload decoding
//!
//! The client never holds the backend's signing key, so tokens are decoded
//! without signature or expiry validation. The backend remains the only
//! authority on whether a token is still accepted.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use crate::error::{SessionError, SessionResult};
use crate::models::UserClaims;

fn payload_only_validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    validation
}

/// Decode the claims carried by `token`
pub fn decode_claims(token: &str) -> SessionResult<UserClaims> {
    let token = token.trim();
    if token.is_empty() {
        return Err(SessionError::MalformedToken("token is empty".to_string()));
    }

    let data = decode::<UserClaims>(
        token,
        &DecodingKey::from_secret(&[]),
        &payload_only_validation(),
    )
    .map_err(|e| SessionError::MalformedToken(e.to_string()))?;

    debug!("Decoded token for subject {}", data.claims.sub);
    Ok(data.claims)
}
