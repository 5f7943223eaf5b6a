//! Per-request bearer token: a compact HS256 JWT with `iss` and `iat` only.
//!
//! No expiry claim is set; a token is minted immediately before each request
//! and never reused.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;

use crate::domain::Credential;

type HmacSha256 = Hmac<Sha256>;

const HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

#[derive(Debug, thiserror::Error)]
/// A per-request token could not be minted.
pub enum SigningError {
    #[error("signing key rejected by HMAC-SHA256")]
    InvalidKey,

    #[error("cannot encode token claims: {0}")]
    Claims(#[from] serde_json::Error),

    #[error("system clock is set before the unix epoch")]
    Clock,
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    iat: u64,
}

/// Current time as whole seconds since the unix epoch.
pub fn issued_at_now() -> Result<u64, SigningError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .map_err(|_| SigningError::Clock)
}

/// Sign `{iss: service id, iat: issued_at}` with the credential's secret.
pub fn sign_token(credential: &Credential, issued_at: u64) -> Result<String, SigningError> {
    let claims = serde_json::to_vec(&Claims {
        iss: credential.service_id().as_str(),
        iat: issued_at,
    })?;

    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(HEADER),
        URL_SAFE_NO_PAD.encode(claims)
    );

    let mut mac = HmacSha256::new_from_slice(credential.secret().as_bytes())
        .map_err(|_| SigningError::InvalidKey)?;
    mac.update(signing_input.as_bytes());
    let signature = mac.finalize().into_bytes();

    Ok(format!(
        "{signing_input}.{}",
        URL_SAFE_NO_PAD.encode(signature)
    ))
}
