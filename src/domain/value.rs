use std::fmt;

use crate::domain::validation::ValidationError;

/// Length of the trailing window of an API key that carries the credential.
///
/// The key layout is `[name-]<36-char service id>-<36-char secret>`; any name
/// prefix sits before this window and is ignored.
pub const API_KEY_MIN_LEN: usize = 73;

const BLOCK_LEN: usize = 36;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Service identifier carved out of an API key; used as the token issuer.
pub struct ServiceId(String);

impl ServiceId {
    /// Borrow the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, PartialEq, Eq)]
/// Signing secret carved out of an API key.
///
/// `Debug` output is redacted.
pub struct SecretKey(String);

impl SecretKey {
    /// Borrow the raw secret bytes for MAC construction.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Credential derived from a single API key string.
///
/// Invariant: both parts are non-empty; parsed once and never mutated.
pub struct Credential {
    service_id: ServiceId,
    secret: SecretKey,
}

impl Credential {
    /// Name used in validation errors.
    pub const FIELD: &'static str = "api key";

    /// Parse an API key into its service id and signing secret.
    ///
    /// The last 73 characters are split as `[-73, -37)` for the service id and
    /// `[-36, end)` for the secret. The separator between them and anything in
    /// front of the window are discarded without validation.
    pub fn parse(api_key: &str) -> Result<Self, ValidationError> {
        if api_key.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let chars = api_key.chars().count();
        if chars < API_KEY_MIN_LEN {
            return Err(ValidationError::TooShort {
                field: Self::FIELD,
                min: API_KEY_MIN_LEN,
                actual: chars,
            });
        }

        let window = tail_chars(api_key, API_KEY_MIN_LEN);
        let service_id: String = window.chars().take(BLOCK_LEN).collect();
        let secret = tail_chars(window, BLOCK_LEN).to_owned();

        Ok(Self {
            service_id: ServiceId(service_id),
            secret: SecretKey(secret),
        })
    }

    /// The service (tenant) identifier.
    pub fn service_id(&self) -> &ServiceId {
        &self.service_id
    }

    /// The signing secret.
    pub fn secret(&self) -> &SecretKey {
        &self.secret
    }
}

/// Borrow the last `n` characters of `value`; callers guarantee it has at least `n`.
fn tail_chars(value: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match value.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &value[idx..],
        None => value,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Template channel used to filter template listings.
pub enum TemplateType {
    Sms,
    Email,
}

impl TemplateType {
    /// Query parameter name used by the templates endpoint (`type`).
    pub const FIELD: &'static str = "type";

    /// Wire representation (`sms` / `email`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sms => "sms",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
