//! Authentication types for Splunk dispatch configuration.
//!
//! Responsibilities:
//! - Hold the bearer token used to authorize REST calls.
//! - Handle serialization of secret values.
//!
//! Does NOT handle:
//! - Session login or token exchange.
//!
//! Invariants:
//! - The token is always wrapped in `secrecy::SecretString`; `Debug` output never shows it.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Module for serializing `Option<SecretString>` as plain strings.
mod secret_string {
    use secrecy::{ExposeSecret, SecretString};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(secret: &Option<SecretString>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        secret
            .as_ref()
            .map(|s| s.expose_secret().to_string())
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        Ok(s.map(|s| SecretString::new(s.into())))
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Bearer token sent as `Authorization: Bearer <token>`.
    ///
    /// `None` sends unauthenticated requests (useful against local test services).
    #[serde(default, with = "secret_string", skip_serializing_if = "Option::is_none")]
    pub token: Option<SecretString>,
}

impl AuthConfig {
    /// Create an auth config carrying the given bearer token.
    pub fn with_token(token: SecretString) -> Self {
        Self { token: Some(token) }
    }
}
