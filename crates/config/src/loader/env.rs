//! Environment variable parsing for configuration.
//!
//! Responsibilities:
//! - Read and parse environment variables for Splunk dispatch configuration.
//! - Apply environment variable values to a ConfigLoader instance.
//!
//! Does NOT handle:
//! - Building the final Config (see builder.rs).
//! - .env file loading (handled by ConfigLoader::load_dotenv).
//!
//! Invariants:
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed (leading/trailing whitespace removed).
//! - Invalid numeric values return ConfigError::InvalidValue.

use secrecy::SecretString;
use std::str::FromStr;
use std::time::Duration;

use super::builder::ConfigLoader;
use super::error::ConfigError;
use crate::constants::MAX_MAX_RETRIES;

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Parse an environment variable into `T`, mapping failures to `InvalidValue`.
fn parse_env<T: FromStr>(var: &str, message: &str) -> Result<Option<T>, ConfigError> {
    env_var_or_none(var)
        .map(|raw| {
            raw.parse::<T>().map_err(|_| ConfigError::InvalidValue {
                var: var.to_string(),
                message: message.to_string(),
            })
        })
        .transpose()
}

/// Apply environment variable configuration to the loader.
///
/// Values already set through builder methods are left untouched.
pub fn apply_env(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    if loader.base_url().is_none() {
        loader.set_base_url(env_var_or_none("SPLUNK_BASE_URL"));
    }
    if loader.api_token().is_none() {
        loader.set_api_token(env_var_or_none("SPLUNK_API_TOKEN").map(|t| SecretString::new(t.into())));
    }
    if loader.owner().is_none() {
        loader.set_owner(env_var_or_none("SPLUNK_OWNER"));
    }
    if loader.app().is_none() {
        loader.set_app(env_var_or_none("SPLUNK_APP"));
    }
    if let Some(skip) = parse_env::<bool>("SPLUNK_SKIP_VERIFY", "must be true or false")? {
        loader.set_skip_verify_if_unset(skip);
    }
    if let Some(secs) = parse_env::<u64>("SPLUNK_TIMEOUT", "must be a number")? {
        loader.set_timeout_if_unset(Duration::from_secs(secs));
    }
    if let Some(value) =
        parse_env::<usize>("SPLUNK_MAX_RETRIES", "must be a non-negative integer")?
    {
        if value > MAX_MAX_RETRIES {
            return Err(ConfigError::InvalidMaxRetries {
                message: format!("must be between 0 and {} (got {})", MAX_MAX_RETRIES, value),
            });
        }
        loader.set_max_retries_if_unset(value);
    }
    if let Some(ms) = parse_env::<u64>("SPLUNK_POLL_INTERVAL_MS", "must be a number")? {
        loader.set_poll_interval_if_unset(Duration::from_millis(ms));
    }
    if let Some(ms) = parse_env::<u64>("SPLUNK_MAX_POLL_INTERVAL_MS", "must be a number")? {
        loader.set_max_poll_interval_if_unset(Duration::from_millis(ms));
    }
    if let Some(secs) = parse_env::<u64>("SPLUNK_MAX_WAIT_SECS", "must be a number")? {
        loader.set_max_wait_secs_if_unset(secs);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_var_or_none_filters_empty_and_whitespace_strings() {
        let key1 = "_SPLUNK_DISPATCH_TEST_UNSET_VAR";
        assert!(env_var_or_none(key1).is_none(), "Unset env var should return None");

        temp_env::with_vars([(key1, Some(""))], || {
            assert!(env_var_or_none(key1).is_none(), "Empty env var should return None");
        });

        temp_env::with_vars([(key1, Some("   "))], || {
            assert!(
                env_var_or_none(key1).is_none(),
                "Whitespace-only env var should return None"
            );
        });

        let key2 = "_SPLUNK_DISPATCH_TEST_SET_VAR";
        temp_env::with_vars([(key2, Some(" test-value "))], || {
            assert_eq!(env_var_or_none(key2), Some("test-value".to_string()));
        });
    }

    #[test]
    #[serial]
    fn test_parse_env_reports_variable_name() {
        temp_env::with_vars([("SPLUNK_POLL_INTERVAL_MS", Some("soon"))], || {
            let err = parse_env::<u64>("SPLUNK_POLL_INTERVAL_MS", "must be a number").unwrap_err();
            match err {
                ConfigError::InvalidValue { var, .. } => assert_eq!(var, "SPLUNK_POLL_INTERVAL_MS"),
                other => panic!("unexpected error: {other:?}"),
            }
        });
    }
}
