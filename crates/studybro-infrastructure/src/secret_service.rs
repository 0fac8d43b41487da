//! API key resolution.
//!
//! The provider key comes from the process environment only. It is never
//! written to disk or logged.

use studybro_core::{Result, StudyError};

/// Environment variables consulted, in order.
pub const API_KEY_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

/// Reads the provider API key from the environment.
pub fn api_key_from_env() -> Result<String> {
    resolve_api_key(|name| std::env::var(name).ok())
}

/// Returns the first non-blank value among [`API_KEY_VARS`].
pub fn resolve_api_key<F>(lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    API_KEY_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .ok_or_else(|| {
            StudyError::config(format!(
                "no API key found; set one of {}",
                API_KEY_VARS.join(", ")
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_primary_variable_wins() {
        let vars = env(&[("API_KEY", "primary"), ("GEMINI_API_KEY", "fallback")]);
        let key = resolve_api_key(|name| vars.get(name).cloned()).unwrap();
        assert_eq!(key, "primary");
    }

    #[test]
    fn test_blank_primary_falls_back() {
        let vars = env(&[("API_KEY", "  "), ("GEMINI_API_KEY", "fallback")]);
        let key = resolve_api_key(|name| vars.get(name).cloned()).unwrap();
        assert_eq!(key, "fallback");
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let err = resolve_api_key(|_| None).unwrap_err();
        assert!(matches!(err, StudyError::Config(_)));
        assert!(err.to_string().contains("API_KEY"));
    }
}
