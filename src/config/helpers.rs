// src/config/helpers.rs
// Helper functions for loading environment variables

use std::env;
use std::str::FromStr;

use crate::error::{Result, VersusError};

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

pub fn env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse a variable if set; a value that fails to parse is an error, not a default
pub fn env_parsed<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_optional(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| VersusError::Config(format!("failed to parse {key}={raw}: {e}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Variable names are unique to each test; tests run in parallel.

    #[test]
    fn test_env_parsed_default_and_error() {
        assert_eq!(env_parsed("VERSUS_TEST_UNSET_PORT", 3000u16).unwrap(), 3000);

        unsafe { env::set_var("VERSUS_TEST_BAD_PORT", "not-a-port") };
        let err = env_parsed("VERSUS_TEST_BAD_PORT", 3000u16).unwrap_err();
        assert!(matches!(err, VersusError::Config(ref m) if m.contains("VERSUS_TEST_BAD_PORT")));
    }

    #[test]
    fn test_env_or_ignores_blank_values() {
        unsafe { env::set_var("VERSUS_TEST_BLANK_HOST", "  ") };
        assert_eq!(env_or("VERSUS_TEST_BLANK_HOST", "127.0.0.1"), "127.0.0.1");
    }
}
