//! Environment variable parsing utilities.
//!
//! Type-safe helpers for reading optional settings from the environment,
//! replacing the repeated `std::env::var(..).ok().and_then(|v| v.parse().ok())`
//! pattern.
//!
//! # Example
//!
//! ```
//! use autobuilder_types::env_utils::{env_var, env_var_or};
//!
//! let count: usize = env_var_or("AUTOBUILDER_COLLECTION_COUNT", 1);
//! let seed: Option<u64> = env_var("AUTOBUILDER_SEED");
//! ```

use std::str::FromStr;

/// Parse an environment variable into a type that implements `FromStr`.
///
/// Returns `None` if the variable is not set or cannot be parsed.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Parse an environment variable with a default value.
///
/// Returns the default if the variable is not set or cannot be parsed.
pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

/// Get an environment variable as a string with a default value.
pub fn env_string_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a comma-separated environment variable into a vector.
///
/// Empty items are dropped. Returns an empty vector if the variable is not set.
///
/// ```
/// use autobuilder_types::env_utils::env_list;
///
/// // AUTOBUILDER_ENUM_EXCLUSIONS="Color.Red, Color.Blue"
/// let excluded: Vec<String> = env_list("AUTOBUILDER_ENUM_EXCLUSIONS");
/// ```
pub fn env_list(key: &str) -> Vec<String> {
    std::env::var(key)
        .ok()
        .map(|v| {
            v.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}
