//! Generator configuration.
//!
//! ```
//! use autobuilder_core::GeneratorConfig;
//!
//! let config = GeneratorConfig::default()
//!     .with_seed(7)
//!     .with_collection_count(3);
//! assert_eq!(config.string_length, 10);
//! ```

use crate::error::{GenerateError, GenerateResult};
use crate::randomizer::MAX_DATE_WINDOW_DAYS;
use anyhow::Context;
use autobuilder_types::env_utils::{env_list, env_string_or, env_var, env_var_or};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Default character pool for generated text.
pub const DEFAULT_STRING_POOL: &str = "abcdefghijklmnopqrstuvwxyz";

/// Configuration shared by every strategy in one generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Seed for the random source. `None` seeds from OS entropy.
    pub seed: Option<u64>,

    /// Element count for arrays, lists and sets, and candidate key count for
    /// dictionaries (default: 1).
    pub collection_count: usize,

    /// Length of generated text (default: 10).
    pub string_length: usize,

    /// Characters generated text is drawn from (default: `a`-`z`).
    pub string_pool: String,

    /// Generated dates fall within this many days before the reference time (default: 1).
    pub date_window_days: i64,

    /// Reference instant for generated dates. `None` means "now".
    pub reference_time: Option<DateTime<Utc>>,

    /// Recursion limit. `None` disables the guard (default).
    pub max_depth: Option<usize>,

    /// Enum variants never selected, keyed by enum type name.
    pub enum_exclusions: BTreeMap<String, Vec<String>>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            collection_count: 1,
            string_length: 10,
            string_pool: DEFAULT_STRING_POOL.to_string(),
            date_window_days: 1,
            reference_time: None,
            max_depth: None,
            enum_exclusions: BTreeMap::new(),
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `AUTOBUILDER_*` environment variables.
    ///
    /// - `AUTOBUILDER_SEED`
    /// - `AUTOBUILDER_COLLECTION_COUNT`
    /// - `AUTOBUILDER_STRING_LENGTH`
    /// - `AUTOBUILDER_STRING_POOL`
    /// - `AUTOBUILDER_DATE_WINDOW_DAYS`
    /// - `AUTOBUILDER_MAX_DEPTH`
    /// - `AUTOBUILDER_ENUM_EXCLUSIONS` (comma-separated `Enum.Variant` entries)
    ///
    /// The result is validated the same way as [`from_json_str`](Self::from_json_str).
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        let mut enum_exclusions: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for entry in env_list("AUTOBUILDER_ENUM_EXCLUSIONS") {
            if let Some((enum_name, variant)) = entry.split_once('.') {
                enum_exclusions
                    .entry(enum_name.to_string())
                    .or_default()
                    .push(variant.to_string());
            }
        }

        let config = Self {
            seed: env_var("AUTOBUILDER_SEED"),
            collection_count: env_var_or("AUTOBUILDER_COLLECTION_COUNT", defaults.collection_count),
            string_length: env_var_or("AUTOBUILDER_STRING_LENGTH", defaults.string_length),
            string_pool: env_string_or("AUTOBUILDER_STRING_POOL", &defaults.string_pool),
            date_window_days: env_var_or("AUTOBUILDER_DATE_WINDOW_DAYS", defaults.date_window_days),
            reference_time: None,
            max_depth: env_var("AUTOBUILDER_MAX_DEPTH"),
            enum_exclusions,
        };
        config
            .validate()
            .context("Invalid AUTOBUILDER_* environment configuration")?;
        Ok(config)
    }

    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(json).context("Failed to parse generator config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_collection_count(mut self, count: usize) -> Self {
        self.collection_count = count;
        self
    }

    pub fn with_string_length(mut self, length: usize) -> Self {
        self.string_length = length;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_reference_time(mut self, reference: DateTime<Utc>) -> Self {
        self.reference_time = Some(reference);
        self
    }

    pub fn exclude_enum_value(mut self, enum_name: &str, variant: &str) -> Self {
        self.enum_exclusions
            .entry(enum_name.to_string())
            .or_default()
            .push(variant.to_string());
        self
    }

    /// Variants excluded for an enum type.
    pub fn excluded_variants(&self, enum_name: &str) -> &[String] {
        self.enum_exclusions
            .get(enum_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn validate(&self) -> GenerateResult<()> {
        if self.string_length > 0 && self.string_pool.is_empty() {
            return Err(GenerateError::invalid_argument(
                "string_pool",
                "must not be empty when string_length > 0",
            ));
        }
        if self.date_window_days < 0 {
            return Err(GenerateError::invalid_argument(
                "date_window_days",
                "must not be negative",
            ));
        }
        if self.date_window_days > MAX_DATE_WINDOW_DAYS {
            return Err(GenerateError::invalid_argument(
                "date_window_days",
                format!("must not exceed {}", MAX_DATE_WINDOW_DAYS),
            ));
        }
        if self.max_depth == Some(0) {
            return Err(GenerateError::invalid_argument(
                "max_depth",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // Tests reading AUTOBUILDER_* variables share the process environment.
    static ENV_LOCK: parking_lot::Mutex<()> = parking_lot::const_mutex(());

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.collection_count, 1);
        assert_eq!(config.string_length, 10);
        assert_eq!(config.string_pool, DEFAULT_STRING_POOL);
        assert_eq!(config.date_window_days, 1);
        assert!(config.seed.is_none());
        assert!(config.max_depth.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = GeneratorConfig::from_json_str(
            r#"{ "seed": 9, "collection_count": 4, "enum_exclusions": { "Color": ["Red"] } }"#,
        )
        .unwrap();
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.collection_count, 4);
        assert_eq!(config.string_length, 10);
        assert_eq!(config.excluded_variants("Color"), ["Red".to_string()]);
        assert!(config.excluded_variants("Shape").is_empty());
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        let err = GeneratorConfig::from_json_str(r#"{ "string_pool": "" }"#).unwrap_err();
        assert!(format!("{:#}", err).contains("string_pool"));
        assert!(GeneratorConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "string_length": 4, "max_depth": 6 }}"#).unwrap();
        let config = GeneratorConfig::from_file(file.path()).unwrap();
        assert_eq!(config.string_length, 4);
        assert_eq!(config.max_depth, Some(6));

        assert!(GeneratorConfig::from_file("/nonexistent/autobuilder.json").is_err());
    }

    #[test]
    fn test_from_env() {
        let _guard = ENV_LOCK.lock();
        std::env::set_var("AUTOBUILDER_COLLECTION_COUNT", "5");
        std::env::set_var("AUTOBUILDER_ENUM_EXCLUSIONS", "Color.Red,Color.Blue,bogus");
        let config = GeneratorConfig::from_env();
        std::env::remove_var("AUTOBUILDER_COLLECTION_COUNT");
        std::env::remove_var("AUTOBUILDER_ENUM_EXCLUSIONS");
        let config = config.unwrap();

        assert_eq!(config.collection_count, 5);
        assert_eq!(config.string_length, 10);
        assert_eq!(
            config.excluded_variants("Color"),
            ["Red".to_string(), "Blue".to_string()]
        );
    }

    #[test]
    fn test_from_env_rejects_empty_string_pool() {
        let _guard = ENV_LOCK.lock();
        std::env::set_var("AUTOBUILDER_STRING_POOL", "");
        let result = GeneratorConfig::from_env();
        std::env::remove_var("AUTOBUILDER_STRING_POOL");

        let err = result.unwrap_err();
        assert!(format!("{:#}", err).contains("string_pool"));
    }

    #[test]
    fn test_date_window_beyond_calendar_rejected() {
        let err = GeneratorConfig::from_json_str(r#"{ "seed": 1, "date_window_days": 1000000000 }"#)
            .unwrap_err();
        assert!(format!("{:#}", err).contains("date_window_days"));

        let widest = GeneratorConfig {
            date_window_days: MAX_DATE_WINDOW_DAYS,
            ..GeneratorConfig::default()
        };
        assert!(widest.validate().is_ok());
    }
}
