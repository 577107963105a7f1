//! # Unified Application Configuration
//!
//! This module provides a centralized configuration system that consolidates
//! all application settings into a single, structured configuration object.
//! It supports loading from environment variables, validation, and provides
//! a clean interface for accessing configuration throughout the application.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::{AppError, AppResult};
use crate::matcher::MatcherConfig;
use crate::observability_config::ObservabilityConfig;
use crate::scan_session::ScanConfig;

/// Where the selected allergen list is kept
#[derive(Debug, Clone, PartialEq)]
pub struct StorageConfig {
    /// Path of the JSON allergen list
    pub allergens_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            allergens_file: PathBuf::from("allergens.json"),
        }
    }
}

impl StorageConfig {
    /// Validate storage configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.allergens_file.as_os_str().is_empty() {
            return Err(AppError::Config(
                "Allergens file path cannot be empty".to_string(),
            ));
        }

        if self.allergens_file.is_dir() {
            return Err(AppError::Config(format!(
                "Allergens file path '{}' is a directory",
                self.allergens_file.display()
            )));
        }

        Ok(())
    }
}

/// Unified application configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    /// Matching rules
    pub matcher: MatcherConfig,
    /// Allergen list storage
    pub storage: StorageConfig,
    /// Scan session throttling
    pub scan: ScanConfig,
    /// Logging and metrics
    pub observability: ObservabilityConfig,
}

/// Parse an optional environment variable, keeping `default` when unset
fn env_or<T: FromStr>(key: &str, default: T) -> AppResult<T> {
    match env::var(key) {
        Ok(value) => value.trim().parse().map_err(|_| {
            AppError::Config(format!("{} must be a valid value, got '{}'", key, value))
        }),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        // Matcher configuration
        config.matcher.enable_fuzzy_matching =
            env_or("ENABLE_FUZZY_MATCHING", config.matcher.enable_fuzzy_matching)?;
        config.matcher.threshold_divisor =
            env_or("FUZZY_THRESHOLD_DIVISOR", config.matcher.threshold_divisor)?;
        config.matcher.min_threshold = env_or("FUZZY_MIN_THRESHOLD", config.matcher.min_threshold)?;
        config.matcher.min_word_length =
            env_or("FUZZY_MIN_WORD_LENGTH", config.matcher.min_word_length)?;

        // Storage configuration
        if let Ok(path) = env::var("ALLERGENS_FILE") {
            config.storage.allergens_file = PathBuf::from(path);
        }

        // Scan session configuration
        let interval_ms: u64 = env_or(
            "SCAN_INTERVAL_MS",
            config.scan.scan_interval.as_millis() as u64,
        )?;
        config.scan.scan_interval = Duration::from_millis(interval_ms);
        config.scan.deduplicate = env_or("SCAN_DEDUPLICATE", config.scan.deduplicate)?;

        // Observability configuration
        config.observability = ObservabilityConfig::from_env();

        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> AppResult<()> {
        self.matcher.validate()?;
        self.storage.validate()?;
        self.scan.validate()?;
        self.observability.validate()?;
        Ok(())
    }

    /// Get a summary of the current configuration for logging
    pub fn summary(&self) -> String {
        format!(
            "Configuration: allergens_file={}, fuzzy={}, threshold=len/{} (min {}), scan_interval_ms={}, deduplicate={}, environment={}",
            self.storage.allergens_file.display(),
            self.matcher.enable_fuzzy_matching,
            self.matcher.threshold_divisor,
            self.matcher.min_threshold,
            self.scan.scan_interval.as_millis(),
            self.scan.deduplicate,
            self.observability.environment
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.matcher.threshold_divisor, 4);
        assert_eq!(config.matcher.min_threshold, 1);
    }

    #[test]
    fn test_storage_config_validation() {
        let mut config = StorageConfig::default();
        assert!(config.validate().is_ok());

        config.allergens_file = PathBuf::new();
        assert!(config.validate().is_err());

        let dir = tempfile::tempdir().unwrap();
        config.allergens_file = dir.path().to_path_buf();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_or_parsing() {
        // Variable names unique to this test to avoid interference
        env::set_var("ALLERGEN_TEST_ENV_OR_NUMBER", "7");
        env::set_var("ALLERGEN_TEST_ENV_OR_BAD", "seven");

        assert_eq!(env_or("ALLERGEN_TEST_ENV_OR_NUMBER", 1usize).unwrap(), 7);
        assert_eq!(env_or("ALLERGEN_TEST_ENV_OR_UNSET", 3usize).unwrap(), 3);
        assert!(matches!(
            env_or("ALLERGEN_TEST_ENV_OR_BAD", 1usize),
            Err(AppError::Config(_))
        ));

        env::remove_var("ALLERGEN_TEST_ENV_OR_NUMBER");
        env::remove_var("ALLERGEN_TEST_ENV_OR_BAD");
    }

    #[test]
    fn test_summary_mentions_key_settings() {
        let summary = AppConfig::default().summary();
        assert!(summary.contains("allergens.json"));
        assert!(summary.contains("threshold=len/4"));
    }
}
