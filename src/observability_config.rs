//! # Observability Configuration
//!
//! Environment-specific settings for logging and metrics.

use std::env;

use crate::errors::{AppError, AppResult};

/// Observability configuration for different environments
#[derive(Debug, Clone, PartialEq)]
pub struct ObservabilityConfig {
    /// Environment name (development, staging, production)
    pub environment: String,
    /// Log level for the scanner's own targets
    pub log_level: String,
    /// Explicit log format ("pretty" or "json"); defaults by environment
    pub log_format: Option<String>,
    /// Whether to install the Prometheus metrics recorder
    pub enable_metrics: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            log_level: "info".to_string(),
            log_format: None,
            enable_metrics: true,
        }
    }
}

impl ObservabilityConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_format: env::var("LOG_FORMAT").ok(),
            enable_metrics: env::var("ENABLE_METRICS")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
        }
    }

    /// Check if running in development environment
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Whether logs should be human readable rather than JSON
    pub fn use_pretty_logs(&self) -> bool {
        match self.log_format.as_deref() {
            Some(format) => format.eq_ignore_ascii_case("pretty"),
            None => self.is_development(),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> AppResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(AppError::Config(format!(
                "Invalid log level: {}",
                self.log_level
            )));
        }

        if let Some(format) = &self.log_format {
            if !format.eq_ignore_ascii_case("pretty") && !format.eq_ignore_ascii_case("json") {
                return Err(AppError::Config(format!(
                    "Invalid log format: {} (expected 'pretty' or 'json')",
                    format
                )));
            }
        }

        let valid_environments = ["development", "staging", "production"];
        if !valid_environments.contains(&self.environment.as_str()) {
            return Err(AppError::Config(format!(
                "Invalid environment: {}",
                self.environment
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ObservabilityConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.use_pretty_logs());
    }

    #[test]
    fn test_log_format_override() {
        let config = ObservabilityConfig {
            environment: "production".to_string(),
            ..Default::default()
        };
        assert!(!config.use_pretty_logs());

        let config = ObservabilityConfig {
            environment: "production".to_string(),
            log_format: Some("PRETTY".to_string()),
            ..Default::default()
        };
        assert!(config.use_pretty_logs());
    }

    #[test]
    fn test_invalid_values() {
        let config = ObservabilityConfig {
            log_level: "verbose".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ObservabilityConfig {
            log_format: Some("xml".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ObservabilityConfig {
            environment: "moon".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
