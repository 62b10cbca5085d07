use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

use crate::processor::query_filter::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockConfig {
    pub source: SourceSection,
    #[serde(default)]
    pub display: DisplaySection,
}

/// Where the stock export lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSection {
    pub name: String,
    /// HTTP(S) URL or local file path
    pub location: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    // Optional environment variable names for overriding the file values
    pub env_location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySection {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    pub env_page_size: Option<String>,
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl StockConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read stock config file: {}", path))?;

        let mut config: StockConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse stock config file: {}", path))?;

        config.load_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Applies environment overrides, if the variables are set.
    pub fn load_overrides(&mut self) -> Result<()> {
        let location_var = self
            .source
            .env_location
            .as_deref()
            .unwrap_or("OPEN_BIN_SOURCE");
        if let Ok(location) = env::var(location_var) {
            self.source.location = location;
        }

        let page_size_var = self
            .display
            .env_page_size
            .as_deref()
            .unwrap_or("OPEN_BIN_PAGE_SIZE");
        if let Ok(page_size) = env::var(page_size_var) {
            self.display.page_size = page_size
                .trim()
                .parse()
                .with_context(|| format!("Invalid page size in {}: {}", page_size_var, page_size))?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.source.location.trim().is_empty() {
            return Err(anyhow::anyhow!("Source location cannot be empty"));
        }

        if self.display.page_size == 0 {
            return Err(anyhow::anyhow!("Page size must be at least 1"));
        }

        if self.source.timeout_seconds == 0 {
            return Err(anyhow::anyhow!("Request timeout must be at least 1 second"));
        }

        Ok(())
    }
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            source: SourceSection {
                name: "open_bin".to_string(),
                location: "Open Bin.csv".to_string(),
                timeout_seconds: default_timeout_seconds(),
                env_location: None,
            },
            display: DisplaySection::default(),
        }
    }
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            env_page_size: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StockConfig::default();
        assert_eq!(config.source.name, "open_bin");
        assert_eq!(config.display.page_size, 50);
        assert_eq!(config.source.timeout_seconds, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_with_defaults() {
        let config: StockConfig = toml::from_str(
            r#"
            [source]
            name = "open_bin"
            location = "https://example.com/Open%20Bin.csv"
            "#,
        )
        .unwrap();

        assert_eq!(config.display.page_size, 50);
        assert_eq!(config.source.timeout_seconds, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut config = StockConfig::default();
        config.display.page_size = 0;
        assert!(config.validate().is_err());

        let mut config = StockConfig::default();
        config.source.location = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        unsafe {
            env::set_var("TEST_OPEN_BIN_SOURCE", "/tmp/other.csv");
            env::set_var("TEST_OPEN_BIN_PAGE_SIZE", "25");
        }

        let mut config = StockConfig::default();
        config.source.env_location = Some("TEST_OPEN_BIN_SOURCE".to_string());
        config.display.env_page_size = Some("TEST_OPEN_BIN_PAGE_SIZE".to_string());

        assert!(config.load_overrides().is_ok());
        assert_eq!(config.source.location, "/tmp/other.csv");
        assert_eq!(config.display.page_size, 25);

        // Clean up
        unsafe {
            env::remove_var("TEST_OPEN_BIN_SOURCE");
            env::remove_var("TEST_OPEN_BIN_PAGE_SIZE");
        }
    }

    #[test]
    fn test_invalid_page_size_override() {
        unsafe {
            env::set_var("TEST_BAD_PAGE_SIZE", "fifty");
        }

        let mut config = StockConfig::default();
        config.source.env_location = Some("TEST_UNSET_SOURCE_VAR".to_string());
        config.display.env_page_size = Some("TEST_BAD_PAGE_SIZE".to_string());
        assert!(config.load_overrides().is_err());

        unsafe {
            env::remove_var("TEST_BAD_PAGE_SIZE");
        }
    }
}
