use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use wreq::Client;
use wreq_util::Emulation;

use crate::config::StockConfig;

/// Somewhere the stock export text can be read from, once per ingestion.
#[async_trait]
pub trait TextSource: Send + Sync {
    fn describe(&self) -> String;

    async fn fetch_text(&self) -> Result<String>;
}

pub struct HttpTextSource {
    client: Client,
    url: String,
}

impl HttpTextSource {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .emulation(Emulation::Firefox136)
            .timeout(timeout)
            .build()?;

        Ok(HttpTextSource {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl TextSource for HttpTextSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch_text(&self) -> Result<String> {
        info!("Fetching stock export from: {}", self.url);

        let response = self
            .client
            .get(self.url.as_str())
            .send()
            .await
            .with_context(|| format!("Request to {} failed", self.url))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {}", response.status()));
        }

        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read body from {}", self.url))?;

        info!("Fetched {} bytes from {}", text.len(), self.url);
        Ok(text)
    }
}

pub struct FileTextSource {
    path: PathBuf,
}

impl FileTextSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileTextSource { path: path.into() }
    }
}

#[async_trait]
impl TextSource for FileTextSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_text(&self) -> Result<String> {
        info!("Reading stock export from: {}", self.path.display());

        let text = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        info!("Read {} bytes from {}", text.len(), self.path.display());
        Ok(text)
    }
}

/// URLs go through HTTP, anything else is treated as a local path.
pub fn source_from_config(config: &StockConfig) -> Result<Box<dyn TextSource>> {
    let location = config.source.location.as_str();
    if location.starts_with("http://") || location.starts_with("https://") {
        let timeout = Duration::from_secs(config.source.timeout_seconds);
        Ok(Box::new(HttpTextSource::new(location, timeout)?))
    } else {
        Ok(Box::new(FileTextSource::new(location)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_selection() {
        let mut config = StockConfig::default();
        config.source.location = "data/Open Bin.csv".to_string();
        let source = source_from_config(&config).unwrap();
        assert_eq!(source.describe(), "data/Open Bin.csv");
    }

    #[tokio::test]
    async fn test_file_source_reads_text() {
        let path = std::env::temp_dir().join(format!("open-bin-{}.csv", std::process::id()));
        tokio::fs::write(&path, "Site,Status\nJUR,Available\n").await.unwrap();

        let source = FileTextSource::new(&path);
        let text = source.fetch_text().await.unwrap();
        assert!(text.starts_with("Site,Status"));

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let source = FileTextSource::new("/definitely/not/here/open-bin.csv");
        assert!(source.fetch_text().await.is_err());
    }
}
