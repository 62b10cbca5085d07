use anyhow::Result;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::StockConfig;
use crate::error::{StockError, StockResult};
use crate::fetcher::TextSource;
use crate::models::{ExpandedRecord, PlantSummary};
use crate::processor::ingest_pipeline::{IngestPipeline, IngestReport};
use crate::processor::plant_aggregator::summarize;
use crate::processor::query_filter::{self, Facets};

/// One fully ingested export. Never modified after it is published.
#[derive(Debug)]
pub struct Dataset {
    records: Vec<ExpandedRecord>,
    report: IngestReport,
    ingested_at: DateTime<Local>,
}

impl Dataset {
    pub fn records(&self) -> &[ExpandedRecord] {
        &self.records
    }

    pub fn report(&self) -> &IngestReport {
        &self.report
    }

    pub fn ingested_at(&self) -> DateTime<Local> {
        self.ingested_at
    }
}

#[derive(Debug, Serialize)]
pub struct PageView<'a> {
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub rows: Vec<&'a ExpandedRecord>,
}

/// Holds the current dataset snapshot and the active filter. Views are
/// derived from the snapshot on every call.
pub struct StockSession {
    pipeline: IngestPipeline,
    page_size: usize,
    dataset: Option<Arc<Dataset>>,
    query: String,
    facets: Facets,
    page: usize,
}

impl StockSession {
    pub fn new(page_size: usize) -> Result<Self> {
        Ok(StockSession {
            pipeline: IngestPipeline::new()?,
            page_size: page_size.max(1),
            dataset: None,
            query: String::new(),
            facets: Facets::default(),
            page: 1,
        })
    }

    pub fn from_config(config: &StockConfig) -> Result<Self> {
        Self::new(config.display.page_size)
    }

    pub fn is_ready(&self) -> bool {
        self.dataset.is_some()
    }

    /// Builds a complete dataset from `text` and only then replaces the
    /// current one. The active filter is kept; the page cursor resets.
    pub fn ingest(&mut self, text: &str) -> IngestReport {
        let (records, report) = self.pipeline.run(text);
        let dataset = Dataset {
            records,
            report: report.clone(),
            ingested_at: Local::now(),
        };

        self.dataset = Some(Arc::new(dataset));
        self.page = 1;
        info!("Published dataset with {} records", report.expanded_records);

        report
    }

    /// Fetches from `source` and ingests. A failed fetch leaves the previous
    /// dataset untouched.
    pub async fn refresh(&mut self, source: &dyn TextSource) -> StockResult<IngestReport> {
        match source.fetch_text().await {
            Ok(text) => Ok(self.ingest(&text)),
            Err(e) => {
                error!("Ingestion aborted, keeping previous dataset: {:#}", e);
                Err(StockError::Fetch {
                    location: source.describe(),
                    message: format!("{:#}", e),
                })
            }
        }
    }

    pub fn set_filter(&mut self, query: &str, facets: Facets) {
        self.query = query.to_string();
        self.facets = facets;
        self.page = 1;
    }

    pub fn clear_filter(&mut self) {
        self.set_filter("", Facets::default());
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    pub fn snapshot(&self) -> StockResult<Arc<Dataset>> {
        self.dataset.clone().ok_or(StockError::NotReady)
    }

    fn dataset(&self) -> StockResult<&Dataset> {
        self.dataset.as_deref().ok_or(StockError::NotReady)
    }

    pub fn records(&self) -> StockResult<&[ExpandedRecord]> {
        Ok(self.dataset()?.records())
    }

    pub fn filtered(&self) -> StockResult<Vec<&ExpandedRecord>> {
        let dataset = self.dataset()?;
        Ok(query_filter::filter(dataset.records(), &self.query, &self.facets))
    }

    pub fn summary(&self) -> StockResult<Vec<PlantSummary>> {
        Ok(summarize(self.dataset()?.records()))
    }

    /// Summary over the current filtered view rather than the whole dataset.
    pub fn filtered_summary(&self) -> StockResult<Vec<PlantSummary>> {
        Ok(summarize(self.filtered()?))
    }

    pub fn page_count(&self) -> StockResult<usize> {
        Ok(query_filter::page_count(self.filtered()?.len(), self.page_size))
    }

    pub fn current_page(&self) -> StockResult<PageView<'_>> {
        let filtered = self.filtered()?;
        let total_pages = query_filter::page_count(filtered.len(), self.page_size);
        let rows = query_filter::page_slice(&filtered, self.page, self.page_size).to_vec();

        Ok(PageView {
            number: self.page,
            total_pages,
            total_items: filtered.len(),
            rows,
        })
    }

    pub fn next_page(&mut self) -> StockResult<usize> {
        self.go_to_page(self.page + 1)
    }

    pub fn prev_page(&mut self) -> StockResult<usize> {
        self.go_to_page(self.page.saturating_sub(1))
    }

    /// Moves the cursor, clamped to the pages of the current view.
    pub fn go_to_page(&mut self, page: usize) -> StockResult<usize> {
        let pages = self.page_count()?;
        self.page = page.clamp(1, pages);
        Ok(self.page)
    }
}
