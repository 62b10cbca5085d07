use anyhow::Result;
use tracing::{info, warn};

use crate::models::{ExpandedRecord, StatusClass};
use crate::processor::delimited_tokenizer::{DelimitedTokenizer, Delimiter};
use crate::processor::row_expander::expand_all;
use crate::processor::schema_normalizer::SchemaNormalizer;

/// What one ingestion pass saw and repaired.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    pub delimiter: Delimiter,
    pub header_repaired: bool,
    pub data_rows: usize,
    pub overflow_rows: usize,
    pub padded_rows: usize,
    pub unmapped_fields: Vec<&'static str>,
    pub expanded_records: usize,
    pub unresolved_sites: usize,
    pub unclassified_statuses: usize,
}

/// Text in, expanded records out. Holds no dataset state of its own.
pub struct IngestPipeline {
    tokenizer: DelimitedTokenizer,
    normalizer: SchemaNormalizer,
}

impl IngestPipeline {
    pub fn new() -> Result<Self> {
        Ok(IngestPipeline {
            tokenizer: DelimitedTokenizer::new()?,
            normalizer: SchemaNormalizer::new(),
        })
    }

    pub fn with_normalizer(normalizer: SchemaNormalizer) -> Result<Self> {
        Ok(IngestPipeline {
            tokenizer: DelimitedTokenizer::new()?,
            normalizer,
        })
    }

    pub fn run(&self, text: &str) -> (Vec<ExpandedRecord>, IngestReport) {
        let table = self.tokenizer.parse_table(text);
        let mapping = self.normalizer.resolve(&table.header);

        let canonical: Vec<_> = table.rows.iter().map(|row| mapping.apply(row)).collect();
        let data_rows = canonical.len();
        let records = expand_all(canonical);

        let unresolved_sites = records.iter().filter(|r| r.site.is_none()).count();
        let unclassified_statuses = records
            .iter()
            .filter(|r| r.status_class == StatusClass::Unclassified)
            .count();

        if unresolved_sites > 0 {
            warn!("{} records have no recognized site code", unresolved_sites);
        }
        if unclassified_statuses > 0 {
            warn!("{} records have an unrecognized stock status", unclassified_statuses);
        }
        info!("Expanded {} rows into {} records", data_rows, records.len());

        let report = IngestReport {
            delimiter: table.delimiter,
            header_repaired: table.header_repaired,
            data_rows,
            overflow_rows: table.overflow_rows,
            padded_rows: table.padded_rows,
            unmapped_fields: mapping.unmapped_fields().iter().map(|f| f.name()).collect(),
            expanded_records: records.len(),
            unresolved_sites,
            unclassified_statuses,
        };

        (records, report)
    }
}
