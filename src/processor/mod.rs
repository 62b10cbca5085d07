pub mod delimited_tokenizer;
pub mod ingest_pipeline;
pub mod plant_aggregator;
pub mod query_filter;
pub mod row_expander;
pub mod schema_normalizer;
pub mod stock_classifier;

pub use delimited_tokenizer::*;
pub use ingest_pipeline::*;
pub use plant_aggregator::*;
pub use query_filter::*;
pub use row_expander::*;
pub use schema_normalizer::*;
pub use stock_classifier::*;
