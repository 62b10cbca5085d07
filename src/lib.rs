//! Open Bin stock pipeline: ingests a warehouse stock export (CSV or TSV),
//! normalizes and expands it per plant, and serves filtered and summarized
//! views of the result.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod processor;
pub mod session;

pub use error::{StockError, StockResult};
pub use session::{Dataset, PageView, StockSession};
