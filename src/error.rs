use thiserror::Error;

/// Errors surfaced by a stock session to its caller.
#[derive(Debug, Error)]
pub enum StockError {
    /// The source could not be read; the previous dataset stays in place.
    #[error("Failed to fetch stock export from {location}: {message}")]
    Fetch { location: String, message: String },
    #[error("No stock data has been ingested yet")]
    NotReady,
}

pub type StockResult<T> = std::result::Result<T, StockError>;
