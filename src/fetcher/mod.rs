pub mod text_fetcher;

pub use text_fetcher::*;
