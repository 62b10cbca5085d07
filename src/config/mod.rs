pub mod stock_config;

pub use stock_config::*;
