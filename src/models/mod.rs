pub mod stock_models;

pub use stock_models::*;
