//! Sales data sources: the HTTP backend and its built-in fallback sample.

pub mod client;
pub mod sample;

pub use client::SalesClient;
pub use sample::fallback_sales;
