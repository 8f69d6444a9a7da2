//! Core business logic: loading, statistics and exchange rates

pub mod analytics;
pub mod config;
pub mod dataset;
pub mod loader;
pub mod log;
pub mod rates;
pub mod rounding;
pub mod synthetic;

// Re-export main types for cleaner imports
pub use analytics::{CountrySummary, GrowthRow, StatsError};
pub use dataset::{Dataset, Metric, Record};
pub use loader::{LoadError, ParseFailure, load_dataset};
pub use rates::{ExchangeRateProvider, ExchangeRates, convert};
