//! Terminal views over the core statistics.

pub mod compare;
pub mod countries;
pub mod map;
pub mod setup;
pub mod stats;
pub mod top;
pub mod trend;
pub mod ui;
