// src/lib.rs

pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::cache::{LoadedTable, TableCache};
pub use services::loader::{load, try_load, DataSourceError};
pub use services::period::{derive_period_timestamp, parse_period, PeriodParseError};
pub use services::transform::{by_tenor_order, chronological, pivot, slice_by_period, to_tidy};
