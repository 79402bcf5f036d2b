// src/services/mod.rs
pub mod cache;
pub mod charts;
pub mod loader;
pub mod period;
pub mod transform;
