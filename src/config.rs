// src/config.rs
use anyhow::{Context, Result};
use log::{info, warn};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3030;
pub const DEFAULT_DATA_PATH: &str = "pd_dataframe_tbills.xlsx";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,
    pub data_path: PathBuf,
}

impl AppConfig {
    /// Reads `PORT` and `TBILLS_DATA_PATH`, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a number, got '{}'", raw))?,
            None => {
                warn!("$PORT not set, defaulting to {}", DEFAULT_PORT);
                DEFAULT_PORT
            }
        };

        let data_path = match lookup("TBILLS_DATA_PATH") {
            Some(p) if !p.trim().is_empty() => PathBuf::from(p.trim()),
            _ => {
                warn!("$TBILLS_DATA_PATH not set, defaulting to {}", DEFAULT_DATA_PATH);
                PathBuf::from(DEFAULT_DATA_PATH)
            }
        };

        info!("Using PORT: {}, data file: {}", port, data_path.display());
        Ok(AppConfig { port, data_path })
    }
}
