// src/bin/inspect_tbills.rs
use anyhow::{Context, Result};
use dotenv::dotenv;
use log::{info, warn};
use std::env;

use tbills_india_dashboard::config::DEFAULT_DATA_PATH;
use tbills_india_dashboard::services::{charts, loader};

fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let path = env::args().nth(1).unwrap_or_else(|| {
        warn!("No path given, defaulting to {}", DEFAULT_DATA_PATH);
        DEFAULT_DATA_PATH.to_string()
    });

    let table = loader::try_load(&path).with_context(|| format!("Could not load '{}'", path))?;
    let summary = charts::summary(&table);

    info!("Period column: {}", summary.period_column);
    info!("Tenors:        {}", summary.tenors.join(", "));
    info!("Rows:          {}", summary.row_count);
    info!(
        "Range:         {} .. {}",
        summary.first_period.as_deref().unwrap_or("-"),
        summary.last_period.as_deref().unwrap_or("-")
    );
    info!("Missing cells: {}", summary.missing_yields);
    if !summary.unparseable_periods.is_empty() {
        warn!("Unparseable periods: {:?}", summary.unparseable_periods);
    }

    if let Some(latest) = charts::latest_period(&table) {
        let curve = charts::yield_curve(&table, &latest);
        info!("Yield curve for {}:", latest);
        for point in &curve.points {
            match point.yield_pct {
                Some(y) => info!("  {:>9}  {:.2}%", point.tenor, y),
                None => info!("  {:>9}  -", point.tenor),
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
