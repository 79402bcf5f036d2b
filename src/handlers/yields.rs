// src/handlers/yields.rs
use warp::reply::Json;
use warp::Rejection;
use serde::Deserialize;
use std::sync::Arc;
use log::{error, info, warn};
use crate::services::cache::{LoadedTable, YieldStore};
use crate::services::{charts, transform};
use super::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CurveQuery {
    pub period: Option<String>,
}

/// Loaded table, or the "no data" rejection when there is nothing to chart.
/// A cold cache reads the sheet from disk, so the lookup runs on the blocking
/// pool.
async fn require_data(store: &Arc<YieldStore>) -> Result<Arc<LoadedTable>, Rejection> {
    let lookup = Arc::clone(store);
    let loaded = tokio::task::spawn_blocking(move || lookup.table())
        .await
        .map_err(|e| {
            error!("Yield sheet load task failed: {}", e);
            warp::reject::custom(ApiError::new(e.to_string()))
        })?;
    if loaded.is_empty() {
        warn!("No yield data available from {}", store.data_path().display());
        return Err(warp::reject::custom(ApiError::no_data(loaded.load_error.clone())));
    }
    Ok(loaded)
}

pub async fn get_summary(store: Arc<YieldStore>) -> Result<Json, Rejection> {
    info!("Handling request for table summary");
    let loaded = require_data(&store).await?;
    Ok(warp::reply::json(&charts::summary(&loaded.table)))
}

pub async fn get_periods(store: Arc<YieldStore>) -> Result<Json, Rejection> {
    info!("Handling request for periods");
    let loaded = require_data(&store).await?;
    Ok(warp::reply::json(&charts::periods(&loaded.table)))
}

pub async fn get_tidy(store: Arc<YieldStore>) -> Result<Json, Rejection> {
    info!("Handling request for tidy yields");
    let loaded = require_data(&store).await?;
    let rows = transform::chronological(&transform::to_tidy(&loaded.table));
    Ok(warp::reply::json(&rows))
}

pub async fn get_time_series(store: Arc<YieldStore>) -> Result<Json, Rejection> {
    info!("Handling request for tenor time series");
    let loaded = require_data(&store).await?;
    Ok(warp::reply::json(&charts::time_series(&loaded.table)))
}

pub async fn get_curve(query: CurveQuery, store: Arc<YieldStore>) -> Result<Json, Rejection> {
    let loaded = require_data(&store).await?;
    let period = match query.period {
        Some(p) => p,
        // Non-empty table always has a latest period.
        None => charts::latest_period(&loaded.table).unwrap_or_default(),
    };
    info!("Handling request for yield curve of '{}'", period);
    Ok(warp::reply::json(&charts::yield_curve(&loaded.table, &period)))
}

pub async fn get_grid(store: Arc<YieldStore>) -> Result<Json, Rejection> {
    info!("Handling request for yield grid");
    let loaded = require_data(&store).await?;
    Ok(warp::reply::json(&charts::yield_grid(&loaded.table)))
}
