// src/routes.rs
use std::sync::Arc;
use warp::reject::Rejection;
use crate::handlers::yields::{
    get_curve, get_grid, get_periods, get_summary, get_tidy, get_time_series, CurveQuery,
};
use crate::services::cache::YieldStore;
use log::{error, info};

use std::convert::Infallible;
use warp::http::StatusCode;
use warp::{Filter, Reply};
use crate::handlers::error::ApiError;

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let api_error = if err.is_not_found() {
        ApiError::with_status(StatusCode::NOT_FOUND, "Not Found")
    } else if let Some(api_error) = err.find::<ApiError>() {
        api_error.clone()
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        ApiError::with_status(StatusCode::BAD_REQUEST, "Invalid query string")
    } else {
        error!("Unhandled rejection: {:?}", err);
        ApiError::new("Internal Server Error")
    };

    let body = match &api_error.detail {
        Some(detail) => serde_json::json!({ "error": api_error.message, "detail": detail }),
        None => serde_json::json!({ "error": api_error.message }),
    };
    Ok(warp::reply::with_status(warp::reply::json(&body), api_error.status))
}

pub fn routes(store: Arc<YieldStore>) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let store_filter = warp::any().map(move || store.clone());

    let summary_route = warp::path!("api" / "v1" / "summary")
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(get_summary);

    let periods_route = warp::path!("api" / "v1" / "periods")
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(get_periods);

    let tidy_route = warp::path!("api" / "v1" / "tidy")
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(get_tidy);

    let time_series_route = warp::path!("api" / "v1" / "time_series")
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(get_time_series);

    let curve_route = warp::path!("api" / "v1" / "curve")
        .and(warp::get())
        .and(warp::query::<CurveQuery>())
        .and(store_filter.clone())
        .and_then(get_curve);

    // Surface and heatmap render the same period x tenor grid.
    let surface_route = warp::path!("api" / "v1" / "surface")
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(get_grid);

    let heatmap_route = warp::path!("api" / "v1" / "heatmap")
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(get_grid);

    info!("All routes configured successfully.");

    summary_route
        .or(periods_route)
        .or(tidy_route)
        .or(time_series_route)
        .or(curve_route)
        .or(surface_route)
        .or(heatmap_route)
        .recover(handle_rejection)
}
