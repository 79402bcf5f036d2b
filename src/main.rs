use anyhow::Result;
use dotenv::dotenv;
use log::{info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

use tbills_india_dashboard::config::AppConfig;
use tbills_india_dashboard::routes;
use tbills_india_dashboard::services::cache::YieldStore;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let config = AppConfig::from_env()?;

    // Warm the cache so a bad sheet shows up in the startup log.
    let store = Arc::new(YieldStore::new(config.data_path.clone()));
    let loaded = store.table();
    match &loaded.load_error {
        Some(e) => warn!("Serving without data: {}", e),
        None if loaded.is_empty() => warn!("Yield sheet has no rows; serving without data"),
        None => info!(
            "Yield sheet ready: {} periods x {} tenors",
            loaded.table.rows.len(),
            loaded.table.tenors.len()
        ),
    }

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    info!("Will bind to: {}", addr);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET"]);

    let api = routes::routes(store).with(cors);
    info!("Routes configured successfully with CORS.");

    info!("Starting server on {}", addr);
    warp::serve(api).run(addr).await;
    Ok(())
}
