use std::path::PathBuf;
use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing::info;

use innkeep::compactor;
use innkeep::engine::Engine;
use innkeep::rest;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();

    let metrics_port: Option<u16> = std::env::var("INNKEEP_METRICS_PORT")
        .ok()
        .and_then(|s| s.parse().ok());
    innkeep::observability::init(metrics_port);

    let port: u16 = std::env::var("INNKEEP_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let bind = std::env::var("INNKEEP_BIND").unwrap_or_else(|_| "0.0.0.0".into());
    let data_dir = std::env::var("INNKEEP_DATA_DIR").unwrap_or_else(|_| "./data".into());
    let compact_threshold: u64 = std::env::var("INNKEEP_COMPACT_THRESHOLD")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(1000);

    // Ensure data directory exists
    std::fs::create_dir_all(&data_dir)?;
    let wal_path = PathBuf::from(&data_dir).join("innkeep.wal");

    let engine = Arc::new(Engine::new(wal_path)?);

    let compactor_engine = engine.clone();
    tokio::spawn(async move {
        compactor::run_compactor(compactor_engine, compact_threshold).await;
    });

    info!("innkeep listening on {bind}:{port}");
    info!("  data_dir: {data_dir}");
    info!(
        "  metrics: {}",
        metrics_port.map_or("disabled".to_string(), |p| format!("http://0.0.0.0:{p}/metrics"))
    );

    let engine_data = web::Data::new(engine);
    HttpServer::new(move || {
        App::new()
            .app_data(engine_data.clone())
            .configure(rest::configure)
    })
    .bind((bind.as_str(), port))?
    .run()
    .await
}
