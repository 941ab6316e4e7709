//! Top-picks API Server
//!
//! Serves `GET /predict/top?n=<count>`, a health check and metrics.
//! Every request scores the configured universe from fresh history, so the
//! service is stateless and can be horizontally scaled.

use dotenvy::dotenv;
use tokio::signal;
use toppicks::config::ServiceConfig;
use toppicks::core::http::start_server;
use toppicks::logging;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let config = ServiceConfig::from_env().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        e
    })?;

    let env = toppicks::config::get_environment();
    info!("Starting top-picks API server");
    info!(environment = %env, "Environment");
    info!(port = config.port, "HTTP Server: http://0.0.0.0:{}", config.port);
    info!(symbols = ?config.universe, "Universe: {}", config.universe.join(", "));
    info!(
        concurrency = config.max_concurrency,
        timeout_secs = config.request_timeout.map(|t| t.as_secs()),
        trees = config.forest.n_trees,
        "Scoring with up to {} symbols in parallel",
        config.max_concurrency
    );

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(config).await {
            error!(error = %e, "HTTP server error");
        }
    });

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
