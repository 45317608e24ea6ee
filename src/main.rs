use anyhow::Context;
use dotenvy::dotenv;
use tracing::{error, info};

use scholaris::logging::{init_tracing, shutdown_tracer};
use scholaris::metrics::{init_metrics, metrics_app};
use scholaris::router::init_router;
use scholaris::state::{AppConfig, AppState};
use scholaris_config::DatabaseConfig;
use scholaris_db::{init_db_pool, run_migrations};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = AppConfig::from_env();
    init_tracing(config.server.observability_enabled)?;

    let metrics_handle = init_metrics(config.server.observability_enabled)?;

    let db_config = DatabaseConfig::from_env().context("DATABASE_URL must be set")?;
    let db = init_db_pool(&db_config).await?;
    run_migrations(&db).await?;

    let host = config.server.host.clone();
    let port = config.server.port;
    let metrics_port = config.server.metrics_port;

    let state = AppState::new(db, config)?;
    let app = init_router(state);

    if let Some(handle) = metrics_handle {
        let metrics_addr = format!("{}:{}", host, metrics_port);
        let listener = tokio::net::TcpListener::bind(&metrics_addr)
            .await
            .with_context(|| format!("Failed to bind metrics listener on {metrics_addr}"))?;
        info!("Metrics available at http://{}/metrics", metrics_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                error!(error = %e, "Metrics server stopped");
            }
        });
    }

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Server running on http://{}", addr);
    info!("Swagger UI available at http://{}/swagger-ui", addr);
    info!("Scalar UI available at http://{}/scalar", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    shutdown_tracer().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
