use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::{info, warn};

use sessionvault::logging::{init_tracing, shutdown_tracer};
use sessionvault::metrics::{init_metrics, metrics_app};
use sessionvault::router::init_router;
use sessionvault::state::AppState;
use sessionvault_config::{ServerConfig, UploadConfig};
use sessionvault_core::{LocalMediaStore, MediaStore};
use sessionvault_db::{InMemoryUserDirectory, PgUserDirectory, UserDirectory, init_db_pool};

async fn init_user_directory(
    server_config: &ServerConfig,
) -> anyhow::Result<Arc<dyn UserDirectory>> {
    let Some(database_url) = server_config.database_url.as_deref() else {
        warn!("DATABASE_URL not set, using in-memory user directory; data is lost on exit");
        return Ok(Arc::new(InMemoryUserDirectory::new()));
    };

    let pool = init_db_pool(database_url)
        .await
        .context("Failed to connect to database")?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    info!("Database connected and migrations applied");

    Ok(Arc::new(PgUserDirectory::new(pool)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing()?;

    let server_config = ServerConfig::from_env();
    let upload_config = UploadConfig::from_env();

    let users = init_user_directory(&server_config).await?;
    let media: Arc<dyn MediaStore> = Arc::new(LocalMediaStore::with_max_size(
        upload_config.media_dir.clone(),
        upload_config.media_base_url.clone(),
        upload_config.max_file_size,
    ));

    let state = AppState::from_env(users, media);
    state
        .jwt_config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid token configuration: {}", e))?;

    if let Some(handle) = init_metrics()? {
        let metrics_addr = format!("0.0.0.0:{}", server_config.metrics_port);
        let metrics_listener = tokio::net::TcpListener::bind(&metrics_addr)
            .await
            .with_context(|| format!("Failed to bind metrics listener on {}", metrics_addr))?;
        info!("Metrics available at http://{}/metrics", metrics_addr);
        tokio::spawn(async move {
            if let Err(e) = axum::serve(metrics_listener, metrics_app(handle)).await {
                warn!(error = %e, "Metrics server stopped");
            }
        });
    }

    let app = init_router(state);

    let addr = format!("0.0.0.0:{}", server_config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running on http://localhost:{}", server_config.port);
    info!("Scalar UI available at http://localhost:{}/scalar", server_config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    shutdown_tracer();
    Ok(())
}
