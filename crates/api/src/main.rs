use anyhow::Context;

use intake_api::{app, config::AppConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    intake_observability::init();

    let config = AppConfig::from_env()?;
    let services = app::services::AppServices::from_config(&config)?;
    let app = app::build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
