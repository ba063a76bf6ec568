use std::time::Duration;

use anyhow::Context;
use chrono::Utc;

use gatehouse_core::UserId;
use gatehouse_infra::AppConfig;

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    gatehouse_observability::init();

    let config = AppConfig::from_env()?;
    let bind_addr = config.bind_addr;
    let services = gatehouse_api::app::services::build_services(config)?;

    if cfg!(debug_assertions) {
        let token = services.start_editor_session(UserId::new());
        tracing::warn!(%token, "debug build: editor session started for local testing");
    }

    let purge = services.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            purge.sessions.purge_expired(Utc::now());
        }
    });

    let app = gatehouse_api::app::build_app(services);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
