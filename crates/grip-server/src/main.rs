use anyhow::Context;
use grip_core::GripConfig;
use grip_router::Dispatcher;
use grip_server::{app_with_state, discovery::HttpDiscovery, state::AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GripConfig::load().context("loading configuration")?;
    config.validate().context("validating configuration")?;

    let discovery = HttpDiscovery::new(&config.discovery).context("building discovery client")?;
    let dispatcher = Dispatcher::new(&config.skill, Arc::new(discovery));
    let app = app_with_state(AppState::new(dispatcher));

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!(%addr, namespace = %config.skill.gadget_namespace, "grip server listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
