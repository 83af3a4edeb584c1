use anyhow::Context;
use crmd::config::Config;
use crmd::db::Database;
use crmd::dispatch::Dispatcher;
use crmd::email::ResendMailer;
use crmd::server::{self, AppState};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Refuse to serve anything until configuration validates.
    let config = Config::load().context("configuration error")?;

    let db = Database::new(&config.database_url).await?;
    let mailer = Arc::new(ResendMailer::new(config.resend_api_key.clone()));
    let dispatcher = Arc::new(Dispatcher::new(
        Arc::new(db.clone()),
        mailer,
        config.from_email.clone(),
        config.app_url.clone(),
        config.settings.max_concurrent_sends,
    ));

    let state = AppState {
        db,
        dispatcher,
        invocation_timeout: Duration::from_secs(config.settings.invocation_timeout_secs),
    };

    let listener = TcpListener::bind(&config.settings.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.settings.bind_addr))?;
    info!(addr = %config.settings.bind_addr, "crmd listening");

    axum::serve(listener, server::router(state)).await?;

    Ok(())
}
