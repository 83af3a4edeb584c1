//! One-shot dispatcher invocation for cron-style scheduling. Prints the
//! JSON report; exits non-zero when the pending-reminders fetch fails so
//! the scheduler can see the failed tick.

use anyhow::Context;
use crmd::config::Config;
use crmd::db::Database;
use crmd::dispatch::Dispatcher;
use crmd::email::ResendMailer;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load().context("configuration error")?;

    let db = Database::new(&config.database_url).await?;
    let dispatcher = Dispatcher::new(
        Arc::new(db),
        Arc::new(ResendMailer::new(config.resend_api_key.clone())),
        config.from_email,
        config.app_url,
        config.settings.max_concurrent_sends,
    );

    let report = dispatcher.run().await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
