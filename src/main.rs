use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use job_digest::browser::HttpBrowser;
use job_digest::config::Config;
use job_digest::notify::SmtpNotifier;
use job_digest::pipeline::Pipeline;
use job_digest::scheduler;
use job_digest::storage::{SeenStore, SqliteStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is fine, the variables may come from the environment
    dotenvy::dotenv().ok();

    job_digest::init_tracing()?;

    info!("Starting Job Digest");

    let config = Arc::new(Config::load()?);

    let browser = Arc::new(HttpBrowser::new(
        config.user_agents.clone(),
        config.request_timeout(),
    ));
    let notifier = Arc::new(SmtpNotifier::new(
        &config.email,
        &config.smtp,
        config.recipient(),
    )?);

    let mut pipeline = Pipeline::new(config.clone(), browser, notifier);

    if let Some(path) = &config.seen_db_path {
        let store = SqliteStore::open(path)
            .with_context(|| format!("Failed to open seen store at {}", path))?;
        store.migrate().await?;
        info!("Cross-run deduplication enabled ({})", path);
        pipeline = pipeline.with_seen_store(Arc::new(store));
    }

    let handle = scheduler::start(Arc::new(pipeline), &config.schedule).await?;

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    info!("Shutting down");
    handle.shutdown().await
}
