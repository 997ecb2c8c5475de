//! Recurring runs using tokio-cron-scheduler.
//!
//! ```text
//! start()
//!     ├─► run now
//!     └─► every tick of `schedule` ─► Pipeline::run (skipped while one is in flight)
//! ```

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::info;

use crate::pipeline::Pipeline;

/// Stop handle for the recurring job. Dropping it without calling
/// [`SchedulerHandle::shutdown`] leaves the job running.
pub struct SchedulerHandle {
    scheduler: JobScheduler,
}

impl SchedulerHandle {
    /// Stops future triggers. A run already in progress finishes on its own.
    pub async fn shutdown(mut self) -> Result<()> {
        self.scheduler
            .shutdown()
            .await
            .context("Failed to stop scheduler")?;
        info!("Scheduler stopped");
        Ok(())
    }
}

/// Runs the pipeline once immediately, then on every tick of `schedule`
/// (seconds-first cron).
pub async fn start(pipeline: Arc<Pipeline>, schedule: &str) -> Result<SchedulerHandle> {
    let scheduler = JobScheduler::new().await?;

    let job_pipeline = pipeline.clone();
    let job = Job::new_async(schedule, move |_uuid, _lock| {
        let pipeline = job_pipeline.clone();
        Box::pin(async move {
            info!("Running scheduled job search...");
            pipeline.run().await;
        })
    })
    .with_context(|| format!("Invalid schedule {:?}", schedule))?;

    scheduler.add(job).await?;

    tokio::spawn(async move {
        pipeline.run().await;
    });

    scheduler.start().await?;
    info!("Scheduled job search started ({})", schedule);

    Ok(SchedulerHandle { scheduler })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::{Browser, Session};
    use crate::config::Config;
    use crate::digest::Digest;
    use crate::error::{NotifyError, ScrapeError};
    use crate::notify::Notifier;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingBrowser(Arc<AtomicUsize>);

    #[async_trait]
    impl Browser for CountingBrowser {
        async fn new_session(&self) -> Result<Box<dyn Session>, ScrapeError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(ScrapeError::InvalidUrl("offline".to_string()))
        }
    }

    struct NullNotifier;

    #[async_trait]
    impl Notifier for NullNotifier {
        async fn send(&self, _digest: &Digest) -> Result<String, NotifyError> {
            Ok(String::new())
        }
    }

    fn pipeline(runs: Arc<AtomicUsize>) -> Arc<Pipeline> {
        Arc::new(Pipeline::new(
            Arc::new(Config::default()),
            Arc::new(CountingBrowser(runs)),
            Arc::new(NullNotifier),
        ))
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn runs_once_at_startup() {
        let runs = Arc::new(AtomicUsize::new(0));

        // Far-off schedule so only the startup run fires
        let handle = start(pipeline(runs.clone()), "0 0 0 1 1 *").await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(runs.load(Ordering::SeqCst), 1);
        handle.shutdown().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn rejects_invalid_schedule() {
        let runs = Arc::new(AtomicUsize::new(0));

        assert!(start(pipeline(runs.clone()), "every twenty minutes").await.is_err());
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
