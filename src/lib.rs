pub mod browser;
pub mod config;
pub mod dedupe;
pub mod digest;
pub mod error;
pub mod models;
pub mod notify;
pub mod parsers;
pub mod pipeline;
pub mod scheduler;
pub mod storage;

use anyhow::Result;

/// Installs the fmt subscriber, honouring `RUST_LOG` on top of
/// `job_digest=info`.
pub fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("job_digest=info".parse()?),
        )
        .init();
    Ok(())
}
