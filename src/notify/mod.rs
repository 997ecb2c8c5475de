mod email;

pub use email::SmtpNotifier;

use async_trait::async_trait;

use crate::digest::Digest;
use crate::error::NotifyError;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers one digest. Returns the provider's response on success.
    async fn send(&self, digest: &Digest) -> Result<String, NotifyError>;
}
