use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::ListingId;

mod sqlite;
pub use sqlite::SqliteStore;

/// Listing keys already delivered in earlier runs.
#[async_trait]
pub trait SeenStore: Send + Sync {
    async fn migrate(&self) -> Result<(), StoreError>;
    async fn has_seen(&self, id: &ListingId) -> Result<bool, StoreError>;
    async fn mark_seen(&self, ids: &[ListingId]) -> Result<(), StoreError>;
}
