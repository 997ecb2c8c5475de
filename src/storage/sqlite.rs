use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

use crate::error::StoreError;
use crate::models::ListingId;
use crate::storage::SeenStore;

pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open(db_path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

#[async_trait]
impl SeenStore for SqliteStore {
    async fn migrate(&self) -> Result<(), StoreError> {
        let conn = self.lock()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS seen_listings (
                listing_id TEXT PRIMARY KEY,
                first_seen DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;

        info!("Seen store migration completed");
        Ok(())
    }

    async fn has_seen(&self, id: &ListingId) -> Result<bool, StoreError> {
        let conn = self.lock()?;

        let found: Option<i32> = conn
            .query_row(
                "SELECT 1 FROM seen_listings WHERE listing_id = ?1",
                params![&id.0],
                |row| row.get(0),
            )
            .optional()?;

        Ok(found.is_some())
    }

    async fn mark_seen(&self, ids: &[ListingId]) -> Result<(), StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        for id in ids {
            tx.execute(
                "INSERT OR IGNORE INTO seen_listings (listing_id) VALUES (?1)",
                params![&id.0],
            )?;
        }

        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn remembers_marked_ids() {
        let store = SqliteStore::in_memory().unwrap();
        store.migrate().await.unwrap();

        let a = ListingId("a".to_string());
        let b = ListingId("b".to_string());

        assert!(!store.has_seen(&a).await.unwrap());

        store.mark_seen(&[a.clone(), a.clone()]).await.unwrap();

        assert!(store.has_seen(&a).await.unwrap());
        assert!(!store.has_seen(&b).await.unwrap());
    }

    #[tokio::test]
    async fn migrate_is_repeatable() {
        let store = SqliteStore::in_memory().unwrap();
        store.migrate().await.unwrap();
        store.migrate().await.unwrap();
    }
}
