//! # Session
//!
//! The signed-in user's bill for the lifetime of one command.
//!
//! ```text
//! open ──► load document ──► BillState + OrderHistory
//!                                 │ edits
//!                                 ▼
//!                            commit() ──► PersistWorker ──► documents table
//!                                 │
//! close ──► shutdown (final flush) ──► close pool
//! ```

use std::sync::Arc;

use chrono::NaiveDate;
use splitbill_core::{BillState, OrderHistory, StoredDocument};
use splitbill_store::{
    open_store, AppConfig, DocumentStore, PersistHandle, PersistWorker, SqliteDocumentStore,
    StoreResult,
};
use tracing::info;

pub struct Session {
    pub state: BillState,
    pub history: OrderHistory,
    store: Arc<SqliteDocumentStore>,
    persist: PersistHandle,
}

impl Session {
    /// Loads the configured user's document, or starts an empty one.
    pub async fn open(config: &AppConfig, today: NaiveDate) -> StoreResult<Self> {
        let store = Arc::new(open_store(config).await?);
        let user_id = config.user_id();

        let document = match store.load(user_id).await? {
            Some(document) => document,
            None => {
                info!(user_id = %user_id, "No stored document, starting fresh");
                let mut document = StoredDocument::default();
                document.settings.exclude_no_order = config.engine.exclude_no_order;
                document
            }
        };

        let persist = PersistWorker::new(config.persist_config(), store.clone(), user_id)
            .with_baseline(&document)?
            .start();
        let (state, history) = BillState::from_document(document, today);

        Ok(Session {
            state,
            history,
            store,
            persist,
        })
    }

    /// Queues the current state for writing.
    pub async fn commit(&self) -> StoreResult<()> {
        self.persist
            .persist(self.state.to_document(&self.history))
            .await
    }

    /// Writes anything pending and releases the database.
    pub async fn close(self) -> StoreResult<()> {
        self.persist.shutdown().await?;
        self.store.database().close().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn memory_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.storage.database_path = PathBuf::from(":memory:");
        config.engine.exclude_no_order = false;
        config
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[tokio::test]
    async fn test_fresh_session_uses_configured_defaults() {
        let session = Session::open(&memory_config(), today()).await.unwrap();

        assert!(session.state.people.is_empty());
        assert!(session.history.is_empty());
        assert!(!session.state.settings.exclude_no_order);
        assert_eq!(session.state.bill_date, today());

        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_commit_then_flush_writes_document() {
        let mut session = Session::open(&memory_config(), today()).await.unwrap();
        session.state.add_person("Ayu").unwrap();
        session.commit().await.unwrap();

        let store = session.store.clone();
        session.persist.flush().await.unwrap();

        let stored = store.load(splitbill_core::LOCAL_USER_ID).await.unwrap().unwrap();
        assert_eq!(stored.people[0].name, "Ayu");

        session.close().await.unwrap();
    }
}
