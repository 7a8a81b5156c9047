//! # Document Store
//!
//! Where a user's [`StoredDocument`] lives between sessions.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        DocumentStore (trait)                            │
//! │                                                                         │
//! │   load(user)  ──► Option<StoredDocument>                               │
//! │   save(user, payload)                                                   │
//! │   delete(user)                                                          │
//! │                                                                         │
//! │   ┌─────────────────────────┐      ┌─────────────────────────┐        │
//! │   │  SqliteDocumentStore    │      │  MemoryDocumentStore    │        │
//! │   │  documents table        │      │  HashMap, write counter │        │
//! │   └─────────────────────────┘      └─────────────────────────┘        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Payloads are the JSON serialization of [`StoredDocument`]. The key is the
//! signed-in user id, or [`LOCAL_USER_ID`](splitbill_core::LOCAL_USER_ID)
//! when nobody is signed in.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use splitbill_core::StoredDocument;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::pool::Database;

// =============================================================================
// Trait
// =============================================================================

/// Storage for per-user documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Loads the document stored for `user_id`.
    ///
    /// ## Returns
    /// `Ok(None)` when nothing has been stored for the user yet.
    async fn load(&self, user_id: &str) -> StoreResult<Option<StoredDocument>>;

    /// Stores an already-serialized document for `user_id`.
    async fn save(&self, user_id: &str, payload: &str) -> StoreResult<()>;

    /// Removes the document for `user_id`.
    async fn delete(&self, user_id: &str) -> StoreResult<()>;

    /// Serializes and stores `document`.
    async fn save_document(&self, user_id: &str, document: &StoredDocument) -> StoreResult<()> {
        let payload = serde_json::to_string(document)?;
        self.save(user_id, &payload).await
    }
}

fn parse_payload(user_id: &str, payload: &str) -> StoreResult<StoredDocument> {
    serde_json::from_str(payload).map_err(|e| {
        StoreError::Serialization(format!("document for '{user_id}' is unreadable: {e}"))
    })
}

// =============================================================================
// SQLite
// =============================================================================

/// Documents kept in the local SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteDocumentStore {
    db: Database,
}

impl SqliteDocumentStore {
    /// Wraps an open database.
    pub fn new(db: Database) -> Self {
        SqliteDocumentStore { db }
    }

    /// Returns the underlying database.
    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn load(&self, user_id: &str) -> StoreResult<Option<StoredDocument>> {
        match self.db.documents().get(user_id).await? {
            Some(record) => {
                info!(user_id = %user_id, updated_at = %record.updated_at, "Loaded document");
                parse_payload(user_id, &record.payload).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn save(&self, user_id: &str, payload: &str) -> StoreResult<()> {
        self.db.documents().upsert(user_id, payload).await?;
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> StoreResult<()> {
        self.db.documents().delete(user_id).await
    }
}

// =============================================================================
// In-Memory
// =============================================================================

/// Documents kept in process memory.
///
/// Clones share the same map, so a test can hand one clone to a
/// [`PersistWorker`](crate::persist::PersistWorker) and inspect another.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    documents: Arc<RwLock<HashMap<String, String>>>,
    writes: Arc<AtomicUsize>,
}

impl MemoryDocumentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `save` calls so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Raw payload stored for `user_id`.
    pub async fn payload(&self, user_id: &str) -> Option<String> {
        self.documents.read().await.get(user_id).cloned()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn load(&self, user_id: &str) -> StoreResult<Option<StoredDocument>> {
        match self.documents.read().await.get(user_id) {
            Some(payload) => parse_payload(user_id, payload).map(Some),
            None => Ok(None),
        }
    }

    async fn save(&self, user_id: &str, payload: &str) -> StoreResult<()> {
        self.documents
            .write()
            .await
            .insert(user_id.to_string(), payload.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        debug!(user_id = %user_id, "Stored document in memory");
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> StoreResult<()> {
        self.documents
            .write()
            .await
            .remove(user_id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("Document", user_id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
