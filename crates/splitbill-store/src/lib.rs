//! # splitbill-store: Persistence Layer for Split Bill
//!
//! Keeps each user's bill document between sessions and writes edits back
//! without hammering the disk.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Split Bill Data Flow                             │
//! │                                                                         │
//! │  CLI command (import, history save, ...)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                splitbill-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ PersistWorker │───►│ DocumentStore │───►│   Database   │  │   │
//! │  │   │ (debounce,    │    │ (SQLite or    │    │ (pool.rs,    │  │   │
//! │  │   │  dedupe)      │    │  in-memory)   │    │  migrations) │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   AppConfig (splitbill.toml + SPLITBILL_* overrides)           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  SQLite: documents(user_id, payload, updated_at)               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use splitbill_store::{open_store, AppConfig, DocumentStore};
//!
//! let config = AppConfig::load(None)?;
//! let store = open_store(&config).await?;
//! let document = store.load(config.user_id()).await?.unwrap_or_default();
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod document_store;
pub mod error;
pub mod migrations;
pub mod persist;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::AppConfig;
pub use document_store::{DocumentStore, MemoryDocumentStore, SqliteDocumentStore};
pub use error::{StoreError, StoreResult};
pub use persist::{PersistConfig, PersistHandle, PersistWorker};
pub use pool::{Database, DbConfig};
pub use repository::DocumentRepository;

/// Opens the configured database and wraps it as a document store.
pub async fn open_store(config: &AppConfig) -> StoreResult<SqliteDocumentStore> {
    let db = Database::new(config.db_config()).await?;
    Ok(SqliteDocumentStore::new(db))
}
