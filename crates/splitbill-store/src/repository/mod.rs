//! # Repository Module
//!
//! Database repository implementations for Split Bill.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SqliteDocumentStore                                                   │
//! │       │                                                                 │
//! │       │  db.documents().upsert("local", payload)                       │
//! │       ▼                                                                 │
//! │  DocumentRepository                                                    │
//! │  ├── get(&self, user_id)                                               │
//! │  ├── upsert(&self, user_id, payload)                                   │
//! │  ├── delete(&self, user_id)                                            │
//! │  └── list_users(&self)                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod document;

pub use document::{DocumentRecord, DocumentRepository};
