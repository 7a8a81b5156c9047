//! # Persist Worker
//!
//! Debounced, de-duplicated writes of the user's document.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Persist Worker                                │
//! │                                                                         │
//! │  edit ──► handle.persist(doc) ──┐                                      │
//! │  edit ──► handle.persist(doc) ──┼──► mpsc ──► PersistWorker task       │
//! │  edit ──► handle.persist(doc) ──┘               │                      │
//! │                                                 │ keep latest snapshot │
//! │                                                 │ restart quiet timer  │
//! │                                                 ▼                      │
//! │                                  timer fires (default 400ms)           │
//! │                                                 │                      │
//! │                                   serialize ──► same as last write?    │
//! │                                                 │ yes: skip            │
//! │                                                 │ no:  store.save      │
//! │                                                 ▼                      │
//! │                                          DocumentStore                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `flush()` writes the pending snapshot now; `shutdown()` flushes and stops
//! the task. Each worker owns exactly one user's document.

use std::sync::Arc;
use std::time::Duration;

use splitbill_core::StoredDocument;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info, warn};

use crate::document_store::DocumentStore;
use crate::error::{StoreError, StoreResult};

// =============================================================================
// Constants
// =============================================================================

/// Default quiet period before a snapshot is written.
pub const DEFAULT_DEBOUNCE_MS: u64 = 400;

/// Command channel capacity.
const COMMAND_BUFFER: usize = 64;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the persist worker.
#[derive(Debug, Clone)]
pub struct PersistConfig {
    /// Quiet period restarted by every new snapshot.
    pub debounce: Duration,
}

impl Default for PersistConfig {
    fn default() -> Self {
        PersistConfig {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }
}

impl PersistConfig {
    /// Creates a config with a custom quiet period.
    pub fn debounced(debounce_ms: u64) -> Self {
        PersistConfig {
            debounce: Duration::from_millis(debounce_ms),
        }
    }
}

// =============================================================================
// Handle
// =============================================================================

/// Commands for the worker.
#[derive(Debug)]
enum PersistCommand {
    /// Replace the pending snapshot and restart the timer.
    Snapshot(Box<StoredDocument>),
    /// Write the pending snapshot now.
    Flush(oneshot::Sender<StoreResult<()>>),
    /// Write the pending snapshot and stop.
    Shutdown(oneshot::Sender<StoreResult<()>>),
}

/// Handle for sending snapshots to a running [`PersistWorker`].
#[derive(Debug, Clone)]
pub struct PersistHandle {
    cmd_tx: mpsc::Sender<PersistCommand>,
}

impl PersistHandle {
    /// Queues a snapshot of the document.
    pub async fn persist(&self, document: StoredDocument) -> StoreResult<()> {
        self.cmd_tx
            .send(PersistCommand::Snapshot(Box::new(document)))
            .await
            .map_err(|_| closed())
    }

    /// Writes any pending snapshot without waiting for the quiet period.
    pub async fn flush(&self) -> StoreResult<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.cmd_tx
            .send(PersistCommand::Flush(reply_tx))
            .await
            .map_err(|_| closed())?;
        reply_rx.await.map_err(|_| closed())?
    }

    /// Flushes and stops the worker.
    pub async fn shutdown(&self) -> StoreResult<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.cmd_tx
            .send(PersistCommand::Shutdown(reply_tx))
            .await
            .map_err(|_| closed())?;
        reply_rx.await.map_err(|_| closed())?
    }
}

fn closed() -> StoreError {
    StoreError::ChannelError("Persist worker channel closed".into())
}

// =============================================================================
// Worker
// =============================================================================

/// Writes the latest snapshot once edits go quiet.
pub struct PersistWorker {
    config: PersistConfig,
    store: Arc<dyn DocumentStore>,
    user_id: String,
    /// Latest snapshot not yet written.
    pending: Option<StoredDocument>,
    /// Payload of the last successful write.
    last_payload: Option<String>,
}

impl PersistWorker {
    /// Creates a worker writing `user_id`'s document to `store`.
    pub fn new(config: PersistConfig, store: Arc<dyn DocumentStore>, user_id: impl Into<String>) -> Self {
        PersistWorker {
            config,
            store,
            user_id: user_id.into(),
            pending: None,
            last_payload: None,
        }
    }

    /// Records what the store already holds, so an unchanged snapshot is
    /// never written back.
    pub fn with_baseline(mut self, document: &StoredDocument) -> StoreResult<Self> {
        self.last_payload = Some(serde_json::to_string(document)?);
        Ok(self)
    }

    /// Starts the worker task and returns a handle.
    pub fn start(self) -> PersistHandle {
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER);

        tokio::spawn(async move {
            self.run(cmd_rx).await;
        });

        PersistHandle { cmd_tx }
    }

    /// Main worker loop.
    async fn run(mut self, mut cmd_rx: mpsc::Receiver<PersistCommand>) {
        info!(
            user_id = %self.user_id,
            debounce_ms = self.config.debounce.as_millis() as u64,
            "Persist worker started"
        );

        let mut deadline: Option<Instant> = None;

        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(PersistCommand::Snapshot(document)) => {
                            self.pending = Some(*document);
                            deadline = Some(Instant::now() + self.config.debounce);
                        }
                        Some(PersistCommand::Flush(reply)) => {
                            deadline = None;
                            let _ = reply.send(self.write_pending().await);
                        }
                        Some(PersistCommand::Shutdown(reply)) => {
                            info!(user_id = %self.user_id, "Persist worker shutting down");
                            let _ = reply.send(self.write_pending().await);
                            break;
                        }
                        None => {
                            // Every handle dropped
                            if let Err(e) = self.write_pending().await {
                                error!(error = %e, "Final write failed");
                            }
                            break;
                        }
                    }
                }
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    deadline = None;
                    if let Err(e) = self.write_pending().await {
                        warn!(error = %e, "Debounced write failed; will retry on next flush");
                    }
                }
            }
        }
    }

    /// Serializes and writes the pending snapshot, skipping it when the
    /// payload matches the last write.
    async fn write_pending(&mut self) -> StoreResult<()> {
        let Some(document) = self.pending.take() else {
            return Ok(());
        };

        let payload = serde_json::to_string(&document)?;
        if self.last_payload.as_deref() == Some(payload.as_str()) {
            debug!(user_id = %self.user_id, "Snapshot unchanged - skipping write");
            return Ok(());
        }

        if let Err(e) = self.store.save(&self.user_id, &payload).await {
            self.pending = Some(document);
            return Err(e);
        }

        debug!(user_id = %self.user_id, bytes = payload.len(), "Snapshot written");
        self.last_payload = Some(payload);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document_store::MemoryDocumentStore;
    use splitbill_core::{Person, LOCAL_USER_ID};

    fn document(names: &[&str]) -> StoredDocument {
        StoredDocument {
            people: names
                .iter()
                .map(|name| Person::with_id(name.to_lowercase(), *name))
                .collect(),
            ..StoredDocument::default()
        }
    }

    fn start(store: &MemoryDocumentStore) -> PersistHandle {
        PersistWorker::new(PersistConfig::default(), Arc::new(store.clone()), LOCAL_USER_ID).start()
    }

    async fn stored(store: &MemoryDocumentStore) -> StoredDocument {
        store.load(LOCAL_USER_ID).await.unwrap().unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_is_written_once_after_quiet_period() {
        let store = MemoryDocumentStore::new();
        let handle = start(&store);

        handle.persist(document(&["Ayu"])).await.unwrap();
        handle.persist(document(&["Ayu", "Budi"])).await.unwrap();
        handle.persist(document(&["Ayu", "Budi", "Citra"])).await.unwrap();

        tokio::time::sleep(Duration::from_millis(399)).await;
        assert_eq!(store.writes(), 0);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(store.writes(), 1);
        assert_eq!(stored(&store).await.people.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_snapshot_restarts_timer() {
        let store = MemoryDocumentStore::new();
        let handle = start(&store);

        handle.persist(document(&["Ayu"])).await.unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        handle.persist(document(&["Budi"])).await.unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(store.writes(), 0);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(store.writes(), 1);
        assert_eq!(stored(&store).await.people[0].name, "Budi");
    }

    #[tokio::test(start_paused = true)]
    async fn test_identical_payload_is_skipped() {
        let store = MemoryDocumentStore::new();
        let handle = start(&store);

        handle.persist(document(&["Ayu"])).await.unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;
        handle.persist(document(&["Ayu"])).await.unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(store.writes(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_baseline_suppresses_unchanged_write() {
        let store = MemoryDocumentStore::new();
        let loaded = document(&["Ayu"]);
        let handle = PersistWorker::new(PersistConfig::default(), Arc::new(store.clone()), LOCAL_USER_ID)
            .with_baseline(&loaded)
            .unwrap()
            .start();

        handle.persist(loaded).await.unwrap();
        handle.flush().await.unwrap();

        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_flush_writes_immediately() {
        let store = MemoryDocumentStore::new();
        let handle = start(&store);

        handle.persist(document(&["Ayu"])).await.unwrap();
        handle.flush().await.unwrap();
        assert_eq!(store.writes(), 1);

        // Nothing pending
        handle.flush().await.unwrap();
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_flushes_and_stops() {
        let store = MemoryDocumentStore::new();
        let handle = start(&store);

        handle.persist(document(&["Ayu"])).await.unwrap();
        handle.shutdown().await.unwrap();
        assert_eq!(store.writes(), 1);

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(matches!(
            handle.persist(document(&["Budi"])).await,
            Err(StoreError::ChannelError(_))
        ));
    }
}
