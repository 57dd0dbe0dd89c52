//! Host environment abstraction.
//!
//! The sandboxed host cannot touch the network or a filesystem; what it
//! gets from the design tool is a small key/value store, a view of the
//! open document, and the ability to close itself. [`HostEnv`] is the
//! injected seam; [`MemoryEnv`] stands in for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// A node in the current selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRef {
    pub id: String,
    pub name: String,
}

/// Point-in-time view of the open document.
///
/// Not every host environment exposes a stable document identifier, so
/// every field is best-effort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSnapshot {
    pub file_key: Option<String>,
    pub file_name: Option<String>,
    pub page_name: Option<String>,
    pub selection: Vec<NodeRef>,
}

/// Capabilities the design tool grants the plugin host.
#[async_trait]
pub trait HostEnv: Send + Sync {
    /// Reads a persisted value.
    async fn storage_get(&self, key: &str) -> Option<String>;

    /// Persists a value.
    async fn storage_set(&self, key: &str, value: &str);

    /// Removes a persisted value.
    async fn storage_delete(&self, key: &str);

    /// Snapshot of the active document and selection.
    fn document(&self) -> DocumentSnapshot;

    /// Asks the design tool to close the plugin.
    fn close(&self);
}

/// In-memory [`HostEnv`] for tests.
#[derive(Default)]
pub struct MemoryEnv {
    storage: Mutex<HashMap<String, String>>,
    document: DocumentSnapshot,
    closed: AtomicBool,
}

impl MemoryEnv {
    /// Empty storage, empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the document snapshot subsequent calls will see.
    #[must_use]
    pub fn with_document(mut self, document: DocumentSnapshot) -> Self {
        self.document = document;
        self
    }

    /// Pre-seeds a storage key.
    pub async fn seed(&self, key: &str, value: &str) {
        self.storage
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
    }

    /// Whether `close` was called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HostEnv for MemoryEnv {
    async fn storage_get(&self, key: &str) -> Option<String> {
        self.storage.lock().await.get(key).cloned()
    }

    async fn storage_set(&self, key: &str, value: &str) {
        self.storage
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
    }

    async fn storage_delete(&self, key: &str) {
        self.storage.lock().await.remove(key);
    }

    fn document(&self) -> DocumentSnapshot {
        self.document.clone()
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
