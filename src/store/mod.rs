//! Shared record store contract
//!
//! The store is the single source of truth for child records. Documents are
//! keyed by the decimal string form of the record id and hold the five
//! record fields. All visible state change flows back to readers through
//! the push subscription, which delivers the full matching set after every
//! committed write.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::types::ChildRecord;

pub use memory::MemoryStore;

/// Error types for store operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(u32),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("subscription lost: {0}")]
    SubscriptionLost(String),

    #[error("internal store error: {0}")]
    Internal(String),
}

/// One push from the store's live query.
#[derive(Clone, Debug)]
pub enum StorePush {
    /// The full record set, ordered ascending by id.
    Snapshot(Vec<ChildRecord>),

    /// The push stream failed. No further snapshots will arrive on this
    /// subscription; the last delivered snapshot stays valid but stale.
    Lost(String),
}

/// A write queued in an atomic batch.
#[derive(Clone, Debug)]
pub(crate) enum BatchOp {
    /// Full overwrite of the document.
    Set(u32, ChildRecord),

    /// Merge of the named fields into the existing document.
    Update(u32, serde_json::Map<String, serde_json::Value>),
}

/// Writes queued for a single atomic commit: every op in the batch commits
/// together or none do. There is no atomicity across separate commits.
#[derive(Clone, Debug, Default)]
pub struct WriteBatch {
    pub(crate) ops: Vec<BatchOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a full overwrite.
    pub fn set(&mut self, id: u32, record: ChildRecord) {
        self.ops.push(BatchOp::Set(id, record));
    }

    /// Queue a merge of only the named fields.
    pub fn update(&mut self, id: u32, fields: serde_json::Map<String, serde_json::Value>) {
        self.ops.push(BatchOp::Update(id, fields));
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Trait for keyed document stores holding the shared record set
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch a single record, or `None` if the document is absent.
    async fn get(&self, id: u32) -> Result<Option<ChildRecord>, StoreError>;

    /// Write a full document, creating or overwriting it.
    async fn set(&self, id: u32, record: ChildRecord) -> Result<(), StoreError>;

    /// Merge the named fields into an existing document. Fails with
    /// [`StoreError::NotFound`] if the document is absent.
    async fn update(
        &self,
        id: u32,
        fields: serde_json::Map<String, serde_json::Value>,
    ) -> Result<(), StoreError>;

    /// Commit a batch of writes atomically.
    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;

    /// Read the full record set, ordered ascending by id.
    async fn list(&self) -> Result<Vec<ChildRecord>, StoreError>;

    /// Open a push subscription. Every committed write is followed by a
    /// [`StorePush::Snapshot`] of the full record set.
    fn subscribe(&self) -> broadcast::Receiver<StorePush>;
}
