//! In-process record store
//!
//! Backs tests and the demo binary with the same contract the hosted
//! document store provides: documents keyed by the decimal record id,
//! merge updates, atomic batches, and a push stream that delivers the
//! full record set after every committed write.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::broadcast;

use super::{BatchOp, RecordStore, StoreError, StorePush, WriteBatch};
use crate::types::ChildRecord;

/// An in-memory document store with live push notifications
pub struct MemoryStore {
    /// Documents keyed by the decimal string form of the record id
    docs: Mutex<HashMap<String, Map<String, Value>>>,

    /// Channel for broadcasting full-snapshot pushes
    push_tx: broadcast::Sender<StorePush>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (push_tx, _) = broadcast::channel(32);

        Self {
            docs: Mutex::new(HashMap::new()),
            push_tx,
        }
    }

    /// Simulate losing the push stream. Subscribers receive a terminal
    /// [`StorePush::Lost`] event; document state is untouched.
    pub fn break_subscription(&self, reason: &str) {
        let _ = self.push_tx.send(StorePush::Lost(reason.to_string()));
    }

    fn key(id: u32) -> String {
        id.to_string()
    }

    fn decode(doc: &Map<String, Value>) -> Result<ChildRecord, StoreError> {
        serde_json::from_value(Value::Object(doc.clone()))
            .map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn encode(record: &ChildRecord) -> Result<Map<String, Value>, StoreError> {
        match serde_json::to_value(record) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(StoreError::Serialization(
                "record did not serialize to an object".to_string(),
            )),
            Err(e) => Err(StoreError::Serialization(e.to_string())),
        }
    }

    /// Decode every document and order the set ascending by id.
    fn snapshot(docs: &HashMap<String, Map<String, Value>>) -> Result<Vec<ChildRecord>, StoreError> {
        let mut records = docs
            .values()
            .map(Self::decode)
            .collect::<Result<Vec<_>, _>>()?;
        records.sort_by_key(|r| r.id);
        Ok(records)
    }

    fn publish(&self, records: Vec<ChildRecord>) {
        // No receivers is fine; pushes are only meaningful to live
        // subscriptions.
        let _ = self.push_tx.send(StorePush::Snapshot(records));
    }

    /// Apply one queued op to a document map.
    fn apply_op(
        docs: &mut HashMap<String, Map<String, Value>>,
        op: BatchOp,
    ) -> Result<(), StoreError> {
        match op {
            BatchOp::Set(id, record) => {
                docs.insert(Self::key(id), Self::encode(&record)?);
                Ok(())
            }
            BatchOp::Update(id, fields) => {
                let doc = docs
                    .get_mut(&Self::key(id))
                    .ok_or(StoreError::NotFound(id))?;
                for (field, value) in fields {
                    doc.insert(field, value);
                }
                Ok(())
            }
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get(&self, id: u32) -> Result<Option<ChildRecord>, StoreError> {
        let docs = self
            .docs
            .lock()
            .map_err(|_| StoreError::Internal("store lock poisoned".to_string()))?;

        docs.get(&Self::key(id)).map(Self::decode).transpose()
    }

    async fn set(&self, id: u32, record: ChildRecord) -> Result<(), StoreError> {
        let snapshot = {
            let mut docs = self
                .docs
                .lock()
                .map_err(|_| StoreError::Internal("store lock poisoned".to_string()))?;

            docs.insert(Self::key(id), Self::encode(&record)?);
            Self::snapshot(&docs)?
        };

        self.publish(snapshot);
        Ok(())
    }

    async fn update(
        &self,
        id: u32,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let snapshot = {
            let mut docs = self
                .docs
                .lock()
                .map_err(|_| StoreError::Internal("store lock poisoned".to_string()))?;

            Self::apply_op(&mut docs, BatchOp::Update(id, fields))?;
            Self::snapshot(&docs)?
        };

        self.publish(snapshot);
        Ok(())
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }

        let snapshot = {
            let mut docs = self
                .docs
                .lock()
                .map_err(|_| StoreError::Internal("store lock poisoned".to_string()))?;

            // Stage the whole batch on a copy so a failing op leaves the
            // committed state untouched.
            let mut staged = docs.clone();
            for op in batch.ops {
                Self::apply_op(&mut staged, op)?;
            }

            *docs = staged;
            Self::snapshot(&docs)?
        };

        self.publish(snapshot);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ChildRecord>, StoreError> {
        let docs = self
            .docs
            .lock()
            .map_err(|_| StoreError::Internal("store lock poisoned".to_string()))?;

        Self::snapshot(&docs)
    }

    fn subscribe(&self) -> broadcast::Receiver<StorePush> {
        self.push_tx.subscribe()
    }
}
