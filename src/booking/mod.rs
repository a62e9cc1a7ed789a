//! Claim/release and bulk administrative operations
//!
//! Every operation here writes to the store and nothing else; visible state
//! change arrives back through the push subscription. Claims and releases
//! are unconditional merge writes with no compare-and-swap, so concurrent
//! writers race and the store keeps whichever write commits last. That is
//! accepted behavior for this workload, not a defect to compensate for.

mod confirm;

use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::store::{RecordStore, StoreError, WriteBatch};
use crate::types::{CanonicalChild, FieldPatch};

pub use confirm::{validate_reset_input, AdminConfirmation, ResetDecision, RESET_CODE};

/// Error types for booking operations
#[derive(Error, Debug)]
pub enum BookingError {
    /// A store write was rejected or failed in transit. Surfaced to the
    /// operator; never retried automatically.
    #[error("store write failed: {0}")]
    Store(#[from] StoreError),

    /// The typed full-reset input did not match the confirmation word.
    /// Purely local; no store interaction happened.
    #[error("wrong confirmation code")]
    WrongConfirmationCode,
}

/// Result of a gated administrative operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdminOutcome {
    /// The operation ran. The count is operation-specific: documents
    /// written for a seed, records added for an incremental sync, patches
    /// for a correction, claims released for a reset.
    Applied(usize),

    /// The operator declined the prompt; nothing was written.
    Declined,
}

/// Claim/release and administrative writes against the record store
pub struct BookingService {
    store: Arc<dyn RecordStore>,
}

impl BookingService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Claim a record for a volunteer.
    ///
    /// This writes `selectedBy` without checking the prior value. If two
    /// claims race, both report success locally and the store keeps the
    /// last committed one; the other volunteer is not notified.
    pub async fn claim(&self, child_id: u32, volunteer_name: &str) -> Result<(), BookingError> {
        self.store
            .update(child_id, selected_by_field(Some(volunteer_name)))
            .await?;

        log::info!("record {child_id} claimed by {volunteer_name}");
        Ok(())
    }

    /// Release a record back to the available pool.
    ///
    /// Unconditional like [`claim`](Self::claim): releasing a record
    /// someone else just claimed silently reverts their claim.
    pub async fn release(&self, child_id: u32) -> Result<(), BookingError> {
        self.store.update(child_id, selected_by_field(None)).await?;

        log::info!("record {child_id} released");
        Ok(())
    }

    /// Overwrite every record in the canonical dataset in one atomic batch,
    /// forcing all of them unclaimed.
    ///
    /// Intended for first-time initialization. Rerunning it wipes existing
    /// claims, which is why the prompt is required.
    pub async fn seed(
        &self,
        dataset: &[CanonicalChild],
        confirmation: AdminConfirmation,
    ) -> Result<AdminOutcome, BookingError> {
        if !confirmation.is_confirmed() {
            return Ok(AdminOutcome::Declined);
        }

        let mut batch = WriteBatch::new();
        for entry in dataset {
            batch.set(entry.id, entry.clone().into_record());
        }

        let written = batch.len();
        self.store.commit(batch).await?;

        log::info!("seeded {written} records");
        Ok(AdminOutcome::Applied(written))
    }

    /// Add the canonical entries missing from the store, leaving existing
    /// records and their claims untouched.
    ///
    /// This is a sequence of independent check-then-insert round trips, not
    /// one atomic operation. An interruption leaves a partial result, but
    /// rerunning adds only the records still missing, so a retry heals it.
    pub async fn sync_new_records(
        &self,
        dataset: &[CanonicalChild],
        confirmation: AdminConfirmation,
    ) -> Result<AdminOutcome, BookingError> {
        if !confirmation.is_confirmed() {
            return Ok(AdminOutcome::Declined);
        }

        let mut added = 0;
        for entry in dataset {
            if self.store.get(entry.id).await?.is_none() {
                self.store.set(entry.id, entry.clone().into_record()).await?;
                added += 1;
            }
        }

        log::info!("incremental sync added {added} records");
        Ok(AdminOutcome::Applied(added))
    }

    /// Apply a fixed list of field corrections in one atomic batch. Only
    /// the listed fields on the listed records are touched.
    pub async fn correct_fields(
        &self,
        patches: &[FieldPatch],
        confirmation: AdminConfirmation,
    ) -> Result<AdminOutcome, BookingError> {
        if !confirmation.is_confirmed() {
            return Ok(AdminOutcome::Declined);
        }

        let mut batch = WriteBatch::new();
        for patch in patches {
            batch.update(patch.id, patch.fields.clone());
        }

        let applied = batch.len();
        self.store.commit(batch).await?;

        log::info!("applied {applied} field corrections");
        Ok(AdminOutcome::Applied(applied))
    }

    /// Clear every record's assignment in one atomic batch.
    ///
    /// Runs only for [`ResetDecision::Proceed`], the outcome of a matching
    /// typed confirmation (see [`validate_reset_input`]). A wrong code is
    /// an error with zero writes; a cancelled prompt declines silently.
    pub async fn reset_cycle(&self, decision: ResetDecision) -> Result<AdminOutcome, BookingError> {
        match decision {
            ResetDecision::Cancelled => Ok(AdminOutcome::Declined),
            ResetDecision::WrongCode => Err(BookingError::WrongConfirmationCode),
            ResetDecision::Proceed => {
                let records = self.store.list().await?;

                let mut batch = WriteBatch::new();
                for record in &records {
                    batch.update(record.id, selected_by_field(None));
                }
                self.store.commit(batch).await?;

                log::info!("cycle reset, {} assignments released", records.len());
                Ok(AdminOutcome::Applied(records.len()))
            }
        }
    }
}

/// Merge payload touching only the assignment field.
fn selected_by_field(volunteer_name: Option<&str>) -> Map<String, Value> {
    let mut fields = Map::new();
    let value = match volunteer_name {
        Some(name) => Value::String(name.to_string()),
        None => Value::Null,
    };
    fields.insert("selectedBy".to_string(), value);
    fields
}
