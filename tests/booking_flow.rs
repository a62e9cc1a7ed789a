//! End-to-end booking behavior against the in-memory store.

use std::sync::Arc;

use padrinos::booking::{
    validate_reset_input, AdminConfirmation, AdminOutcome, BookingError, BookingService,
    ResetDecision,
};
use padrinos::store::{MemoryStore, RecordStore, StoreError};
use padrinos::types::{CanonicalChild, FieldPatch};

fn dataset() -> Vec<CanonicalChild> {
    vec![
        CanonicalChild::new(1, "Hannah", 2.0, "Mutual"),
        CanonicalChild::new(2, "Jana", 5.0, "Mutual"),
        CanonicalChild::new(3, "Samuel", 10.0, "Adolescentes"),
    ]
}

async fn seeded() -> (Arc<MemoryStore>, BookingService) {
    let store = Arc::new(MemoryStore::new());
    let booking = BookingService::new(store.clone());
    booking
        .seed(&dataset(), AdminConfirmation::Confirmed)
        .await
        .unwrap();
    (store, booking)
}

#[tokio::test]
async fn test_claim_then_release_restores_prior_state() {
    let (store, booking) = seeded().await;
    let before = store.get(2).await.unwrap().unwrap();

    booking.claim(2, "Ana").await.unwrap();
    let claimed = store.get(2).await.unwrap().unwrap();
    assert_eq!(claimed.selected_by.as_deref(), Some("Ana"));
    assert_eq!(claimed.name, before.name);
    assert_eq!(claimed.age, before.age);
    assert_eq!(claimed.ministry, before.ministry);

    booking.release(2).await.unwrap();
    let released = store.get(2).await.unwrap().unwrap();
    assert_eq!(released, before);
}

#[tokio::test]
async fn test_racing_claims_keep_last_write() {
    let (store, booking) = seeded().await;

    // Both claims succeed locally; the store keeps the later one and the
    // first volunteer is never told otherwise.
    booking.claim(2, "Ana").await.unwrap();
    booking.claim(2, "Luis").await.unwrap();

    let record = store.get(2).await.unwrap().unwrap();
    assert_eq!(record.selected_by.as_deref(), Some("Luis"));
}

#[tokio::test]
async fn test_claim_on_missing_record_surfaces_write_error() {
    let (_store, booking) = seeded().await;

    let err = booking.claim(99, "Ana").await.unwrap_err();
    assert!(matches!(
        err,
        BookingError::Store(StoreError::NotFound(99))
    ));
}

#[tokio::test]
async fn test_seed_is_destructive_and_total() {
    let (store, booking) = seeded().await;
    booking.claim(1, "Ana").await.unwrap();

    let outcome = booking
        .seed(&dataset(), AdminConfirmation::Confirmed)
        .await
        .unwrap();
    assert_eq!(outcome, AdminOutcome::Applied(3));

    let records = store.list().await.unwrap();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.is_available()));
}

#[tokio::test]
async fn test_declined_seed_writes_nothing() {
    let store = Arc::new(MemoryStore::new());
    let booking = BookingService::new(store.clone());

    let outcome = booking
        .seed(&dataset(), AdminConfirmation::Declined)
        .await
        .unwrap();
    assert_eq!(outcome, AdminOutcome::Declined);
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sync_new_records_is_idempotent_and_preserves_claims() {
    let store = Arc::new(MemoryStore::new());
    let booking = BookingService::new(store.clone());

    // Only the first two records exist before the sync.
    booking
        .seed(&dataset()[..2], AdminConfirmation::Confirmed)
        .await
        .unwrap();
    booking.claim(1, "Ana").await.unwrap();

    let outcome = booking
        .sync_new_records(&dataset(), AdminConfirmation::Confirmed)
        .await
        .unwrap();
    assert_eq!(outcome, AdminOutcome::Applied(1));

    // Second run adds nothing and leaves the existing claim alone.
    let outcome = booking
        .sync_new_records(&dataset(), AdminConfirmation::Confirmed)
        .await
        .unwrap();
    assert_eq!(outcome, AdminOutcome::Applied(0));

    let records = store.list().await.unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].selected_by.as_deref(), Some("Ana"));
    assert!(records[1].is_available());
    assert!(records[2].is_available());
}

#[tokio::test]
async fn test_correct_fields_touches_only_listed_fields() {
    let (store, booking) = seeded().await;
    booking.claim(2, "Ana").await.unwrap();

    let before: Vec<_> = store.list().await.unwrap();

    let outcome = booking
        .correct_fields(&[FieldPatch::age(1, 0.8)], AdminConfirmation::Confirmed)
        .await
        .unwrap();
    assert_eq!(outcome, AdminOutcome::Applied(1));

    let after = store.list().await.unwrap();

    // Patched record: age changed, everything else intact.
    assert_eq!(after[0].age, 0.8);
    assert_eq!(after[0].name, before[0].name);
    assert_eq!(after[0].ministry, before[0].ministry);
    assert_eq!(after[0].selected_by, before[0].selected_by);

    // Unlisted records are untouched, claims included.
    assert_eq!(after[1], before[1]);
    assert_eq!(after[2], before[2]);
}

#[tokio::test]
async fn test_reset_cycle_rejects_wrong_code_with_zero_writes() {
    let (store, booking) = seeded().await;
    booking.claim(2, "Ana").await.unwrap();
    let before = store.list().await.unwrap();

    let decision = validate_reset_input(Some("PAZ"));
    assert_eq!(decision, ResetDecision::WrongCode);

    let err = booking.reset_cycle(decision).await.unwrap_err();
    assert!(matches!(err, BookingError::WrongConfirmationCode));
    assert_eq!(store.list().await.unwrap(), before);
}

#[tokio::test]
async fn test_reset_cycle_cancelled_declines_silently() {
    let (store, booking) = seeded().await;
    booking.claim(2, "Ana").await.unwrap();
    let before = store.list().await.unwrap();

    let outcome = booking
        .reset_cycle(validate_reset_input(None))
        .await
        .unwrap();
    assert_eq!(outcome, AdminOutcome::Declined);
    assert_eq!(store.list().await.unwrap(), before);
}

#[tokio::test]
async fn test_reset_cycle_releases_every_assignment() {
    let (store, booking) = seeded().await;
    booking.claim(1, "Ana").await.unwrap();
    booking.claim(3, "Luis").await.unwrap();

    let outcome = booking
        .reset_cycle(validate_reset_input(Some("amor")))
        .await
        .unwrap();
    assert_eq!(outcome, AdminOutcome::Applied(3));

    let records = store.list().await.unwrap();
    assert!(records.iter().all(|r| r.is_available()));

    // Only the assignment field was cleared.
    assert_eq!(records[0].name, "Hannah");
    assert_eq!(records[2].ministry, "Adolescentes");
}
