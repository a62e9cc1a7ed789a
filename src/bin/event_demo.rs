//! Runnable walkthrough of a sponsorship session against the in-memory
//! store: seed, live subscription, claims, a release, and the final report.

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;

use padrinos::booking::{AdminConfirmation, BookingService};
use padrinos::report::build_report;
use padrinos::store::MemoryStore;
use padrinos::sync::SyncEngine;
use padrinos::types::CanonicalChild;
use padrinos::view::{band_counts, view, AgeBand};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let store = Arc::new(MemoryStore::new());
    let booking = BookingService::new(store.clone());
    let engine = SyncEngine::new(store.clone());

    let subscription = engine.start(
        Box::new(|records| {
            println!("mirror updated: {} records", records.len());
        }),
        Box::new(|err| {
            eprintln!("{err}");
        }),
    );

    let dataset = vec![
        CanonicalChild::new(1, "Hannah", 0.8, "Mutual"),
        CanonicalChild::new(2, "Jana", 5.0, "Mutual"),
        CanonicalChild::new(3, "Isabella Paredes", 0.7, "Mutual"),
        CanonicalChild::new(4, "Samuel", 10.0, "Adolescentes"),
    ];

    booking.seed(&dataset, AdminConfirmation::Confirmed).await?;
    booking.claim(2, "Ana").await?;
    booking.claim(4, "Luis").await?;
    booking.release(4).await?;
    booking.claim(4, "Marta").await?;

    // Let the subscription task drain the pushes before reading the mirror.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let mirror = engine.snapshot();
    let counts = band_counts(&mirror);
    println!(
        "counts: all={} infants={} children={} older={}",
        counts.all, counts.infant, counts.child, counts.older
    );

    for record in view(&mirror, AgeBand::All) {
        let status = match &record.selected_by {
            Some(name) => format!("apadrinado por {name}"),
            None => "disponible".to_string(),
        };
        println!("#{} {} ({})", record.id, record.name, status);
    }

    let report = build_report(&mirror, Utc::now());
    println!("\n{}", report.render());
    println!("\n-> {}", report.file_name());

    subscription.unsubscribe();
    Ok(())
}
