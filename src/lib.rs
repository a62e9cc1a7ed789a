// Padrinos - Sponsorship booking and synchronization engine

pub mod booking;
pub mod report;
pub mod roster;
pub mod store;
pub mod sync;
pub mod types;
pub mod view;
