//! Static volunteer roster for the identification step
//!
//! The identification screen is a plain list selection with no state
//! machine; the core only supplies the partitioned lookup.

use std::collections::BTreeMap;

use crate::types::Volunteer;

/// Partition the roster by category, preserving roster order inside each
/// category. Categories are opaque labels.
pub fn partition_by_category(roster: &[Volunteer]) -> BTreeMap<String, Vec<Volunteer>> {
    let mut partitions: BTreeMap<String, Vec<Volunteer>> = BTreeMap::new();

    for volunteer in roster {
        partitions
            .entry(volunteer.category.clone())
            .or_default()
            .push(volunteer.clone());
    }

    partitions
}

/// Look up a volunteer by id.
pub fn find_by_id(roster: &[Volunteer], id: u32) -> Option<&Volunteer> {
    roster.iter().find(|v| v.id == id)
}
