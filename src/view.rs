//! Filtered, ordered presentation of the mirror
//!
//! Pure functions over a mirror snapshot. The view is recomputed from
//! scratch on every mirror update and every band change; nothing is
//! maintained incrementally.

use crate::types::ChildRecord;

/// Age-range classification used for filtering.
///
/// The three narrow bands partition the non-negative ages: every age falls
/// in exactly one of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgeBand {
    All,
    /// Infants and toddlers, through age 3.
    Infant,
    /// Ages 4 through 8.
    Child,
    /// Age 9 and up.
    Older,
}

impl AgeBand {
    /// Whether an age falls in this band.
    pub fn contains(self, age: f64) -> bool {
        match self {
            AgeBand::All => true,
            AgeBand::Infant => age < 4.0,
            AgeBand::Child => (4.0..9.0).contains(&age),
            AgeBand::Older => age >= 9.0,
        }
    }
}

/// Per-band record counts for the filter controls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BandCounts {
    pub all: usize,
    pub infant: usize,
    pub child: usize,
    pub older: usize,
}

/// Compute the presented view: keep the records in the band, then order
/// available records before claimed ones, ascending id within each group.
pub fn view(records: &[ChildRecord], band: AgeBand) -> Vec<ChildRecord> {
    let mut presented: Vec<ChildRecord> = records
        .iter()
        .filter(|r| band.contains(r.age))
        .cloned()
        .collect();

    presented.sort_by_key(|r| (!r.is_available(), r.id));
    presented
}

/// Count the mirror's records per band.
pub fn band_counts(records: &[ChildRecord]) -> BandCounts {
    BandCounts {
        all: records.len(),
        infant: records.iter().filter(|r| AgeBand::Infant.contains(r.age)).count(),
        child: records.iter().filter(|r| AgeBand::Child.contains(r.age)).count(),
        older: records.iter().filter(|r| AgeBand::Older.contains(r.age)).count(),
    }
}
