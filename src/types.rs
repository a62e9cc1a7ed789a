//! Record and roster types shared across the crate.

use serde::{Deserialize, Serialize};

/// A child record as held by the store and mirrored locally.
///
/// `selected_by == None` means the record is available for sponsorship;
/// any volunteer name means it is claimed. Nothing records when a claim
/// happened or which operation produced it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChildRecord {
    /// Unique, stable identifier. Assigned at creation, never reused.
    pub id: u32,

    /// Display name.
    pub name: String,

    /// Age in years. Values below 1 are infants in fractional years
    /// (0.8 is roughly nine to ten months).
    pub age: f64,

    /// Ministry / category label, treated as opaque.
    pub ministry: String,

    /// Display name of the claiming volunteer, if any.
    #[serde(rename = "selectedBy")]
    pub selected_by: Option<String>,
}

impl ChildRecord {
    /// Whether the record can still be claimed.
    pub fn is_available(&self) -> bool {
        self.selected_by.is_none()
    }
}

/// One entry of the canonical seed dataset.
///
/// Canonical entries carry no assignment; converting one to a store record
/// always yields an available record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanonicalChild {
    pub id: u32,
    pub name: String,
    pub age: f64,
    pub ministry: String,
}

impl CanonicalChild {
    pub fn new(id: u32, name: &str, age: f64, ministry: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            age,
            ministry: ministry.to_string(),
        }
    }

    /// Convert to a store record, forcing the unclaimed state.
    pub fn into_record(self) -> ChildRecord {
        ChildRecord {
            id: self.id,
            name: self.name,
            age: self.age,
            ministry: self.ministry,
            selected_by: None,
        }
    }
}

/// A targeted correction applied by the administrative field-correction
/// batch: only the listed fields on the listed record are touched.
#[derive(Clone, Debug)]
pub struct FieldPatch {
    pub id: u32,
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl FieldPatch {
    /// Correct a single record's age, leaving every other field alone.
    pub fn age(id: u32, age: f64) -> Self {
        let mut fields = serde_json::Map::new();
        fields.insert("age".to_string(), serde_json::json!(age));
        Self { id, fields }
    }
}

/// A volunteer in the static identification roster.
///
/// The category only partitions the roster for the identification screen;
/// it carries no further behavior.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Volunteer {
    pub id: u32,
    pub name: String,
    pub category: String,
}
