use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::field::FieldId;
use crate::value::{CalendarDate, FieldValue};

/// A normalized, schema-fixed health-assessment record.
///
/// Every [`FieldId`] always has a value; absent data is
/// [`FieldValue::Missing`]. Serializes as a JSON object keyed by canonical
/// field name in canonical order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<FieldId, FieldValue>",
    into = "BTreeMap<FieldId, FieldValue>"
)]
pub struct CanonicalHealthRecord {
    values: [FieldValue; FieldId::COUNT],
}

impl Default for CanonicalHealthRecord {
    fn default() -> Self {
        Self {
            values: std::array::from_fn(|_| FieldValue::Missing),
        }
    }
}

impl CanonicalHealthRecord {
    /// A record with every field set to the missing marker.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, field: FieldId, value: FieldValue) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: FieldId, value: FieldValue) {
        self.values[field.index()] = value;
    }

    pub fn get(&self, field: FieldId) -> &FieldValue {
        &self.values[field.index()]
    }

    /// Iterates `(field, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &FieldValue)> {
        FieldId::ALL.iter().copied().zip(self.values.iter())
    }

    pub fn name(&self) -> Option<&str> {
        self.get(FieldId::Name).as_text()
    }

    pub fn assessment_date(&self) -> Option<CalendarDate> {
        self.get(FieldId::AssessmentDate).as_date()
    }

    pub fn has_comment(&self) -> bool {
        !self.get(FieldId::Comment).is_missing()
    }

    /// Number of fields holding real data.
    pub fn present_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_missing()).count()
    }
}

impl From<BTreeMap<FieldId, FieldValue>> for CanonicalHealthRecord {
    fn from(map: BTreeMap<FieldId, FieldValue>) -> Self {
        let mut record = CanonicalHealthRecord::new();
        for (field, value) in map {
            record.set(field, value);
        }
        record
    }
}

impl From<CanonicalHealthRecord> for BTreeMap<FieldId, FieldValue> {
    fn from(record: CanonicalHealthRecord) -> Self {
        FieldId::ALL.into_iter().zip(record.values).collect()
    }
}
