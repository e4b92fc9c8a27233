//! Raw row to canonical record.

use serde::Serialize;
use tracing::debug;

use hcard_model::{CanonicalHealthRecord, FieldId, RawRecord, RawValue};

use crate::coerce::{coerce_value, is_sentinel};
use crate::error::NormalizationError;
use crate::fields::lookup_field;

/// A recovered problem with one source cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizationIssue {
    pub field: FieldId,
    /// Header exactly as it appeared in the source.
    pub source_key: String,
    /// Source value as text.
    pub raw_value: String,
    #[serde(serialize_with = "serialize_error")]
    pub error: NormalizationError,
}

fn serialize_error<S: serde::Serializer>(
    error: &NormalizationError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Normalized record plus everything that was set aside on the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizationOutcome {
    pub record: CanonicalHealthRecord,
    pub issues: Vec<NormalizationIssue>,
    /// Source headers that match no canonical field, in source order.
    pub unmatched_keys: Vec<String>,
}

impl NormalizationOutcome {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Maps a raw row onto the canonical schema.
///
/// Never fails; see [`normalize_with_diagnostics`] for what was dropped.
pub fn normalize(raw: &RawRecord) -> CanonicalHealthRecord {
    normalize_with_diagnostics(raw).record
}

/// Maps a raw row onto the canonical schema and reports recovered issues.
///
/// For a field fed by several source columns, the first non-missing value
/// in column order is kept.
pub fn normalize_with_diagnostics(raw: &RawRecord) -> NormalizationOutcome {
    let mut record = CanonicalHealthRecord::new();
    let mut issues = Vec::new();
    let mut unmatched_keys = Vec::new();
    let mut filled = [false; FieldId::COUNT];

    for (key, value) in &raw.fields {
        let Some(field) = lookup_field(key) else {
            if !key.trim().is_empty() {
                unmatched_keys.push(key.clone());
            }
            continue;
        };
        if filled[field.index()] {
            if !is_sentinel(value) {
                issues.push(issue(field, key, value, NormalizationError::DuplicateKey));
            }
            continue;
        }
        match coerce_value(field.kind(), value) {
            Ok(coerced) => {
                if !coerced.is_missing() {
                    filled[field.index()] = true;
                    record.set(field, coerced);
                }
            }
            Err(error) => {
                debug!(
                    field = %field,
                    source_key = %key,
                    error = %error,
                    "value replaced with missing marker"
                );
                issues.push(issue(field, key, value, error));
            }
        }
    }

    NormalizationOutcome {
        record,
        issues,
        unmatched_keys,
    }
}

fn issue(
    field: FieldId,
    key: &str,
    value: &RawValue,
    error: NormalizationError,
) -> NormalizationIssue {
    NormalizationIssue {
        field,
        source_key: key.to_string(),
        raw_value: value.to_string(),
        error,
    }
}
