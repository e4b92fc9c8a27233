use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::field::FieldId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Normalization aborted instead of recovering.
    Normalize,
    /// The record has no usable name.
    MissingIdentity,
    /// The layout could not be computed or left the page.
    Layout,
    /// The renderer rejected the document.
    Render,
    /// The artifact could not be written.
    Write,
    /// The renderer did not finish before the per-record deadline.
    Timeout,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::Normalize => "normalize",
            FailureReason::MissingIdentity => "missing_identity",
            FailureReason::Layout => "layout",
            FailureReason::Render => "render",
            FailureReason::Write => "write",
            FailureReason::Timeout => "timeout",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One record that did not produce an artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordFailure {
    /// 0-based position in the batch input.
    pub index: usize,
    /// Name field when present, otherwise the source location.
    pub record_id: String,
    pub reason: FailureReason,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionResolution {
    /// The later record replaced the earlier artifact.
    Overwritten,
    /// The later record was written under a numbered name instead.
    Suffixed,
}

/// Two records that sanitized to the same artifact name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameCollision {
    /// Sanitized base name both records share.
    pub artifact: String,
    /// Index of the record that first claimed the name.
    pub first_index: usize,
    /// Index of the colliding record.
    pub index: usize,
    pub resolution: CollisionResolution,
    /// Final path written for the colliding record.
    pub written_to: PathBuf,
}

/// A recovered normalization problem, kept for the run report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDiagnostic {
    pub index: usize,
    pub record_id: String,
    pub field: Option<FieldId>,
    pub source_key: String,
    pub message: String,
}

/// Aggregate outcome of one batch run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<RecordFailure>,
    /// Artifacts written, in write order.
    pub artifacts: Vec<PathBuf>,
    pub collisions: Vec<NameCollision>,
    pub diagnostics: Vec<RecordDiagnostic>,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, artifact: PathBuf) {
        self.attempted += 1;
        self.succeeded += 1;
        self.artifacts.push(artifact);
    }

    pub fn record_failure(&mut self, failure: RecordFailure) {
        self.attempted += 1;
        self.failed += 1;
        self.failures.push(failure);
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn failures_with(&self, reason: FailureReason) -> usize {
        self.failures
            .iter()
            .filter(|failure| failure.reason == reason)
            .count()
    }

    /// Number of artifacts that replaced an earlier one.
    pub fn overwrite_count(&self) -> usize {
        self.collisions
            .iter()
            .filter(|c| c.resolution == CollisionResolution::Overwritten)
            .count()
    }

    /// Distinct files left on disk.
    pub fn unique_artifact_count(&self) -> usize {
        let mut paths: Vec<&PathBuf> = self.artifacts.iter().collect();
        paths.sort();
        paths.dedup();
        paths.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_track_outcomes() {
        let mut result = BatchResult::new();
        result.record_success(PathBuf::from("out/A_B_.svg"));
        result.record_success(PathBuf::from("out/A_B_.svg"));
        result.record_failure(RecordFailure {
            index: 2,
            record_id: "row 3".to_string(),
            reason: FailureReason::MissingIdentity,
            detail: "name is missing".to_string(),
        });

        assert_eq!(result.attempted, 3);
        assert_eq!(result.succeeded, 2);
        assert_eq!(result.failed, 1);
        assert!(result.has_failures());
        assert_eq!(result.failures_with(FailureReason::MissingIdentity), 1);
        assert_eq!(result.failures_with(FailureReason::Render), 0);
        assert_eq!(result.unique_artifact_count(), 1);
    }
}
