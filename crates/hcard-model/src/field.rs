//! Canonical field identifiers.
//!
//! Every normalized record carries exactly these fields. The declaration
//! order is the canonical order used by serialization and interchange
//! columns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Declared value type of a canonical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text; stringified and trimmed.
    Text,
    /// Integer or float measurement.
    Numeric,
    /// Phone/contact number; kept as digits without a fractional part.
    Contact,
    /// Calendar date, usually a spreadsheet day serial in the source.
    Date,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Numeric => "numeric",
            FieldKind::Contact => "contact",
            FieldKind::Date => "date",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A canonical health-record field.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    // Identity
    Name,
    GradeClass,
    Gender,
    School,
    Section,
    AssistId,
    ParentName,
    ParentContact,
    AssessmentDate,
    // Vitals
    Height,
    Weight,
    Bmi,
    Temperature,
    PulseRate,
    Spo2,
    // Vision
    LeftEye,
    RightEye,
    // Free text
    Comment,
}

impl FieldId {
    /// Number of canonical fields.
    pub const COUNT: usize = 18;

    /// All fields in canonical order.
    pub const ALL: [FieldId; FieldId::COUNT] = [
        FieldId::Name,
        FieldId::GradeClass,
        FieldId::Gender,
        FieldId::School,
        FieldId::Section,
        FieldId::AssistId,
        FieldId::ParentName,
        FieldId::ParentContact,
        FieldId::AssessmentDate,
        FieldId::Height,
        FieldId::Weight,
        FieldId::Bmi,
        FieldId::Temperature,
        FieldId::PulseRate,
        FieldId::Spo2,
        FieldId::LeftEye,
        FieldId::RightEye,
        FieldId::Comment,
    ];

    /// Position of this field in [`FieldId::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Canonical snake_case name, as used in JSON and CSV interchange.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldId::Name => "name",
            FieldId::GradeClass => "grade_class",
            FieldId::Gender => "gender",
            FieldId::School => "school",
            FieldId::Section => "section",
            FieldId::AssistId => "assist_id",
            FieldId::ParentName => "parent_name",
            FieldId::ParentContact => "parent_contact",
            FieldId::AssessmentDate => "assessment_date",
            FieldId::Height => "height",
            FieldId::Weight => "weight",
            FieldId::Bmi => "bmi",
            FieldId::Temperature => "temperature",
            FieldId::PulseRate => "pulse_rate",
            FieldId::Spo2 => "spo2",
            FieldId::LeftEye => "left_eye",
            FieldId::RightEye => "right_eye",
            FieldId::Comment => "comment",
        }
    }

    /// Display label printed next to the value on a report page.
    pub fn label(&self) -> &'static str {
        match self {
            FieldId::Name => "Name",
            FieldId::GradeClass => "Grade/Class",
            FieldId::Gender => "Gender",
            FieldId::School => "School",
            FieldId::Section => "Section",
            FieldId::AssistId => "Assist ID",
            FieldId::ParentName => "Parent Name",
            FieldId::ParentContact => "Parent Contact",
            FieldId::AssessmentDate => "Date of Assessment",
            FieldId::Height => "Height (cm)",
            FieldId::Weight => "Weight (kg)",
            FieldId::Bmi => "BMI",
            FieldId::Temperature => "Temperature (°F)",
            FieldId::PulseRate => "Pulse Rate (bpm)",
            FieldId::Spo2 => "SpO2 (%)",
            FieldId::LeftEye => "Left Eye",
            FieldId::RightEye => "Right Eye",
            FieldId::Comment => "Comments",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FieldId::AssessmentDate => FieldKind::Date,
            FieldId::ParentContact => FieldKind::Contact,
            FieldId::Height
            | FieldId::Weight
            | FieldId::Bmi
            | FieldId::Temperature
            | FieldId::PulseRate
            | FieldId::Spo2 => FieldKind::Numeric,
            _ => FieldKind::Text,
        }
    }

    /// True for the field that identifies the student and names the artifact.
    pub fn is_required_identity(&self) -> bool {
        matches!(self, FieldId::Name)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        FieldId::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == normalized)
            .ok_or_else(|| ModelError::UnknownField(s.to_string()))
    }
}
