//! Declarative source-header table.
//!
//! Each canonical field lists the header spellings seen in collected
//! sheets. Spellings are written as they appear in the wild and reduced
//! with [`normalize_key`] once, when the index is first used.

use std::collections::HashMap;
use std::sync::LazyLock;

use hcard_model::FieldId;

/// Accepted source spellings for one canonical field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub id: FieldId,
    pub aliases: &'static [&'static str],
}

pub static FIELD_SPECS: &[FieldSpec] = &[
    FieldSpec {
        id: FieldId::Name,
        aliases: &[
            "Name",
            "Student Name",
            "Student's Name",
            "Students Name",
            "Name of Student",
            "Student",
        ],
    },
    FieldSpec {
        id: FieldId::GradeClass,
        aliases: &["Grade / Class", "Grade", "Class", "Standard", "Std"],
    },
    FieldSpec {
        id: FieldId::Gender,
        aliases: &["Gender", "Sex"],
    },
    FieldSpec {
        id: FieldId::School,
        aliases: &["School", "School Name", "Name of School"],
    },
    FieldSpec {
        id: FieldId::Section,
        aliases: &["Section", "Div", "Division"],
    },
    FieldSpec {
        id: FieldId::AssistId,
        aliases: &["Assist ID", "AssistID", "Student ID", "ID"],
    },
    FieldSpec {
        id: FieldId::ParentName,
        aliases: &["Parent Name", "Parent's Name", "Parents Name", "Guardian Name"],
    },
    FieldSpec {
        id: FieldId::ParentContact,
        aliases: &[
            "Parent Contact",
            "Parent's Contact",
            "Parent Contact Number",
            "Parent Phone",
            "Parent Mobile",
            "Contact",
            "Contact Number",
            "Contact No",
            "Phone",
            "Phone Number",
            "Mobile",
            "Mobile Number",
        ],
    },
    FieldSpec {
        id: FieldId::AssessmentDate,
        aliases: &["Date of Assessment", "Assessment Date", "Date", "DOA"],
    },
    FieldSpec {
        id: FieldId::Height,
        aliases: &["Height", "Height (cm)", "Height cm", "Height in cm"],
    },
    FieldSpec {
        id: FieldId::Weight,
        aliases: &["Weight", "Weight (kg)", "Weight kg", "Weight in kg"],
    },
    FieldSpec {
        id: FieldId::Bmi,
        aliases: &["BMI", "Body Mass Index"],
    },
    FieldSpec {
        id: FieldId::Temperature,
        aliases: &[
            "Temperature",
            "Temp",
            "Temperature (F)",
            "Temperature (°F)",
            "Temp (F)",
        ],
    },
    FieldSpec {
        id: FieldId::PulseRate,
        aliases: &["Pulse", "Pulse Rate", "Pulse Rate (bpm)", "Heart Rate"],
    },
    FieldSpec {
        id: FieldId::Spo2,
        aliases: &["SpO2", "SpO2 (%)", "SpO2 %", "Oxygen Saturation"],
    },
    FieldSpec {
        id: FieldId::LeftEye,
        aliases: &["Left Eye", "Left Eye Vision", "Vision Left", "LE"],
    },
    FieldSpec {
        id: FieldId::RightEye,
        aliases: &["Right Eye", "Right Eye Vision", "Vision Right", "RE"],
    },
    FieldSpec {
        id: FieldId::Comment,
        aliases: &["Comment", "Comments", "Remarks", "Remark", "Notes", "Observations"],
    },
];

static ALIAS_INDEX: LazyLock<HashMap<String, FieldId>> = LazyLock::new(|| {
    let mut index = HashMap::new();
    for spec in FIELD_SPECS {
        index.insert(normalize_key(spec.id.as_str()), spec.id);
        index.insert(normalize_key(spec.id.label()), spec.id);
        for alias in spec.aliases {
            index.insert(normalize_key(alias), spec.id);
        }
    }
    index
});

/// Reduces a header to its matching form.
///
/// Trims, lower-cases, and collapses every run of whitespace, `/` or `_`
/// into a single `_`. Leading and trailing separators are dropped.
///
/// # Examples
///
/// ```
/// use hcard_normalization::normalize_key;
///
/// assert_eq!(normalize_key("GRADE  / CLASS"), "grade_class");
/// assert_eq!(normalize_key("grade_class"), "grade_class");
/// ```
pub fn normalize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut pending_separator = false;
    for ch in key.trim().chars() {
        if ch.is_whitespace() || ch == '/' || ch == '_' {
            pending_separator = true;
            continue;
        }
        if pending_separator && !out.is_empty() {
            out.push('_');
        }
        pending_separator = false;
        out.extend(ch.to_lowercase());
    }
    out
}

/// Canonical field for a raw header, if any spelling matches.
pub fn lookup_field(key: &str) -> Option<FieldId> {
    ALIAS_INDEX.get(&normalize_key(key)).copied()
}

/// Table entry for a canonical field.
pub fn field_spec(id: FieldId) -> &'static FieldSpec {
    &FIELD_SPECS[id.index()]
}
