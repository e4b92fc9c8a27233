//! Presentation settings for a report page.

use hcard_model::Color;
use serde::{Deserialize, Serialize};

/// Placeholder printed for fields holding the missing marker.
pub const DEFAULT_PLACEHOLDER: &str = "NA";

/// Display format for the assessment date (chrono `strftime`).
pub const DEFAULT_DATE_FORMAT: &str = "%d-%m-%Y";

/// Asset key the header logo is drawn from.
pub const DEFAULT_LOGO_ASSET: &str = "logo";

/// Presentation settings shared by every page of a batch.
///
/// Deserializes from the `[layout]` table of a settings file; absent keys
/// keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    pub title: String,
    /// Asset key for the header image; `None` leaves the logo slot empty.
    pub logo_asset: Option<String>,
    pub placeholder: String,
    pub date_format: String,
    /// Heading and label colour.
    pub accent: Color,
    /// Section background fill.
    pub background: Color,
    pub contact_lines: Vec<String>,
    pub attribution: String,
    /// Adds the parent's contact number to the identity section.
    pub show_parent_contact: bool,
    /// Captions under the two signature boxes, left then right.
    pub signature_captions: [String; 2],
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            title: "Student Health Assessment Report".to_string(),
            logo_asset: Some(DEFAULT_LOGO_ASSET.to_string()),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            accent: Color(0x1f, 0x4e, 0x79),
            background: Color(0xee, 0xf3, 0xf8),
            contact_lines: Vec::new(),
            attribution: "Generated by Health Card Studio".to_string(),
            show_parent_contact: false,
            signature_captions: [
                "Examining Doctor".to_string(),
                "Parent / Guardian".to_string(),
            ],
        }
    }
}

impl LayoutOptions {
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    #[must_use]
    pub fn with_contact_lines(mut self, lines: Vec<String>) -> Self {
        self.contact_lines = lines;
        self
    }

    #[must_use]
    pub fn with_parent_contact(mut self, show: bool) -> Self {
        self.show_parent_contact = show;
        self
    }

    /// Footer lines in print order: contact lines, then the attribution.
    pub fn footer_lines(&self) -> Vec<&str> {
        let mut lines: Vec<&str> = self
            .contact_lines
            .iter()
            .map(String::as_str)
            .filter(|line| !line.trim().is_empty())
            .collect();
        if !self.attribution.trim().is_empty() {
            lines.push(self.attribution.as_str());
        }
        lines
    }
}
