use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ValidationKind;

/// One selectable choice of a choice-bearing question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOption {
    pub id: Uuid,

    /// Label shown to the respondent.
    pub text: String,

    /// Value stored in answers. Follows `slugify(text)` unless set explicitly.
    pub value: String,

    /// Position among the sibling options, 0-based and contiguous.
    pub order: usize,

    /// False when the option repeats the text of an earlier sibling.
    pub is_valid: bool,

    #[serde(default)]
    pub validation_type: ValidationKind,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

impl QuestionOption {
    /// Create an option with a fresh id whose value derives from its text.
    pub fn new(text: impl Into<String>, order: usize) -> Self {
        let text = text.into();
        Self {
            id: Uuid::new_v4(),
            value: slugify(&text),
            text,
            order,
            is_valid: true,
            validation_type: ValidationKind::None,
            disabled: false,
        }
    }

    /// Set an explicit value instead of the derived one.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Check if the value is still the one derived from the text.
    pub fn has_derived_value(&self) -> bool {
        self.value == slugify(&self.text)
    }

    /// The text used for duplicate detection.
    pub fn comparison_key(&self) -> String {
        self.text.trim().to_lowercase()
    }
}

/// Derive an answer value from option text: lower-cased, with every run of
/// non-alphanumeric characters collapsed to a single `_`.
///
/// ```
/// use surveyor_types::slugify;
///
/// assert_eq!(slugify("Very Satisfied"), "very_satisfied");
/// assert_eq!(slugify("  Yes, please! "), "yes_please");
/// assert_eq!(slugify(""), "");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;
    for ch in text.trim().chars() {
        if ch.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('_');
            }
            pending_separator = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_separator = true;
        }
    }
    slug
}
