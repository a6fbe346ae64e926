use serde::{Deserialize, Serialize};

use crate::QuestionOption;

/// The kind of rule attached to a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationKind {
    #[default]
    None,
    Email,
    Url,
    Phone,
    Date,
    Number,
    Text,
    Regex,
    Required,
    Pattern,
    Custom,
    Options,
    Length,
    Range,
    Rating,
}

/// Rule configuration consulted when deciding whether a question is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRules {
    /// Which rule applies.
    #[serde(rename = "type")]
    pub kind: ValidationKind,

    /// Message shown instead of the built-in one when the rule fails.
    #[serde(default)]
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    /// Regular expression for `pattern` and `regex` rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Options attached to the rule by the editor form. Carried, never checked.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<QuestionOption>,
}

impl ValidationRules {
    /// Create rules of the given kind with no bounds and no message.
    pub fn new(kind: ValidationKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Create a `pattern` rule.
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self {
            kind: ValidationKind::Pattern,
            pattern: Some(pattern.into()),
            ..Self::default()
        }
    }

    /// Set the failure message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set numeric bounds.
    pub fn with_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Set length bounds.
    pub fn with_length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    /// Check if this rule does nothing.
    pub fn is_none(&self) -> bool {
        self.kind == ValidationKind::None
    }
}
