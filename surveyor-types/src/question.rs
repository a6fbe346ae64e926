use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{QuestionOption, QuestionType, TypeSettings, ValidationRules};

/// A single prompt in a survey section.
///
/// `order`, `is_first` and `is_last` describe the position among the questions
/// of the same section; `is_valid` and `validation_error` mirror the last
/// validation run. The editor keeps all of them current after every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: Uuid,

    /// Lookup key of the owning section.
    pub section_id: Uuid,

    /// Lookup key of the owning survey.
    pub survey_id: Uuid,

    #[serde(rename = "type")]
    pub kind: QuestionType,

    /// The prompt text shown to the respondent.
    pub text: String,

    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    /// Choices; non-empty exactly for choice-bearing types.
    #[serde(default)]
    pub options: Vec<QuestionOption>,

    pub order: usize,

    pub is_first: bool,

    pub is_last: bool,

    pub is_valid: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRules>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,

    #[serde(flatten)]
    pub settings: TypeSettings,
}

impl Question {
    /// Get an option by id.
    pub fn option(&self, option_id: Uuid) -> Option<&QuestionOption> {
        self.options.iter().find(|option| option.id == option_id)
    }

    /// Get a mutable reference to an option by id.
    pub fn option_mut(&mut self, option_id: Uuid) -> Option<&mut QuestionOption> {
        self.options.iter_mut().find(|option| option.id == option_id)
    }

    /// Find the option whose value matches, if any.
    pub fn option_by_value(&self, value: &str) -> Option<&QuestionOption> {
        self.options.iter().find(|option| option.value == value)
    }

    /// Check if the text is blank.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
