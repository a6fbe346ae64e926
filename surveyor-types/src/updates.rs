use serde::{Deserialize, Serialize};

use crate::{Question, QuestionOption, QuestionType, Section, TypeSettings, ValidationRules};

/// Partial update of a question. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionUpdate {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<QuestionType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<QuestionOption>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRules>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<TypeSettings>,
}

impl QuestionUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the question type.
    pub fn kind(mut self, kind: QuestionType) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Change the prompt text.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Change whether an answer is required.
    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Change the help text.
    pub fn help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = Some(help_text.into());
        self
    }

    /// Change the placeholder.
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Replace the options.
    pub fn options(mut self, options: Vec<QuestionOption>) -> Self {
        self.options = Some(options);
        self
    }

    /// Replace the validation rules.
    pub fn validation(mut self, validation: ValidationRules) -> Self {
        self.validation = Some(validation);
        self
    }

    /// Enable or disable the question.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(disabled);
        self
    }

    /// Replace the type-specific settings.
    pub fn settings(mut self, settings: TypeSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Shallow-merge into a question. Returns `true` if the type changed.
    pub fn merge_into(self, question: &mut Question) -> bool {
        let type_changed = self.kind.is_some_and(|kind| kind != question.kind);
        if let Some(kind) = self.kind {
            question.kind = kind;
        }
        if let Some(text) = self.text {
            question.text = text;
        }
        if let Some(required) = self.required {
            question.required = required;
        }
        if let Some(help_text) = self.help_text {
            question.help_text = Some(help_text);
        }
        if let Some(placeholder) = self.placeholder {
            question.placeholder = Some(placeholder);
        }
        if let Some(options) = self.options {
            question.options = options;
        }
        if let Some(validation) = self.validation {
            question.validation = Some(validation);
        }
        if let Some(disabled) = self.disabled {
            question.disabled = disabled;
        }
        if let Some(settings) = self.settings {
            question.settings = settings;
        }
        type_changed
    }
}

/// Partial update of a section's metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SectionUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Change the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Shallow-merge into a section. Ordering is left alone.
    pub fn merge_into(self, section: &mut Section) {
        if let Some(title) = self.title {
            section.title = title;
        }
        if let Some(description) = self.description {
            section.description = description;
        }
    }
}

/// Partial update of an option.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Explicit value. Without it the value keeps following the text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
}

impl OptionUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the label.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Override the stored value.
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Enable or disable the option.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(disabled);
        self
    }

    /// Merge into an option. A derived value follows a text change; an
    /// overridden one stays as it is.
    pub fn merge_into(self, option: &mut QuestionOption) {
        let follows_text = option.has_derived_value();
        if let Some(text) = self.text {
            option.text = text;
            if follows_text {
                option.value = crate::slugify(&option.text);
            }
        }
        if let Some(value) = self.value {
            option.value = value;
        }
        if let Some(disabled) = self.disabled {
            option.disabled = disabled;
        }
    }
}
