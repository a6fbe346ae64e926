use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Question;

/// Publication state of a survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyStatus {
    Active,
    #[default]
    Draft,
    Closed,
}

/// A named, ordered group of questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: Uuid,

    pub survey_id: Uuid,

    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Position among the sibling sections, 0-based and contiguous.
    pub order: usize,

    /// Questions of this section, sorted by their `order`.
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Section {
    /// Create an empty section.
    pub fn new(survey_id: Uuid, title: impl Into<String>, order: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            survey_id,
            title: title.into(),
            description: String::new(),
            order,
            questions: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Get the questions.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Check if the section has any questions.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Get the number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }
}

/// The top-level structure: survey metadata and its ordered sections.
///
/// A survey is presentation-agnostic. It can be edited, rendered as a preview,
/// answered by respondents and aggregated into results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    pub id: Uuid,

    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Sections in display order; `sections[i].order == i`.
    #[serde(default)]
    pub sections: Vec<Section>,

    #[serde(default)]
    pub status: SurveyStatus,

    pub owner_id: Uuid,
}

impl Survey {
    /// Create an empty draft survey.
    pub fn new(owner_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: String::new(),
            description: String::new(),
            sections: Vec::new(),
            status: SurveyStatus::Draft,
            owner_id,
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Get the sections.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Get a section by id.
    pub fn section(&self, section_id: Uuid) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == section_id)
    }

    /// Get a question by id, searching every section.
    pub fn question(&self, question_id: Uuid) -> Option<&Question> {
        self.questions().find(|question| question.id == question_id)
    }

    /// Iterate over all questions in display order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.sections.iter().flat_map(|section| section.questions.iter())
    }

    /// Check if the survey has no questions at all.
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(Section::is_empty)
    }

    /// Get the total number of questions.
    pub fn len(&self) -> usize {
        self.sections.iter().map(Section::len).sum()
    }
}
