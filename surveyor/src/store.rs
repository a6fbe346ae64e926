//! The persistence boundary.
//!
//! Durable storage is an external collaborator. The editor only needs plain
//! CRUD calls keyed by id, expressed by [`SurveyStore`]. Rows are flat: a
//! section row knows its survey, a question row knows its survey and section,
//! and the tree is rebuilt on load.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surveyor_types::{
    Question, QuestionOption, QuestionType, Section, Survey, SurveyResponse, SurveyStatus,
    TypeSettings, ValidationRules,
};
use uuid::Uuid;

/// Survey columns written by the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyData {
    pub title: String,
    pub description: String,
    pub status: SurveyStatus,
    pub owner_id: Uuid,
}

impl From<&Survey> for SurveyData {
    fn from(survey: &Survey) -> Self {
        Self {
            title: survey.title.clone(),
            description: survey.description.clone(),
            status: survey.status,
            owner_id: survey.owner_id,
        }
    }
}

/// A stored survey row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyRecord {
    pub id: Uuid,

    #[serde(flatten)]
    pub data: SurveyData,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Narrows a survey listing.
///
/// `search` matches title or description, ignoring case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurveyFilter {
    pub status: Option<SurveyStatus>,
    pub search: Option<String>,
}

impl SurveyFilter {
    /// A filter that lets every survey through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only surveys with this status.
    pub fn status(mut self, status: SurveyStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Only surveys whose title or description contains `query`.
    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search = Some(query.into());
        self
    }

    /// Check a row against the filter.
    pub fn matches(&self, data: &SurveyData) -> bool {
        if self.status.is_some_and(|status| status != data.status) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(query) if !query.is_empty() => {
                let query = query.to_lowercase();
                data.title.to_lowercase().contains(&query)
                    || data.description.to_lowercase().contains(&query)
            }
            _ => true,
        }
    }
}

/// Section columns written by the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionData {
    pub survey_id: Uuid,
    pub title: String,
    pub description: String,
    pub order: usize,
}

impl SectionData {
    /// Columns of a section, attached to `survey_id`.
    pub fn from_section(section: &Section, survey_id: Uuid) -> Self {
        Self {
            survey_id,
            title: section.title.clone(),
            description: section.description.clone(),
            order: section.order,
        }
    }
}

/// A stored section row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRecord {
    pub id: Uuid,

    #[serde(flatten)]
    pub data: SectionData,
}

impl SectionRecord {
    /// An empty in-memory section for this row.
    pub fn into_section(self) -> Section {
        Section {
            id: self.id,
            survey_id: self.data.survey_id,
            title: self.data.title,
            description: self.data.description,
            order: self.data.order,
            questions: Vec::new(),
        }
    }
}

/// Question columns written by the editor. Derived state (position flags,
/// validity) is not stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionData {
    pub survey_id: Uuid,

    pub section_id: Uuid,

    #[serde(rename = "type")]
    pub kind: QuestionType,

    pub text: String,

    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    #[serde(default)]
    pub options: Vec<QuestionOption>,

    pub order: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRules>,

    #[serde(default)]
    pub disabled: bool,

    #[serde(flatten)]
    pub settings: TypeSettings,
}

impl QuestionData {
    /// Columns of a question, attached to the given survey and section.
    pub fn from_question(question: &Question, survey_id: Uuid, section_id: Uuid) -> Self {
        Self {
            survey_id,
            section_id,
            kind: question.kind,
            text: question.text.clone(),
            required: question.required,
            help_text: question.help_text.clone(),
            placeholder: question.placeholder.clone(),
            options: question.options.clone(),
            order: question.order,
            validation: question.validation.clone(),
            disabled: question.disabled,
            settings: question.settings.clone(),
        }
    }
}

/// A stored question row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: Uuid,

    #[serde(flatten)]
    pub data: QuestionData,
}

impl QuestionRecord {
    /// The in-memory question for this row. Position flags and validity are
    /// placeholders until the owning section is reindexed.
    pub fn into_question(self) -> Question {
        let data = self.data;
        Question {
            id: self.id,
            section_id: data.section_id,
            survey_id: data.survey_id,
            kind: data.kind,
            text: data.text,
            required: data.required,
            help_text: data.help_text,
            placeholder: data.placeholder,
            options: data.options,
            order: data.order,
            is_first: false,
            is_last: false,
            is_valid: true,
            validation_error: None,
            validation: data.validation,
            disabled: data.disabled,
            settings: data.settings,
        }
    }
}

/// CRUD access to stored surveys, sections, questions and responses.
///
/// Ids of created rows are assigned by the store. Deleting a survey or a
/// section must cascade to its children.
#[async_trait]
pub trait SurveyStore: Send + Sync {
    /// The error type for this store.
    type Error: Into<anyhow::Error> + Send;

    async fn create_survey(&self, data: SurveyData) -> Result<SurveyRecord, Self::Error>;

    async fn get_survey(&self, id: Uuid) -> Result<Option<SurveyRecord>, Self::Error>;

    /// Surveys owned by `owner_id` that pass `filter`, newest first.
    async fn list_surveys(
        &self,
        owner_id: Uuid,
        filter: &SurveyFilter,
    ) -> Result<Vec<SurveyRecord>, Self::Error>;

    async fn update_survey(&self, id: Uuid, data: SurveyData) -> Result<SurveyRecord, Self::Error>;

    async fn delete_survey(&self, id: Uuid) -> Result<(), Self::Error>;

    async fn create_section(&self, data: SectionData) -> Result<SectionRecord, Self::Error>;

    async fn update_section(&self, id: Uuid, data: SectionData)
    -> Result<SectionRecord, Self::Error>;

    async fn delete_section(&self, id: Uuid) -> Result<(), Self::Error>;

    async fn list_sections(&self, survey_id: Uuid) -> Result<Vec<SectionRecord>, Self::Error>;

    /// Insert many questions at once. The returned rows are in input order.
    async fn insert_questions(
        &self,
        rows: Vec<QuestionData>,
    ) -> Result<Vec<QuestionRecord>, Self::Error>;

    async fn update_question(
        &self,
        id: Uuid,
        data: QuestionData,
    ) -> Result<QuestionRecord, Self::Error>;

    async fn delete_question(&self, id: Uuid) -> Result<(), Self::Error>;

    async fn list_questions(&self, survey_id: Uuid) -> Result<Vec<QuestionRecord>, Self::Error>;

    async fn insert_response(&self, response: SurveyResponse)
    -> Result<SurveyResponse, Self::Error>;

    async fn list_responses(&self, survey_id: Uuid) -> Result<Vec<SurveyResponse>, Self::Error>;
}
