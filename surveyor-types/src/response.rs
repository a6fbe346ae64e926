use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Answers;

/// One respondent's submission for a survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    pub id: Uuid,

    pub survey_id: Uuid,

    pub answers: Answers,

    /// Whether every enabled question was answered.
    pub completed: bool,

    /// Time the respondent spent on the survey.
    #[serde(default)]
    pub duration_secs: u64,

    pub submitted_at: DateTime<Utc>,
}

impl SurveyResponse {
    /// Create a completed response submitted now.
    pub fn new(survey_id: Uuid, answers: Answers) -> Self {
        Self {
            id: Uuid::new_v4(),
            survey_id,
            answers,
            completed: true,
            duration_secs: 0,
            submitted_at: Utc::now(),
        }
    }

    /// Set the time spent.
    pub fn with_duration_secs(mut self, duration_secs: u64) -> Self {
        self.duration_secs = duration_secs;
        self
    }

    /// Set the submission time.
    pub fn with_submitted_at(mut self, submitted_at: DateTime<Utc>) -> Self {
        self.submitted_at = submitted_at;
        self
    }

    /// Mark the response as incomplete.
    pub fn incomplete(mut self) -> Self {
        self.completed = false;
        self
    }
}
