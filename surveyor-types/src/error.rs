use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::QuestionType;

/// Direction of a one-step move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// Error type for edit operations on a survey.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    /// No section with this id exists in the survey being edited.
    #[error("Section not found: {0}")]
    SectionNotFound(Uuid),

    /// No question with this id exists in the survey being edited.
    #[error("Question not found: {0}")]
    QuestionNotFound(Uuid),

    /// The question exists but has no option with this id.
    #[error("Option {option_id} not found on question {question_id}")]
    OptionNotFound { question_id: Uuid, option_id: Uuid },

    /// Options were added to a question whose type has none.
    #[error("{kind} questions do not take options")]
    OptionsNotSupported { question_id: Uuid, kind: QuestionType },
}

