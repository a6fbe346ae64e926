//! Core types for the surveyor crate.
//!
//! This crate provides the data model the survey editor works on:
//! - `Survey` and `Section` - The aggregate and its ordered groups
//! - `Question`, `QuestionType` and `QuestionOption` - Typed prompts and their choices
//! - `ValidationRules` - Per-question rule configuration
//! - `Answers` and `AnswerValue` - What a respondent submitted
//! - `QuestionUpdate`, `SectionUpdate`, `OptionUpdate` - Partial updates applied by the editor

mod question_type;
pub use question_type::{QuestionType, TypeInfo, UnknownTypeError};

mod validation_rules;
pub use validation_rules::{ValidationKind, ValidationRules};

mod settings;
pub use settings::{NpsScale, TypeSettings};

mod option;
pub use option::{QuestionOption, slugify};

mod question;
pub use question::Question;

mod survey;
pub use survey::{Section, Survey, SurveyStatus};

mod updates;
pub use updates::{OptionUpdate, QuestionUpdate, SectionUpdate};

mod answer_value;
pub use answer_value::AnswerValue;

mod answers;
pub use answers::{AnswerError, Answers};

mod error;
pub use error::{Direction, EditError};

mod response;
pub use response::SurveyResponse;
