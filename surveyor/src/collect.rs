//! Gathering answers from respondents and storing them.
//!
//! A front end implements [`ResponseCollector`] and decides how to present
//! the survey. It receives a validation callback and only returns once every
//! answer it collected passed it (or on cancellation). [`ScriptedCollector`]
//! answers from a prepared map instead of asking anyone.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use surveyor_types::{AnswerValue, Answers, Question, QuestionType, Survey, SurveyResponse};
use uuid::Uuid;

use crate::store::SurveyStore;
use crate::validation::EMAIL;

/// Trait for front ends that collect answers to a survey.
pub trait ResponseCollector {
    /// The error type for this collector.
    type Error: Into<anyhow::Error>;

    /// Collect answers for a survey.
    ///
    /// # Arguments
    /// * `survey` - The survey to collect answers for
    /// * `validate` - Checks a single answer. Collectors re-ask or fail when
    ///   it returns `Err(message)`.
    fn collect(
        &self,
        survey: &Survey,
        validate: &dyn Fn(&Question, &AnswerValue) -> Result<(), String>,
    ) -> Result<Answers, Self::Error>;
}

/// Run a collector against a survey, checking every answer with [`check_answer`].
pub fn collect_answers<C: ResponseCollector>(
    survey: &Survey,
    collector: &C,
) -> anyhow::Result<Answers> {
    collector.collect(survey, &check_answer).map_err(Into::into)
}

/// Check one answer against its question.
///
/// Choice questions only accept the values of their enabled options, numeric
/// questions stay inside the configured range, and required questions reject
/// blank answers. Returns the message to show next to the question.
pub fn check_answer(question: &Question, value: &AnswerValue) -> Result<(), String> {
    if value.is_blank() {
        return if question.required {
            Err("This question is required".to_string())
        } else {
            Ok(())
        };
    }

    match question.kind {
        QuestionType::MultipleChoice | QuestionType::Dropdown | QuestionType::LikertScale => {
            let chosen = value
                .as_str()
                .ok_or_else(|| expected("a single choice", value))?;
            if !is_choice(question, chosen) {
                return Err(format!("'{chosen}' is not one of the options"));
            }
        }
        QuestionType::Checkbox => {
            let chosen = value
                .as_list()
                .ok_or_else(|| expected("a list of choices", value))?;
            if let Some(unknown) = chosen.iter().find(|item| !is_choice(question, item)) {
                return Err(format!("'{unknown}' is not one of the options"));
            }
        }
        QuestionType::Number | QuestionType::Rating | QuestionType::NetPromoterScore => {
            let number = value.as_number().ok_or_else(|| expected("a number", value))?;
            if !number.is_finite() {
                return Err("Must be a valid number".to_string());
            }
            check_range(question, number)?;
        }
        QuestionType::YesNo => {
            value.as_bool().ok_or_else(|| expected("yes or no", value))?;
        }
        QuestionType::Legal => {
            let accepted = value
                .as_bool()
                .ok_or_else(|| expected("an acceptance", value))?;
            if question.required && !accepted {
                return Err("The agreement must be accepted".to_string());
            }
        }
        QuestionType::Email => {
            let text = value.as_str().ok_or_else(|| expected("text", value))?;
            if !EMAIL.is_match(text) {
                return Err("Invalid email format".to_string());
            }
        }
        QuestionType::Url => {
            let text = value.as_str().ok_or_else(|| expected("text", value))?;
            if url::Url::parse(text).is_err() {
                return Err("Invalid URL format".to_string());
            }
        }
        QuestionType::Date => {
            let text = value.as_str().ok_or_else(|| expected("a date", value))?;
            NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
                .map_err(|_| "Dates use the form YYYY-MM-DD".to_string())?;
        }
        QuestionType::Time => {
            let text = value.as_str().ok_or_else(|| expected("a time", value))?;
            NaiveTime::parse_from_str(text.trim(), "%H:%M")
                .map_err(|_| "Times use the form HH:MM".to_string())?;
        }
        QuestionType::ShortText
        | QuestionType::LongText
        | QuestionType::Phone
        | QuestionType::FileUpload
        | QuestionType::Signature => {
            value.as_str().ok_or_else(|| expected("text", value))?;
        }
    }
    Ok(())
}

fn is_choice(question: &Question, value: &str) -> bool {
    question
        .option_by_value(value)
        .is_some_and(|option| !option.disabled)
}

fn check_range(question: &Question, number: f64) -> Result<(), String> {
    let min = question.settings.min_range;
    let max = match question.settings.net_promoter_score_scale {
        Some(scale) => Some(f64::from(scale.max())),
        None => question.settings.max_range,
    };
    let below = min.is_some_and(|min| number < min);
    let above = max.is_some_and(|max| number > max);
    if below || above {
        let min = min.map_or_else(|| "-".to_string(), |min| min.to_string());
        let max = max.map_or_else(|| "-".to_string(), |max| max.to_string());
        return Err(format!("Value must be between {min} and {max}"));
    }
    Ok(())
}

fn expected(what: &str, value: &AnswerValue) -> String {
    format!("Expected {what}, got {}", value.type_name().to_lowercase())
}

/// A collector that returns pre-configured answers.
///
/// Useful for tests and for importing answers gathered elsewhere.
#[derive(Debug, Clone, Default)]
pub struct ScriptedCollector {
    answers: HashMap<Uuid, AnswerValue>,
}

/// Error type for ScriptedCollector.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("Missing answer for required question: {0}")]
    MissingAnswer(Uuid),

    #[error("Answer rejected for question {question_id}: {message}")]
    Rejected { question_id: Uuid, message: String },
}

impl ScriptedCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self {
            answers: HashMap::new(),
        }
    }

    /// Add an answer for a question.
    pub fn with_answer(mut self, question_id: Uuid, value: impl Into<AnswerValue>) -> Self {
        self.answers.insert(question_id, value.into());
        self
    }

    /// Add the answer for the question with this prompt text.
    ///
    /// Questions whose text does not match are left unanswered.
    pub fn with_answer_for(
        self,
        survey: &Survey,
        text: &str,
        value: impl Into<AnswerValue>,
    ) -> Self {
        match survey.questions().find(|question| question.text == text) {
            Some(question) => {
                let id = question.id;
                self.with_answer(id, value)
            }
            None => self,
        }
    }
}

impl ResponseCollector for ScriptedCollector {
    type Error = CollectError;

    fn collect(
        &self,
        survey: &Survey,
        validate: &dyn Fn(&Question, &AnswerValue) -> Result<(), String>,
    ) -> Result<Answers, Self::Error> {
        let mut answers = Answers::new();

        for question in survey.questions().filter(|question| !question.disabled) {
            match self.answers.get(&question.id) {
                Some(value) => {
                    validate(question, value).map_err(|message| CollectError::Rejected {
                        question_id: question.id,
                        message,
                    })?;
                    answers.insert(question.id, value.clone());
                }
                None if question.required => {
                    return Err(CollectError::MissingAnswer(question.id));
                }
                None => {}
            }
        }

        Ok(answers)
    }
}

/// Error type for storing a response.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Survey {0} has not been saved")]
    MissingSurveyId(Uuid),

    #[error("No answers to submit")]
    NoAnswers,

    #[error("Question {0} is required")]
    MissingRequired(Uuid),

    #[error("Answer does not belong to this survey: {0}")]
    UnknownQuestion(Uuid),

    #[error("Invalid answer for question {question_id}: {message}")]
    InvalidAnswer { question_id: Uuid, message: String },

    #[error("Failed to store response: {0}")]
    Persistence(#[source] anyhow::Error),
}

/// Check a respondent's answers and store them as a response.
pub async fn submit_response<S: SurveyStore>(
    store: &S,
    survey: &Survey,
    answers: Answers,
    duration: Duration,
) -> Result<SurveyResponse, SubmitError> {
    let stored = store
        .get_survey(survey.id)
        .await
        .map_err(|err| SubmitError::Persistence(err.into()))?;
    if stored.is_none() {
        return Err(SubmitError::MissingSurveyId(survey.id));
    }

    if answers.is_empty() {
        return Err(SubmitError::NoAnswers);
    }

    if let Some((&unknown, _)) = answers.iter().find(|(id, _)| survey.question(**id).is_none()) {
        return Err(SubmitError::UnknownQuestion(unknown));
    }

    let mut completed = true;
    for question in survey.questions().filter(|question| !question.disabled) {
        match answers.get(question.id) {
            Some(value) => {
                check_answer(question, value).map_err(|message| SubmitError::InvalidAnswer {
                    question_id: question.id,
                    message,
                })?;
                completed &= !value.is_blank();
            }
            None if question.required => return Err(SubmitError::MissingRequired(question.id)),
            None => completed = false,
        }
    }

    let mut response =
        SurveyResponse::new(survey.id, answers).with_duration_secs(duration.as_secs());
    if !completed {
        response = response.incomplete();
    }

    let response = store
        .insert_response(response)
        .await
        .map_err(|err| SubmitError::Persistence(err.into()))?;
    tracing::info!(
        survey_id = %response.survey_id,
        response_id = %response.id,
        answers = response.answers.len(),
        completed = response.completed,
        "response submitted"
    );
    Ok(response)
}
