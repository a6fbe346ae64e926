//! Ready-made surveys used by tests and demos.
//!
//! Each builder returns an unsaved [`SurveyEditModel`] assembled through the
//! public editing API, so the result obeys every ordering and validation rule.

pub mod customer_feedback;
pub mod employee_onboarding;

pub use customer_feedback::customer_feedback;
pub use employee_onboarding::employee_onboarding;

use surveyor::{EditError, QuestionOption, QuestionUpdate, SurveyEditModel};
use uuid::Uuid;

/// Append a question to a section and apply `update` to it.
///
/// Returns the new model and the id of the added question.
pub fn ask(
    model: &SurveyEditModel,
    section_id: Uuid,
    update: QuestionUpdate,
) -> Result<(SurveyEditModel, Uuid), EditError> {
    let model = model.add_question(section_id)?;
    let question_id = model
        .section(section_id)
        .and_then(|section| section.questions.last())
        .map(|question| question.id)
        .ok_or(EditError::SectionNotFound(section_id))?;
    let model = model.update_question(question_id, update)?;
    Ok((model, question_id))
}

/// Options with values derived from their labels.
pub fn options(labels: &[&str]) -> Vec<QuestionOption> {
    labels
        .iter()
        .enumerate()
        .map(|(order, label)| QuestionOption::new(*label, order))
        .collect()
}

/// Id of the last section of a model.
fn last_section(model: &SurveyEditModel) -> anyhow::Result<Uuid> {
    model
        .sections()
        .last()
        .map(|section| section.id)
        .ok_or_else(|| anyhow::anyhow!("survey has no sections"))
}
