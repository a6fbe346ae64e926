use surveyor::{QuestionType, QuestionUpdate, SectionUpdate, SurveyEditModel};
use uuid::Uuid;

use crate::{ask, last_section, options};

pub const TITLE: &str = "Customer Feedback";

pub const NAME: &str = "What is your name?";
pub const EMAIL: &str = "Where can we reach you?";
pub const SATISFACTION: &str = "How satisfied are you with our service?";
pub const RATING: &str = "How would you rate your last order?";
pub const FEATURES: &str = "Which features do you use?";
pub const RECOMMEND: &str = "How likely are you to recommend us to a friend?";
pub const COMMENTS: &str = "Anything else you would like to tell us?";

/// Two sections: contact details, then the experience itself.
pub fn customer_feedback(owner_id: Uuid) -> anyhow::Result<SurveyEditModel> {
    let model = SurveyEditModel::new(owner_id)
        .update_details(TITLE, "Tell us how we are doing.")
        .add_section(Some("About You"));
    let about = last_section(&model)?;

    let (model, _) = ask(&model, about, QuestionUpdate::new().text(NAME).required(true))?;
    let (model, _) = ask(
        &model,
        about,
        QuestionUpdate::new()
            .kind(QuestionType::Email)
            .text(EMAIL)
            .placeholder("you@example.com"),
    )?;

    let model = model.add_section(Some("Your Experience"));
    let experience = last_section(&model)?;
    let model = model.update_section(
        experience,
        SectionUpdate::new().description("A few questions about your recent visits."),
    )?;

    let (model, _) = ask(
        &model,
        experience,
        QuestionUpdate::new()
            .kind(QuestionType::MultipleChoice)
            .text(SATISFACTION)
            .required(true)
            .options(options(&[
                "Very Satisfied",
                "Satisfied",
                "Neutral",
                "Dissatisfied",
            ])),
    )?;
    let (model, _) = ask(
        &model,
        experience,
        QuestionUpdate::new().kind(QuestionType::Rating).text(RATING),
    )?;
    let (model, _) = ask(
        &model,
        experience,
        QuestionUpdate::new()
            .kind(QuestionType::Checkbox)
            .text(FEATURES)
            .help_text("Pick as many as apply.")
            .options(options(&["Online Ordering", "Delivery", "Loyalty Program"])),
    )?;
    let (model, _) = ask(
        &model,
        experience,
        QuestionUpdate::new()
            .kind(QuestionType::NetPromoterScore)
            .text(RECOMMEND),
    )?;
    let (model, _) = ask(
        &model,
        experience,
        QuestionUpdate::new()
            .kind(QuestionType::LongText)
            .text(COMMENTS),
    )?;

    Ok(model)
}
