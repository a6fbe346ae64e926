use surveyor::{QuestionType, QuestionUpdate, SurveyEditModel, TypeSettings};
use uuid::Uuid;

use crate::{ask, last_section, options};

pub const TITLE: &str = "Employee Onboarding";

pub const FULL_NAME: &str = "Full name";
pub const EMPLOYEE_ID: &str = "Employee number";
pub const START_DATE: &str = "First working day";
pub const PHONE: &str = "Mobile number";
pub const LAPTOP: &str = "Preferred laptop";
pub const MONITOR: &str = "Do you need an external monitor?";
pub const POLICY: &str = "Acceptable use policy";
pub const SIGNATURE: &str = "Signature";

pub const POLICY_TEXT: &str = "I have read and accept the acceptable use policy.";

/// Three sections: personal details, equipment and agreements.
pub fn employee_onboarding(owner_id: Uuid) -> anyhow::Result<SurveyEditModel> {
    let model = SurveyEditModel::new(owner_id)
        .update_details(TITLE, "Everything we need before your first day.")
        .add_section(Some("Personal Details"));
    let personal = last_section(&model)?;

    let (model, _) = ask(
        &model,
        personal,
        QuestionUpdate::new().text(FULL_NAME).required(true),
    )?;
    let (model, _) = ask(
        &model,
        personal,
        QuestionUpdate::new()
            .text(EMPLOYEE_ID)
            .required(true)
            .placeholder("E-1234"),
    )?;
    let (model, _) = ask(
        &model,
        personal,
        QuestionUpdate::new()
            .kind(QuestionType::Date)
            .text(START_DATE)
            .required(true),
    )?;
    let (model, _) = ask(
        &model,
        personal,
        QuestionUpdate::new().kind(QuestionType::Phone).text(PHONE),
    )?;

    let model = model.add_section(Some("Equipment"));
    let equipment = last_section(&model)?;
    let (model, _) = ask(
        &model,
        equipment,
        QuestionUpdate::new()
            .kind(QuestionType::Dropdown)
            .text(LAPTOP)
            .required(true)
            .options(options(&["MacBook Pro", "ThinkPad", "Dell XPS"])),
    )?;
    let (model, _) = ask(
        &model,
        equipment,
        QuestionUpdate::new().kind(QuestionType::YesNo).text(MONITOR),
    )?;

    let model = model.add_section(Some("Agreements"));
    let agreements = last_section(&model)?;
    let (model, _) = ask(
        &model,
        agreements,
        QuestionUpdate::new()
            .kind(QuestionType::Legal)
            .text(POLICY)
            .required(true)
            .settings(TypeSettings {
                legal_agreement_text: Some(POLICY_TEXT.to_string()),
                ..TypeSettings::default()
            }),
    )?;
    let (model, _) = ask(
        &model,
        agreements,
        QuestionUpdate::new()
            .kind(QuestionType::Signature)
            .text(SIGNATURE)
            .required(true),
    )?;

    Ok(model)
}
