//! Catalog of supported question types and factories for fresh questions and options.

use surveyor_types::{
    NpsScale, Question, QuestionOption, QuestionType, TypeInfo, TypeSettings, UnknownTypeError,
    ValidationKind,
};
use uuid::Uuid;

const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Describe a question type.
pub fn describe(kind: QuestionType) -> TypeInfo {
    let (label, has_options) = match kind {
        QuestionType::ShortText => ("Short Text", false),
        QuestionType::LongText => ("Long Text", false),
        QuestionType::MultipleChoice => ("Multiple Choice", true),
        QuestionType::Checkbox => ("Checkboxes", true),
        QuestionType::Dropdown => ("Dropdown", true),
        QuestionType::Date => ("Date Picker", false),
        QuestionType::Number => ("Number", false),
        QuestionType::FileUpload => ("File Upload", false),
        QuestionType::Rating => ("Rating", false),
        QuestionType::LikertScale => ("Likert Scale", true),
        QuestionType::Email => ("Email", false),
        QuestionType::Phone => ("Phone", false),
        QuestionType::Url => ("Website", false),
        QuestionType::Time => ("Time", false),
        QuestionType::YesNo => ("Yes / No", false),
        QuestionType::NetPromoterScore => ("Net Promoter Score", false),
        QuestionType::Signature => ("Signature", false),
        QuestionType::Legal => ("Legal Agreement", false),
    };
    TypeInfo { label, has_options }
}

/// Describe a question type given by its wire name.
pub fn describe_str(kind: &str) -> Result<TypeInfo, UnknownTypeError> {
    Ok(describe(kind.parse()?))
}

/// Every catalog entry in selector order.
pub fn all() -> impl Iterator<Item = (QuestionType, TypeInfo)> {
    QuestionType::ALL.into_iter().map(|kind| (kind, describe(kind)))
}

/// Check if questions of this type must carry options.
pub fn has_options(kind: QuestionType) -> bool {
    describe(kind).has_options
}

/// Type-specific fields a new question of this type starts with.
pub fn default_settings(kind: QuestionType) -> TypeSettings {
    match kind {
        QuestionType::Rating => TypeSettings {
            min_range: Some(1.0),
            max_range: Some(5.0),
            step: Some(1.0),
            ..TypeSettings::default()
        },
        QuestionType::NetPromoterScore => TypeSettings {
            min_range: Some(0.0),
            max_range: Some(10.0),
            step: Some(1.0),
            net_promoter_score_scale: Some(NpsScale::Ten),
            ..TypeSettings::default()
        },
        QuestionType::FileUpload => TypeSettings {
            max_file_size: Some(MAX_UPLOAD_BYTES),
            ..TypeSettings::default()
        },
        QuestionType::Signature => TypeSettings {
            signature_required: Some(true),
            ..TypeSettings::default()
        },
        QuestionType::Legal => TypeSettings {
            legal_agreement_text: Some(String::new()),
            ..TypeSettings::default()
        },
        _ => TypeSettings::default(),
    }
}

/// The options a question of this type starts with: one blank option for
/// choice-bearing types, none otherwise.
pub fn default_options(kind: QuestionType) -> Vec<QuestionOption> {
    if has_options(kind) {
        vec![create_default_option(0)]
    } else {
        Vec::new()
    }
}

/// A blank option at the given position.
pub fn create_default_option(order: usize) -> QuestionOption {
    QuestionOption {
        id: Uuid::new_v4(),
        text: String::new(),
        value: String::new(),
        order,
        is_valid: true,
        validation_type: ValidationKind::None,
        disabled: false,
    }
}

/// A blank short-text question at the given position.
///
/// The question is marked last because new questions are always appended.
pub fn create_default_question(section_id: Uuid, survey_id: Uuid, order: usize) -> Question {
    Question {
        id: Uuid::new_v4(),
        section_id,
        survey_id,
        kind: QuestionType::ShortText,
        text: String::new(),
        required: false,
        help_text: None,
        placeholder: None,
        options: Vec::new(),
        order,
        is_first: order == 0,
        is_last: true,
        is_valid: true,
        validation_error: None,
        validation: None,
        disabled: false,
        settings: default_settings(QuestionType::ShortText),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_types_have_options() {
        let with_options: Vec<_> = all()
            .filter(|(_, info)| info.has_options)
            .map(|(kind, _)| kind)
            .collect();
        assert_eq!(
            with_options,
            vec![
                QuestionType::MultipleChoice,
                QuestionType::Checkbox,
                QuestionType::Dropdown,
                QuestionType::LikertScale,
            ]
        );
    }

    #[test]
    fn describe_str_rejects_unknown() {
        assert_eq!(describe_str("checkbox").unwrap().label, "Checkboxes");
        let err = describe_str("matrix").unwrap_err();
        assert_eq!(err.0, "matrix");
    }

    #[test]
    fn default_question_shape() {
        let section = Uuid::new_v4();
        let survey = Uuid::new_v4();
        let question = create_default_question(section, survey, 0);
        assert_eq!(question.kind, QuestionType::ShortText);
        assert!(!question.required);
        assert!(question.options.is_empty());
        assert!(question.is_first);
        assert!(question.is_last);
        assert!(question.is_valid);
        assert_eq!(question.section_id, section);
        assert_eq!(question.survey_id, survey);

        let later = create_default_question(section, survey, 3);
        assert!(!later.is_first);
        assert_eq!(later.order, 3);
    }

    #[test]
    fn default_option_shape() {
        let option = create_default_option(4);
        assert_eq!(option.text, "");
        assert_eq!(option.value, "");
        assert_eq!(option.order, 4);
        assert!(option.is_valid);
        assert_eq!(option.validation_type, ValidationKind::None);
    }

    #[test]
    fn rating_defaults_to_five_stars() {
        let settings = default_settings(QuestionType::Rating);
        assert_eq!(settings.min_range, Some(1.0));
        assert_eq!(settings.max_range, Some(5.0));
        assert_eq!(default_options(QuestionType::Rating).len(), 0);
        assert_eq!(default_options(QuestionType::Dropdown).len(), 1);
    }
}
