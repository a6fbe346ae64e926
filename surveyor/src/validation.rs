//! Decides whether a single question is well-formed.
//!
//! Checks run in a fixed order and the first failure wins:
//! 1. required questions need text
//! 2. choice-bearing types need at least one option
//! 3. option texts must be unique (trimmed, case-insensitive)
//! 4. the attached validation rule, if any, must accept the text
//!
//! Everything here is pure and cheap enough to run on every keystroke.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use surveyor_types::{Question, QuestionOption, QuestionType, ValidationKind, ValidationRules};
use uuid::Uuid;

use crate::registry;

pub(crate) static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Why a question is not well-formed. The `Display` output is the message
/// shown next to the question.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestionIssue {
    #[error("Question text is required")]
    TextRequired,

    #[error("{} questions require at least one option", .0.as_str().replacen('_', " ", 1))]
    MissingOptions(QuestionType),

    #[error("Duplicate options are not allowed")]
    DuplicateOptions,

    /// A `pattern`/`regex` rule without a usable regular expression.
    #[error("Invalid pattern configuration")]
    InvalidPattern,

    /// The attached rule rejected the text.
    #[error("{0}")]
    RuleFailed(String),
}

/// Validate a question against its type and rule configuration.
pub fn validate(question: &Question) -> Result<(), QuestionIssue> {
    if question.required && question.is_blank() {
        return Err(QuestionIssue::TextRequired);
    }

    if registry::has_options(question.kind) && question.options.is_empty() {
        return Err(QuestionIssue::MissingOptions(question.kind));
    }

    if !option_issues(&question.options).is_empty() {
        return Err(QuestionIssue::DuplicateOptions);
    }

    if let Some(rules) = &question.validation {
        check_rule(&question.text, rules)?;
    }

    Ok(())
}

/// Ids of the options whose text repeats an earlier sibling.
pub fn option_issues(options: &[QuestionOption]) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    options
        .iter()
        .filter(|option| !seen.insert(option.comparison_key()))
        .map(|option| option.id)
        .collect()
}

/// Re-run validation and store the outcome on the question and its options.
pub fn refresh(question: &mut Question) {
    let duplicates = option_issues(&question.options);
    for option in &mut question.options {
        option.is_valid = !duplicates.contains(&option.id);
    }

    match validate(question) {
        Ok(()) => {
            question.is_valid = true;
            question.validation_error = None;
        }
        Err(issue) => {
            question.is_valid = false;
            question.validation_error = Some(issue.to_string());
        }
    }
}

fn check_rule(text: &str, rules: &ValidationRules) -> Result<(), QuestionIssue> {
    match rules.kind {
        ValidationKind::Email => {
            if !EMAIL.is_match(text) {
                return Err(failure(rules, "Invalid email format"));
            }
        }
        ValidationKind::Url => {
            if url::Url::parse(text).is_err() {
                return Err(failure(rules, "Invalid URL format"));
            }
        }
        ValidationKind::Number => {
            if parse_finite(text).is_none() {
                return Err(failure(rules, "Must be a valid number"));
            }
        }
        ValidationKind::Pattern | ValidationKind::Regex => {
            let pattern = rules
                .pattern
                .as_deref()
                .filter(|pattern| !pattern.is_empty())
                .ok_or(QuestionIssue::InvalidPattern)?;
            let regex = Regex::new(pattern).map_err(|_| QuestionIssue::InvalidPattern)?;
            if !regex.is_match(text) {
                return Err(failure(rules, "Text does not match the required pattern"));
            }
        }
        ValidationKind::Length => {
            let length = text.chars().count();
            let too_short = rules.min_length.is_some_and(|min| length < min);
            let too_long = rules.max_length.is_some_and(|max| length > max);
            if too_short || too_long {
                return Err(failure(rules, "Text length is out of bounds"));
            }
        }
        ValidationKind::Range => {
            let value = parse_finite(text).ok_or_else(|| failure(rules, "Must be a valid number"))?;
            let below = rules.min.is_some_and(|min| value < min);
            let above = rules.max.is_some_and(|max| value > max);
            if below || above {
                return Err(failure(rules, "Value is out of range"));
            }
        }
        _ => {}
    }
    Ok(())
}

fn parse_finite(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

fn failure(rules: &ValidationRules, default: &str) -> QuestionIssue {
    if rules.message.trim().is_empty() {
        QuestionIssue::RuleFailed(default.to_string())
    } else {
        QuestionIssue::RuleFailed(rules.message.clone())
    }
}
