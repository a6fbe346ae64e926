use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The kind of a question, determining its input widget and answer shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Single-line text input.
    #[default]
    ShortText,

    /// Multi-line text input.
    LongText,

    /// Pick exactly one option (radio buttons).
    MultipleChoice,

    /// Pick any number of options.
    Checkbox,

    /// Pick exactly one option from a select box.
    Dropdown,

    /// Calendar date.
    Date,

    /// Free numeric input.
    Number,

    /// File attachment.
    FileUpload,

    /// Numeric score within a range.
    Rating,

    /// Agreement scale with one option per step.
    LikertScale,

    /// Email address input.
    Email,

    /// Phone number input.
    Phone,

    /// Web address input.
    Url,

    /// Time of day.
    Time,

    /// Yes/no confirmation.
    YesNo,

    /// 0..=N recommendation score.
    NetPromoterScore,

    /// Drawn or typed signature.
    Signature,

    /// Legal agreement the respondent has to accept.
    Legal,
}

/// Catalog entry for a question type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeInfo {
    /// Human readable label shown in the type selector.
    pub label: &'static str,

    /// Whether questions of this type carry selectable options.
    pub has_options: bool,
}

/// A type string that is not part of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown question type: {0}")]
pub struct UnknownTypeError(pub String);

impl QuestionType {
    /// Every supported type, in selector order.
    pub const ALL: [QuestionType; 18] = [
        Self::ShortText,
        Self::LongText,
        Self::MultipleChoice,
        Self::Checkbox,
        Self::Dropdown,
        Self::Date,
        Self::Number,
        Self::FileUpload,
        Self::Rating,
        Self::LikertScale,
        Self::Email,
        Self::Phone,
        Self::Url,
        Self::Time,
        Self::YesNo,
        Self::NetPromoterScore,
        Self::Signature,
        Self::Legal,
    ];

    /// The wire name of this type, e.g. `"multiple_choice"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShortText => "short_text",
            Self::LongText => "long_text",
            Self::MultipleChoice => "multiple_choice",
            Self::Checkbox => "checkbox",
            Self::Dropdown => "dropdown",
            Self::Date => "date",
            Self::Number => "number",
            Self::FileUpload => "file_upload",
            Self::Rating => "rating",
            Self::LikertScale => "likert_scale",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Url => "url",
            Self::Time => "time",
            Self::YesNo => "yes_no",
            Self::NetPromoterScore => "net_promoter_score",
            Self::Signature => "signature",
            Self::Legal => "legal",
        }
    }

    /// Check if answers to this type are numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Number | Self::Rating | Self::NetPromoterScore)
    }

    /// Check if answers to this type are free text.
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            Self::ShortText
                | Self::LongText
                | Self::Email
                | Self::Phone
                | Self::Url
                | Self::Date
                | Self::Time
                | Self::FileUpload
                | Self::Signature
        )
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = UnknownTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownTypeError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_types() {
        for kind in QuestionType::ALL {
            assert_eq!(kind.as_str().parse::<QuestionType>().unwrap(), kind);
        }
    }

    #[test]
    fn parse_unknown_type() {
        let err = "matrix_radio".parse::<QuestionType>().unwrap_err();
        assert_eq!(err, UnknownTypeError("matrix_radio".to_string()));
        assert_eq!(err.to_string(), "Unknown question type: matrix_radio");
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&QuestionType::LikertScale).unwrap();
        assert_eq!(json, "\"likert_scale\"");
        let kind: QuestionType = serde_json::from_str("\"net_promoter_score\"").unwrap();
        assert_eq!(kind, QuestionType::NetPromoterScore);
    }
}
