use serde::{Deserialize, Serialize};

/// Scale used by net promoter score questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum NpsScale {
    Five,
    Seven,
    Ten,
}

impl NpsScale {
    /// Highest selectable score.
    pub fn max(&self) -> u8 {
        u8::from(*self)
    }
}

impl From<NpsScale> for u8 {
    fn from(scale: NpsScale) -> Self {
        match scale {
            NpsScale::Five => 5,
            NpsScale::Seven => 7,
            NpsScale::Ten => 10,
        }
    }
}

impl TryFrom<u8> for NpsScale {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            5 => Ok(Self::Five),
            7 => Ok(Self::Seven),
            10 => Ok(Self::Ten),
            other => Err(format!("net promoter score scale must be 5, 7 or 10, got {other}")),
        }
    }
}

/// Fields that only some question types use.
///
/// Serialized flattened into the question, so the JSON carries `minRange`,
/// `maxFileSize` and friends directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_range: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_range: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,

    /// Accepted file extensions or MIME types. Empty accepts anything.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_types_allowed: Vec<String>,

    /// Upper bound in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_required: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_agreement_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_promoter_score_scale: Option<NpsScale>,
}
