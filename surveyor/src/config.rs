//! Editor settings, loadable from TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use surveyor_types::SurveyStatus;

/// Defaults the editor applies to new items.
///
/// ```toml
/// default_section_title = "Untitled Section"
/// default_question_text = "Untitled Question"
/// default_status = "draft"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Title of a section added without one.
    pub default_section_title: String,

    /// Prompt text of a freshly added question.
    pub default_question_text: String,

    /// Status of a newly created survey.
    pub default_status: SurveyStatus,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_section_title: "New Section".to_string(),
            default_question_text: "New Question".to_string(),
            default_status: SurveyStatus::Draft,
        }
    }
}

/// Error type for loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid editor configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

impl EditorConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), "loaded editor configuration");
        Ok(config)
    }
}
