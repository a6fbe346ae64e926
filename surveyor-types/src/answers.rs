use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AnswerValue;

/// Error type for answer access operations.
#[derive(Debug, thiserror::Error)]
pub enum AnswerError {
    #[error("Missing answer for question: {0}")]
    Missing(Uuid),

    #[error("Type mismatch for question '{question_id}': expected {expected}, got {actual}")]
    TypeMismatch {
        question_id: Uuid,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Answers submitted by one respondent, keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers {
    values: BTreeMap<Uuid, AnswerValue>,
}

impl Answers {
    /// Create an empty answer set.
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Record the answer to a question, replacing any earlier one.
    pub fn insert(&mut self, question_id: Uuid, value: impl Into<AnswerValue>) {
        self.values.insert(question_id, value.into());
    }

    /// Builder-style `insert`.
    pub fn with(mut self, question_id: Uuid, value: impl Into<AnswerValue>) -> Self {
        self.insert(question_id, value);
        self
    }

    /// Get the answer to a question.
    pub fn get(&self, question_id: Uuid) -> Option<&AnswerValue> {
        self.values.get(&question_id)
    }

    /// Check if a question was answered.
    pub fn contains(&self, question_id: Uuid) -> bool {
        self.values.contains_key(&question_id)
    }

    /// Remove the answer to a question.
    pub fn remove(&mut self, question_id: Uuid) -> Option<AnswerValue> {
        self.values.remove(&question_id)
    }

    /// Iterate over all question-answer pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Uuid, &AnswerValue)> {
        self.values.iter()
    }

    /// Get the number of answers.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no answers.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Merge another answer set into this one.
    pub fn extend(&mut self, other: Answers) {
        self.values.extend(other.values);
    }

    // === Convenience accessors ===

    /// Get a text answer.
    pub fn get_text(&self, question_id: Uuid) -> Result<&str, AnswerError> {
        match self.get(question_id) {
            Some(AnswerValue::Text(s)) => Ok(s),
            Some(other) => Err(AnswerError::TypeMismatch {
                question_id,
                expected: "Text",
                actual: other.type_name(),
            }),
            None => Err(AnswerError::Missing(question_id)),
        }
    }

    /// Get a numeric answer.
    pub fn get_number(&self, question_id: Uuid) -> Result<f64, AnswerError> {
        match self.get(question_id) {
            Some(AnswerValue::Number(n)) => Ok(*n),
            Some(other) => Err(AnswerError::TypeMismatch {
                question_id,
                expected: "Number",
                actual: other.type_name(),
            }),
            None => Err(AnswerError::Missing(question_id)),
        }
    }

    /// Get a boolean answer.
    pub fn get_bool(&self, question_id: Uuid) -> Result<bool, AnswerError> {
        match self.get(question_id) {
            Some(AnswerValue::Bool(b)) => Ok(*b),
            Some(other) => Err(AnswerError::TypeMismatch {
                question_id,
                expected: "Bool",
                actual: other.type_name(),
            }),
            None => Err(AnswerError::Missing(question_id)),
        }
    }

    /// Get the chosen option values of a multi-select answer.
    pub fn get_list(&self, question_id: Uuid) -> Result<&[String], AnswerError> {
        match self.get(question_id) {
            Some(AnswerValue::List(items)) => Ok(items),
            Some(other) => Err(AnswerError::TypeMismatch {
                question_id,
                expected: "List",
                actual: other.type_name(),
            }),
            None => Err(AnswerError::Missing(question_id)),
        }
    }

    /// Check if a question has a non-blank answer.
    pub fn has_value(&self, question_id: Uuid) -> bool {
        self.get(question_id).is_some_and(|value| !value.is_blank())
    }
}

impl IntoIterator for Answers {
    type Item = (Uuid, AnswerValue);
    type IntoIter = std::collections::btree_map::IntoIter<Uuid, AnswerValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a Answers {
    type Item = (&'a Uuid, &'a AnswerValue);
    type IntoIter = std::collections::btree_map::Iter<'a, Uuid, AnswerValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
