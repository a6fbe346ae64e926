//! The survey being edited.
//!
//! [`SurveyEditModel`] is the aggregate root a front end binds to. Every
//! mutation takes `&self` and returns the next snapshot, so a failed
//! operation leaves the caller's model untouched. After every mutation the
//! ordering of sections, questions and options is contiguous, first/last
//! flags are correct and every question carries a fresh validation result.
//!
//! [`SurveyEditModel::save`] is the only place that talks to the store.

use std::collections::{HashMap, HashSet};
use std::fmt;

use surveyor_types::{
    Direction, EditError, OptionUpdate, Question, QuestionUpdate, Section, SectionUpdate, Survey,
    SurveyStatus,
};
use uuid::Uuid;

use crate::config::EditorConfig;
use crate::session::{AccessError, Session};
use crate::store::{QuestionData, SectionData, SurveyData, SurveyStore};
use crate::{ordering, registry, validation};

/// A stored row that was removed from the model and must be deleted on the
/// next save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tombstone {
    Section(Uuid),
    Question(Uuid),
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Persisted {
    survey: bool,
    sections: HashSet<Uuid>,
    /// Stored questions and the section each row points at.
    questions: HashMap<Uuid, Uuid>,
}

/// A question that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionFailure {
    pub question_id: Uuid,
    pub message: String,
}

/// One or more questions are not well-formed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} question(s) failed validation", .failures.len())]
pub struct ValidationError {
    pub failures: Vec<QuestionFailure>,
}

impl ValidationError {
    /// Ids of the failing questions, in survey order.
    pub fn question_ids(&self) -> Vec<Uuid> {
        self.failures.iter().map(|failure| failure.question_id).collect()
    }
}

/// The step of a save that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStage {
    CreateSurvey,
    UpdateSurvey,
    DeleteQuestions,
    DeleteSections,
    SaveSections,
    UpdateQuestions,
    InsertQuestions,
}

impl fmt::Display for SaveStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            SaveStage::CreateSurvey => "create survey",
            SaveStage::UpdateSurvey => "update survey",
            SaveStage::DeleteQuestions => "delete questions",
            SaveStage::DeleteSections => "delete sections",
            SaveStage::SaveSections => "save sections",
            SaveStage::UpdateQuestions => "update questions",
            SaveStage::InsertQuestions => "insert questions",
        };
        f.write_str(stage)
    }
}

/// The store rejected a write during save.
#[derive(Debug, thiserror::Error)]
#[error("Failed to {stage}: {source}")]
pub struct PersistenceError {
    pub stage: SaveStage,

    #[source]
    pub source: anyhow::Error,

    /// Whether the rows created by the failed save were removed again.
    pub compensated: bool,
}

/// Error type for [`SurveyEditModel::save`].
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("Survey title is required")]
    MissingTitle,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Error type for [`SurveyEditModel::load`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Survey not found: {0}")]
    NotFound(Uuid),

    #[error("Failed to load survey: {0}")]
    Persistence(#[source] anyhow::Error),
}

/// Ids after a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSurvey {
    pub survey_id: Uuid,

    /// Section ids in display order.
    pub section_ids: Vec<Uuid>,

    /// Question ids in display order.
    pub question_ids: Vec<Uuid>,

    /// Whether the survey row was created by this save.
    pub created: bool,
}

/// Rows written so far by a running save.
#[derive(Debug, Default)]
struct SaveProgress {
    created_survey: Option<Uuid>,
    created_sections: Vec<Uuid>,
    moved_questions: Vec<MovedQuestion>,
    inserted_questions: Vec<Uuid>,
    applied_tombstones: Vec<Tombstone>,
}

/// A stored question pointed at a section created by the running save.
#[derive(Debug)]
struct MovedQuestion {
    question_id: Uuid,
    section_id: Uuid,
    /// The row that puts it back where it was.
    previous: QuestionData,
}

/// What undoing a failed save achieved.
#[derive(Debug)]
struct Compensation {
    complete: bool,
    /// Stored questions that went down with a removed section.
    lost_questions: Vec<Uuid>,
}

/// Store ids assigned by a save, keyed by the model's ids.
#[derive(Debug)]
struct WriteOutcome {
    survey_id: Uuid,
    owner_id: Uuid,
    sections: HashMap<Uuid, Uuid>,
    questions: HashMap<Uuid, Uuid>,
}

type StageError = (SaveStage, anyhow::Error);

fn stage<E: Into<anyhow::Error>>(stage: SaveStage) -> impl FnOnce(E) -> StageError {
    move |err| (stage, err.into())
}

/// The in-memory survey under edit.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyEditModel {
    survey: Survey,
    config: EditorConfig,
    persisted: Persisted,
    tombstones: Vec<Tombstone>,
}

impl SurveyEditModel {
    /// Create a new empty survey owned by `owner_id`.
    pub fn new(owner_id: Uuid) -> Self {
        Self::with_config(owner_id, EditorConfig::default())
    }

    /// Create a new empty survey using the given editor settings.
    pub fn with_config(owner_id: Uuid, config: EditorConfig) -> Self {
        let mut survey = Survey::new(owner_id);
        survey.status = config.default_status;
        Self {
            survey,
            config,
            persisted: Persisted::default(),
            tombstones: Vec::new(),
        }
    }

    /// Set the title (builder-style).
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.survey.title = title.into();
        self
    }

    /// Get the survey.
    pub fn survey(&self) -> &Survey {
        &self.survey
    }

    /// Take the survey out of the model.
    pub fn into_survey(self) -> Survey {
        self.survey
    }

    /// Get the editor settings.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Get the sections in display order.
    pub fn sections(&self) -> &[Section] {
        &self.survey.sections
    }

    /// Get a section by id.
    pub fn section(&self, section_id: Uuid) -> Option<&Section> {
        self.survey.section(section_id)
    }

    /// Get a question by id.
    pub fn question(&self, question_id: Uuid) -> Option<&Question> {
        self.survey.question(question_id)
    }

    /// Iterate over all questions in display order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.survey.questions()
    }

    /// Check if the survey row exists in the store.
    pub fn is_persisted(&self) -> bool {
        self.persisted.survey
    }

    /// Check if a question exists in the store.
    pub fn is_question_persisted(&self, question_id: Uuid) -> bool {
        self.persisted.questions.contains_key(&question_id)
    }

    /// Deletes waiting for the next save.
    pub fn tombstones(&self) -> &[Tombstone] {
        &self.tombstones
    }

    /// Check if every question is currently valid.
    pub fn is_valid(&self) -> bool {
        self.questions().all(|question| question.is_valid)
    }

    // === Survey ===

    /// Change title and description.
    pub fn update_details(&self, title: impl Into<String>, description: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.survey.title = title.into();
        next.survey.description = description.into();
        next
    }

    /// Change the publication status.
    pub fn set_status(&self, status: SurveyStatus) -> Self {
        let mut next = self.clone();
        next.survey.status = status;
        next
    }

    // === Sections ===

    /// Append a section. Without a title the configured default is used.
    pub fn add_section(&self, title: Option<&str>) -> Self {
        let mut next = self.clone();
        let title = title.unwrap_or(&self.config.default_section_title);
        let order = next.survey.sections.len();
        next.survey
            .sections
            .push(Section::new(next.survey.id, title, order));
        next
    }

    /// Merge new metadata into a section. Ordering is left alone.
    pub fn update_section(&self, section_id: Uuid, update: SectionUpdate) -> Result<Self, EditError> {
        let mut next = self.clone();
        let section = next
            .survey
            .sections
            .iter_mut()
            .find(|section| section.id == section_id)
            .ok_or(EditError::SectionNotFound(section_id))?;
        update.merge_into(section);
        Ok(next)
    }

    /// Remove a section with all its questions and renumber the rest.
    pub fn delete_section(&self, section_id: Uuid) -> Result<Self, EditError> {
        let mut next = self.clone();
        let position = next
            .survey
            .sections
            .iter()
            .position(|section| section.id == section_id)
            .ok_or(EditError::SectionNotFound(section_id))?;
        let removed = next.survey.sections.remove(position);

        for question in &removed.questions {
            if next.persisted.questions.remove(&question.id).is_some() {
                next.tombstones.push(Tombstone::Question(question.id));
            }
        }
        if next.persisted.sections.remove(&section_id) {
            next.tombstones.push(Tombstone::Section(section_id));
        }

        next.survey.sections = ordering::reindex_sections(&next.survey.sections);
        Ok(next)
    }

    /// Swap a section with its neighbour.
    pub fn move_section(&self, section_id: Uuid, direction: Direction) -> Result<Self, EditError> {
        let mut next = self.clone();
        next.survey.sections = ordering::move_section(&self.survey.sections, section_id, direction)?;
        Ok(next)
    }

    // === Questions ===

    /// Append a default question to a section.
    pub fn add_question(&self, section_id: Uuid) -> Result<Self, EditError> {
        let section = self.require_section(section_id)?;
        let mut question =
            registry::create_default_question(section_id, self.survey.id, section.questions.len());
        question.text = self.config.default_question_text.clone();

        let mut all = self.flatten();
        all.push(question);
        Ok(self.with_questions(ordering::reindex_questions(section_id, &all)))
    }

    /// Merge changes into a question and re-validate it.
    ///
    /// Changing the type replaces the options with the new type's defaults
    /// (unless the update brings its own) and resets type-specific settings.
    /// Types without options never keep any.
    pub fn update_question(&self, question_id: Uuid, update: QuestionUpdate) -> Result<Self, EditError> {
        let mut next = self.clone();
        let question = next.question_mut(question_id)?;

        let brings_options = update.options.is_some();
        let brings_settings = update.settings.is_some();
        let type_changed = update.merge_into(question);
        if type_changed {
            if !brings_options {
                question.options = registry::default_options(question.kind);
            }
            if !brings_settings {
                question.settings = registry::default_settings(question.kind);
            }
            tracing::debug!(question_id = %question_id, kind = %question.kind, "question type changed");
        }
        if !registry::has_options(question.kind) {
            question.options.clear();
        }
        question.options = ordering::reindex_options(&question.options);
        validation::refresh(question);
        Ok(next)
    }

    /// Remove a question and renumber its section.
    pub fn delete_question(&self, question_id: Uuid) -> Result<Self, EditError> {
        let section_id = self.require_question(question_id)?.section_id;
        let mut all = self.flatten();
        all.retain(|question| question.id != question_id);

        let mut next = self.with_questions(ordering::reindex_questions(section_id, &all));
        if next.persisted.questions.remove(&question_id).is_some() {
            next.tombstones.push(Tombstone::Question(question_id));
        }
        Ok(next)
    }

    /// Copy a question, with fresh ids, to the end of its section.
    pub fn duplicate_question(&self, question_id: Uuid) -> Result<Self, EditError> {
        let original = self.require_question(question_id)?;
        let mut copy = original.clone();
        copy.id = Uuid::new_v4();
        for option in &mut copy.options {
            option.id = Uuid::new_v4();
        }
        copy.order = usize::MAX;

        let section_id = copy.section_id;
        let mut all = self.flatten();
        all.push(copy);
        Ok(self.with_questions(ordering::reindex_questions(section_id, &all)))
    }

    /// Swap a question with its neighbour inside its section.
    pub fn move_question(&self, question_id: Uuid, direction: Direction) -> Result<Self, EditError> {
        let all = ordering::move_question(question_id, direction, &self.flatten())?;
        Ok(self.with_questions(all))
    }

    /// Move a question to `target_index` of another section.
    pub fn move_question_to_section(
        &self,
        question_id: Uuid,
        target_section_id: Uuid,
        target_index: usize,
    ) -> Result<Self, EditError> {
        self.require_section(target_section_id)?;
        let all = ordering::move_question_to_section(
            question_id,
            target_section_id,
            target_index,
            &self.flatten(),
        )?;
        Ok(self.with_questions(all))
    }

    /// Drag-and-drop inside a section.
    pub fn reorder_questions(
        &self,
        section_id: Uuid,
        source_index: usize,
        destination_index: usize,
    ) -> Result<Self, EditError> {
        self.require_section(section_id)?;
        let all =
            ordering::reorder_questions(section_id, source_index, destination_index, &self.flatten());
        Ok(self.with_questions(all))
    }

    // === Options ===

    /// Append a blank option to a choice question.
    pub fn add_option(&self, question_id: Uuid) -> Result<Self, EditError> {
        self.edit_question(question_id, |question| {
            if !registry::has_options(question.kind) {
                return Err(EditError::OptionsNotSupported {
                    question_id,
                    kind: question.kind,
                });
            }
            let option = registry::create_default_option(question.options.len());
            question.options.push(option);
            Ok(())
        })
    }

    /// Change an option. Its value keeps following the text unless it was
    /// overridden.
    pub fn update_option(
        &self,
        question_id: Uuid,
        option_id: Uuid,
        update: OptionUpdate,
    ) -> Result<Self, EditError> {
        self.edit_question(question_id, |question| {
            let option = question.option_mut(option_id).ok_or(EditError::OptionNotFound {
                question_id,
                option_id,
            })?;
            update.merge_into(option);
            Ok(())
        })
    }

    /// Remove an option and renumber the rest.
    pub fn delete_option(&self, question_id: Uuid, option_id: Uuid) -> Result<Self, EditError> {
        self.edit_question(question_id, |question| {
            let position = question
                .options
                .iter()
                .position(|option| option.id == option_id)
                .ok_or(EditError::OptionNotFound {
                    question_id,
                    option_id,
                })?;
            question.options.remove(position);
            Ok(())
        })
    }

    /// Swap an option with its neighbour.
    pub fn move_option(
        &self,
        question_id: Uuid,
        option_id: Uuid,
        direction: Direction,
    ) -> Result<Self, EditError> {
        self.edit_question(question_id, |question| {
            question.options = ordering::move_option(question, option_id, direction)?;
            Ok(())
        })
    }

    /// Drag-and-drop for options.
    pub fn reorder_options(
        &self,
        question_id: Uuid,
        source_index: usize,
        destination_index: usize,
    ) -> Result<Self, EditError> {
        self.edit_question(question_id, |question| {
            question.options =
                ordering::reorder_options(&question.options, source_index, destination_index);
            Ok(())
        })
    }

    // === Validation ===

    /// Validate every question, collecting all failures.
    pub fn validate_all(&self) -> Result<(), ValidationError> {
        let failures: Vec<QuestionFailure> = self
            .questions()
            .filter_map(|question| {
                validation::validate(question)
                    .err()
                    .map(|issue| QuestionFailure {
                        question_id: question.id,
                        message: issue.to_string(),
                    })
            })
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { failures })
        }
    }

    // === Persistence ===

    /// Write the survey to the store.
    ///
    /// Nothing is sent unless the survey has a title, every question is valid
    /// and the session belongs to an administrator. A new survey is owned by
    /// the saving administrator. Deleted questions go first, then sections,
    /// updated questions and new questions. Deleted sections go last so that
    /// questions moved out of them are not dropped by the cascade. On success
    /// the model adopts the ids assigned by the store.
    ///
    /// If a write fails, rows created by this call are removed again: the
    /// survey row if it was new, otherwise inserted questions and new sections.
    /// Stored questions that were moved into a new section are pointed back
    /// first. The model keeps its content so the save can be retried.
    pub async fn save<S: SurveyStore>(
        &mut self,
        store: &S,
        session: &Session,
    ) -> Result<SavedSurvey, SaveError> {
        if self.survey.title.trim().is_empty() {
            return Err(SaveError::MissingTitle);
        }
        self.validate_all()?;
        let admin = session.require_admin()?;

        tracing::debug!(
            survey_id = %self.survey.id,
            user_id = %admin.id,
            persisted = self.persisted.survey,
            "saving survey"
        );

        let mut progress = SaveProgress::default();
        match self.write(store, admin.id, &mut progress).await {
            Ok(outcome) => {
                let created = progress.created_survey.is_some();
                self.adopt(outcome);
                let saved = SavedSurvey {
                    survey_id: self.survey.id,
                    section_ids: self.sections().iter().map(|section| section.id).collect(),
                    question_ids: self.questions().map(|question| question.id).collect(),
                    created,
                };
                tracing::info!(
                    survey_id = %saved.survey_id,
                    sections = saved.section_ids.len(),
                    questions = saved.question_ids.len(),
                    created,
                    "survey saved"
                );
                Ok(saved)
            }
            Err((stage, source)) => {
                tracing::warn!(survey_id = %self.survey.id, %stage, error = %source, "save failed");
                self.tombstones
                    .retain(|tombstone| !progress.applied_tombstones.contains(tombstone));
                let compensation = compensate(store, &progress).await;
                for question_id in &compensation.lost_questions {
                    self.persisted.questions.remove(question_id);
                }
                Err(PersistenceError {
                    stage,
                    source,
                    compensated: compensation.complete,
                }
                .into())
            }
        }
    }

    /// Rebuild a model from the rows of a stored survey.
    pub async fn load<S: SurveyStore>(
        store: &S,
        survey_id: Uuid,
        config: EditorConfig,
    ) -> Result<Self, LoadError> {
        let record = store
            .get_survey(survey_id)
            .await
            .map_err(|err| LoadError::Persistence(err.into()))?
            .ok_or(LoadError::NotFound(survey_id))?;
        let sections = store
            .list_sections(survey_id)
            .await
            .map_err(|err| LoadError::Persistence(err.into()))?;
        let questions = store
            .list_questions(survey_id)
            .await
            .map_err(|err| LoadError::Persistence(err.into()))?;

        let sections: Vec<Section> = sections
            .into_iter()
            .map(|section| section.into_section())
            .collect();
        let section_ids: HashSet<Uuid> = sections.iter().map(|section| section.id).collect();

        let mut all = Vec::with_capacity(questions.len());
        for question in questions {
            if section_ids.contains(&question.data.section_id) {
                all.push(question.into_question());
            } else {
                tracing::warn!(
                    survey_id = %survey_id,
                    question_id = %question.id,
                    section_id = %question.data.section_id,
                    "skipping question of unknown section"
                );
            }
        }
        for section_id in &section_ids {
            all = ordering::reindex_questions(*section_id, &all);
        }

        let survey = Survey {
            id: record.id,
            title: record.data.title,
            description: record.data.description,
            sections: ordering::reindex_sections(&sections),
            status: record.data.status,
            owner_id: record.data.owner_id,
        };
        let model = Self {
            persisted: Persisted {
                survey: true,
                sections: section_ids,
                questions: all
                    .iter()
                    .map(|question| (question.id, question.section_id))
                    .collect(),
            },
            survey,
            config,
            tombstones: Vec::new(),
        }
        .with_questions(all);

        tracing::info!(
            survey_id = %survey_id,
            sections = model.sections().len(),
            questions = model.survey.len(),
            "survey loaded"
        );
        Ok(model)
    }

    async fn write<S: SurveyStore>(
        &self,
        store: &S,
        owner_id: Uuid,
        progress: &mut SaveProgress,
    ) -> Result<WriteOutcome, StageError> {
        let mut data = SurveyData::from(&self.survey);
        if !self.persisted.survey {
            data.owner_id = owner_id;
        }
        let owner_id = data.owner_id;
        let survey_id = if self.persisted.survey {
            store
                .update_survey(self.survey.id, data)
                .await
                .map_err(stage(SaveStage::UpdateSurvey))?;
            self.survey.id
        } else {
            let record = store
                .create_survey(data)
                .await
                .map_err(stage(SaveStage::CreateSurvey))?;
            progress.created_survey = Some(record.id);
            record.id
        };

        let (question_tombstones, section_tombstones): (Vec<Tombstone>, Vec<Tombstone>) = self
            .tombstones
            .iter()
            .partition(|tombstone| matches!(tombstone, Tombstone::Question(_)));
        for tombstone in question_tombstones {
            if let Tombstone::Question(id) = tombstone {
                store
                    .delete_question(id)
                    .await
                    .map_err(stage(SaveStage::DeleteQuestions))?;
            }
            progress.applied_tombstones.push(tombstone);
        }

        let mut sections = HashMap::new();
        for section in &self.survey.sections {
            let data = SectionData::from_section(section, survey_id);
            let id = if self.persisted.sections.contains(&section.id) {
                store
                    .update_section(section.id, data)
                    .await
                    .map_err(stage(SaveStage::SaveSections))?;
                section.id
            } else {
                let record = store
                    .create_section(data)
                    .await
                    .map_err(stage(SaveStage::SaveSections))?;
                progress.created_sections.push(record.id);
                record.id
            };
            sections.insert(section.id, id);
        }

        let mut questions = HashMap::new();
        let mut new_ids = Vec::new();
        let mut new_rows = Vec::new();
        for section in &self.survey.sections {
            let section_id = sections.get(&section.id).copied().unwrap_or(section.id);
            for question in &section.questions {
                let data = QuestionData::from_question(question, survey_id, section_id);
                if let Some(&stored_section) = self.persisted.questions.get(&question.id) {
                    store
                        .update_question(question.id, data)
                        .await
                        .map_err(stage(SaveStage::UpdateQuestions))?;
                    if stored_section != section_id
                        && progress.created_sections.contains(&section_id)
                    {
                        progress.moved_questions.push(MovedQuestion {
                            question_id: question.id,
                            section_id,
                            previous: QuestionData::from_question(
                                question,
                                survey_id,
                                stored_section,
                            ),
                        });
                    }
                    questions.insert(question.id, question.id);
                } else {
                    new_ids.push(question.id);
                    new_rows.push(data);
                }
            }
        }

        if !new_rows.is_empty() {
            let records = store
                .insert_questions(new_rows)
                .await
                .map_err(stage(SaveStage::InsertQuestions))?;
            progress
                .inserted_questions
                .extend(records.iter().map(|record| record.id));
            questions.extend(new_ids.into_iter().zip(records.into_iter().map(|record| record.id)));
        }

        for tombstone in section_tombstones {
            if let Tombstone::Section(id) = tombstone {
                store
                    .delete_section(id)
                    .await
                    .map_err(stage(SaveStage::DeleteSections))?;
            }
            progress.applied_tombstones.push(tombstone);
        }

        Ok(WriteOutcome {
            survey_id,
            owner_id,
            sections,
            questions,
        })
    }

    fn adopt(&mut self, outcome: WriteOutcome) {
        self.survey.id = outcome.survey_id;
        self.survey.owner_id = outcome.owner_id;
        for section in &mut self.survey.sections {
            section.survey_id = outcome.survey_id;
            if let Some(&id) = outcome.sections.get(&section.id) {
                section.id = id;
            }
            for question in &mut section.questions {
                question.survey_id = outcome.survey_id;
                question.section_id = section.id;
                if let Some(&id) = outcome.questions.get(&question.id) {
                    question.id = id;
                }
            }
        }

        self.persisted = Persisted {
            survey: true,
            sections: self.survey.sections.iter().map(|section| section.id).collect(),
            questions: self
                .survey
                .questions()
                .map(|question| (question.id, question.section_id))
                .collect(),
        };
        self.tombstones.clear();
    }

    fn flatten(&self) -> Vec<Question> {
        self.survey.questions().cloned().collect()
    }

    /// A copy of the model whose sections hold the given questions.
    fn with_questions(&self, all: Vec<Question>) -> Self {
        let mut next = self.clone();
        for section in &mut next.survey.sections {
            let mut questions: Vec<Question> = all
                .iter()
                .filter(|question| question.section_id == section.id)
                .cloned()
                .collect();
            questions.sort_by_key(|question| question.order);
            section.questions = questions;
        }
        next
    }

    fn require_section(&self, section_id: Uuid) -> Result<&Section, EditError> {
        self.section(section_id)
            .ok_or(EditError::SectionNotFound(section_id))
    }

    fn require_question(&self, question_id: Uuid) -> Result<&Question, EditError> {
        self.question(question_id)
            .ok_or(EditError::QuestionNotFound(question_id))
    }

    fn question_mut(&mut self, question_id: Uuid) -> Result<&mut Question, EditError> {
        self.survey
            .sections
            .iter_mut()
            .flat_map(|section| section.questions.iter_mut())
            .find(|question| question.id == question_id)
            .ok_or(EditError::QuestionNotFound(question_id))
    }

    /// Apply an edit to one question, then renumber its options and re-validate.
    fn edit_question(
        &self,
        question_id: Uuid,
        edit: impl FnOnce(&mut Question) -> Result<(), EditError>,
    ) -> Result<Self, EditError> {
        let mut next = self.clone();
        let question = next.question_mut(question_id)?;
        edit(question)?;
        question.options = ordering::reindex_options(&question.options);
        validation::refresh(question);
        Ok(next)
    }
}

/// Remove the rows a failed save created.
///
/// A created survey takes everything with it. Otherwise inserted questions
/// are deleted, moved questions are pointed back at their stored section and
/// new sections are deleted.
async fn compensate<S: SurveyStore>(store: &S, progress: &SaveProgress) -> Compensation {
    if let Some(survey_id) = progress.created_survey {
        let complete = match store.delete_survey(survey_id).await {
            Ok(()) => {
                tracing::info!(survey_id = %survey_id, "removed survey created by failed save");
                true
            }
            Err(err) => {
                let err: anyhow::Error = err.into();
                tracing::warn!(survey_id = %survey_id, error = %err, "could not remove survey created by failed save");
                false
            }
        };
        return Compensation {
            complete,
            lost_questions: Vec::new(),
        };
    }

    let mut compensation = Compensation {
        complete: true,
        lost_questions: Vec::new(),
    };
    for &question_id in &progress.inserted_questions {
        if let Err(err) = store.delete_question(question_id).await {
            let err: anyhow::Error = err.into();
            tracing::warn!(question_id = %question_id, error = %err, "could not remove question inserted by failed save");
            compensation.complete = false;
        }
    }

    let mut stranded = Vec::new();
    for moved in &progress.moved_questions {
        if let Err(err) = store
            .update_question(moved.question_id, moved.previous.clone())
            .await
        {
            let err: anyhow::Error = err.into();
            tracing::warn!(question_id = %moved.question_id, error = %err, "could not move question back to its section");
            compensation.complete = false;
            stranded.push(moved);
        }
    }

    for &section_id in &progress.created_sections {
        match store.delete_section(section_id).await {
            Ok(()) => compensation.lost_questions.extend(
                stranded
                    .iter()
                    .filter(|moved| moved.section_id == section_id)
                    .map(|moved| moved.question_id),
            ),
            Err(err) => {
                let err: anyhow::Error = err.into();
                tracing::warn!(section_id = %section_id, error = %err, "could not remove section created by failed save");
                compensation.complete = false;
            }
        }
    }
    compensation
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use surveyor_types::QuestionType;

    fn model_with_questions(count: usize) -> (SurveyEditModel, Uuid, Vec<Uuid>) {
        let mut model = SurveyEditModel::new(Uuid::new_v4())
            .with_title("T")
            .add_section(None);
        let section_id = model.sections()[0].id;
        for _ in 0..count {
            model = model.add_question(section_id).unwrap();
        }
        let ids = model.sections()[0].questions.iter().map(|q| q.id).collect();
        (model, section_id, ids)
    }

    fn ids(model: &SurveyEditModel, section_id: Uuid) -> Vec<Uuid> {
        model
            .section(section_id)
            .unwrap()
            .questions
            .iter()
            .map(|q| q.id)
            .collect()
    }

    #[test]
    fn new_model_uses_config() {
        let config = EditorConfig {
            default_section_title: "Part".into(),
            default_question_text: "Ask".into(),
            default_status: SurveyStatus::Active,
        };
        let model = SurveyEditModel::with_config(Uuid::new_v4(), config).add_section(None);
        assert_eq!(model.survey().status, SurveyStatus::Active);
        assert_eq!(model.sections()[0].title, "Part");

        let section_id = model.sections()[0].id;
        let model = model.add_question(section_id).unwrap();
        assert_eq!(model.sections()[0].questions[0].text, "Ask");
    }

    #[test]
    fn mutations_leave_the_original_alone() {
        let (model, section_id, _) = model_with_questions(1);
        let next = model.add_question(section_id).unwrap();
        assert_eq!(model.survey().len(), 1);
        assert_eq!(next.survey().len(), 2);
    }

    #[test]
    fn add_section_appends() {
        let model = SurveyEditModel::new(Uuid::new_v4())
            .add_section(Some("One"))
            .add_section(None);
        let orders: Vec<_> = model.sections().iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![0, 1]);
        assert_eq!(model.sections()[1].title, "New Section");
    }

    #[test]
    fn add_question_to_unknown_section_fails() {
        let model = SurveyEditModel::new(Uuid::new_v4());
        let missing = Uuid::new_v4();
        assert_eq!(
            model.add_question(missing),
            Err(EditError::SectionNotFound(missing))
        );
    }

    #[test]
    fn added_questions_keep_flags_current() {
        let (model, section_id, _) = model_with_questions(3);
        let questions = &model.section(section_id).unwrap().questions;
        let flags: Vec<_> = questions
            .iter()
            .map(|q| (q.order, q.is_first, q.is_last))
            .collect();
        assert_eq!(
            flags,
            vec![(0, true, false), (1, false, false), (2, false, true)]
        );
    }

    #[test]
    fn type_change_resets_options_and_settings() {
        let (model, _, ids) = model_with_questions(1);
        let model = model
            .update_question(ids[0], QuestionUpdate::new().kind(QuestionType::Rating))
            .unwrap();
        let question = model.question(ids[0]).unwrap();
        assert_eq!(question.settings.max_range, Some(5.0));
        assert!(question.options.is_empty());

        let model = model
            .update_question(ids[0], QuestionUpdate::new().kind(QuestionType::Dropdown))
            .unwrap();
        let question = model.question(ids[0]).unwrap();
        assert_eq!(question.options.len(), 1);
        assert_eq!(question.settings.max_range, None);
    }

    #[test]
    fn type_change_keeps_supplied_options() {
        let (model, _, ids) = model_with_questions(1);
        let options = vec![
            surveyor_types::QuestionOption::new("Yes", 0),
            surveyor_types::QuestionOption::new("No", 1),
        ];
        let model = model
            .update_question(
                ids[0],
                QuestionUpdate::new()
                    .kind(QuestionType::MultipleChoice)
                    .options(options),
            )
            .unwrap();
        assert_eq!(model.question(ids[0]).unwrap().options.len(), 2);
    }

    #[test]
    fn non_choice_types_drop_supplied_options() {
        let (model, _, ids) = model_with_questions(1);
        let model = model
            .update_question(
                ids[0],
                QuestionUpdate::new()
                    .kind(QuestionType::Date)
                    .options(vec![surveyor_types::QuestionOption::new("x", 0)]),
            )
            .unwrap();
        let question = model.question(ids[0]).unwrap();
        assert_eq!(question.kind, QuestionType::Date);
        assert!(question.options.is_empty());

        let model = model
            .update_question(
                ids[0],
                QuestionUpdate::new().options(vec![surveyor_types::QuestionOption::new("y", 0)]),
            )
            .unwrap();
        assert!(model.question(ids[0]).unwrap().options.is_empty());
    }

    #[test]
    fn add_option_needs_a_choice_type() {
        let (model, _, ids) = model_with_questions(1);
        assert_eq!(
            model.add_option(ids[0]),
            Err(EditError::OptionsNotSupported {
                question_id: ids[0],
                kind: QuestionType::ShortText,
            })
        );
        assert!(model.question(ids[0]).unwrap().options.is_empty());
    }

    #[test]
    fn update_revalidates() {
        let (model, _, ids) = model_with_questions(1);
        let model = model
            .update_question(ids[0], QuestionUpdate::new().text("").required(true))
            .unwrap();
        let question = model.question(ids[0]).unwrap();
        assert!(!question.is_valid);
        assert_eq!(
            question.validation_error.as_deref(),
            Some("Question text is required")
        );
        assert!(!model.is_valid());
    }

    #[test]
    fn delete_question_renumbers() {
        let (model, section_id, ids) = model_with_questions(3);
        let model = model.delete_question(ids[0]).unwrap();
        assert_eq!(self::ids(&model, section_id), vec![ids[1], ids[2]]);
        let first = model.question(ids[1]).unwrap();
        assert_eq!(first.order, 0);
        assert!(first.is_first);
        assert!(model.tombstones().is_empty());
    }

    #[test]
    fn duplicate_goes_last_with_fresh_ids() {
        let (model, section_id, ids) = model_with_questions(2);
        let model = model
            .update_question(ids[0], QuestionUpdate::new().kind(QuestionType::Checkbox))
            .unwrap();
        let model = model.duplicate_question(ids[0]).unwrap();

        let order = self::ids(&model, section_id);
        assert_eq!(order.len(), 3);
        assert_eq!(&order[..2], &ids[..]);

        let original = model.question(ids[0]).unwrap();
        let copy = model.question(order[2]).unwrap();
        assert_ne!(copy.id, original.id);
        assert_ne!(copy.options[0].id, original.options[0].id);
        assert_eq!(copy.kind, QuestionType::Checkbox);
        assert!(copy.is_last);
    }

    #[test]
    fn delete_section_cascades_and_renumbers() {
        let model = SurveyEditModel::new(Uuid::new_v4())
            .add_section(Some("A"))
            .add_section(Some("B"))
            .add_section(Some("C"));
        let a = model.sections()[0].id;
        let model = model.add_question(a).unwrap().delete_section(a).unwrap();

        let sections: Vec<_> = model
            .sections()
            .iter()
            .map(|s| (s.title.as_str(), s.order))
            .collect();
        assert_eq!(sections, vec![("B", 0), ("C", 1)]);
        assert_eq!(model.survey().len(), 0);
    }

    #[test]
    fn move_question_across_sections() {
        let (model, a, ids) = model_with_questions(2);
        let model = model.add_section(Some("Other"));
        let b = model.sections()[1].id;

        let model = model.move_question_to_section(ids[0], b, 0).unwrap();
        assert_eq!(self::ids(&model, a), vec![ids[1]]);
        assert_eq!(self::ids(&model, b), vec![ids[0]]);
        assert_eq!(model.question(ids[0]).unwrap().section_id, b);

        let missing = Uuid::new_v4();
        assert_eq!(
            model.move_question_to_section(ids[0], missing, 0),
            Err(EditError::SectionNotFound(missing))
        );
    }

    #[test]
    fn option_editing() {
        let (model, _, ids) = model_with_questions(1);
        let q = ids[0];
        let model = model
            .update_question(q, QuestionUpdate::new().kind(QuestionType::MultipleChoice))
            .unwrap()
            .add_option(q)
            .unwrap();
        let options: Vec<Uuid> = model.question(q).unwrap().options.iter().map(|o| o.id).collect();

        let model = model
            .update_option(q, options[0], OptionUpdate::new().text("Very Satisfied"))
            .unwrap()
            .update_option(q, options[1], OptionUpdate::new().text("very satisfied "))
            .unwrap();
        let question = model.question(q).unwrap();
        assert_eq!(question.options[0].value, "very_satisfied");
        assert!(!question.is_valid);
        assert!(!question.options[1].is_valid);

        let model = model.delete_option(q, options[0]).unwrap();
        let question = model.question(q).unwrap();
        assert!(question.is_valid);
        assert_eq!(question.options.len(), 1);
        assert_eq!(question.options[0].order, 0);

        let missing = Uuid::new_v4();
        assert_eq!(
            model.delete_option(q, missing),
            Err(EditError::OptionNotFound {
                question_id: q,
                option_id: missing,
            })
        );
    }

    #[test]
    fn validate_all_lists_every_failure() {
        let (model, _, ids) = model_with_questions(3);
        let model = model
            .update_question(ids[0], QuestionUpdate::new().text(" ").required(true))
            .unwrap()
            .update_question(
                ids[2],
                QuestionUpdate::new().kind(QuestionType::Checkbox).options(vec![]),
            )
            .unwrap();

        let err = model.validate_all().unwrap_err();
        assert_eq!(err.question_ids(), vec![ids[0], ids[2]]);
        assert_eq!(err.failures[0].message, "Question text is required");
        assert_eq!(
            err.failures[1].message,
            "checkbox questions require at least one option"
        );
        assert_eq!(err.to_string(), "2 question(s) failed validation");
    }

    #[test]
    fn stage_names() {
        let err = PersistenceError {
            stage: SaveStage::InsertQuestions,
            source: anyhow::anyhow!("boom"),
            compensated: true,
        };
        assert_eq!(err.to_string(), "Failed to insert questions: boom");
    }
}
