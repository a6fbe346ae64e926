//! In-memory store for testing and demos.
//!
//! `MemoryStore` implements [`SurveyStore`] and [`AuthProvider`] on plain
//! maps. It records every call it receives and can be told to fail a given
//! operation, which makes it suitable for exercising the save path without a
//! real backend.
//!
//! # Example
//!
//! ```rust
//! use surveyor::{MemoryStore, StoreOp};
//!
//! let store = MemoryStore::new().fail_on(StoreOp::InsertQuestions);
//! assert!(store.calls().is_empty());
//! ```

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use surveyor_types::SurveyResponse;
use uuid::Uuid;

use crate::session::{AuthProvider, CurrentUser, Role};
use crate::store::{
    QuestionData, QuestionRecord, SectionData, SectionRecord, SurveyData, SurveyFilter,
    SurveyRecord, SurveyStore,
};

/// The operations a store offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    CreateSurvey,
    GetSurvey,
    ListSurveys,
    UpdateSurvey,
    DeleteSurvey,
    CreateSection,
    UpdateSection,
    DeleteSection,
    ListSections,
    InsertQuestions,
    UpdateQuestion,
    DeleteQuestion,
    ListQuestions,
    InsertResponse,
    ListResponses,
}

/// A call received by the store, with the id it targeted when there is one.
/// For creates the target is the id handed out to the new row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreCall {
    pub op: StoreOp,
    pub target: Option<Uuid>,
}

/// Error type for MemoryStore.
#[derive(Debug, thiserror::Error)]
pub enum MemoryStoreError {
    #[error("Injected failure for {0:?}")]
    Injected(StoreOp),

    #[error("Survey not found: {0}")]
    SurveyNotFound(Uuid),

    #[error("Section not found: {0}")]
    SectionNotFound(Uuid),

    #[error("Question not found: {0}")]
    QuestionNotFound(Uuid),
}

#[derive(Debug, Default)]
struct Tables {
    surveys: HashMap<Uuid, SurveyRecord>,
    sections: HashMap<Uuid, SectionRecord>,
    questions: HashMap<Uuid, QuestionRecord>,
    responses: Vec<SurveyResponse>,
    calls: Vec<StoreCall>,
    failures: HashSet<StoreOp>,
    current_user: Option<CurrentUser>,
    roles: HashMap<Uuid, Role>,
}

impl Tables {
    fn enter(&mut self, op: StoreOp, target: Option<Uuid>) -> Result<(), MemoryStoreError> {
        self.calls.push(StoreCall { op, target });
        if self.failures.contains(&op) {
            tracing::debug!(?op, "injected store failure");
            return Err(MemoryStoreError::Injected(op));
        }
        Ok(())
    }

    fn require_survey(&self, id: Uuid) -> Result<(), MemoryStoreError> {
        if self.surveys.contains_key(&id) {
            Ok(())
        } else {
            Err(MemoryStoreError::SurveyNotFound(id))
        }
    }

    fn require_section(&self, id: Uuid) -> Result<(), MemoryStoreError> {
        if self.sections.contains_key(&id) {
            Ok(())
        } else {
            Err(MemoryStoreError::SectionNotFound(id))
        }
    }
}

/// A store that keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call of this operation fail.
    pub fn fail_on(self, op: StoreOp) -> Self {
        self.tables.lock().failures.insert(op);
        self
    }

    /// Stop failing an operation.
    pub fn heal(&self, op: StoreOp) {
        self.tables.lock().failures.remove(&op);
    }

    /// Sign a user in with the given role.
    pub fn with_user(self, user: CurrentUser, role: Role) -> Self {
        {
            let mut tables = self.tables.lock();
            tables.roles.insert(user.id, role);
            tables.current_user = Some(user);
        }
        self
    }

    /// Every call received so far, oldest first.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.tables.lock().calls.clone()
    }

    /// Calls of one operation.
    pub fn calls_of(&self, op: StoreOp) -> Vec<StoreCall> {
        self.tables
            .lock()
            .calls
            .iter()
            .copied()
            .filter(|call| call.op == op)
            .collect()
    }

    /// Forget recorded calls.
    pub fn clear_calls(&self) {
        self.tables.lock().calls.clear();
    }

    /// Number of stored surveys.
    pub fn survey_count(&self) -> usize {
        self.tables.lock().surveys.len()
    }

    /// Number of stored sections across all surveys.
    pub fn section_count(&self) -> usize {
        self.tables.lock().sections.len()
    }

    /// Number of stored questions across all surveys.
    pub fn question_count(&self) -> usize {
        self.tables.lock().questions.len()
    }
}

#[async_trait]
impl SurveyStore for MemoryStore {
    type Error = MemoryStoreError;

    async fn create_survey(&self, data: SurveyData) -> Result<SurveyRecord, Self::Error> {
        let mut tables = self.tables.lock();
        let id = Uuid::new_v4();
        tables.enter(StoreOp::CreateSurvey, Some(id))?;
        let now = Utc::now();
        let record = SurveyRecord {
            id,
            data,
            created_at: now,
            updated_at: now,
        };
        tables.surveys.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_survey(&self, id: Uuid) -> Result<Option<SurveyRecord>, Self::Error> {
        let mut tables = self.tables.lock();
        tables.enter(StoreOp::GetSurvey, Some(id))?;
        Ok(tables.surveys.get(&id).cloned())
    }

    async fn list_surveys(
        &self,
        owner_id: Uuid,
        filter: &SurveyFilter,
    ) -> Result<Vec<SurveyRecord>, Self::Error> {
        let mut tables = self.tables.lock();
        tables.enter(StoreOp::ListSurveys, Some(owner_id))?;
        let mut surveys: Vec<SurveyRecord> = tables
            .surveys
            .values()
            .filter(|survey| survey.data.owner_id == owner_id && filter.matches(&survey.data))
            .cloned()
            .collect();
        surveys.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(surveys)
    }

    async fn update_survey(&self, id: Uuid, data: SurveyData) -> Result<SurveyRecord, Self::Error> {
        let mut tables = self.tables.lock();
        tables.enter(StoreOp::UpdateSurvey, Some(id))?;
        let record = tables
            .surveys
            .get_mut(&id)
            .ok_or(MemoryStoreError::SurveyNotFound(id))?;
        record.data = data;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete_survey(&self, id: Uuid) -> Result<(), Self::Error> {
        let mut tables = self.tables.lock();
        tables.enter(StoreOp::DeleteSurvey, Some(id))?;
        tables
            .surveys
            .remove(&id)
            .ok_or(MemoryStoreError::SurveyNotFound(id))?;
        tables.sections.retain(|_, section| section.data.survey_id != id);
        tables.questions.retain(|_, question| question.data.survey_id != id);
        tables.responses.retain(|response| response.survey_id != id);
        Ok(())
    }

    async fn create_section(&self, data: SectionData) -> Result<SectionRecord, Self::Error> {
        let mut tables = self.tables.lock();
        let id = Uuid::new_v4();
        tables.enter(StoreOp::CreateSection, Some(id))?;
        tables.require_survey(data.survey_id)?;
        let record = SectionRecord { id, data };
        tables.sections.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_section(
        &self,
        id: Uuid,
        data: SectionData,
    ) -> Result<SectionRecord, Self::Error> {
        let mut tables = self.tables.lock();
        tables.enter(StoreOp::UpdateSection, Some(id))?;
        let record = tables
            .sections
            .get_mut(&id)
            .ok_or(MemoryStoreError::SectionNotFound(id))?;
        record.data = data;
        Ok(record.clone())
    }

    async fn delete_section(&self, id: Uuid) -> Result<(), Self::Error> {
        let mut tables = self.tables.lock();
        tables.enter(StoreOp::DeleteSection, Some(id))?;
        tables
            .sections
            .remove(&id)
            .ok_or(MemoryStoreError::SectionNotFound(id))?;
        tables.questions.retain(|_, question| question.data.section_id != id);
        Ok(())
    }

    async fn list_sections(&self, survey_id: Uuid) -> Result<Vec<SectionRecord>, Self::Error> {
        let mut tables = self.tables.lock();
        tables.enter(StoreOp::ListSections, Some(survey_id))?;
        let mut sections: Vec<SectionRecord> = tables
            .sections
            .values()
            .filter(|section| section.data.survey_id == survey_id)
            .cloned()
            .collect();
        sections.sort_by_key(|section| section.data.order);
        Ok(sections)
    }

    async fn insert_questions(
        &self,
        rows: Vec<QuestionData>,
    ) -> Result<Vec<QuestionRecord>, Self::Error> {
        let mut tables = self.tables.lock();
        tables.enter(StoreOp::InsertQuestions, None)?;
        for row in &rows {
            tables.require_survey(row.survey_id)?;
            tables.require_section(row.section_id)?;
        }
        let records: Vec<QuestionRecord> = rows
            .into_iter()
            .map(|data| QuestionRecord {
                id: Uuid::new_v4(),
                data,
            })
            .collect();
        for record in &records {
            tables.questions.insert(record.id, record.clone());
        }
        Ok(records)
    }

    async fn update_question(
        &self,
        id: Uuid,
        data: QuestionData,
    ) -> Result<QuestionRecord, Self::Error> {
        let mut tables = self.tables.lock();
        tables.enter(StoreOp::UpdateQuestion, Some(id))?;
        tables.require_section(data.section_id)?;
        let record = tables
            .questions
            .get_mut(&id)
            .ok_or(MemoryStoreError::QuestionNotFound(id))?;
        record.data = data;
        Ok(record.clone())
    }

    async fn delete_question(&self, id: Uuid) -> Result<(), Self::Error> {
        let mut tables = self.tables.lock();
        tables.enter(StoreOp::DeleteQuestion, Some(id))?;
        tables
            .questions
            .remove(&id)
            .ok_or(MemoryStoreError::QuestionNotFound(id))?;
        Ok(())
    }

    async fn list_questions(&self, survey_id: Uuid) -> Result<Vec<QuestionRecord>, Self::Error> {
        let mut tables = self.tables.lock();
        tables.enter(StoreOp::ListQuestions, Some(survey_id))?;
        let mut questions: Vec<QuestionRecord> = tables
            .questions
            .values()
            .filter(|question| question.data.survey_id == survey_id)
            .cloned()
            .collect();
        questions.sort_by_key(|question| question.data.order);
        Ok(questions)
    }

    async fn insert_response(
        &self,
        response: SurveyResponse,
    ) -> Result<SurveyResponse, Self::Error> {
        let mut tables = self.tables.lock();
        tables.enter(StoreOp::InsertResponse, Some(response.survey_id))?;
        tables.require_survey(response.survey_id)?;
        tables.responses.push(response.clone());
        Ok(response)
    }

    async fn list_responses(&self, survey_id: Uuid) -> Result<Vec<SurveyResponse>, Self::Error> {
        let mut tables = self.tables.lock();
        tables.enter(StoreOp::ListResponses, Some(survey_id))?;
        Ok(tables
            .responses
            .iter()
            .filter(|response| response.survey_id == survey_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AuthProvider for MemoryStore {
    type Error = MemoryStoreError;

    async fn current_user(&self) -> Result<Option<CurrentUser>, Self::Error> {
        Ok(self.tables.lock().current_user.clone())
    }

    async fn role(&self, user_id: Uuid) -> Result<Role, Self::Error> {
        Ok(self
            .tables
            .lock()
            .roles
            .get(&user_id)
            .copied()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surveyor_types::{Answers, SurveyStatus};

    fn survey_data() -> SurveyData {
        SurveyData {
            title: "T".into(),
            description: String::new(),
            status: SurveyStatus::Draft,
            owner_id: Uuid::new_v4(),
        }
    }

    fn section_data(survey_id: Uuid, order: usize) -> SectionData {
        SectionData {
            survey_id,
            title: format!("S{order}"),
            description: String::new(),
            order,
        }
    }

    #[tokio::test]
    async fn records_calls_and_assigns_ids() {
        let store = MemoryStore::new();
        let survey = store.create_survey(survey_data()).await.unwrap();
        let fetched = store.get_survey(survey.id).await.unwrap();
        assert_eq!(fetched, Some(survey.clone()));

        assert_eq!(
            store.calls(),
            vec![
                StoreCall {
                    op: StoreOp::CreateSurvey,
                    target: Some(survey.id)
                },
                StoreCall {
                    op: StoreOp::GetSurvey,
                    target: Some(survey.id)
                },
            ]
        );
    }

    #[tokio::test]
    async fn lists_surveys_of_one_owner() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let mine = |title: &str, status| SurveyData {
            title: title.into(),
            status,
            owner_id: owner,
            ..survey_data()
        };
        let feedback = store
            .create_survey(mine("Customer Feedback", SurveyStatus::Active))
            .await
            .unwrap();
        let onboarding = store
            .create_survey(mine("Onboarding", SurveyStatus::Draft))
            .await
            .unwrap();
        store.create_survey(survey_data()).await.unwrap();

        let mut all: Vec<Uuid> = store
            .list_surveys(owner, &SurveyFilter::new())
            .await
            .unwrap()
            .into_iter()
            .map(|survey| survey.id)
            .collect();
        all.sort();
        let mut expected = vec![feedback.id, onboarding.id];
        expected.sort();
        assert_eq!(all, expected);

        let drafts = store
            .list_surveys(owner, &SurveyFilter::new().status(SurveyStatus::Draft))
            .await
            .unwrap();
        assert_eq!(drafts, vec![onboarding]);

        let found = store
            .list_surveys(owner, &SurveyFilter::new().search("feed"))
            .await
            .unwrap();
        assert_eq!(found, vec![feedback]);
        assert!(
            store
                .list_surveys(Uuid::new_v4(), &SurveyFilter::new())
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn injected_failure_still_records_call() {
        let store = MemoryStore::new().fail_on(StoreOp::CreateSurvey);
        let err = store.create_survey(survey_data()).await.unwrap_err();
        assert!(matches!(err, MemoryStoreError::Injected(StoreOp::CreateSurvey)));
        assert_eq!(store.calls_of(StoreOp::CreateSurvey).len(), 1);
        assert_eq!(store.survey_count(), 0);

        store.heal(StoreOp::CreateSurvey);
        assert!(store.create_survey(survey_data()).await.is_ok());
    }

    #[tokio::test]
    async fn deleting_a_survey_cascades() {
        let store = MemoryStore::new();
        let survey = store.create_survey(survey_data()).await.unwrap();
        let section = store
            .create_section(section_data(survey.id, 0))
            .await
            .unwrap();
        let question = QuestionData::from_question(
            &crate::registry::create_default_question(section.id, survey.id, 0),
            survey.id,
            section.id,
        );
        store.insert_questions(vec![question]).await.unwrap();
        store
            .insert_response(SurveyResponse::new(survey.id, Answers::new()))
            .await
            .unwrap();

        store.delete_survey(survey.id).await.unwrap();
        assert_eq!(store.survey_count(), 0);
        assert_eq!(store.section_count(), 0);
        assert_eq!(store.question_count(), 0);
        assert!(store.list_responses(survey.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sections_list_in_order() {
        let store = MemoryStore::new();
        let survey = store.create_survey(survey_data()).await.unwrap();
        for order in [2, 0, 1] {
            store
                .create_section(section_data(survey.id, order))
                .await
                .unwrap();
        }
        let titles: Vec<_> = store
            .list_sections(survey.id)
            .await
            .unwrap()
            .into_iter()
            .map(|section| section.data.title)
            .collect();
        assert_eq!(titles, vec!["S0", "S1", "S2"]);
    }

    #[tokio::test]
    async fn section_needs_existing_survey() {
        let store = MemoryStore::new();
        let missing = Uuid::new_v4();
        let err = store
            .create_section(section_data(missing, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, MemoryStoreError::SurveyNotFound(id) if id == missing));
    }

    #[tokio::test]
    async fn acts_as_auth_provider() {
        let user = CurrentUser::new(Uuid::new_v4(), "a@example.com");
        let store = MemoryStore::new().with_user(user.clone(), Role::Admin);
        assert_eq!(store.current_user().await.unwrap(), Some(user.clone()));
        assert_eq!(store.role(user.id).await.unwrap(), Role::Admin);
        assert_eq!(store.role(Uuid::new_v4()).await.unwrap(), Role::User);
    }
}
