//! # surveyor
//!
//! Survey editing model. Storage-agnostic.
//!
//! A survey is a list of ordered sections, each holding ordered, typed
//! questions. This crate keeps that tree consistent while it is edited and
//! writes it to a store when asked.
//!
//! ## Usage
//!
//! ```rust
//! use surveyor::{Direction, QuestionType, QuestionUpdate, SurveyEditModel};
//! use uuid::Uuid;
//!
//! let model = SurveyEditModel::new(Uuid::new_v4())
//!     .with_title("Customer Feedback")
//!     .add_section(None);
//! let section_id = model.sections()[0].id;
//!
//! let model = model.add_question(section_id)?.add_question(section_id)?;
//! let second = model.sections()[0].questions[1].id;
//!
//! let model = model
//!     .update_question(second, QuestionUpdate::new().kind(QuestionType::Dropdown))?
//!     .move_question(second, Direction::Up)?;
//!
//! let first = &model.sections()[0].questions[0];
//! assert_eq!(first.id, second);
//! assert_eq!(first.options.len(), 1);
//! assert!(first.is_first);
//! # Ok::<(), surveyor::EditError>(())
//! ```
//!
//! ## Modules
//!
//! - `registry` - The question type catalog and factories for new items
//! - `validation` - Decides whether a question is well-formed
//! - `ordering` - Keeps sections, questions and options contiguously ordered
//! - `edit_model` - The aggregate the editor mutates, and save/load
//! - `store` - The persistence boundary (`SurveyStore`)
//! - `session` - Current user and role (`AuthProvider`, `Session`)
//! - `collect` - Gathering and submitting answers (`ResponseCollector`)
//! - `results` - Aggregated answers for a results page
//! - `config` - Editor settings from TOML
//!
//! `MemoryStore` implements both collaborator traits in memory, for tests
//! and demos.

// Re-export all types from surveyor-types
pub use surveyor_types::*;

pub mod collect;
pub mod config;
pub mod edit_model;
pub mod ordering;
pub mod registry;
pub mod results;
pub mod session;
pub mod store;
pub mod validation;

mod memory_store;

pub use collect::{
    CollectError, ResponseCollector, ScriptedCollector, SubmitError, check_answer,
    collect_answers, submit_response,
};
pub use config::{ConfigError, EditorConfig};
pub use edit_model::{
    LoadError, PersistenceError, QuestionFailure, SaveError, SaveStage, SavedSurvey,
    SurveyEditModel, Tombstone, ValidationError,
};
pub use memory_store::{MemoryStore, MemoryStoreError, StoreCall, StoreOp};
pub use results::{QuestionResults, ResultsSummary, SurveyResults, TimelinePoint};
pub use session::{AccessError, AuthProvider, CurrentUser, Role, Session};
pub use store::{
    QuestionData, QuestionRecord, SectionData, SectionRecord, SurveyData, SurveyFilter,
    SurveyRecord, SurveyStore,
};
pub use validation::QuestionIssue;
