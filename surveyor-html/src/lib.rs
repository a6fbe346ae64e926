//! # surveyor-html
//!
//! Render a [`surveyor::Survey`] as a fillable HTML form, for previews and
//! printing.
//!
//! ```rust
//! use surveyor::SurveyEditModel;
//! use surveyor_html::{HtmlOptions, to_html};
//! use uuid::Uuid;
//!
//! let model = SurveyEditModel::new(Uuid::new_v4())
//!     .with_title("Team Lunch")
//!     .add_section(Some("Food"));
//! let html = to_html(model.survey(), &HtmlOptions::new().full_document(false));
//! assert!(html.contains("<legend>Food</legend>"));
//! ```

mod generator;

pub use generator::{HtmlOptions, escape_html, to_html};
