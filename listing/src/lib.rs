//! # listing
//!
//! Domain model for turning scanned products into marketplace listings.
//!
//! This crate owns everything both front ends share: the static category
//! field registry, aspect definitions and their required/recommended/optional
//! split, AI suggestions and how they merge, the bulk-editor model, the
//! listing form with its validation gate and submit state machine, plus
//! description templates and market research.
//!
//! DESIGN
//! ======
//! No I/O lives here. Every network call goes through the [`api::ListingApi`]
//! trait, implemented with `gloo-net` by the web client and with `reqwest` by
//! the CLI. Wire decoding helpers in [`api`] are shared by both so the two
//! transports read backend responses identically.

pub mod api;
pub mod aspect;
pub mod bulk_editor;
pub mod category;
pub mod condition;
pub mod error;
pub mod form;
pub mod market;
pub mod registry;
pub mod session;
pub mod suggestion;
pub mod template;

#[cfg(test)]
mod fake_api;

pub use api::ListingApi;
pub use aspect::{Aspect, AspectGroups, AspectMode, AspectUsage};
pub use bulk_editor::BulkEditor;
pub use error::{ApiError, SubmitError};
pub use form::{AspectValues, FieldValue, ListingForm, ValidationIssue};
pub use market::{MarketData, MarketWindow};
pub use registry::{FieldDescriptor, FieldKind};
pub use session::{FormPhase, ListingSession};
pub use suggestion::{Suggestion, SuggestionMap, SuggestionSource};
pub use template::TemplateData;
