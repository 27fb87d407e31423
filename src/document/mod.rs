//! Document model and editor session
//!
//! This module knows nothing about the UI: the session owns the buffer and
//! talks to the outside world through a `FilePicker` and document events.

mod doc_type;
mod model;
mod session;

pub use doc_type::DocumentType;
pub use session::{DocumentEvent, EditorSession, PendingAction, Transition};
