//! Editor module for Serum Writer
//!
//! The text editor widget plus the pure text operations behind the Insert
//! menu, the find bar and the status bar counts.

mod edit;
mod find;
mod formatting;
mod stats;
mod widget;

pub use edit::{read_clipboard, EditCommand};
pub use find::{FindBar, FindState};
pub use formatting::{apply_format, FormatCommand};
pub use stats::TextStats;
pub use widget::EditorWidget;
