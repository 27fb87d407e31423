//! Markup syntax highlighting
//!
//! Regex-driven, line-by-line decoration of the editor buffer:
//!
//! - [`format`]: sparse character formats and `|`-composable formatters
//! - [`patterns`]: the ordered rule table gated by document type
//! - [`block`]: per-block scanning, code-span suppression, spell marks and
//!   the cached whole-document highlighter used by the editor widget

pub mod block;
pub mod format;
pub mod patterns;

pub use block::{DocumentHighlighter, Segment};
pub use format::{CharFormat, Underline, Weight};
pub use patterns::HighlightPalette;
