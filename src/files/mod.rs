//! File dialogs
//!
//! The document session never talks to the native dialogs directly. It asks
//! a [`FilePicker`], which is the rfd-backed [`NativeFilePicker`] in the app
//! and a scripted fake in tests.

pub mod dialogs;

pub use dialogs::NativeFilePicker;

use std::path::{Path, PathBuf};

/// Source of user-chosen paths.
pub trait FilePicker {
    /// Ask for an existing document to open. `None` if cancelled.
    fn pick_open(&mut self, start_dir: Option<&Path>) -> Option<PathBuf>;

    /// Ask for a destination to save to. `None` if cancelled.
    fn pick_save(&mut self, start_dir: Option<&Path>, suggested_name: &str) -> Option<PathBuf>;
}
