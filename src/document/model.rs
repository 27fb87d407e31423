//! The document being edited
//!
//! `EditorDocument` keeps the buffer next to the text as it was last saved
//! or opened. Dirtiness is never stored: it is recomputed from the two on
//! every query.

use std::path::{Path, PathBuf};

use super::DocumentType;

/// Name shown for documents without a path.
pub const UNTITLED: &str = "Untitled";

/// Lifecycle state of the open document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentState {
    UntitledClean,
    UntitledDirty,
    SavedClean,
    SavedDirty,
}

impl DocumentState {
    pub fn is_dirty(&self) -> bool {
        matches!(self, Self::UntitledDirty | Self::SavedDirty)
    }

    #[allow(dead_code)]
    pub fn has_path(&self) -> bool {
        matches!(self, Self::SavedClean | Self::SavedDirty)
    }
}

/// Buffer, saved snapshot, file association and markup dialect.
#[derive(Debug, Clone, Default)]
pub struct EditorDocument {
    path: Option<PathBuf>,
    text: String,
    snapshot: String,
    doc_type: DocumentType,
}

impl EditorDocument {
    /// An empty untitled Markdown document.
    pub fn new() -> Self {
        Self::default()
    }

    /// A clean document loaded from `path`.
    pub fn from_file(path: PathBuf, text: String, doc_type: DocumentType) -> Self {
        Self {
            path: Some(path),
            snapshot: text.clone(),
            text,
            doc_type,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Mutable buffer access for the text widget.
    pub fn text_mut(&mut self) -> &mut String {
        &mut self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn snapshot(&self) -> &str {
        &self.snapshot
    }

    pub fn doc_type(&self) -> DocumentType {
        self.doc_type
    }

    pub fn set_doc_type(&mut self, doc_type: DocumentType) {
        self.doc_type = doc_type;
    }

    pub fn is_dirty(&self) -> bool {
        self.text != self.snapshot
    }

    pub fn state(&self) -> DocumentState {
        match (self.path.is_some(), self.is_dirty()) {
            (false, false) => DocumentState::UntitledClean,
            (false, true) => DocumentState::UntitledDirty,
            (true, false) => DocumentState::SavedClean,
            (true, true) => DocumentState::SavedDirty,
        }
    }

    /// The buffer was written to `path`.
    pub fn mark_saved(&mut self, path: PathBuf, doc_type: DocumentType) {
        self.path = Some(path);
        self.doc_type = doc_type;
        self.snapshot = self.text.clone();
    }

    /// File name, or "Untitled".
    pub fn display_name(&self) -> String {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNTITLED.to_string())
    }

    /// Title without the extension, used for exports.
    pub fn title(&self) -> String {
        self.path
            .as_ref()
            .and_then(|p| p.file_stem())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNTITLED.to_string())
    }
}
