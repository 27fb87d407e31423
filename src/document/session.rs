//! Editor session: the document state machine
//!
//! Operations that would throw away unsaved text (new, open, close, exit)
//! do not act straight away on a dirty document. They park themselves in a
//! single pending slot and report `Transition::NeedsConfirmation`; the UI
//! then answers with [`EditorSession::confirm`] or [`EditorSession::decline`].
//! Asking again before answering replaces the parked action instead of
//! queueing a second one.

use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use super::model::{DocumentState, EditorDocument};
use super::DocumentType;
use crate::error::{Error, Result};
use crate::events::EventBus;
use crate::files::FilePicker;

// ─────────────────────────────────────────────────────────────────────────────
// Actions & Events
// ─────────────────────────────────────────────────────────────────────────────

/// Actions that may need confirmation before execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    NewDocument,
    Open(PathBuf),
    Close,
    Exit,
}

impl PendingAction {
    pub fn confirmation_message(&self) -> &'static str {
        match self {
            PendingAction::Exit => "You have unsaved changes. Exit anyway?",
            _ => "You have unsaved changes. Continue without saving?",
        }
    }
}

/// Result of requesting a destructive action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The action has been carried out (or, for exit, may proceed).
    Done,
    /// The document is dirty; the action waits for `confirm`/`decline`.
    NeedsConfirmation(String),
}

/// Notifications emitted after the document changed identity or was saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    Opened(PathBuf),
    Saved(PathBuf),
    /// Buffer and path cleared by "new"
    Cleared,
    /// Buffer and path cleared by "close"
    Closed,
    TypeChanged(DocumentType),
}

// ─────────────────────────────────────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────────────────────────────────────

/// Owns the open document and drives its lifecycle.
#[derive(Debug, Default)]
pub struct EditorSession {
    document: EditorDocument,
    pending: Option<PendingAction>,
    force_markdown: bool,
    events: EventBus<DocumentEvent>,
}

impl EditorSession {
    pub fn new(force_markdown: bool) -> Self {
        Self {
            force_markdown,
            ..Self::default()
        }
    }

    pub fn document(&self) -> &EditorDocument {
        &self.document
    }

    pub fn text(&self) -> &str {
        self.document.text()
    }

    /// Mutable buffer access for the text widget.
    pub fn text_mut(&mut self) -> &mut String {
        self.document.text_mut()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.document.set_text(text);
    }

    pub fn state(&self) -> DocumentState {
        self.document.state()
    }

    pub fn is_dirty(&self) -> bool {
        self.document.is_dirty()
    }

    pub fn doc_type(&self) -> DocumentType {
        self.document.doc_type()
    }

    pub fn force_markdown(&self) -> bool {
        self.force_markdown
    }

    #[allow(dead_code)]
    pub fn pending_action(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    /// Register an observer for document events. Re-using a key replaces
    /// the earlier handler.
    pub fn subscribe(&mut self, key: &str, handler: impl FnMut(&DocumentEvent) + 'static) {
        self.events.subscribe(key, handler);
    }

    /// "Serum Writer - name", with a trailing `*` while dirty.
    pub fn window_title(&self) -> String {
        format!(
            "Serum Writer - {}{}",
            self.document.display_name(),
            if self.is_dirty() { " *" } else { "" }
        )
    }

    /// Document name as shown in the status bar.
    pub fn status_label(&self) -> String {
        if self.is_dirty() {
            format!("*  {}", self.document.display_name())
        } else {
            self.document.display_name()
        }
    }

    fn emit(&mut self, event: DocumentEvent) {
        debug!("Document event: {:?}", event);
        self.events.emit(&event);
    }

    fn set_type(&mut self, doc_type: DocumentType) {
        if self.document.doc_type() != doc_type {
            self.document.set_doc_type(doc_type);
            self.emit(DocumentEvent::TypeChanged(doc_type));
        }
    }

    fn park(&mut self, action: PendingAction) -> Transition {
        let message = action.confirmation_message().to_string();
        if let Some(previous) = self.pending.replace(action) {
            debug!("Replacing pending action {:?}", previous);
        }
        Transition::NeedsConfirmation(message)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Destructive Requests
    // ─────────────────────────────────────────────────────────────────────────

    /// Start a new untitled document.
    pub fn request_new(&mut self) -> Transition {
        if self.is_dirty() {
            return self.park(PendingAction::NewDocument);
        }
        self.clear(DocumentEvent::Cleared);
        Transition::Done
    }

    /// Replace the buffer with the contents of `path`.
    pub fn request_open(&mut self, path: PathBuf) -> Result<Transition> {
        if self.is_dirty() {
            return Ok(self.park(PendingAction::Open(path)));
        }
        self.open_now(path)?;
        Ok(Transition::Done)
    }

    /// Close the current file, leaving an empty untitled document.
    pub fn request_close(&mut self) -> Transition {
        if self.is_dirty() {
            return self.park(PendingAction::Close);
        }
        self.clear(DocumentEvent::Closed);
        Transition::Done
    }

    /// `Done` means the application may exit now.
    pub fn request_exit(&mut self) -> Transition {
        if self.is_dirty() {
            return self.park(PendingAction::Exit);
        }
        Transition::Done
    }

    /// Carry out the pending action. Returns the action performed.
    ///
    /// The pending slot is emptied even when the action fails.
    pub fn confirm(&mut self) -> Result<Option<PendingAction>> {
        let Some(action) = self.pending.take() else {
            return Ok(None);
        };
        debug!("Confirmed {:?}", action);
        match &action {
            PendingAction::NewDocument => self.clear(DocumentEvent::Cleared),
            PendingAction::Close => self.clear(DocumentEvent::Closed),
            PendingAction::Open(path) => self.open_now(path.clone())?,
            PendingAction::Exit => {}
        }
        Ok(Some(action))
    }

    /// Drop the pending action, leaving the document untouched.
    pub fn decline(&mut self) -> Option<PendingAction> {
        let action = self.pending.take();
        if let Some(action) = &action {
            debug!("Declined {:?}", action);
        }
        action
    }

    fn clear(&mut self, event: DocumentEvent) {
        let previous_type = self.document.doc_type();
        self.document = EditorDocument::new();
        self.emit(event);
        if previous_type != self.document.doc_type() {
            self.emit(DocumentEvent::TypeChanged(self.document.doc_type()));
        }
    }

    fn open_now(&mut self, path: PathBuf) -> Result<()> {
        if !path.exists() {
            return Err(Error::FileNotFound(path));
        }
        let text = fs::read_to_string(&path).map_err(|source| Error::FileRead {
            path: path.clone(),
            source,
        })?;

        let doc_type = DocumentType::resolve(Some(&path), self.force_markdown);
        let previous_type = self.document.doc_type();
        self.document = EditorDocument::from_file(path.clone(), text, doc_type);
        info!("Opened {} as {}", path.display(), doc_type.display_name());

        self.emit(DocumentEvent::Opened(path));
        if previous_type != doc_type {
            self.emit(DocumentEvent::TypeChanged(doc_type));
        }
        Ok(())
    }

    /// Open a previously used file at startup.
    ///
    /// A stale path is not an error: the session stays on an untitled
    /// document. Returns whether the file was opened.
    pub fn restore(&mut self, path: &Path) -> bool {
        match self.open_now(path.to_path_buf()) {
            Ok(()) => true,
            Err(Error::FileNotFound(_)) => {
                debug!("Last file {} no longer exists", path.display());
                false
            }
            Err(e) => {
                warn!("Could not restore {}: {}", path.display(), e);
                false
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Saving
    // ─────────────────────────────────────────────────────────────────────────

    /// Save to the current path, or ask for one if the document is untitled.
    ///
    /// Returns `Ok(false)` if the user cancelled the picker.
    pub fn save(&mut self, picker: &mut dyn FilePicker) -> Result<bool> {
        match self.document.path().map(Path::to_path_buf) {
            Some(path) => {
                self.save_to(path)?;
                Ok(true)
            }
            None => self.save_as(picker),
        }
    }

    /// Ask for a new path and save there.
    pub fn save_as(&mut self, picker: &mut dyn FilePicker) -> Result<bool> {
        let start_dir = self
            .document
            .path()
            .and_then(Path::parent)
            .map(Path::to_path_buf);
        let suggested = match self.document.path() {
            Some(_) => self.document.display_name(),
            None => format!(
                "{}.{}",
                self.document.title(),
                self.document.doc_type().extensions()[0]
            ),
        };

        match picker.pick_save(start_dir.as_deref(), &suggested) {
            Some(path) => {
                self.save_to(path)?;
                Ok(true)
            }
            None => {
                debug!("Save As cancelled");
                Ok(false)
            }
        }
    }

    /// Write the buffer to `path` verbatim and make it the document's path.
    pub fn save_to(&mut self, path: PathBuf) -> Result<()> {
        fs::write(&path, self.document.text()).map_err(|source| Error::FileWrite {
            path: path.clone(),
            source,
        })?;

        let doc_type = DocumentType::resolve(Some(&path), self.force_markdown);
        let previous_type = self.document.doc_type();
        self.document.mark_saved(path.clone(), previous_type);
        info!("Saved {}", path.display());

        self.emit(DocumentEvent::Saved(path));
        self.set_type(doc_type);
        Ok(())
    }
}
