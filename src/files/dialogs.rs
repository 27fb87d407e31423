//! Native file dialog integration using the rfd crate

use rfd::FileDialog;
use std::path::{Path, PathBuf};

use super::FilePicker;
use crate::document::DocumentType;

const TEXT_EXTENSIONS: &[&str] = &["txt", "text"];
const PDF_EXTENSIONS: &[&str] = &["pdf"];
const HTML_EXTENSIONS: &[&str] = &["html", "htm"];

fn with_document_filters(mut dialog: FileDialog) -> FileDialog {
    for doc_type in DocumentType::all() {
        dialog = dialog.add_filter(doc_type.display_name(), doc_type.extensions());
    }
    dialog
        .add_filter("Text Files", TEXT_EXTENSIONS)
        .add_filter("All Files", &["*"])
}

fn with_start_dir(dialog: FileDialog, start_dir: Option<&Path>) -> FileDialog {
    match start_dir {
        Some(dir) => dialog.set_directory(dir),
        None => dialog,
    }
}

/// Opens a native dialog for choosing a document to open.
pub fn open_file_dialog(start_dir: Option<&Path>) -> Option<PathBuf> {
    let dialog = with_document_filters(FileDialog::new().set_title("Open File"));
    with_start_dir(dialog, start_dir).pick_file()
}

/// Opens a native save dialog for a document.
pub fn save_file_dialog(start_dir: Option<&Path>, default_name: &str) -> Option<PathBuf> {
    let dialog = with_document_filters(FileDialog::new().set_title("Save File"))
        .set_file_name(default_name);
    with_start_dir(dialog, start_dir).save_file()
}

/// Opens a native save dialog for an export target (`pdf` or `html`).
pub fn export_file_dialog(
    start_dir: Option<&Path>,
    default_name: &str,
    as_pdf: bool,
) -> Option<PathBuf> {
    let (label, extensions) = if as_pdf {
        ("PDF Document", PDF_EXTENSIONS)
    } else {
        ("HTML Document", HTML_EXTENSIONS)
    };
    let dialog = FileDialog::new()
        .set_title("Export")
        .add_filter(label, extensions)
        .set_file_name(default_name);
    with_start_dir(dialog, start_dir).save_file()
}

/// [`FilePicker`] backed by the platform's native dialogs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeFilePicker;

impl FilePicker for NativeFilePicker {
    fn pick_open(&mut self, start_dir: Option<&Path>) -> Option<PathBuf> {
        open_file_dialog(start_dir)
    }

    fn pick_save(&mut self, start_dir: Option<&Path>, suggested_name: &str) -> Option<PathBuf> {
        save_file_dialog(start_dir, suggested_name)
    }
}
