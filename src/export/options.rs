//! Export Options
//!
//! What to export and how, derived from the user's settings at the time the
//! export is started.

use std::path::PathBuf;

use crate::config::Settings;

// ─────────────────────────────────────────────────────────────────────────────
// Export Format
// ─────────────────────────────────────────────────────────────────────────────

/// Supported export formats for documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Standalone HTML file with embedded styles
    #[default]
    Html,
    /// PDF produced by the external converter
    Pdf,
}

impl ExportFormat {
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Html => "HTML File",
            ExportFormat::Pdf => "PDF Document",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Html => "html",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn all() -> &'static [ExportFormat] {
        &[ExportFormat::Html, ExportFormat::Pdf]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Export Options
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for a single export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Template name; `None` uses the built-in themed layout
    pub template: Option<String>,
    pub templates_dir: PathBuf,
    pub pdf_command: String,
    pub open_after_export: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default(), ExportFormat::default())
    }
}

impl ExportOptions {
    pub fn from_settings(settings: &Settings, format: ExportFormat) -> Self {
        Self {
            format,
            template: settings.template.clone().filter(|t| !t.trim().is_empty()),
            templates_dir: settings.templates_dir.clone(),
            pdf_command: settings.pdf_command.clone(),
            open_after_export: settings.open_after_export,
        }
    }

    /// File name suggested in the export dialog for a document titled `title`.
    pub fn suggested_file_name(&self, title: &str) -> String {
        let stem = std::path::Path::new(title)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("document");
        format!("{}.{}", stem, self.format.extension())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_default() {
        assert_eq!(ExportFormat::default(), ExportFormat::Html);
        assert_eq!(ExportFormat::Pdf.extension(), "pdf");
    }

    #[test]
    fn test_options_from_settings() {
        let settings = Settings {
            template: Some("Report".to_string()),
            pdf_command: "weasyprint".to_string(),
            open_after_export: true,
            ..Default::default()
        };
        let options = ExportOptions::from_settings(&settings, ExportFormat::Pdf);
        assert_eq!(options.format, ExportFormat::Pdf);
        assert_eq!(options.template.as_deref(), Some("Report"));
        assert_eq!(options.pdf_command, "weasyprint");
        assert!(options.open_after_export);
    }

    #[test]
    fn test_blank_template_means_builtin() {
        let settings = Settings {
            template: Some("  ".to_string()),
            ..Default::default()
        };
        let options = ExportOptions::from_settings(&settings, ExportFormat::Html);
        assert_eq!(options.template, None);
    }

    #[test]
    fn test_suggested_file_name() {
        let options = ExportOptions::from_settings(&Settings::default(), ExportFormat::Pdf);
        assert_eq!(options.suggested_file_name("notes.md"), "notes.pdf");
        assert_eq!(options.suggested_file_name(""), "document.pdf");
    }
}
