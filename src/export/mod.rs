//! Document Export Module
//!
//! Exports the current document as a standalone HTML page or as a PDF.
//!
//! # Architecture
//!
//! - `options.rs` - Export format and per-export configuration
//! - `html.rs` - HTML document generation with theme styling
//! - `templates.rs` - User templates (`Templates/**.json` + `res/layout.html`)
//! - `pdf.rs` - `PdfRenderer` trait and the external converter

mod html;
mod options;
mod pdf;
mod templates;

pub use options::{ExportFormat, ExportOptions};
pub use pdf::{CommandPdfRenderer, PdfRenderer};
pub use templates::list_templates;

use std::path::Path;

use log::{info, warn};

use crate::error::Result;
use crate::preview::render_html;
use crate::theme::ThemeColors;
use html::{wrap_html_body, write_html_file};
use templates::find_template;

/// Full HTML page for `markdown`, using the configured template when it can
/// be rendered and the built-in themed layout otherwise.
pub fn build_html(
    markdown: &str,
    title: &str,
    colors: &ThemeColors,
    options: &ExportOptions,
) -> String {
    let body = render_html(markdown);

    if let Some(name) = options.template.as_deref() {
        match find_template(&options.templates_dir, name).and_then(|t| t.render(&body, title)) {
            Ok(html) => return html,
            Err(e) => warn!("Falling back to the built-in layout: {}", e),
        }
    }

    wrap_html_body(&body, title, colors)
}

/// Export `markdown` to `output` in the format named by `options`.
pub fn export_document(
    markdown: &str,
    title: &str,
    colors: &ThemeColors,
    options: &ExportOptions,
    renderer: &dyn PdfRenderer,
    output: &Path,
) -> Result<()> {
    let html = build_html(markdown, title, colors, options);

    match options.format {
        ExportFormat::Html => {
            write_html_file(output, &html)?;
            info!("Exported HTML to {}", output.display());
        }
        ExportFormat::Pdf => renderer.render(&html, output)?,
    }

    if options.open_after_export {
        if let Err(e) = open::that(output) {
            warn!("Could not open {}: {}", output.display(), e);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::cell::RefCell;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingRenderer {
        calls: RefCell<Vec<(String, PathBuf)>>,
        fail: bool,
    }

    impl PdfRenderer for RecordingRenderer {
        fn render(&self, html: &str, output: &Path) -> Result<()> {
            if self.fail {
                return Err(Error::Export("converter crashed".to_string()));
            }
            self.calls
                .borrow_mut()
                .push((html.to_string(), output.to_path_buf()));
            Ok(())
        }
    }

    fn options(format: ExportFormat, templates_dir: &Path, template: Option<&str>) -> ExportOptions {
        ExportOptions {
            format,
            template: template.map(str::to_string),
            templates_dir: templates_dir.to_path_buf(),
            pdf_command: "unused".to_string(),
            open_after_export: false,
        }
    }

    #[test]
    fn test_html_export_writes_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("doc.html");
        let renderer = RecordingRenderer::default();
        let opts = options(ExportFormat::Html, dir.path(), None);

        export_document("# Title", "doc", &ThemeColors::dark(), &opts, &renderer, &out).unwrap();

        let html = fs::read_to_string(&out).unwrap();
        assert!(html.contains("<h1"));
        assert!(html.contains("Title</h1>"));
        assert!(renderer.calls.borrow().is_empty());
    }

    #[test]
    fn test_pdf_export_uses_template() {
        let dir = TempDir::new().unwrap();
        let tpl = dir.path().join("plain");
        fs::create_dir_all(tpl.join("res")).unwrap();
        fs::write(tpl.join("plain.json"), r#"{"name": "Plain"}"#).unwrap();
        fs::write(tpl.join("res/layout.html"), "<t>{{ title }}</t>{{ body }}").unwrap();

        let out = dir.path().join("doc.pdf");
        let renderer = RecordingRenderer::default();
        let opts = options(ExportFormat::Pdf, dir.path(), Some("Plain"));

        export_document("*hi*", "Notes", &ThemeColors::light(), &opts, &renderer, &out).unwrap();

        let calls = renderer.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "<t>Notes</t><p><em>hi</em></p>\n");
        assert_eq!(calls[0].1, out);
    }

    #[test]
    fn test_missing_template_falls_back() {
        let dir = TempDir::new().unwrap();
        let opts = options(ExportFormat::Html, dir.path(), Some("Ghost"));
        let html = build_html("text", "t", &ThemeColors::light(), &opts);
        assert!(html.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_renderer_failure_propagates() {
        let dir = TempDir::new().unwrap();
        let renderer = RecordingRenderer {
            fail: true,
            ..Default::default()
        };
        let opts = options(ExportFormat::Pdf, dir.path(), None);
        let result = export_document(
            "x",
            "t",
            &ThemeColors::light(),
            &opts,
            &renderer,
            &dir.path().join("x.pdf"),
        );
        assert!(matches!(result, Err(Error::Export(_))));
    }
}
