//! PDF output through an external HTML-to-PDF converter.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

use log::{debug, info, warn};

use crate::error::{Error, Result};

/// Turns a complete HTML document into a PDF file.
pub trait PdfRenderer {
    fn render(&self, html: &str, output: &Path) -> Result<()>;
}

/// Runs `<command> [args..] - <output>` with the HTML on stdin.
///
/// The default command is `wkhtmltopdf`, which reads from `-` and writes to
/// the final argument. Any converter following the same convention works.
#[derive(Debug, Clone)]
pub struct CommandPdfRenderer {
    command: String,
}

impl CommandPdfRenderer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

impl PdfRenderer for CommandPdfRenderer {
    fn render(&self, html: &str, output: &Path) -> Result<()> {
        let mut parts = self.command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| Error::Export("No PDF converter configured".to_string()))?;

        debug!("Running PDF converter: {} -> {}", self.command, output.display());

        let mut child = Command::new(program)
            .args(parts)
            .arg("-")
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::Export(format!("Could not start '{}': {}", program, e)))?;

        // Written from a separate thread so a converter that reports on
        // stderr while still reading cannot stall on a full pipe.
        let writer = child.stdin.take().map(|mut stdin| {
            let html = html.as_bytes().to_vec();
            thread::spawn(move || {
                // A converter that exits early closes the pipe; its exit
                // status carries the real error.
                if let Err(e) = stdin.write_all(&html) {
                    debug!("PDF converter stdin closed early: {}", e);
                }
            })
        });

        let result = child
            .wait_with_output()
            .map_err(|e| Error::Export(format!("'{}' did not finish: {}", program, e)))?;
        if let Some(writer) = writer {
            if writer.join().is_err() {
                warn!("PDF converter stdin writer panicked");
            }
        }

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(Error::Export(format!(
                "'{}' failed ({}): {}",
                program,
                result.status,
                stderr.trim()
            )));
        }

        info!("Exported PDF to {}", output.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_command_is_an_error() {
        let renderer = CommandPdfRenderer::new("   ");
        assert!(matches!(
            renderer.render("<p>x</p>", Path::new("out.pdf")),
            Err(Error::Export(_))
        ));
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let renderer = CommandPdfRenderer::new("serum-writer-no-such-converter --quiet");
        let err = renderer
            .render("<p>x</p>", Path::new("out.pdf"))
            .unwrap_err();
        assert!(err.to_string().contains("serum-writer-no-such-converter"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_an_error() {
        let renderer = CommandPdfRenderer::new("false");
        assert!(matches!(
            renderer.render("<p>x</p>", Path::new("out.pdf")),
            Err(Error::Export(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_chatty_converter_with_large_document() {
        use std::os::unix::fs::PermissionsExt;
        use std::sync::mpsc;
        use std::time::Duration;

        let dir = tempfile::TempDir::new().unwrap();
        // Echoes the whole document to stderr while copying it to the output
        let script = dir.path().join("chatty.sh");
        std::fs::write(&script, "#!/bin/sh\ntee /dev/stderr > \"$2\"\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let output = dir.path().join("out.pdf");
        let target = output.clone();
        let command = script.display().to_string();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let renderer = CommandPdfRenderer::new(command);
            let html = format!("<p>{}</p>", "x".repeat(1 << 20));
            let _ = tx.send(renderer.render(&html, &target).is_ok());
        });

        let finished = rx
            .recv_timeout(Duration::from_secs(30))
            .expect("converter did not finish");
        assert!(finished);
        assert!(std::fs::metadata(&output).unwrap().len() > 1 << 20);
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_exit() {
        let renderer = CommandPdfRenderer::new("true");
        assert!(renderer.render("<p>x</p>", Path::new("out.pdf")).is_ok());
    }
}
