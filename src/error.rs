//! Centralized error handling for Serum Writer
//!
//! One error type covers every failure the writer can run into: document
//! I/O, the spell-check dictionary, configuration, export and plugins.

use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Custom Result Type Alias
// ─────────────────────────────────────────────────────────────────────────────

/// `Result` with the writer's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Error type shared by every module.
#[derive(Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // File I/O Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// I/O error without a more specific context
    Io(io::Error),

    /// A document path that no longer exists
    FileNotFound(PathBuf),

    /// Failed to read file contents
    FileRead { path: PathBuf, source: io::Error },

    /// Failed to write file contents
    FileWrite { path: PathBuf, source: io::Error },

    // ─────────────────────────────────────────────────────────────────────────
    // Highlighting & Spell-Check Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// The system dictionary could not be loaded; spell-check is disabled
    DictionaryUnavailable { path: PathBuf, reason: String },

    /// A highlighting pattern failed to compile
    RegexCompile { pattern: String, source: regex::Error },

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Failed to load configuration file
    ConfigLoad {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to save configuration file
    ConfigSave {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to parse configuration (invalid JSON/format)
    ConfigParse {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration directory not found or inaccessible
    ConfigDirNotFound,

    // ─────────────────────────────────────────────────────────────────────────
    // Export & Plugin Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// No usable layout file for the requested template
    TemplateNotFound(String),

    /// HTML/PDF export failed
    Export(String),

    /// A plugin failed to load, initialise or run
    Plugin { name: String, message: String },

    /// The system clipboard could not be read
    Clipboard(String),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigParse {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Display
// ─────────────────────────────────────────────────────────────────────────────
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // File I/O Errors
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::FileNotFound(path) => write!(f, "File not found: '{}'", path.display()),
            Error::FileRead { path, source } => {
                write!(f, "Failed to read '{}': {}", path.display(), source)
            }
            Error::FileWrite { path, source } => {
                write!(f, "Failed to write '{}': {}", path.display(), source)
            }

            // Highlighting & Spell-Check Errors
            Error::DictionaryUnavailable { path, reason } => write!(
                f,
                "Spell-check dictionary unavailable ('{}'): {}",
                path.display(),
                reason
            ),
            Error::RegexCompile { pattern, source } => {
                write!(f, "Invalid highlighting pattern '{}': {}", pattern, source)
            }

            // Configuration Errors
            Error::ConfigLoad { path, source } => {
                write!(
                    f,
                    "Failed to load configuration from '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigSave { path, source } => {
                write!(
                    f,
                    "Failed to save configuration to '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigParse { message, .. } => {
                write!(f, "Invalid configuration format: {}", message)
            }
            Error::ConfigDirNotFound => {
                write!(f, "Configuration directory not found")
            }

            // Export & Plugin Errors
            Error::TemplateNotFound(name) => {
                write!(f, "Template '{}' not found or missing a layout", name)
            }
            Error::Export(msg) => write!(f, "Export failed: {}", msg),
            Error::Plugin { name, message } => write!(f, "Plugin '{}': {}", name, message),
            Error::Clipboard(msg) => write!(f, "Clipboard unavailable: {}", msg),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Error chaining
// ─────────────────────────────────────────────────────────────────────────────
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::FileRead { source, .. } | Error::FileWrite { source, .. } => Some(source),
            Error::RegexCompile { source, .. } => Some(source),
            Error::ConfigLoad { source, .. } => Some(source.as_ref()),
            Error::ConfigSave { source, .. } => Some(source.as_ref()),
            Error::ConfigParse { source, .. } => source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            Error::FileNotFound(_)
            | Error::DictionaryUnavailable { .. }
            | Error::ConfigDirNotFound
            | Error::TemplateNotFound(_)
            | Error::Export(_)
            | Error::Plugin { .. }
            | Error::Clipboard(_) => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Degrading Gracefully
// ─────────────────────────────────────────────────────────────────────────────

/// Turn failures of optional features into a `warn!` line.
pub trait ResultExt<T> {
    /// Log an error at warning level and fall back to `default`.
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;

    /// Log an error at warning level and turn the result into an `Option`.
    fn ok_or_warn(self, context: &str) -> Option<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                warn!("{}: {}. Using default.", context, err);
                default
            }
        }
    }

    fn ok_or_warn(self, context: &str) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("{}: {}", context, err);
                None
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_creation() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "test error");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_file_write_error_keeps_path() {
        let path = PathBuf::from("/test/chapter.md");
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "read-only");
        let err = Error::FileWrite {
            path: path.clone(),
            source: io_err,
        };
        assert!(matches!(&err, Error::FileWrite { path: p, .. } if *p == path));
        assert!(err.to_string().contains("chapter.md"));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_result: std::result::Result<String, _> = serde_json::from_str("invalid json");
        let err = Error::from(json_result.unwrap_err());
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn test_display_dictionary_unavailable() {
        let err = Error::DictionaryUnavailable {
            path: PathBuf::from("/usr/share/dict/words"),
            reason: "missing".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("dictionary unavailable"));
        assert!(msg.contains("missing"));
    }

    #[test]
    fn test_display_config_dir_not_found() {
        let err = Error::ConfigDirNotFound;
        assert_eq!(err.to_string(), "Configuration directory not found");
    }

    #[test]
    fn test_error_source_chaining() {
        use std::error::Error as StdError;
        let err = Error::FileRead {
            path: PathBuf::from("a.md"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.source().is_some());
        assert!(Error::ConfigDirNotFound.source().is_none());
        assert!(Error::TemplateNotFound("plain".into()).source().is_none());
    }

    #[test]
    fn test_unwrap_or_warn_default() {
        let ok: Result<i32> = Ok(42);
        assert_eq!(ok.unwrap_or_warn_default(0, "ctx"), 42);

        let err: Result<i32> = Err(Error::Export("boom".to_string()));
        assert_eq!(err.unwrap_or_warn_default(7, "ctx"), 7);
    }

    #[test]
    fn test_ok_or_warn() {
        let err: Result<i32> = Err(Error::Export("no converter".to_string()));
        assert_eq!(err.ok_or_warn("export"), None);
        let ok: Result<&str> = Ok("x");
        assert_eq!(ok.ok_or_warn("export"), Some("x"));
    }
}
