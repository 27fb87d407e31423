//! User settings and preferences for Serum Writer
//!
//! `Settings` holds everything the writer remembers between sessions:
//! theme, window geometry, preview and spell-check toggles, the last file,
//! plus paths for the word list, templates and the PDF converter.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Theme Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Available color themes for the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
    System,
}

impl Theme {
    /// Label shown in the View menu and preferences.
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::System => "System",
        }
    }

    pub fn all() -> &'static [Theme] {
        &[Theme::Light, Theme::Dark, Theme::System]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Window Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Window size and state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    /// Window width in pixels
    pub width: f32,
    /// Window height in pixels
    pub height: f32,
    /// Whether the window was maximized
    #[serde(default)]
    pub maximized: bool,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 980.0,
            height: 720.0,
            maximized: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

/// All user-configurable options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    pub window_size: WindowSize,
    /// Whether the live preview pane is visible
    pub show_preview: bool,
    /// Whether misspelled words are underlined
    pub spell_check: bool,
    /// File that was open when the writer last exited
    pub last_file: Option<PathBuf>,
    pub recent_files: Vec<PathBuf>,
    pub max_recent_files: usize,
    pub font_size: f32,
    /// Personal word list, relative paths resolve against the working directory
    pub word_list_path: PathBuf,
    /// System word list; `None` uses the platform default
    pub system_dictionary: Option<PathBuf>,
    /// Name of the export template, `None` for the built-in layout
    pub template: Option<String>,
    pub templates_dir: PathBuf,
    /// External HTML-to-PDF converter, invoked as `<cmd> - <out.pdf>`
    pub pdf_command: String,
    /// Quiet period after the last edit before the preview re-renders
    pub preview_delay_ms: u64,
    pub open_after_export: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            window_size: WindowSize::default(),
            show_preview: true,
            spell_check: true,
            last_file: None,
            recent_files: Vec::new(),
            max_recent_files: 10,
            font_size: 14.0,
            word_list_path: PathBuf::from("wordlist"),
            system_dictionary: None,
            template: None,
            templates_dir: PathBuf::from("Templates"),
            pdf_command: "wkhtmltopdf".to_string(),
            preview_delay_ms: 300,
            open_after_export: false,
        }
    }
}

impl Settings {
    pub const MIN_FONT_SIZE: f32 = 8.0;
    pub const MAX_FONT_SIZE: f32 = 32.0;
    pub const MIN_WINDOW_SIZE: f32 = 320.0;
    pub const MAX_WINDOW_SIZE: f32 = 10000.0;
    pub const MAX_PREVIEW_DELAY_MS: u64 = 5000;

    /// Move `path` to the front of the recent files list.
    pub fn add_recent_file(&mut self, path: PathBuf) {
        self.recent_files.retain(|p| p != &path);
        self.recent_files.insert(0, path);
        self.recent_files.truncate(self.max_recent_files);
    }

    /// Clamp out-of-range values loaded from disk.
    pub fn sanitize(&mut self) {
        self.font_size = self
            .font_size
            .clamp(Self::MIN_FONT_SIZE, Self::MAX_FONT_SIZE);

        self.window_size.width = self
            .window_size
            .width
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
        self.window_size.height = self
            .window_size
            .height
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);

        self.preview_delay_ms = self.preview_delay_ms.min(Self::MAX_PREVIEW_DELAY_MS);

        if self.max_recent_files == 0 {
            self.max_recent_files = 10;
        } else if self.max_recent_files > 100 {
            self.max_recent_files = 100;
        }
        self.recent_files.truncate(self.max_recent_files);

        if self.pdf_command.trim().is_empty() {
            self.pdf_command = Settings::default().pdf_command;
        }
        if self.word_list_path.as_os_str().is_empty() {
            self.word_list_path = Settings::default().word_list_path;
        }
    }

    /// Deserialize and then sanitize.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.theme, Theme::Dark);
        assert!(settings.show_preview);
        assert!(settings.spell_check);
        assert_eq!(settings.last_file, None);
        assert_eq!(settings.word_list_path, PathBuf::from("wordlist"));
        assert_eq!(settings.pdf_command, "wkhtmltopdf");
    }

    #[test]
    fn test_theme_serialization() {
        assert_eq!(serde_json::to_string(&Theme::Light).unwrap(), "\"light\"");
        let theme: Theme = serde_json::from_str("\"system\"").unwrap();
        assert_eq!(theme, Theme::System);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json_sanitized(r#"{"theme":"light","show_preview":false}"#)
            .unwrap();
        assert_eq!(settings.theme, Theme::Light);
        assert!(!settings.show_preview);
        assert_eq!(settings.font_size, 14.0);
    }

    #[test]
    fn test_sanitize_clamps_values() {
        let mut settings = Settings {
            font_size: 2.0,
            preview_delay_ms: 60_000,
            pdf_command: "  ".to_string(),
            window_size: WindowSize {
                width: 10.0,
                height: 50_000.0,
                maximized: false,
            },
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.font_size, Settings::MIN_FONT_SIZE);
        assert_eq!(settings.preview_delay_ms, Settings::MAX_PREVIEW_DELAY_MS);
        assert_eq!(settings.pdf_command, "wkhtmltopdf");
        assert_eq!(settings.window_size.width, Settings::MIN_WINDOW_SIZE);
        assert_eq!(settings.window_size.height, Settings::MAX_WINDOW_SIZE);
    }

    #[test]
    fn test_add_recent_file_moves_to_front() {
        let mut settings = Settings {
            max_recent_files: 2,
            ..Settings::default()
        };
        settings.add_recent_file(PathBuf::from("a.md"));
        settings.add_recent_file(PathBuf::from("b.md"));
        settings.add_recent_file(PathBuf::from("a.md"));
        assert_eq!(
            settings.recent_files,
            vec![PathBuf::from("a.md"), PathBuf::from("b.md")]
        );
        settings.add_recent_file(PathBuf::from("c.rst"));
        assert_eq!(settings.recent_files.len(), 2);
        assert_eq!(settings.recent_files[0], PathBuf::from("c.rst"));
    }

    #[test]
    fn test_roundtrip() {
        let original = Settings {
            theme: Theme::Light,
            last_file: Some(PathBuf::from("/tmp/notes.md")),
            template: Some("Report".to_string()),
            ..Settings::default()
        };
        let json = serde_json::to_string(&original).unwrap();
        let loaded: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(original, loaded);
    }
}
