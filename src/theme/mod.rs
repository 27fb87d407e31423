//! Theme System for Serum Writer
//!
//! `ThemeColors` holds every color the application draws with: egui visuals
//! are derived from it, the editor highlighter gets its palette from it and
//! HTML export turns it into CSS. The `Theme` setting in `config` picks the
//! light or dark palette at runtime.
//!
//! ```ignore
//! let colors = ThemeColors::from_theme(Theme::Dark, &ctx.style().visuals);
//! ctx.set_visuals(colors.to_visuals());
//! highlighter.set_palette(colors.highlight_palette());
//! ```

pub mod manager;
mod visuals;

pub use manager::ThemeManager;

use eframe::egui::{Color32, Visuals};

use crate::config::Theme;
use crate::highlight::HighlightPalette;

// ─────────────────────────────────────────────────────────────────────────────
// Theme Colors
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ThemeColors {
    pub base: BaseColors,
    pub text: TextColors,
    /// Rendered markup in the preview and exported HTML
    pub markup: MarkupColors,
    pub ui: UiColors,
}

impl ThemeColors {
    /// Colors for a theme setting, resolving `System` through `visuals`.
    pub fn from_theme(theme: Theme, visuals: &Visuals) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
            Theme::System => {
                if visuals.dark_mode {
                    Self::dark()
                } else {
                    Self::light()
                }
            }
        }
    }

    /// Warm paper palette.
    pub fn light() -> Self {
        Self {
            base: BaseColors {
                background: Color32::from_rgb(252, 250, 246),
                surface: Color32::from_rgb(244, 241, 235),
                code_background: Color32::from_rgb(236, 233, 226),
                border: Color32::from_rgb(206, 200, 190),
                border_subtle: Color32::from_rgb(226, 221, 212),
                hover: Color32::from_rgb(236, 232, 224),
                selection: Color32::from_rgb(214, 228, 246),
            },
            text: TextColors {
                primary: Color32::from_rgb(40, 38, 34),
                secondary: Color32::from_rgb(86, 82, 76),
                muted: Color32::from_rgb(136, 130, 120),
                link: Color32::from_rgb(30, 100, 170),
                heading: Color32::from_rgb(24, 84, 140),
            },
            markup: MarkupColors {
                quote_border: Color32::from_rgb(200, 192, 178),
                quote_text: Color32::from_rgb(100, 96, 88),
                code_text: Color32::from_rgb(140, 60, 40),
                rule: Color32::from_rgb(206, 200, 190),
                table_border: Color32::from_rgb(206, 200, 190),
                table_header: Color32::from_rgb(238, 234, 226),
            },
            ui: UiColors {
                accent: Color32::from_rgb(30, 110, 190),
                accent_hover: Color32::from_rgb(24, 90, 160),
                success: Color32::from_rgb(46, 150, 70),
                warning: Color32::from_rgb(230, 170, 20),
                error: Color32::from_rgb(200, 50, 50),
            },
        }
    }

    /// Ink palette.
    pub fn dark() -> Self {
        Self {
            base: BaseColors {
                background: Color32::from_rgb(28, 29, 33),
                surface: Color32::from_rgb(35, 36, 41),
                code_background: Color32::from_rgb(42, 44, 50),
                border: Color32::from_rgb(62, 64, 72),
                border_subtle: Color32::from_rgb(48, 50, 56),
                hover: Color32::from_rgb(50, 52, 58),
                selection: Color32::from_rgb(44, 66, 92),
            },
            text: TextColors {
                primary: Color32::from_rgb(222, 220, 214),
                secondary: Color32::from_rgb(180, 178, 172),
                muted: Color32::from_rgb(128, 128, 134),
                link: Color32::from_rgb(110, 180, 250),
                heading: Color32::from_rgb(130, 190, 250),
            },
            markup: MarkupColors {
                quote_border: Color32::from_rgb(78, 80, 88),
                quote_text: Color32::from_rgb(176, 174, 168),
                code_text: Color32::from_rgb(226, 180, 120),
                rule: Color32::from_rgb(78, 80, 88),
                table_border: Color32::from_rgb(62, 64, 72),
                table_header: Color32::from_rgb(44, 46, 54),
            },
            ui: UiColors {
                accent: Color32::from_rgb(110, 180, 250),
                accent_hover: Color32::from_rgb(140, 200, 255),
                success: Color32::from_rgb(90, 200, 110),
                warning: Color32::from_rgb(250, 205, 60),
                error: Color32::from_rgb(245, 100, 100),
            },
        }
    }

    pub fn is_dark(&self) -> bool {
        self.base.background.r() < 128
    }

    pub fn to_visuals(&self) -> Visuals {
        visuals::create_visuals(self)
    }

    /// Colors for the editor's markup highlighting.
    pub fn highlight_palette(&self) -> HighlightPalette {
        HighlightPalette {
            accent: self.text.link,
            muted: self.text.muted,
            misspelled: self.ui.error,
        }
    }
}

/// Backgrounds and borders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseColors {
    pub background: Color32,
    /// Panels, title bar, status bar
    pub surface: Color32,
    pub code_background: Color32,
    pub border: Color32,
    pub border_subtle: Color32,
    pub hover: Color32,
    pub selection: Color32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextColors {
    pub primary: Color32,
    pub secondary: Color32,
    pub muted: Color32,
    pub link: Color32,
    pub heading: Color32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkupColors {
    pub quote_border: Color32,
    pub quote_text: Color32,
    pub code_text: Color32,
    pub rule: Color32,
    pub table_border: Color32,
    pub table_header: Color32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UiColors {
    pub accent: Color32,
    pub accent_hover: Color32,
    pub success: Color32,
    pub warning: Color32,
    pub error: Color32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
