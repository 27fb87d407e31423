//! Theme Manager
//!
//! Keeps the current `Theme` setting, caches the egui visuals built for it
//! and re-applies them when the setting (or, for `System`, the platform
//! preference) changes.
//!
//! ```ignore
//! let mut manager = ThemeManager::new(settings.theme);
//! // every frame
//! if manager.apply_if_needed(ctx) {
//!     highlighter.set_palette(manager.colors(ctx).highlight_palette());
//! }
//! ```

use eframe::egui::{Context, Visuals};
use log::{debug, info};

use super::ThemeColors;
use crate::config::Theme;

#[derive(Debug, Clone)]
pub struct ThemeManager {
    current_theme: Theme,
    cached_visuals: Option<Visuals>,
    needs_apply: bool,
    /// Platform dark mode seen on the last frame, for `Theme::System`
    last_system_dark_mode: Option<bool>,
}

impl ThemeManager {
    pub fn new(theme: Theme) -> Self {
        info!("ThemeManager initialized with theme: {:?}", theme);
        Self {
            current_theme: theme,
            cached_visuals: None,
            needs_apply: true,
            last_system_dark_mode: None,
        }
    }

    pub fn current_theme(&self) -> Theme {
        self.current_theme
    }

    /// Change the theme; takes effect on the next `apply_if_needed`.
    pub fn set_theme(&mut self, theme: Theme) {
        if self.current_theme != theme {
            info!("Theme changed from {:?} to {:?}", self.current_theme, theme);
            self.current_theme = theme;
            self.cached_visuals = None;
            self.needs_apply = true;
        }
    }

    /// Flip between light and dark. `System` goes to dark.
    pub fn toggle(&mut self) -> Theme {
        let next = match self.current_theme {
            Theme::Dark => Theme::Light,
            Theme::Light | Theme::System => Theme::Dark,
        };
        self.set_theme(next);
        next
    }

    pub fn needs_apply(&self) -> bool {
        self.needs_apply
    }

    /// Apply the theme if it changed. Returns `true` when visuals were set.
    pub fn apply_if_needed(&mut self, ctx: &Context) -> bool {
        if self.current_theme == Theme::System {
            let system_dark = ctx.style().visuals.dark_mode;
            if self.last_system_dark_mode != Some(system_dark) {
                self.last_system_dark_mode = Some(system_dark);
                self.cached_visuals = None;
                self.needs_apply = true;
                debug!("System dark mode changed to: {}", system_dark);
            }
        }

        if !self.needs_apply {
            return false;
        }
        let visuals = self.visuals(ctx);
        ctx.set_visuals(visuals);
        self.needs_apply = false;
        debug!("Applied theme: {:?}", self.current_theme);
        true
    }

    fn visuals(&mut self, ctx: &Context) -> Visuals {
        if let Some(ref visuals) = self.cached_visuals {
            return visuals.clone();
        }
        let visuals = self.colors(ctx).to_visuals();
        self.cached_visuals = Some(visuals.clone());
        visuals
    }

    /// Palette for the effective theme.
    pub fn colors(&self, ctx: &Context) -> ThemeColors {
        match self.current_theme {
            Theme::System => {
                let dark = self
                    .last_system_dark_mode
                    .unwrap_or_else(|| ctx.style().visuals.dark_mode);
                if dark {
                    ThemeColors::dark()
                } else {
                    ThemeColors::light()
                }
            }
            theme => ThemeColors::from_theme(theme, &Visuals::default()),
        }
    }

    pub fn is_dark(&self, ctx: &Context) -> bool {
        self.colors(ctx).is_dark()
    }
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_manager_new() {
        let manager = ThemeManager::new(Theme::Light);
        assert_eq!(manager.current_theme(), Theme::Light);
        assert!(manager.needs_apply());
    }

    #[test]
    fn test_theme_manager_default_is_dark() {
        assert_eq!(ThemeManager::default().current_theme(), Theme::Dark);
    }

    #[test]
    fn test_set_same_theme_is_noop() {
        let mut manager = ThemeManager::new(Theme::Light);
        manager.needs_apply = false;
        manager.set_theme(Theme::Light);
        assert!(!manager.needs_apply());

        manager.set_theme(Theme::Dark);
        assert!(manager.needs_apply());
    }

    #[test]
    fn test_toggle() {
        let mut manager = ThemeManager::new(Theme::System);
        assert_eq!(manager.toggle(), Theme::Dark);
        assert_eq!(manager.toggle(), Theme::Light);
        assert_eq!(manager.toggle(), Theme::Dark);
    }

    #[test]
    fn test_apply_once() {
        let ctx = Context::default();
        let mut manager = ThemeManager::new(Theme::Light);
        assert!(manager.apply_if_needed(&ctx));
        assert!(!ctx.style().visuals.dark_mode);
        assert!(!manager.apply_if_needed(&ctx));

        manager.set_theme(Theme::Dark);
        assert!(manager.apply_if_needed(&ctx));
        assert!(ctx.style().visuals.dark_mode);
        assert!(manager.is_dark(&ctx));
    }
}
