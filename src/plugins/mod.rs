//! Plugins
//!
//! A plugin is anything implementing [`Plugin`]. The [`PluginRegistry`]
//! holds them in registration order, initialises them once at startup and
//! runs them from the Plugins menu. Plugins that fail to initialise stay
//! listed but disabled.
//!
//! Out of the box plugins come from JSON manifests in the config directory
//! (see [`command`]).

pub mod command;

pub use command::{load_plugins, plugins_dir};

use log::{debug, info, warn};

use crate::document::DocumentEvent;
use crate::error::{Error, Result};
use crate::string_utils::floor_char_boundary;

// ─────────────────────────────────────────────────────────────────────────────
// Context
// ─────────────────────────────────────────────────────────────────────────────

/// What a plugin can see and change: the buffer and the caret.
#[derive(Debug)]
pub struct PluginContext<'a> {
    text: &'a mut String,
    cursor: usize,
    changed: bool,
}

impl<'a> PluginContext<'a> {
    /// `cursor` is a byte offset; it is clamped onto a char boundary.
    pub fn new(text: &'a mut String, cursor: usize) -> Self {
        let cursor = floor_char_boundary(text.as_str(), cursor);
        Self {
            text,
            cursor,
            changed: false,
        }
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether a plugin modified the buffer.
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Insert `s` at the caret and move the caret after it.
    pub fn insert(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
        self.changed = true;
    }

    /// Replace the whole buffer, keeping the caret as close as possible.
    pub fn replace_all(&mut self, text: String) {
        if *self.text == text {
            return;
        }
        *self.text = text;
        self.cursor = floor_char_boundary(self.text.as_str(), self.cursor);
        self.changed = true;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Plugin Trait
// ─────────────────────────────────────────────────────────────────────────────

pub trait Plugin {
    /// Unique name, also the Plugins menu label.
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Called once after registration. An error disables the plugin.
    fn init(&mut self, _ctx: &mut PluginContext) -> Result<()> {
        Ok(())
    }

    /// Invoked from the Plugins menu.
    fn run(&mut self, ctx: &mut PluginContext) -> Result<()>;

    /// Document lifecycle notifications.
    fn on_event(&mut self, _event: &DocumentEvent) {}
}

// ─────────────────────────────────────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────────────────────────────────────

struct Entry {
    plugin: Box<dyn Plugin>,
    enabled: bool,
}

/// Registered plugins, in registration order.
#[derive(Default)]
pub struct PluginRegistry {
    entries: Vec<Entry>,
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| (e.plugin.name(), e.enabled)))
            .finish()
    }
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plugin. Names must be unique.
    pub fn register(&mut self, plugin: Box<dyn Plugin>) -> Result<()> {
        let name = plugin.name().to_string();
        if self.entries.iter().any(|e| e.plugin.name() == name) {
            return Err(Error::Plugin {
                name,
                message: "a plugin with this name is already registered".to_string(),
            });
        }
        debug!("Registered plugin '{}'", name);
        self.entries.push(Entry {
            plugin,
            enabled: true,
        });
        Ok(())
    }

    /// Initialise every enabled plugin; failures are logged and disabled.
    /// Returns the number of plugins left enabled.
    pub fn init_all(&mut self, ctx: &mut PluginContext) -> usize {
        for entry in self.entries.iter_mut().filter(|e| e.enabled) {
            if let Err(e) = entry.plugin.init(ctx) {
                warn!("Disabling plugin '{}': {}", entry.plugin.name(), e);
                entry.enabled = false;
            }
        }
        let enabled = self.entries.iter().filter(|e| e.enabled).count();
        info!("{} of {} plugins ready", enabled, self.entries.len());
        enabled
    }

    /// `(name, description, enabled)` for the Plugins menu.
    pub fn plugins(&self) -> impl Iterator<Item = (&str, &str, bool)> {
        self.entries
            .iter()
            .map(|e| (e.plugin.name(), e.plugin.description(), e.enabled))
    }

    #[allow(dead_code)]
    pub fn is_enabled(&self, name: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.enabled && e.plugin.name() == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run the plugin called `name`.
    pub fn run(&mut self, name: &str, ctx: &mut PluginContext) -> Result<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.plugin.name() == name)
            .ok_or_else(|| Error::Plugin {
                name: name.to_string(),
                message: "not registered".to_string(),
            })?;

        if !entry.enabled {
            return Err(Error::Plugin {
                name: name.to_string(),
                message: "disabled after a failed start".to_string(),
            });
        }
        debug!("Running plugin '{}'", name);
        entry.plugin.run(ctx)
    }

    /// Forward a document event to every enabled plugin.
    pub fn dispatch(&mut self, event: &DocumentEvent) {
        for entry in self.entries.iter_mut().filter(|e| e.enabled) {
            entry.plugin.on_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;

    struct Stamp {
        name: &'static str,
        fail_init: bool,
        seen: Rc<RefCell<Vec<DocumentEvent>>>,
    }

    impl Stamp {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                fail_init: false,
                seen: Rc::default(),
            }
        }
    }

    impl Plugin for Stamp {
        fn name(&self) -> &str {
            self.name
        }

        fn init(&mut self, _ctx: &mut PluginContext) -> Result<()> {
            if self.fail_init {
                return Err(Error::Plugin {
                    name: self.name.to_string(),
                    message: "boom".to_string(),
                });
            }
            Ok(())
        }

        fn run(&mut self, ctx: &mut PluginContext) -> Result<()> {
            ctx.insert("[stamp]");
            Ok(())
        }

        fn on_event(&mut self, event: &DocumentEvent) {
            self.seen.borrow_mut().push(event.clone());
        }
    }

    #[test]
    fn test_context_insert_moves_cursor() {
        let mut text = "héllo".to_string();
        // inside the two-byte 'é'
        let mut ctx = PluginContext::new(&mut text, 2);
        assert_eq!(ctx.cursor(), 1);
        ctx.insert("X");
        assert_eq!(ctx.cursor(), 2);
        assert!(ctx.changed());
        assert_eq!(text, "hXéllo");
    }

    #[test]
    fn test_context_replace_all_clamps_cursor() {
        let mut text = "long text here".to_string();
        let mut ctx = PluginContext::new(&mut text, 12);
        ctx.replace_all("short".to_string());
        assert_eq!(ctx.cursor(), 5);

        ctx.replace_all("short".to_string());
        assert_eq!(text, "short");
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = PluginRegistry::new();
        registry.register(Box::new(Stamp::new("stamp"))).unwrap();
        let err = registry.register(Box::new(Stamp::new("stamp"))).unwrap_err();
        assert!(matches!(err, Error::Plugin { name, .. } if name == "stamp"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_failed_init_disables_plugin() {
        let mut registry = PluginRegistry::new();
        registry.register(Box::new(Stamp::new("good"))).unwrap();
        registry
            .register(Box::new(Stamp {
                fail_init: true,
                ..Stamp::new("bad")
            }))
            .unwrap();

        let mut text = String::new();
        let enabled = registry.init_all(&mut PluginContext::new(&mut text, 0));
        assert_eq!(enabled, 1);
        assert!(registry.is_enabled("good"));
        assert!(!registry.is_enabled("bad"));

        let mut ctx = PluginContext::new(&mut text, 0);
        assert!(registry.run("bad", &mut ctx).is_err());
        assert!(!ctx.changed());
    }

    #[test]
    fn test_run_by_name() {
        let mut registry = PluginRegistry::new();
        registry.register(Box::new(Stamp::new("stamp"))).unwrap();

        let mut text = "ab".to_string();
        let mut ctx = PluginContext::new(&mut text, 1);
        registry.run("stamp", &mut ctx).unwrap();
        assert!(registry.run("missing", &mut ctx).is_err());
        assert_eq!(text, "a[stamp]b");
    }

    #[test]
    fn test_dispatch_reaches_enabled_plugins() {
        let plugin = Stamp::new("watcher");
        let seen = Rc::clone(&plugin.seen);
        let mut registry = PluginRegistry::new();
        registry.register(Box::new(plugin)).unwrap();

        registry.dispatch(&DocumentEvent::Saved(PathBuf::from("a.md")));
        registry.dispatch(&DocumentEvent::Closed);
        assert_eq!(
            *seen.borrow(),
            vec![DocumentEvent::Saved(PathBuf::from("a.md")), DocumentEvent::Closed]
        );
    }
}
