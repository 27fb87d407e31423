//! Manifest-driven command plugins
//!
//! Every `*.json` file directly inside `<config dir>/plugins/` describes one
//! plugin:
//!
//! ```json
//! {
//!     "name": "Sort Lines",
//!     "description": "Sort the document with sort(1)",
//!     "command": ["sort"]
//! }
//! ```
//!
//! `insert` text is placed at the caret. `command` receives the buffer on
//! stdin and its stdout replaces the buffer. A manifest may use both; the
//! insertion happens first.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use super::{Plugin, PluginContext};
use crate::config::get_config_dir;
use crate::error::{Error, Result};

const PLUGINS_DIR_NAME: &str = "plugins";

/// On-disk plugin description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginManifest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub insert: Option<String>,
    /// Program and arguments; no shell is involved.
    #[serde(default)]
    pub command: Option<Vec<String>>,
}

/// A plugin built from a [`PluginManifest`].
#[derive(Debug, Clone)]
pub struct CommandPlugin {
    manifest: PluginManifest,
    source: Option<PathBuf>,
}

impl CommandPlugin {
    pub fn new(manifest: PluginManifest) -> Self {
        Self {
            manifest,
            source: None,
        }
    }

    /// Parse a manifest file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest: PluginManifest = serde_json::from_str(&json)?;
        Ok(Self {
            manifest,
            source: Some(path.to_path_buf()),
        })
    }

    pub fn manifest(&self) -> &PluginManifest {
        &self.manifest
    }

    /// Manifest file this plugin was loaded from.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::Plugin {
            name: self.manifest.name.clone(),
            message: message.into(),
        }
    }

    fn pipe_through(&self, argv: &[String], input: &str) -> Result<String> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| self.error("empty command"))?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.error(format!("could not start '{}': {}", program, e)))?;

        // stdin is fed from its own thread while stdout and stderr are
        // drained here; a streaming command would otherwise fill its
        // stdout pipe and never read the rest of the input.
        let writer = child.stdin.take().map(|mut stdin| {
            let input = input.as_bytes().to_vec();
            let label = program.clone();
            thread::spawn(move || {
                if let Err(e) = stdin.write_all(&input) {
                    debug!("'{}' closed stdin early: {}", label, e);
                }
            })
        });

        let output = child
            .wait_with_output()
            .map_err(|e| self.error(format!("'{}' did not finish: {}", program, e)))?;
        if let Some(writer) = writer {
            if writer.join().is_err() {
                warn!("stdin writer for '{}' panicked", program);
            }
        }

        if !output.status.success() {
            return Err(self.error(format!(
                "'{}' failed ({}): {}",
                program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|_| self.error(format!("'{}' produced invalid UTF-8", program)))
    }
}

impl Plugin for CommandPlugin {
    fn name(&self) -> &str {
        &self.manifest.name
    }

    fn description(&self) -> &str {
        &self.manifest.description
    }

    fn init(&mut self, _ctx: &mut PluginContext) -> Result<()> {
        if self.manifest.name.trim().is_empty() {
            return Err(self.error("manifest has an empty name"));
        }
        let has_command = self
            .manifest
            .command
            .as_ref()
            .is_some_and(|argv| !argv.is_empty());
        if self.manifest.insert.is_none() && !has_command {
            return Err(self.error("manifest needs `insert` or `command`"));
        }
        Ok(())
    }

    fn run(&mut self, ctx: &mut PluginContext) -> Result<()> {
        if let Some(insert) = &self.manifest.insert {
            ctx.insert(insert);
        }
        if let Some(argv) = &self.manifest.command {
            let output = self.pipe_through(argv, ctx.text())?;
            ctx.replace_all(output);
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Discovery
// ─────────────────────────────────────────────────────────────────────────────

/// `<config dir>/plugins`
pub fn plugins_dir() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(PLUGINS_DIR_NAME))
}

/// Load every manifest directly inside `dir`, sorted by file name.
///
/// Broken manifests are skipped with a warning.
pub fn load_plugins(dir: &Path) -> Vec<CommandPlugin> {
    if !dir.is_dir() {
        debug!("No plugins directory at {}", dir.display());
        return Vec::new();
    }

    let plugins: Vec<CommandPlugin> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("json"))
        .filter_map(|e| match CommandPlugin::from_file(e.path()) {
            Ok(plugin) => Some(plugin),
            Err(err) => {
                warn!("Skipping plugin manifest {}: {}", e.path().display(), err);
                None
            }
        })
        .collect();

    info!("Found {} plugin manifests in {}", plugins.len(), dir.display());
    plugins
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn manifest(name: &str, insert: Option<&str>, command: Option<&[&str]>) -> PluginManifest {
        PluginManifest {
            name: name.to_string(),
            description: String::new(),
            insert: insert.map(str::to_string),
            command: command.map(|argv| argv.iter().map(|s| s.to_string()).collect()),
        }
    }

    #[test]
    fn test_insert_plugin() {
        let mut plugin = CommandPlugin::new(manifest("Sig", Some("-- me"), None));
        let mut text = "Hello\n".to_string();
        let mut ctx = PluginContext::new(&mut text, 6);
        plugin.init(&mut ctx).unwrap();
        plugin.run(&mut ctx).unwrap();
        assert_eq!(ctx.cursor(), 11);
        assert_eq!(text, "Hello\n-- me");
    }

    #[test]
    fn test_manifest_without_action_fails_init() {
        let mut plugin = CommandPlugin::new(manifest("Nothing", None, Some(&[])));
        let mut text = String::new();
        let err = plugin.init(&mut PluginContext::new(&mut text, 0)).unwrap_err();
        assert!(err.to_string().contains("Nothing"));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_replaces_buffer() {
        let mut plugin = CommandPlugin::new(manifest("Sort", None, Some(&["sort"])));
        let mut text = "pear\napple\n".to_string();
        let mut ctx = PluginContext::new(&mut text, 0);
        plugin.run(&mut ctx).unwrap();
        assert!(ctx.changed());
        assert_eq!(text, "apple\npear\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_large_buffer_through_streaming_command() {
        use std::sync::mpsc;
        use std::time::Duration;

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut plugin = CommandPlugin::new(manifest("Echo", None, Some(&["cat"])));
            let mut text = "x".repeat(1 << 20);
            let mut ctx = PluginContext::new(&mut text, 0);
            let result = plugin.run(&mut ctx).map(|()| text.len());
            let _ = tx.send(result);
        });

        let piped = rx
            .recv_timeout(Duration::from_secs(30))
            .expect("1 MiB through cat did not finish");
        assert_eq!(piped.unwrap(), 1 << 20);
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command_leaves_buffer() {
        let mut plugin = CommandPlugin::new(manifest("Fail", None, Some(&["false"])));
        let mut text = "keep".to_string();
        let mut ctx = PluginContext::new(&mut text, 0);
        assert!(matches!(plugin.run(&mut ctx), Err(Error::Plugin { .. })));
        assert_eq!(text, "keep");
    }

    #[test]
    fn test_load_plugins_from_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("b.json"),
            r#"{"name": "Date", "insert": "2024-01-01"}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("a.json"),
            r#"{"name": "Upper", "description": "Shout", "command": ["tr", "a-z", "A-Z"]}"#,
        )
        .unwrap();
        fs::write(dir.path().join("broken.json"), "{ nope").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(
            dir.path().join("nested").join("deep.json"),
            r#"{"name": "Deep", "insert": "x"}"#,
        )
        .unwrap();

        let plugins = load_plugins(dir.path());
        let names: Vec<_> = plugins.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["Upper", "Date"]);
        assert_eq!(plugins[0].description(), "Shout");
        assert_eq!(plugins[1].source(), Some(dir.path().join("b.json").as_path()));
    }

    #[test]
    fn test_missing_plugins_dir() {
        let dir = TempDir::new().unwrap();
        assert!(load_plugins(&dir.path().join("absent")).is_empty());
    }
}
