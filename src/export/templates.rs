//! Export templates
//!
//! A template is a directory under the templates folder holding a JSON
//! manifest with a `name` key and a `res/` folder with the page layout:
//!
//! ```text
//! Templates/
//!   report/
//!     template.json      {"name": "Report", "author": "..."}
//!     res/layout.html    ... {{ title }} ... {{ body }} ...
//! ```
//!
//! `res/layout.html` wins over `res/index.html`. Manifests may sit at any
//! depth; the first manifest with a matching name is used.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::{debug, warn};
use regex::{NoExpand, Regex};
use serde::Deserialize;
use walkdir::WalkDir;

use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
struct Manifest {
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// A discovered template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    pub description: Option<String>,
    pub manifest_path: PathBuf,
}

impl Template {
    /// Layout file used for rendering: `res/layout.html`, else `res/index.html`.
    pub fn layout_path(&self) -> Result<PathBuf> {
        let res = self
            .manifest_path
            .parent()
            .map(|dir| dir.join("res"))
            .ok_or_else(|| Error::TemplateNotFound(self.name.clone()))?;

        ["layout.html", "index.html"]
            .iter()
            .map(|file| res.join(file))
            .find(|path| path.is_file())
            .ok_or_else(|| Error::TemplateNotFound(self.name.clone()))
    }

    /// Fill the layout with a rendered body and the document title.
    pub fn render(&self, body_html: &str, title: &str) -> Result<String> {
        let layout_path = self.layout_path()?;
        let layout = std::fs::read_to_string(&layout_path).map_err(|source| Error::FileRead {
            path: layout_path.clone(),
            source,
        })?;
        debug!("Rendering template '{}' from {}", self.name, layout_path.display());
        Ok(fill_layout(&layout, body_html, title))
    }
}

fn placeholder(name: &'static str) -> &'static Regex {
    static BODY: OnceLock<Regex> = OnceLock::new();
    static TITLE: OnceLock<Regex> = OnceLock::new();
    let cell = if name == "body" { &BODY } else { &TITLE };
    cell.get_or_init(|| {
        Regex::new(&format!(r"\{{\{{\s*{}\s*\}}\}}", name)).expect("placeholder pattern is valid")
    })
}

/// Substitute `{{ body }}` and `{{ title }}` (whitespace inside the braces
/// is optional).
pub fn fill_layout(layout: &str, body_html: &str, title: &str) -> String {
    let escaped_title = super::html::html_escape(title);
    let with_title = placeholder("title").replace_all(layout, NoExpand(&escaped_title));
    placeholder("body")
        .replace_all(&with_title, NoExpand(body_html))
        .into_owned()
}

/// All templates under `dir` whose manifest has a `name`.
///
/// Unreadable or malformed manifests are skipped with a warning.
pub fn list_templates(dir: &Path) -> Vec<Template> {
    if !dir.is_dir() {
        debug!("Templates directory {} does not exist", dir.display());
        return Vec::new();
    }

    let mut templates = Vec::new();
    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("json")
        {
            continue;
        }

        let manifest: Manifest = match std::fs::read_to_string(path)
            .map_err(Error::from)
            .and_then(|json| serde_json::from_str(&json).map_err(Error::from))
        {
            Ok(manifest) => manifest,
            Err(e) => {
                warn!("Skipping template manifest {}: {}", path.display(), e);
                continue;
            }
        };

        if let Some(name) = manifest.name.filter(|n| !n.trim().is_empty()) {
            templates.push(Template {
                name,
                description: manifest.description,
                manifest_path: path.to_path_buf(),
            });
        }
    }
    templates
}

/// Look a template up by name.
pub fn find_template(dir: &Path, name: &str) -> Result<Template> {
    list_templates(dir)
        .into_iter()
        .find(|t| t.name == name)
        .ok_or_else(|| Error::TemplateNotFound(name.to_string()))
}
