//! Markup dialect of a document

use std::path::Path;

/// The markup dialect governing which highlighting rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DocumentType {
    #[default]
    Markdown,
    ReStructuredText,
    Textile,
    Html,
}

impl DocumentType {
    /// Detect the type from a file path's extension. Unknown or missing
    /// extensions are Markdown.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .unwrap_or_default()
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "md" | "markdown" | "mkd" => Some(Self::Markdown),
            "rst" | "rest" => Some(Self::ReStructuredText),
            "textile" => Some(Self::Textile),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }

    /// Resolve the type for `path`, honoring a forced-Markdown override.
    pub fn resolve(path: Option<&Path>, force_markdown: bool) -> Self {
        match path {
            Some(path) if !force_markdown => Self::from_path(path),
            _ => Self::Markdown,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Markdown => "Markdown",
            Self::ReStructuredText => "reStructuredText",
            Self::Textile => "Textile",
            Self::Html => "HTML",
        }
    }

    /// Extensions offered in file dialogs, primary first.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Markdown => &["md", "markdown"],
            Self::ReStructuredText => &["rst", "rest"],
            Self::Textile => &["textile"],
            Self::Html => &["html", "htm"],
        }
    }

    /// Only Markdown has a live preview.
    pub fn has_preview(&self) -> bool {
        matches!(self, Self::Markdown)
    }

    pub fn all() -> &'static [DocumentType] {
        &[
            Self::Markdown,
            Self::ReStructuredText,
            Self::Textile,
            Self::Html,
        ]
    }
}
