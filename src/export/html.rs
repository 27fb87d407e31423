//! Standalone HTML documents
//!
//! Wraps rendered Markdown in a complete HTML5 page with the active theme's
//! colors inlined as CSS, so the file looks like the preview when opened
//! anywhere.

use std::path::Path;

use eframe::egui::Color32;

use crate::error::{Error, Result};
use crate::theme::ThemeColors;

// ─────────────────────────────────────────────────────────────────────────────
// HTML Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Complete HTML document around an already rendered body.
pub fn wrap_html_body(body: &str, title: &str, colors: &ThemeColors) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="Serum Writer">
    <title>{title}</title>
    <style>
{base_css}
{theme_css}
    </style>
</head>
<body>
    <article class="serum-body">
{body}
    </article>
</body>
</html>"#,
        title = html_escape(title),
        base_css = BASE_CSS,
        theme_css = generate_theme_css(colors),
        body = body,
    )
}

/// Write `html` to `path`.
pub fn write_html_file(path: &Path, html: &str) -> Result<()> {
    std::fs::write(path, html).map_err(|source| Error::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// CSS
// ─────────────────────────────────────────────────────────────────────────────

/// Layout and typography, colors come from the theme CSS.
const BASE_CSS: &str = r#"
*, *::before, *::after { box-sizing: border-box; }

body {
    margin: 0;
    font-family: Georgia, 'Iowan Old Style', 'Palatino Linotype', serif;
    font-size: 17px;
    line-height: 1.65;
}

.serum-body {
    max-width: 760px;
    margin: 0 auto;
    padding: 40px 24px;
}

.serum-body h1, .serum-body h2, .serum-body h3,
.serum-body h4, .serum-body h5, .serum-body h6 {
    font-family: -apple-system, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
    line-height: 1.25;
    margin: 1.6em 0 0.6em;
}

.serum-body h1 { font-size: 2em; border-bottom: 1px solid; padding-bottom: 0.25em; }
.serum-body h2 { font-size: 1.5em; border-bottom: 1px solid; padding-bottom: 0.25em; }
.serum-body h3 { font-size: 1.25em; }

.serum-body p, .serum-body ul, .serum-body ol, .serum-body pre,
.serum-body blockquote, .serum-body table { margin: 0 0 1em; }

.serum-body ul, .serum-body ol { padding-left: 2em; }
.serum-body ul.contains-task-list { list-style: none; padding-left: 0.5em; }

.serum-body blockquote { padding: 0 1em; border-left: 4px solid; }

.serum-body code {
    font-family: 'JetBrains Mono', 'Fira Code', Consolas, monospace;
    font-size: 0.88em;
    padding: 0.15em 0.35em;
    border-radius: 3px;
}

.serum-body pre { padding: 14px; overflow: auto; border-radius: 6px; }
.serum-body pre code { padding: 0; background: transparent; }

.serum-body table { border-collapse: collapse; }
.serum-body th, .serum-body td { padding: 6px 12px; border: 1px solid; }

.serum-body hr { height: 1px; border: none; margin: 2em 0; }
.serum-body img { max-width: 100%; }
"#;

fn generate_theme_css(colors: &ThemeColors) -> String {
    format!(
        r#"
:root {{ color-scheme: {scheme}; }}
body {{ background-color: {bg}; color: {text}; }}
.serum-body h1, .serum-body h2, .serum-body h3,
.serum-body h4, .serum-body h5, .serum-body h6 {{ color: {heading}; }}
.serum-body h1, .serum-body h2 {{ border-bottom-color: {border}; }}
.serum-body a {{ color: {link}; }}
.serum-body blockquote {{ color: {quote_text}; border-left-color: {quote_border}; }}
.serum-body code {{ background-color: {code_bg}; color: {code_text}; }}
.serum-body pre {{ background-color: {code_bg}; border: 1px solid {border}; }}
.serum-body th, .serum-body td {{ border-color: {table_border}; }}
.serum-body th {{ background-color: {table_header}; }}
.serum-body hr {{ background-color: {rule}; }}
"#,
        scheme = if colors.is_dark() { "dark" } else { "light" },
        bg = color32_to_css(colors.base.background),
        text = color32_to_css(colors.text.primary),
        heading = color32_to_css(colors.text.heading),
        border = color32_to_css(colors.base.border),
        link = color32_to_css(colors.text.link),
        quote_text = color32_to_css(colors.markup.quote_text),
        quote_border = color32_to_css(colors.markup.quote_border),
        code_bg = color32_to_css(colors.base.code_background),
        code_text = color32_to_css(colors.markup.code_text),
        table_border = color32_to_css(colors.markup.table_border),
        table_header = color32_to_css(colors.markup.table_header),
        rule = color32_to_css(colors.markup.rule),
    )
}

fn color32_to_css(color: Color32) -> String {
    format!("rgb({}, {}, {})", color.r(), color.g(), color.b())
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::render_html;
    use tempfile::TempDir;

    #[test]
    fn test_wrap_html_body() {
        let body = render_html("# Test\n\nParagraph.");
        let html = wrap_html_body(&body, "My <Doc>", &ThemeColors::light());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>My &lt;Doc&gt;</title>"));
        assert!(html.contains("<article class=\"serum-body\">"));
        assert!(html.contains("<p>Paragraph.</p>"));
        assert!(html.contains("color-scheme: light"));
    }

    #[test]
    fn test_dark_theme_css() {
        let css = generate_theme_css(&ThemeColors::dark());
        assert!(css.contains("color-scheme: dark"));
        assert!(css.contains(&color32_to_css(ThemeColors::dark().base.background)));
    }

    #[test]
    fn test_color32_to_css() {
        assert_eq!(color32_to_css(Color32::from_rgb(255, 128, 64)), "rgb(255, 128, 64)");
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("\"it's\""), "&quot;it&#39;s&quot;");
    }

    #[test]
    fn test_write_html_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.html");
        write_html_file(&path, "<p>x</p>").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<p>x</p>");

        let bad = dir.path().join("missing").join("out.html");
        assert!(matches!(
            write_html_file(&bad, "x"),
            Err(Error::FileWrite { .. })
        ));
    }
}
