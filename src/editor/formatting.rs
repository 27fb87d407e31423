//! Formatting and insert commands
//!
//! Every command takes the full buffer plus the current selection (byte
//! offsets) and returns the new buffer with the selection the editor should
//! show afterwards. Inline commands toggle: applying bold to text that is
//! already bold removes the markers.
//!
//! ```ignore
//! let result = apply_format("Hello world", (0, 5), FormatCommand::Bold);
//! assert_eq!(result.text, "**Hello** world");
//! ```

use crate::string_utils::{ceil_char_boundary, floor_char_boundary};

/// Placeholder selected after inserting a link.
pub const LINK_PLACEHOLDER: &str = "Link";
/// Placeholder selected after inserting an image.
pub const IMAGE_PLACEHOLDER: &str = "Image Url";

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Formatting commands available from the Insert menu and shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatCommand {
    Bold,
    Italic,
    /// `[Link Title](Link)`
    Link,
    /// `![Image Name](Image Url)`
    Image,
    CodeBlock,
    /// `#` to `######`
    Heading(u8),
    List,
    Blockquote,
}

impl FormatCommand {
    /// Insert menu order.
    pub const ALL: [FormatCommand; 13] = [
        Self::Heading(1),
        Self::Heading(2),
        Self::Heading(3),
        Self::Heading(4),
        Self::Heading(5),
        Self::Heading(6),
        Self::Bold,
        Self::Italic,
        Self::Link,
        Self::Image,
        Self::CodeBlock,
        Self::List,
        Self::Blockquote,
    ];

    pub fn label(&self) -> String {
        match self {
            Self::Bold => "Bold".to_string(),
            Self::Italic => "Italic".to_string(),
            Self::Link => "Link".to_string(),
            Self::Image => "Image".to_string(),
            Self::CodeBlock => "Code Block".to_string(),
            Self::Heading(level) => format!("Heading {}", level),
            Self::List => "List".to_string(),
            Self::Blockquote => "Quote Block".to_string(),
        }
    }

    pub fn shortcut_label(&self) -> &'static str {
        match self {
            Self::Bold => "Ctrl+B",
            Self::Italic => "Ctrl+I",
            Self::Link => "Ctrl+K",
            Self::Image => "Ctrl+Shift+I",
            Self::CodeBlock => "Ctrl+Shift+K",
            Self::Heading(1) => "Ctrl+Shift+1",
            Self::Heading(2) => "Ctrl+Shift+2",
            Self::Heading(3) => "Ctrl+Shift+3",
            Self::Heading(4) => "Ctrl+Shift+4",
            Self::Heading(5) => "Ctrl+Shift+5",
            Self::Heading(_) => "Ctrl+Shift+6",
            Self::List => "Ctrl+Shift+L",
            Self::Blockquote => "Ctrl+Shift+Q",
        }
    }
}

/// Outcome of a formatting command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatResult {
    pub text: String,
    /// Selection to restore, `(start, end)` in bytes. Equal ends mean a caret.
    pub selection: (usize, usize),
    /// `false` when the command removed formatting instead of adding it
    pub applied: bool,
}

impl FormatResult {
    fn caret(text: String, at: usize) -> Self {
        Self {
            text,
            selection: (at, at),
            applied: true,
        }
    }

    fn selected(text: String, start: usize, end: usize) -> Self {
        Self {
            text,
            selection: (start, end),
            applied: true,
        }
    }

    fn toggled_off(mut self) -> Self {
        self.applied = false;
        self
    }
}

fn normalize_selection(text: &str, selection: (usize, usize)) -> (usize, usize) {
    let (a, b) = if selection.0 <= selection.1 {
        selection
    } else {
        (selection.1, selection.0)
    };
    (
        floor_char_boundary(text, a.min(text.len())),
        ceil_char_boundary(text, b.min(text.len())),
    )
}

/// Apply `command` to `text` with the given selection.
pub fn apply_format(text: &str, selection: (usize, usize), command: FormatCommand) -> FormatResult {
    let selection = normalize_selection(text, selection);
    match command {
        FormatCommand::Bold => wrap_inline(text, selection, "**"),
        FormatCommand::Italic => wrap_inline(text, selection, "*"),
        FormatCommand::Link => insert_link(text, selection, false),
        FormatCommand::Image => insert_link(text, selection, true),
        FormatCommand::CodeBlock => insert_code_block(text, selection),
        FormatCommand::Heading(level) => set_heading(text, selection, level.clamp(1, 6)),
        FormatCommand::List => toggle_line_prefix(text, selection, "- "),
        FormatCommand::Blockquote => toggle_line_prefix(text, selection, "> "),
    }
}

/// Typing a surround key (`_` or `*`) over a selection wraps it instead of
/// replacing it. Returns `None` when nothing is selected.
pub fn surround_selection(text: &str, selection: (usize, usize), key: char) -> Option<FormatResult> {
    if !is_surround_key(key) {
        return None;
    }
    let (start, end) = normalize_selection(text, selection);
    if start == end {
        return None;
    }
    let marker = key.to_string();
    let new_text = format!(
        "{}{}{}{}{}",
        &text[..start],
        marker,
        &text[start..end],
        marker,
        &text[end..]
    );
    let inner_start = start + marker.len();
    Some(FormatResult::selected(
        new_text,
        inner_start,
        inner_start + (end - start),
    ))
}

pub fn is_surround_key(key: char) -> bool {
    matches!(key, '_' | '*')
}

// ─────────────────────────────────────────────────────────────────────────────
// Inline
// ─────────────────────────────────────────────────────────────────────────────

fn wrap_inline(text: &str, (start, end): (usize, usize), marker: &str) -> FormatResult {
    let selected = &text[start..end];
    let m = marker.len();

    // Selection includes the markers
    if selected.len() >= 2 * m && selected.starts_with(marker) && selected.ends_with(marker) {
        let inner = &selected[m..selected.len() - m];
        let new_text = format!("{}{}{}", &text[..start], inner, &text[end..]);
        return FormatResult::selected(new_text, start, start + inner.len()).toggled_off();
    }

    // Markers sit just outside the selection
    if start >= m
        && text[..start].ends_with(marker)
        && text[end..].starts_with(marker)
        && start != end
    {
        let new_text = format!("{}{}{}", &text[..start - m], selected, &text[end + m..]);
        return FormatResult::selected(new_text, start - m, end - m).toggled_off();
    }

    let new_text = format!("{}{}{}{}{}", &text[..start], marker, selected, marker, &text[end..]);
    if start == end {
        // empty pair, caret between the markers
        FormatResult::caret(new_text, start + m)
    } else {
        FormatResult::selected(new_text, start + m, end + m)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Links & Images
// ─────────────────────────────────────────────────────────────────────────────

fn insert_link(text: &str, (start, end): (usize, usize), image: bool) -> FormatResult {
    let (bang, default_title, placeholder) = if image {
        ("!", "Image Name", IMAGE_PLACEHOLDER)
    } else {
        ("", "Link Title", LINK_PLACEHOLDER)
    };
    let title = if start == end {
        default_title
    } else {
        &text[start..end]
    };

    let head = format!("{}[{}](", bang, title);
    let new_text = format!("{}{}{})", &text[..start], head, placeholder) + &text[end..];
    let target_start = start + head.len();
    FormatResult::selected(new_text, target_start, target_start + placeholder.len())
}

// ─────────────────────────────────────────────────────────────────────────────
// Blocks
// ─────────────────────────────────────────────────────────────────────────────

fn line_start(text: &str, pos: usize) -> usize {
    text[..pos].rfind('\n').map_or(0, |i| i + 1)
}

fn line_end(text: &str, pos: usize) -> usize {
    text[pos..].find('\n').map_or(text.len(), |i| pos + i)
}

fn insert_code_block(text: &str, (start, end): (usize, usize)) -> FormatResult {
    let selected = &text[start..end];
    let needs_leading_newline = start > 0 && !text[..start].ends_with('\n');
    let lead = if needs_leading_newline { "\n" } else { "" };
    let open = format!("{}```\n", lead);

    let new_text = format!("{}{}{}\n```{}", &text[..start], open, selected, &text[end..]);
    let inner_start = start + open.len();
    if selected.is_empty() {
        FormatResult::caret(new_text, inner_start)
    } else {
        FormatResult::selected(new_text, inner_start, inner_start + selected.len())
    }
}

fn heading_level(line: &str) -> usize {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if hashes > 0 && hashes <= 6 && line[hashes..].starts_with(' ') {
        hashes
    } else {
        0
    }
}

fn set_heading(text: &str, (start, end): (usize, usize), level: u8) -> FormatResult {
    let ls = line_start(text, start);
    let le = line_end(text, ls);
    let line = &text[ls..le];

    let current = heading_level(line);
    let body = if current > 0 {
        &line[current + 1..]
    } else {
        line
    };
    let removed = line.len() - body.len();

    let (new_line, applied) = if current == level as usize {
        (body.to_string(), false)
    } else {
        (format!("{} {}", "#".repeat(level as usize), body), true)
    };
    let added = new_line.len() - body.len();

    let new_text = format!("{}{}{}", &text[..ls], new_line, &text[le..]);
    let new_len = new_text.len();
    let shift = |pos: usize| -> usize {
        let moved = if pos <= ls {
            pos
        } else {
            (pos.saturating_sub(removed).max(ls) + added).min(new_len)
        };
        moved.max(ls + added)
    };
    let result = FormatResult::selected(new_text, shift(start), shift(end));
    if applied {
        result
    } else {
        result.toggled_off()
    }
}

fn toggle_line_prefix(text: &str, (start, end): (usize, usize), prefix: &str) -> FormatResult {
    let ls = line_start(text, start);
    let le = line_end(text, end);
    let block = &text[ls..le];

    let lines: Vec<&str> = block.split('\n').collect();
    let all_prefixed = lines.iter().all(|l| l.starts_with(prefix) || l.trim().is_empty())
        && lines.iter().any(|l| l.starts_with(prefix));

    let new_block: Vec<String> = lines
        .iter()
        .map(|l| {
            if all_prefixed {
                l.strip_prefix(prefix).unwrap_or(l).to_string()
            } else if l.trim().is_empty() && lines.len() > 1 {
                l.to_string()
            } else {
                format!("{}{}", prefix, l)
            }
        })
        .collect();
    let new_block = new_block.join("\n");

    let new_text = format!("{}{}{}", &text[..ls], new_block, &text[le..]);
    let new_le = ls + new_block.len();
    let result = if start == end {
        // caret stays at the end of the edited line for a single line
        let caret = if lines.len() == 1 { new_le } else { ls };
        FormatResult::caret(new_text, caret)
    } else {
        FormatResult::selected(new_text, ls, new_le)
    };
    if all_prefixed {
        result.toggled_off()
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_with_selection() {
        let r = apply_format("Hello world", (0, 5), FormatCommand::Bold);
        assert_eq!(r.text, "**Hello** world");
        assert_eq!(r.selection, (2, 7));
        assert!(r.applied);
    }

    #[test]
    fn test_bold_toggle_off_outside_markers() {
        let r = apply_format("**Hello** world", (2, 7), FormatCommand::Bold);
        assert_eq!(r.text, "Hello world");
        assert_eq!(r.selection, (0, 5));
        assert!(!r.applied);
    }

    #[test]
    fn test_italic_toggle_off_inside_selection() {
        let r = apply_format("a *b* c", (2, 5), FormatCommand::Italic);
        assert_eq!(r.text, "a b c");
        assert!(!r.applied);
    }

    #[test]
    fn test_bold_without_selection_inserts_pair() {
        let r = apply_format("ab", (1, 1), FormatCommand::Bold);
        assert_eq!(r.text, "a****b");
        assert_eq!(r.selection, (3, 3));
    }

    #[test]
    fn test_link_without_selection_selects_target() {
        let r = apply_format("", (0, 0), FormatCommand::Link);
        assert_eq!(r.text, "[Link Title](Link)");
        let (s, e) = r.selection;
        assert_eq!(&r.text[s..e], "Link");
        assert_eq!(s, 13);
    }

    #[test]
    fn test_link_with_selection_uses_title() {
        let r = apply_format("see docs", (4, 8), FormatCommand::Link);
        assert_eq!(r.text, "see [docs](Link)");
    }

    #[test]
    fn test_image_selects_url_placeholder() {
        let r = apply_format("x ", (2, 2), FormatCommand::Image);
        assert_eq!(r.text, "x ![Image Name](Image Url)");
        let (s, e) = r.selection;
        assert_eq!(&r.text[s..e], "Image Url");
    }

    #[test]
    fn test_heading_levels() {
        let r = apply_format("Title", (2, 2), FormatCommand::Heading(1));
        assert_eq!(r.text, "# Title");

        let r = apply_format(&r.text, (4, 4), FormatCommand::Heading(3));
        assert_eq!(r.text, "### Title");

        let r = apply_format(&r.text, (5, 5), FormatCommand::Heading(3));
        assert_eq!(r.text, "Title");
        assert!(!r.applied);
    }

    #[test]
    fn test_heading_only_touches_current_line() {
        let r = apply_format("one\ntwo\nthree", (5, 5), FormatCommand::Heading(2));
        assert_eq!(r.text, "one\n## two\nthree");
    }

    #[test]
    fn test_list_and_toggle() {
        let r = apply_format("a\nb", (0, 3), FormatCommand::List);
        assert_eq!(r.text, "- a\n- b");
        let r = apply_format(&r.text, (0, r.text.len()), FormatCommand::List);
        assert_eq!(r.text, "a\nb");
        assert!(!r.applied);
    }

    #[test]
    fn test_quote_single_line() {
        let r = apply_format("quote me", (3, 3), FormatCommand::Blockquote);
        assert_eq!(r.text, "> quote me");
        assert_eq!(r.selection, (10, 10));
    }

    #[test]
    fn test_code_block_wraps_selection() {
        let r = apply_format("x = 1", (0, 5), FormatCommand::CodeBlock);
        assert_eq!(r.text, "```\nx = 1\n```");
        let r = apply_format("text", (4, 4), FormatCommand::CodeBlock);
        assert_eq!(r.text, "text\n```\n\n```");
        assert_eq!(r.selection, (9, 9));
    }

    #[test]
    fn test_surround_keys() {
        let r = surround_selection("make this", (5, 9), '_').unwrap();
        assert_eq!(r.text, "make _this_");
        assert_eq!(r.selection, (6, 10));
        assert!(surround_selection("abc", (1, 1), '*').is_none());
        assert!(surround_selection("abc", (0, 2), 'x').is_none());
    }

    #[test]
    fn test_multibyte_selection() {
        let r = apply_format("Hei på deg", (4, 7), FormatCommand::Bold);
        assert_eq!(r.text, "Hei **på** deg");
    }
}
