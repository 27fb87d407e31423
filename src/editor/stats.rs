//! Text statistics for the status bar

// ─────────────────────────────────────────────────────────────────────────────
// TextStats
// ─────────────────────────────────────────────────────────────────────────────

/// Counts shown in the status bar.
///
/// A word is a whitespace-separated token with at least one alphabetic
/// character, so `42` and `---` do not count but `don't` and `**bold**` do.
///
/// ```ignore
/// let stats = TextStats::from_text("Hello, World! 42");
/// assert_eq!(stats.words, 2);
/// assert_eq!(stats.word_label(), "2 Words");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextStats {
    pub words: usize,
    /// Characters including whitespace
    pub characters: usize,
    /// Lines, an empty document has one
    pub lines: usize,
}

impl TextStats {
    pub fn from_text(text: &str) -> Self {
        let words = text
            .split_whitespace()
            .filter(|token| token.chars().any(char::is_alphabetic))
            .count();

        Self {
            words,
            characters: text.chars().count(),
            lines: text.split('\n').count(),
        }
    }

    /// `"1 Word"`, `"N Words"`.
    pub fn word_label(&self) -> String {
        if self.words == 1 {
            "1 Word".to_string()
        } else {
            format!("{} Words", self.words)
        }
    }

    /// Compact form for tooltips: "150 words | 892 chars | 25 lines"
    pub fn format_compact(&self) -> String {
        format!(
            "{} words | {} chars | {} lines",
            self.words, self.characters, self.lines
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
