//! The markup pattern table
//!
//! An ordered list of regex rules covering Markdown, reStructuredText,
//! Textile and HTML. Each rule carries the formatters applied to its match
//! (index 0 is the whole match, index `i` the i-th capture group) and the
//! markups it applies to.
//!
//! The `regex` crate has no look-around, so rules that need it are written
//! either as a guard checked around the match, or as a wider regex whose
//! first capture group is the logical match.

use eframe::egui::Color32;
use regex::Regex;
use std::fmt;
use std::ops::{BitAnd, BitOr, Range};

use super::format::{fg, Formatter, Weight, ITAL, NF, UNDL};
use crate::document::DocumentType;
use crate::error::{Error, Result};
use crate::string_utils::{char_at, char_before};

// ─────────────────────────────────────────────────────────────────────────────
// Markup Bitset
// ─────────────────────────────────────────────────────────────────────────────

/// Set of markup dialects a rule applies to, plus the code-span marker.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Markup(u8);

impl Markup {
    pub const NONE: Markup = Markup(0);
    pub const MKD: Markup = Markup(1);
    pub const REST: Markup = Markup(1 << 1);
    pub const TEXTILE: Markup = Markup(1 << 2);
    pub const HTML: Markup = Markup(1 << 3);
    /// Nothing else may be highlighted inside a match of this rule.
    pub const CODE_SPAN: Markup = Markup(1 << 4);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Markup) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Markup) -> bool {
        self.0 & other.0 != 0
    }

    /// The markup bit for a document type.
    pub const fn for_document(doc_type: DocumentType) -> Markup {
        match doc_type {
            DocumentType::Markdown => Markup::MKD,
            DocumentType::ReStructuredText => Markup::REST,
            DocumentType::Textile => Markup::TEXTILE,
            DocumentType::Html => Markup::HTML,
        }
    }
}

impl BitOr for Markup {
    type Output = Markup;
    fn bitor(self, rhs: Markup) -> Markup {
        Markup(self.0 | rhs.0)
    }
}

impl BitAnd for Markup {
    type Output = Markup;
    fn bitand(self, rhs: Markup) -> Markup {
        Markup(self.0 & rhs.0)
    }
}

impl From<DocumentType> for Markup {
    fn from(doc_type: DocumentType) -> Self {
        Markup::for_document(doc_type)
    }
}

impl fmt::Debug for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Markup::MKD, "Mkd"),
            (Markup::REST, "ReST"),
            (Markup::TEXTILE, "Textile"),
            (Markup::HTML, "HTML"),
            (Markup::CODE_SPAN, "CodeSpan"),
        ];
        let set: Vec<&str> = names
            .iter()
            .filter(|(bit, _)| self.contains(*bit))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "Markup({})", set.join(" | "))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Palette
// ─────────────────────────────────────────────────────────────────────────────

/// Colors the pattern table and spell checker draw with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightPalette {
    /// HTML tags
    pub accent: Color32,
    /// Horizontal rules
    pub muted: Color32,
    /// Misspelling underline
    pub misspelled: Color32,
}

impl Default for HighlightPalette {
    fn default() -> Self {
        Self {
            accent: Color32::from_rgb(100, 180, 255),
            muted: Color32::from_rgb(90, 90, 90),
            misspelled: Color32::RED,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Matchers
// ─────────────────────────────────────────────────────────────────────────────

/// Accept/reject a raw regex match by looking at the text around it.
pub type Guard = fn(text: &str, span: Range<usize>) -> bool;

#[derive(Debug, Clone)]
enum Matcher {
    Plain(Regex),
    /// Rejected matches are retried one character further on.
    Guarded(Regex, Guard),
    /// Capture group 1 is the logical match.
    Inner(Regex),
}

/// One match of a rule, in byte offsets of the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    /// `groups[0]` is the whole match; later entries are capture groups that
    /// participated.
    pub groups: Vec<Option<Range<usize>>>,
}

impl RuleMatch {
    pub fn span(&self) -> Range<usize> {
        self.groups[0].clone().unwrap_or(0..0)
    }
}

fn next_char_start(text: &str, pos: usize) -> usize {
    char_at(text, pos).map_or(text.len() + 1, |c| pos + c.len_utf8())
}

// ─────────────────────────────────────────────────────────────────────────────
// Pattern Rule
// ─────────────────────────────────────────────────────────────────────────────

/// A compiled regex with its formatters and applicable markups.
#[derive(Debug, Clone)]
pub struct PatternRule {
    name: &'static str,
    matcher: Matcher,
    formatters: Vec<Formatter>,
    markups: Markup,
}

impl PatternRule {
    fn compile(pattern: &str) -> Result<Regex> {
        Regex::new(pattern).map_err(|source| Error::RegexCompile {
            pattern: pattern.to_string(),
            source,
        })
    }

    pub fn plain(
        name: &'static str,
        pattern: &str,
        formatters: &[Formatter],
        markups: Markup,
    ) -> Result<Self> {
        Ok(Self {
            name,
            matcher: Matcher::Plain(Self::compile(pattern)?),
            formatters: formatters.to_vec(),
            markups,
        })
    }

    pub fn guarded(
        name: &'static str,
        pattern: &str,
        guard: Guard,
        formatters: &[Formatter],
        markups: Markup,
    ) -> Result<Self> {
        Ok(Self {
            name,
            matcher: Matcher::Guarded(Self::compile(pattern)?, guard),
            formatters: formatters.to_vec(),
            markups,
        })
    }

    /// `pattern` must contain at least one capture group.
    pub fn inner(
        name: &'static str,
        pattern: &str,
        formatters: &[Formatter],
        markups: Markup,
    ) -> Result<Self> {
        Ok(Self {
            name,
            matcher: Matcher::Inner(Self::compile(pattern)?),
            formatters: formatters.to_vec(),
            markups,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn markups(&self) -> Markup {
        self.markups
    }

    pub fn formatters(&self) -> &[Formatter] {
        &self.formatters
    }

    pub fn is_code_span(&self) -> bool {
        self.markups.contains(Markup::CODE_SPAN)
    }

    pub fn applies_to(&self, markup: Markup) -> bool {
        self.markups.intersects(markup)
    }

    /// All non-overlapping matches in `text`, left to right.
    pub fn find_all(&self, text: &str) -> Vec<RuleMatch> {
        let mut matches = Vec::new();
        let mut pos = 0;

        while pos <= text.len() {
            let found = match &self.matcher {
                Matcher::Plain(re) => re.captures_at(text, pos).map(|caps| {
                    let whole = caps.get(0).map_or(pos..pos, |m| m.range());
                    let next = if whole.is_empty() {
                        next_char_start(text, whole.end)
                    } else {
                        whole.end
                    };
                    let groups = caps.iter().map(|g| g.map(|m| m.range())).collect();
                    (RuleMatch { groups }, next)
                }),
                Matcher::Guarded(re, guard) => {
                    let mut at = pos;
                    let mut accepted = None;
                    while at <= text.len() {
                        let Some(m) = re.find_at(text, at) else { break };
                        if guard(text, m.range()) {
                            let next = if m.is_empty() {
                                next_char_start(text, m.end())
                            } else {
                                m.end()
                            };
                            accepted = Some((RuleMatch { groups: vec![Some(m.range())] }, next));
                            break;
                        }
                        at = next_char_start(text, m.start());
                    }
                    accepted
                }
                Matcher::Inner(re) => re.captures_at(text, pos).and_then(|caps| {
                    let inner = caps.get(1)?.range();
                    let start = caps.get(0).map_or(pos, |m| m.start());
                    let next = inner.end.max(next_char_start(text, start));
                    Some((RuleMatch { groups: vec![Some(inner)] }, next))
                }),
            };

            match found {
                Some((m, next)) => {
                    matches.push(m);
                    pos = next;
                }
                None => break,
            }
        }

        matches
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Guards
// ─────────────────────────────────────────────────────────────────────────────

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Not preceded by another asterisk.
fn no_asterisk_before(text: &str, span: Range<usize>) -> bool {
    char_before(text, span.start) != Some('*')
}

/// Not glued to a word or another underscore on either side.
fn underscore_word_edges(text: &str, span: Range<usize>) -> bool {
    let before_ok = char_before(text, span.start).map_or(true, |c| !is_word_char(c));
    let after_ok = char_at(text, span.end).map_or(true, |c| !is_word_char(c));
    before_ok && after_ok
}

/// The string sits inside a tag: a `>` comes before any `<`.
fn inside_tag(text: &str, span: Range<usize>) -> bool {
    text[span.end..]
        .chars()
        .find(|c| *c == '<' || *c == '>')
        .map_or(false, |c| c == '>')
}

// ─────────────────────────────────────────────────────────────────────────────
// Pattern Table
// ─────────────────────────────────────────────────────────────────────────────

/// The ordered rule list. Order is significant.
#[derive(Debug, Clone)]
pub struct PatternTable {
    rules: Vec<PatternRule>,
}

impl PatternTable {
    /// Build the built-in table.
    ///
    /// # Panics
    ///
    /// Panics if a built-in pattern fails to compile, which is a programming
    /// error rather than a runtime condition.
    pub fn new(palette: &HighlightPalette) -> Self {
        Self::try_new(palette)
            .unwrap_or_else(|e| panic!("built-in highlighting table is invalid: {}", e))
    }

    pub fn try_new(palette: &HighlightPalette) -> Result<Self> {
        use Markup as M;
        let bold = NF | Weight::Bold;

        let rules = vec![
            // Code spans first: they suppress everything below
            PatternRule::plain("MkdCodeSpans", r"`[^`]*`", &[NF], M::MKD | M::CODE_SPAN)?,
            PatternRule::plain(
                "MkdMathSpans",
                r"\\[\(\[].*?\\[\)\]]",
                &[NF],
                M::MKD | M::CODE_SPAN,
            )?,
            PatternRule::plain("ReSTCodeSpan", r"``.+?``", &[NF], M::REST | M::CODE_SPAN)?,
            // HTML
            PatternRule::plain(
                "HtmlTags",
                r"<[^<>@]*>",
                &[fg(palette.accent) | Weight::Bold],
                M::MKD | M::TEXTILE | M::HTML,
            )?,
            PatternRule::plain("HtmlSymbols", r"&#?\w+;", &[bold], M::MKD | M::HTML)?,
            PatternRule::guarded(
                "HtmlStrings",
                r#""[^"<]*""#,
                inside_tag,
                &[bold],
                M::MKD | M::HTML,
            )?,
            PatternRule::plain("HtmlComments", r"<!--[^<>]*-->", &[NF], M::MKD | M::HTML)?,
            // Emphasis
            PatternRule::guarded(
                "Asterisks",
                r"\*[^ *][^*]*\*",
                no_asterisk_before,
                &[ITAL],
                M::MKD | M::REST,
            )?,
            PatternRule::guarded(
                "Underline",
                r"_[^_]+_",
                underscore_word_edges,
                &[ITAL],
                M::MKD | M::TEXTILE,
            )?,
            PatternRule::guarded(
                "DblAsterisks",
                r"\*\*.*?\*\*",
                no_asterisk_before,
                &[bold],
                M::MKD | M::REST | M::TEXTILE,
            )?,
            PatternRule::guarded(
                "DblUnderline",
                r"__[^_]+__",
                underscore_word_edges,
                &[bold],
                M::MKD,
            )?,
            PatternRule::plain(
                "TrpAsterisks",
                r"\*{3}[^*]+\*{3}",
                &[ITAL | Weight::Bold],
                M::MKD,
            )?,
            PatternRule::plain("TrpUnderline", r"__[^_]+___", &[ITAL | Weight::Bold], M::MKD)?,
            // Markdown structure
            PatternRule::plain(
                "MkdHeaders",
                r"(?m)^ {0,3}(#{1,6}) ([^\n]+)",
                &[bold],
                M::MKD,
            )?,
            PatternRule::plain("MkdLine", r"---", &[fg(palette.muted)], M::MKD)?,
            PatternRule::inner("MkdLinksImgs", r"\[([^\[\]]*)\]", &[NF], M::MKD)?,
            PatternRule::inner("MkdLinkRefs", r"\]\(([^()]*)\)", &[ITAL | UNDL], M::MKD)?,
            PatternRule::plain("BlockQuotes", r"^ *>.+", &[NF], M::MKD)?,
            // reStructuredText and Textile
            PatternRule::plain("ReSTDirects", r"\.\. [a-z]+::", &[bold], M::REST)?,
            PatternRule::plain("ReSTRoles", r"(:[a-z-]+:)(`.+?`)", &[NF, bold], M::REST)?,
            PatternRule::plain(
                "TextileHdrs",
                r"^h[1-6][()<>=]*\.\s.+",
                &[NF | Weight::Black],
                M::TEXTILE,
            )?,
            PatternRule::plain("TextileQuot", r"^bq\.\s.+", &[NF], M::TEXTILE)?,
            PatternRule::guarded(
                "Asterisks",
                r"\*[^ *][^*]*\*",
                no_asterisk_before,
                &[bold],
                M::TEXTILE,
            )?,
            PatternRule::guarded(
                "DblUnderline",
                r"__[^_]+__",
                underscore_word_edges,
                &[ITAL],
                M::TEXTILE,
            )?,
            PatternRule::plain(
                "ReSTLinks",
                r"(`.+?<)(.+?)(>`__?)",
                &[NF, NF, ITAL | UNDL, NF],
                M::REST,
            )?,
            PatternRule::plain(
                "ReSTLinkRefs",
                r"\.\. _`?(.*?)`?: (.*)",
                &[NF, ITAL | UNDL],
                M::REST,
            )?,
            PatternRule::plain("ReSTFldLists", r"^ *:(.*?):", &[NF], M::REST)?,
        ];

        Ok(Self { rules })
    }

    /// A table made of arbitrary rules, in the given order.
    #[allow(dead_code)]
    pub fn from_rules(rules: Vec<PatternRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// The ordered subset of rules whose markups intersect `doc_type`.
    pub fn applicable_rules(&self, doc_type: DocumentType) -> Vec<&PatternRule> {
        let markup = Markup::for_document(doc_type);
        self.rules.iter().filter(|r| r.applies_to(markup)).collect()
    }
}
