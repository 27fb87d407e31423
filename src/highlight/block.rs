//! Block highlighter
//!
//! A block is one line of the buffer. Each block is scanned on its own with
//! no state carried over from its neighbours, so a block's ranges depend
//! only on its text, the document type and the dictionary.

use log::trace;
use regex::Regex;
use std::collections::HashMap;
use std::ops::Range;
use std::rc::Rc;
use std::sync::OnceLock;

use super::format::{CharFormat, Formatter, Underline};
use super::patterns::{HighlightPalette, PatternTable};
use crate::document::DocumentType;
use crate::spellcheck::Dictionary;
use crate::string_utils::utf16_len;

/// Beyond this many distinct cached blocks the cache starts over.
const MAX_CACHED_BLOCKS: usize = 8192;

fn spell_word_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b([A-Za-z]{2,})\b").unwrap_or_else(|e| panic!("{}", e)))
}

fn trailing_space_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+$").unwrap_or_else(|e| panic!("{}", e)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────────────────────

/// Unit in which reported offsets and lengths are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextUnits {
    /// UTF-16 code units; characters above U+FFFF count twice.
    #[default]
    Utf16,
    /// UTF-8 bytes, directly usable to slice a `&str`.
    Utf8Bytes,
}

/// How code spans suppress other rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeSpanPolicy {
    /// Collect every code span first, then apply the other rules.
    #[default]
    TwoPass,
    /// Single forward pass in table order: a code-span rule only suppresses
    /// rules listed after it.
    TableOrder,
}

/// A formatted run of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatRange {
    pub start: usize,
    pub len: usize,
    pub format: CharFormat,
}

impl FormatRange {
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// A contiguous run with its final, merged format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub range: Range<usize>,
    pub format: CharFormat,
}

// ─────────────────────────────────────────────────────────────────────────────
// Block Highlighter
// ─────────────────────────────────────────────────────────────────────────────

/// Applies the pattern table (and the spell checker) to single blocks.
#[derive(Debug, Clone)]
pub struct BlockHighlighter {
    table: PatternTable,
    palette: HighlightPalette,
    units: TextUnits,
    policy: CodeSpanPolicy,
}

impl BlockHighlighter {
    pub fn new(palette: HighlightPalette) -> Self {
        Self::with_table(PatternTable::new(&palette), palette)
    }

    pub fn with_table(table: PatternTable, palette: HighlightPalette) -> Self {
        Self {
            table,
            palette,
            units: TextUnits::default(),
            policy: CodeSpanPolicy::default(),
        }
    }

    pub fn with_units(mut self, units: TextUnits) -> Self {
        self.units = units;
        self
    }

    #[allow(dead_code)]
    pub fn with_code_span_policy(mut self, policy: CodeSpanPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn table(&self) -> &PatternTable {
        &self.table
    }

    pub fn palette(&self) -> &HighlightPalette {
        &self.palette
    }

    fn misspelled_format(&self) -> CharFormat {
        Formatter::underline(Underline::SpellCheck, Some(self.palette.misspelled)).char_format()
    }

    /// Format ranges for one block, in this highlighter's units.
    ///
    /// Ranges come out in application order; later ranges are layered on
    /// top of earlier ones.
    #[allow(dead_code)]
    pub fn highlight_block(
        &self,
        text: &str,
        doc_type: DocumentType,
        dictionary: Option<&Dictionary>,
    ) -> Vec<FormatRange> {
        let ranges = self.scan_block(text, doc_type, dictionary);
        match self.units {
            TextUnits::Utf8Bytes => ranges,
            TextUnits::Utf16 => ranges
                .into_iter()
                .map(|r| FormatRange {
                    start: utf16_len(&text[..r.start]),
                    len: utf16_len(&text[r.start..r.end()]),
                    format: r.format,
                })
                .collect(),
        }
    }

    /// Format ranges for one block in byte offsets.
    pub fn scan_block(
        &self,
        text: &str,
        doc_type: DocumentType,
        dictionary: Option<&Dictionary>,
    ) -> Vec<FormatRange> {
        let mut ranges = Vec::new();
        let mut push = |span: Range<usize>, format: CharFormat| {
            if !span.is_empty() {
                ranges.push(FormatRange {
                    start: span.start,
                    len: span.len(),
                    format,
                });
            }
        };

        // 1. Misspelled words
        if let Some(dictionary) = dictionary {
            let misspelled = self.misspelled_format();
            for word in spell_word_regex().find_iter(text) {
                if !dictionary.check(word.as_str()) {
                    push(word.range(), misspelled);
                }
            }
        }

        // 2. Markup rules
        let rules = self.table.applicable_rules(doc_type);
        let mut code_spans: Vec<Range<usize>> = Vec::new();

        if self.policy == CodeSpanPolicy::TwoPass {
            for rule in rules.iter().filter(|r| r.is_code_span()) {
                code_spans.extend(rule.find_all(text).iter().map(|m| m.span()));
            }
        }

        for rule in &rules {
            let matches = rule.find_all(text);
            if rule.is_code_span() {
                if self.policy == CodeSpanPolicy::TableOrder {
                    code_spans.extend(matches.iter().map(|m| m.span()));
                }
                continue;
            }

            for m in matches {
                let span = m.span();
                if code_spans
                    .iter()
                    .any(|code| span.start < code.end && span.end > code.start)
                {
                    trace!("{} at {:?} suppressed by code span", rule.name(), span);
                    continue;
                }
                for (group, formatter) in m.groups.iter().zip(rule.formatters()) {
                    if let Some(group) = group {
                        push(group.clone(), formatter.char_format());
                    }
                }
            }
        }

        // 3. Trailing whitespace gets an explicit neutral run
        for m in trailing_space_regex().find_iter(text) {
            push(m.range(), CharFormat::default());
        }

        ranges
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Flattening
// ─────────────────────────────────────────────────────────────────────────────

/// Resolve layered ranges into non-overlapping segments covering `0..len`.
///
/// Every boundary of every range starts a new segment; each segment's format
/// is the in-order merge of all ranges covering it.
pub fn flatten(len: usize, ranges: &[FormatRange]) -> Vec<Segment> {
    let mut cuts: Vec<usize> = Vec::with_capacity(ranges.len() * 2 + 2);
    cuts.push(0);
    cuts.push(len);
    for r in ranges {
        cuts.push(r.start.min(len));
        cuts.push(r.end().min(len));
    }
    cuts.sort_unstable();
    cuts.dedup();

    let mut segments: Vec<Segment> = Vec::with_capacity(cuts.len());
    for pair in cuts.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let mut format = CharFormat::default();
        for r in ranges.iter().filter(|r| r.start <= a && r.end() >= b) {
            format.merge(&r.format);
        }

        match segments.last_mut() {
            Some(last) if last.format == format => last.range.end = b,
            _ => segments.push(Segment { range: a..b, format }),
        }
    }
    segments
}

// ─────────────────────────────────────────────────────────────────────────────
// Document Highlighter
// ─────────────────────────────────────────────────────────────────────────────

/// Per-block cache around a [`BlockHighlighter`] for a whole buffer.
///
/// Unchanged blocks are served from the cache; only new or edited blocks
/// are rescanned. Changing the document type, the spell-check state or the
/// dictionary contents empties the cache.
#[derive(Debug)]
pub struct DocumentHighlighter {
    highlighter: BlockHighlighter,
    key: CacheKey,
    cache: HashMap<String, Rc<Vec<Segment>>>,
    last_rescanned: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CacheKey {
    doc_type: DocumentType,
    dictionary_generation: Option<u64>,
}

impl DocumentHighlighter {
    pub fn new(palette: HighlightPalette) -> Self {
        Self {
            highlighter: BlockHighlighter::new(palette).with_units(TextUnits::Utf8Bytes),
            key: CacheKey {
                doc_type: DocumentType::default(),
                dictionary_generation: None,
            },
            cache: HashMap::new(),
            last_rescanned: 0,
        }
    }

    /// Rebuild the table for new theme colors.
    pub fn set_palette(&mut self, palette: HighlightPalette) {
        if *self.highlighter.palette() != palette {
            self.highlighter = BlockHighlighter::new(palette).with_units(TextUnits::Utf8Bytes);
            self.cache.clear();
        }
    }

    /// Number of blocks rescanned by the last [`segments`](Self::segments) call.
    pub fn last_rescanned(&self) -> usize {
        self.last_rescanned
    }

    pub fn invalidate(&mut self) {
        self.cache.clear();
    }

    /// Segments covering all of `text`, in byte offsets.
    ///
    /// Pass `None` as dictionary to turn spell-checking off.
    pub fn segments(
        &mut self,
        text: &str,
        doc_type: DocumentType,
        dictionary: Option<&Dictionary>,
    ) -> Vec<Segment> {
        let key = CacheKey {
            doc_type,
            dictionary_generation: dictionary.map(Dictionary::generation),
        };
        if key != self.key || self.cache.len() > MAX_CACHED_BLOCKS {
            self.cache.clear();
            self.key = key;
        }

        let mut out = Vec::new();
        let mut rescanned = 0;
        let mut offset = 0;

        for block in text.split('\n') {
            let block_segments = match self.cache.get(block) {
                Some(cached) => Rc::clone(cached),
                None => {
                    rescanned += 1;
                    let ranges = self.highlighter.scan_block(block, doc_type, dictionary);
                    let fresh = Rc::new(flatten(block.len(), &ranges));
                    self.cache.insert(block.to_string(), Rc::clone(&fresh));
                    fresh
                }
            };

            out.extend(block_segments.iter().map(|s| Segment {
                range: s.range.start + offset..s.range.end + offset,
                format: s.format,
            }));
            offset += block.len();

            if offset < text.len() {
                // the newline itself
                out.push(Segment {
                    range: offset..offset + 1,
                    format: CharFormat::default(),
                });
                offset += 1;
            }
        }

        self.last_rescanned = rescanned;
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::format::{Weight, ITAL, NF};
    use crate::highlight::patterns::{Markup, PatternRule};

    fn highlighter() -> BlockHighlighter {
        BlockHighlighter::new(HighlightPalette::default())
    }

    fn bold_ranges(ranges: &[FormatRange]) -> Vec<Range<usize>> {
        ranges
            .iter()
            .filter(|r| r.format.is_bold())
            .map(|r| r.start..r.end())
            .collect()
    }

    fn italic_ranges(ranges: &[FormatRange]) -> Vec<Range<usize>> {
        ranges
            .iter()
            .filter(|r| r.format.is_italic())
            .map(|r| r.start..r.end())
            .collect()
    }

    #[test]
    fn test_header_bold_italic_scenario() {
        let h = highlighter();
        let text = "# Title\n**bold** and *italic*";
        let blocks: Vec<&str> = text.split('\n').collect();

        let header = h.highlight_block(blocks[0], DocumentType::Markdown, None);
        assert!(bold_ranges(&header).contains(&(0..7)));

        let body = h.highlight_block(blocks[1], DocumentType::Markdown, None);
        assert_eq!(bold_ranges(&body), vec![0..8]);
        assert_eq!(italic_ranges(&body), vec![13..21]);
    }

    #[test]
    fn test_code_span_suppresses_emphasis() {
        let h = highlighter();
        let text = "see `**not bold**` and *yes*";
        let ranges = h.highlight_block(text, DocumentType::Markdown, None);
        assert!(bold_ranges(&ranges).is_empty());
        assert_eq!(italic_ranges(&ranges), vec![23..28]);
        // the code span itself is not formatted
        assert!(ranges.iter().all(|r| r.start != 4));
    }

    #[test]
    fn test_math_span_suppresses_emphasis() {
        let h = highlighter();
        let ranges = h.highlight_block(r"\(a *b* c\)", DocumentType::Markdown, None);
        assert!(italic_ranges(&ranges).is_empty());
    }

    #[test]
    fn test_highlighting_is_idempotent() {
        let h = highlighter();
        let dict = Dictionary::from_words(["hello"]);
        let text = "hello wrold **x** <b class=\"c\">";
        let first = h.highlight_block(text, DocumentType::Markdown, Some(&dict));
        let second = h.highlight_block(text, DocumentType::Markdown, Some(&dict));
        assert_eq!(first, second);
    }

    #[test]
    fn test_utf16_offsets_after_astral_char() {
        let h = highlighter();
        let text = "🎉 *party*";
        let utf16 = h.highlight_block(text, DocumentType::Markdown, None);
        assert_eq!(italic_ranges(&utf16), vec![3..10]);

        let bytes = h
            .clone()
            .with_units(TextUnits::Utf8Bytes)
            .highlight_block(text, DocumentType::Markdown, None);
        assert_eq!(italic_ranges(&bytes), vec![5..12]);
    }

    #[test]
    fn test_spell_check_marks_unknown_words() {
        let h = highlighter();
        let dict = Dictionary::from_words(["the", "cat"]);
        let ranges = h.highlight_block("the cta sat", DocumentType::Markdown, Some(&dict));
        let misspelled: Vec<Range<usize>> = ranges
            .iter()
            .filter(|r| r.format.underline == Some(Underline::SpellCheck))
            .map(|r| r.start..r.end())
            .collect();
        assert_eq!(misspelled, vec![4..7, 8..11]);
    }

    #[test]
    fn test_no_dictionary_means_no_spell_ranges() {
        let h = highlighter();
        let ranges = h.highlight_block("qwxz zzkq", DocumentType::Markdown, None);
        assert!(ranges.iter().all(|r| r.format.underline.is_none()));
    }

    #[test]
    fn test_trailing_whitespace_neutral_run() {
        let h = highlighter().with_units(TextUnits::Utf8Bytes);
        let ranges = h.highlight_block("text   ", DocumentType::Markdown, None);
        let last = ranges.last().unwrap();
        assert_eq!((last.start, last.len), (4, 3));
        assert!(last.format.is_neutral());
    }

    #[test]
    fn test_rst_rules_do_not_fire_for_markdown() {
        let h = highlighter();
        let ranges = h.highlight_block(".. note::", DocumentType::Markdown, None);
        assert!(bold_ranges(&ranges).is_empty());
        let ranges = h.highlight_block(".. note::", DocumentType::ReStructuredText, None);
        assert_eq!(bold_ranges(&ranges), vec![0..9]);
    }

    #[test]
    fn test_textile_asterisks_are_bold() {
        let h = highlighter();
        let ranges = h.highlight_block("a *strong* word", DocumentType::Textile, None);
        assert_eq!(bold_ranges(&ranges), vec![2..10]);
        assert!(italic_ranges(&ranges).is_empty());
    }

    #[test]
    fn test_code_span_policy_table_order() {
        let palette = HighlightPalette::default();
        // A formatting rule declared before the code-span rule
        let table = PatternTable::from_rules(vec![
            PatternRule::plain("Bold", r"\*\*[^*]+\*\*", &[NF | Weight::Bold], Markup::MKD).unwrap(),
            PatternRule::plain("Code", r"`[^`]*`", &[NF], Markup::MKD | Markup::CODE_SPAN)
                .unwrap(),
            PatternRule::plain("Ital", r"_[^_]+_", &[ITAL], Markup::MKD).unwrap(),
        ]);
        let text = "`**x** _y_`";

        let two_pass = BlockHighlighter::with_table(table.clone(), palette);
        let ranges = two_pass.highlight_block(text, DocumentType::Markdown, None);
        assert!(bold_ranges(&ranges).is_empty());
        assert!(italic_ranges(&ranges).is_empty());

        let single = BlockHighlighter::with_table(table, palette)
            .with_code_span_policy(CodeSpanPolicy::TableOrder);
        let ranges = single.highlight_block(text, DocumentType::Markdown, None);
        assert_eq!(bold_ranges(&ranges), vec![1..6]);
        assert!(italic_ranges(&ranges).is_empty());
    }

    #[test]
    fn test_flatten_merges_layers() {
        let bold = (NF | Weight::Bold).char_format();
        let ital = ITAL.char_format();
        let ranges = vec![
            FormatRange { start: 0, len: 6, format: bold },
            FormatRange { start: 2, len: 2, format: ital },
        ];
        let segments = flatten(8, &ranges);
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0].range, 0..2);
        assert!(segments[1].format.is_bold() && segments[1].format.is_italic());
        assert_eq!(segments[3].range, 6..8);
        assert!(segments[3].format.is_neutral());
    }

    #[test]
    fn test_document_highlighter_rescans_only_changed_blocks() {
        let mut doc = DocumentHighlighter::new(HighlightPalette::default());
        let text = "# One\nplain\n**two**";
        let segments = doc.segments(text, DocumentType::Markdown, None);
        assert_eq!(doc.last_rescanned(), 3);
        assert_eq!(segments.first().map(|s| s.range.start), Some(0));
        assert_eq!(segments.last().map(|s| s.range.end), Some(text.len()));

        let edited = "# One\nplain text\n**two**";
        doc.segments(edited, DocumentType::Markdown, None);
        assert_eq!(doc.last_rescanned(), 1);

        doc.segments(edited, DocumentType::ReStructuredText, None);
        assert_eq!(doc.last_rescanned(), 3);
    }

    #[test]
    fn test_document_highlighter_segments_are_contiguous() {
        let mut doc = DocumentHighlighter::new(HighlightPalette::default());
        let text = "a *b*\n\n`c` **d**\n";
        let segments = doc.segments(text, DocumentType::Markdown, None);
        let mut pos = 0;
        for s in &segments {
            assert_eq!(s.range.start, pos);
            pos = s.range.end;
        }
        assert_eq!(pos, text.len());
    }

    #[test]
    fn test_dictionary_change_invalidates_cache() {
        let mut doc = DocumentHighlighter::new(HighlightPalette::default());
        let mut dict = Dictionary::from_words(["known"]);
        doc.segments("known unknwn", DocumentType::Markdown, Some(&dict));
        doc.segments("known unknwn", DocumentType::Markdown, Some(&dict));
        assert_eq!(doc.last_rescanned(), 0);

        dict.add("unknwn").unwrap();
        let segments = doc.segments("known unknwn", DocumentType::Markdown, Some(&dict));
        assert_eq!(doc.last_rescanned(), 1);
        assert!(segments.iter().all(|s| s.format.underline.is_none()));
    }
}
