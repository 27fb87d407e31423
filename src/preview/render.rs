//! Markdown rendering with comrak
//!
//! Two outputs from the same options: an HTML string (preview export and
//! HTML/PDF export) and a flat list of [`PreviewBlock`]s that the egui
//! preview panel draws without an HTML engine.

use comrak::{
    markdown_to_html,
    nodes::{AstNode, ListType, NodeValue},
    parse_document, Arena, Options,
};

// ─────────────────────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────────────────────

/// GitHub flavored extensions enabled for preview and export.
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
    pub tables: bool,
    pub strikethrough: bool,
    pub autolink: bool,
    pub tasklist: bool,
    pub footnotes: bool,
    /// Pass raw HTML through instead of escaping it
    pub allow_raw_html: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            autolink: true,
            tasklist: true,
            footnotes: true,
            allow_raw_html: true,
        }
    }
}

impl MarkdownOptions {
    fn to_comrak_options(&self) -> Options {
        let mut options = Options::default();
        options.extension.table = self.tables;
        options.extension.strikethrough = self.strikethrough;
        options.extension.autolink = self.autolink;
        options.extension.tasklist = self.tasklist;
        options.extension.footnotes = self.footnotes;
        options.extension.header_ids = Some(String::new());
        options.render.unsafe_ = self.allow_raw_html;
        options
    }
}

/// Markdown to an HTML fragment (no `<html>`/`<body>` wrapper).
pub fn render_html(markdown: &str) -> String {
    render_html_with_options(markdown, &MarkdownOptions::default())
}

pub fn render_html_with_options(markdown: &str, options: &MarkdownOptions) -> String {
    markdown_to_html(markdown, &options.to_comrak_options())
}

// ─────────────────────────────────────────────────────────────────────────────
// Preview Blocks
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub strong: bool,
    pub emphasis: bool,
    pub strikethrough: bool,
    pub code: bool,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    pub text: String,
    pub style: InlineStyle,
}

/// One read-only block of the rendered preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewBlock {
    Heading {
        level: u8,
        spans: Vec<InlineSpan>,
    },
    Paragraph {
        spans: Vec<InlineSpan>,
        quote_depth: usize,
    },
    ListItem {
        depth: usize,
        /// "•" or "3."
        marker: String,
        checked: Option<bool>,
        spans: Vec<InlineSpan>,
        quote_depth: usize,
    },
    Code {
        info: String,
        literal: String,
    },
    Table {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Html(String),
    Footnote {
        name: String,
        spans: Vec<InlineSpan>,
    },
    Rule,
}

/// Parse markdown into preview blocks.
pub fn render_blocks(markdown: &str) -> Vec<PreviewBlock> {
    let arena = Arena::new();
    let options = MarkdownOptions::default().to_comrak_options();
    let root = parse_document(&arena, markdown, &options);

    let mut blocks = Vec::new();
    for child in root.children() {
        collect_block(child, 0, 0, &mut blocks);
    }
    blocks
}

fn collect_block<'a>(
    node: &'a AstNode<'a>,
    quote_depth: usize,
    list_depth: usize,
    out: &mut Vec<PreviewBlock>,
) {
    let value = node.data.borrow().value.clone();
    match value {
        NodeValue::Heading(heading) => out.push(PreviewBlock::Heading {
            level: heading.level,
            spans: inline_spans(node),
        }),
        NodeValue::Paragraph => out.push(PreviewBlock::Paragraph {
            spans: inline_spans(node),
            quote_depth,
        }),
        NodeValue::BlockQuote => {
            for child in node.children() {
                collect_block(child, quote_depth + 1, list_depth, out);
            }
        }
        NodeValue::List(list) => {
            for (index, item) in node.children().enumerate() {
                let marker = match list.list_type {
                    ListType::Bullet => "•".to_string(),
                    ListType::Ordered => format!("{}.", list.start + index),
                };
                collect_list_item(item, marker, quote_depth, list_depth, out);
            }
        }
        NodeValue::CodeBlock(code) => out.push(PreviewBlock::Code {
            info: code.info.clone(),
            literal: code.literal.trim_end_matches('\n').to_string(),
        }),
        NodeValue::ThematicBreak => out.push(PreviewBlock::Rule),
        NodeValue::HtmlBlock(html) => out.push(PreviewBlock::Html(html.literal.clone())),
        NodeValue::Table(_) => out.push(table_block(node)),
        NodeValue::FootnoteDefinition(def) => {
            let spans = node
                .children()
                .flat_map(|child| inline_spans(child))
                .collect();
            out.push(PreviewBlock::Footnote {
                name: def.name.clone(),
                spans,
            });
        }
        _ => {
            for child in node.children() {
                collect_block(child, quote_depth, list_depth, out);
            }
        }
    }
}

fn collect_list_item<'a>(
    item: &'a AstNode<'a>,
    marker: String,
    quote_depth: usize,
    list_depth: usize,
    out: &mut Vec<PreviewBlock>,
) {
    let checked = match &item.data.borrow().value {
        NodeValue::TaskItem(mark) => Some(mark.is_some()),
        _ => None,
    };

    let mut children = item.children().peekable();
    let spans = match children.peek() {
        Some(first) if matches!(first.data.borrow().value, NodeValue::Paragraph) => {
            let first = *first;
            children.next();
            inline_spans(first)
        }
        _ => Vec::new(),
    };
    out.push(PreviewBlock::ListItem {
        depth: list_depth,
        marker,
        checked,
        spans,
        quote_depth,
    });

    for child in children {
        collect_block(child, quote_depth, list_depth + 1, out);
    }
}

fn table_block<'a>(table: &'a AstNode<'a>) -> PreviewBlock {
    let mut header = Vec::new();
    let mut rows = Vec::new();
    for row in table.children() {
        let is_header = matches!(row.data.borrow().value, NodeValue::TableRow(true));
        let cells: Vec<String> = row.children().map(|cell| plain_text(&inline_spans(cell))).collect();
        if is_header {
            header = cells;
        } else {
            rows.push(cells);
        }
    }
    PreviewBlock::Table { header, rows }
}

/// Inline content of `node` as styled spans, adjacent equal styles merged.
pub fn inline_spans<'a>(node: &'a AstNode<'a>) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    for child in node.children() {
        collect_inline(child, &InlineStyle::default(), &mut spans);
    }
    spans
}

fn push_span(spans: &mut Vec<InlineSpan>, text: &str, style: &InlineStyle) {
    if text.is_empty() {
        return;
    }
    if let Some(last) = spans.last_mut() {
        if last.style == *style {
            last.text.push_str(text);
            return;
        }
    }
    spans.push(InlineSpan {
        text: text.to_string(),
        style: style.clone(),
    });
}

fn collect_inline<'a>(node: &'a AstNode<'a>, style: &InlineStyle, spans: &mut Vec<InlineSpan>) {
    let value = node.data.borrow().value.clone();
    let mut nested = style.clone();
    match value {
        NodeValue::Text(text) => return push_span(spans, &text, style),
        NodeValue::Code(code) => {
            nested.code = true;
            return push_span(spans, &code.literal, &nested);
        }
        NodeValue::SoftBreak => return push_span(spans, " ", style),
        NodeValue::LineBreak => return push_span(spans, "\n", style),
        NodeValue::HtmlInline(html) => return push_span(spans, &html, style),
        NodeValue::FootnoteReference(reference) => {
            return push_span(spans, &format!("[{}]", reference.name), style)
        }
        NodeValue::Emph => nested.emphasis = true,
        NodeValue::Strong => nested.strong = true,
        NodeValue::Strikethrough => nested.strikethrough = true,
        NodeValue::Link(link) => nested.link = Some(link.url.clone()),
        NodeValue::Image(image) => {
            nested.link = Some(image.url.clone());
            push_span(spans, "[image: ", &nested);
            for child in node.children() {
                collect_inline(child, &nested, spans);
            }
            return push_span(spans, "]", &nested);
        }
        _ => {}
    }
    for child in node.children() {
        collect_inline(child, &nested, spans);
    }
}

/// Concatenated text of spans, styles dropped.
pub fn plain_text(spans: &[InlineSpan]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
