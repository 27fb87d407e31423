//! Text editor widget
//!
//! Wraps egui's `TextEdit` with:
//! - markup highlighting through a [`DocumentHighlighter`] layouter
//! - spell-check underlines and a suggestions context menu
//! - `_` / `*` typed over a selection surrounding it
//! - programmatic selection (used after formatting commands)

use std::ops::Range;
use std::sync::Arc;

use eframe::egui::text::{CCursor, CCursorRange, LayoutJob};
use eframe::egui::{self, Color32, FontId, RichText, ScrollArea, Stroke, TextEdit, TextFormat, Ui};
use log::debug;

use super::formatting::{is_surround_key, surround_selection};
use crate::document::DocumentType;
use crate::highlight::{CharFormat, DocumentHighlighter, Segment, Underline, Weight};
use crate::spellcheck::Dictionary;
use crate::string_utils::{byte_to_char, char_to_byte};

/// Result of showing the editor widget.
#[derive(Debug, Clone, Default)]
pub struct EditorOutput {
    /// Whether the buffer was modified this frame.
    pub changed: bool,
    /// Current selection in bytes, `None` when the editor never had a cursor.
    pub selection: Option<(usize, usize)>,
    /// Word the user asked to add to the personal dictionary.
    pub add_to_dictionary: Option<String>,
}

/// Editor over a plain `String` buffer.
///
/// ```ignore
/// let output = EditorWidget::new(session.text_mut(), &mut highlighter, doc_type)
///     .dictionary(dictionary.as_ref())
///     .font_size(settings.font_size)
///     .select(pending_selection.take())
///     .show(ui);
/// ```
pub struct EditorWidget<'a> {
    text: &'a mut String,
    highlighter: &'a mut DocumentHighlighter,
    doc_type: DocumentType,
    dictionary: Option<&'a Dictionary>,
    font_size: f32,
    id: Option<egui::Id>,
    select: Option<(usize, usize)>,
    request_focus: bool,
    interactive: bool,
}

impl<'a> EditorWidget<'a> {
    pub fn new(
        text: &'a mut String,
        highlighter: &'a mut DocumentHighlighter,
        doc_type: DocumentType,
    ) -> Self {
        Self {
            text,
            highlighter,
            doc_type,
            dictionary: None,
            font_size: 14.0,
            id: None,
            select: None,
            request_focus: false,
            interactive: true,
        }
    }

    /// Dictionary for spell marks; `None` turns spell-checking off.
    #[must_use]
    pub fn dictionary(mut self, dictionary: Option<&'a Dictionary>) -> Self {
        self.dictionary = dictionary;
        self
    }

    #[must_use]
    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    #[must_use]
    pub fn id(mut self, id: egui::Id) -> Self {
        self.id = Some(id);
        self
    }

    /// Byte selection to apply before drawing.
    #[must_use]
    pub fn select(mut self, selection: Option<(usize, usize)>) -> Self {
        self.select = selection;
        self
    }

    #[must_use]
    pub fn request_focus(mut self, focus: bool) -> Self {
        self.request_focus = focus;
        self
    }

    /// A non-interactive editor is drawn as usual but gives up keyboard
    /// focus and ignores input, e.g. while a modal dialog is open.
    #[must_use]
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn show(self, ui: &mut Ui) -> EditorOutput {
        let EditorWidget {
            text,
            highlighter,
            doc_type,
            dictionary,
            font_size,
            id,
            select,
            request_focus,
            interactive,
        } = self;

        let id = id.unwrap_or_else(|| ui.id().with("serum_editor"));
        let ctx = ui.ctx().clone();
        let mut changed = false;

        if !interactive {
            ui.memory_mut(|m| m.surrender_focus(id));
        }

        // Surround keys replace egui's own handling of the typed character
        let mut selection_to_apply = select;
        if ui.memory(|m| m.has_focus(id)) {
            if let Some(range) = TextEdit::load_state(&ctx, id).and_then(|s| s.cursor.char_range())
            {
                let (a, b) = (range.primary.index, range.secondary.index);
                if a != b {
                    if let Some(key) = ui.input(typed_surround_key) {
                        let selection = (char_to_byte(text, a), char_to_byte(text, b));
                        if let Some(result) = surround_selection(text, selection, key) {
                            ui.input_mut(|i| {
                                i.events.retain(|e| !matches!(e, egui::Event::Text(_)))
                            });
                            *text = result.text;
                            selection_to_apply = Some(result.selection);
                            changed = true;
                        }
                    }
                }
            }
        }

        if let Some((start, end)) = selection_to_apply {
            let mut state = TextEdit::load_state(&ctx, id).unwrap_or_default();
            state.cursor.set_char_range(Some(CCursorRange::two(
                CCursor::new(byte_to_char(text, start)),
                CCursor::new(byte_to_char(text, end)),
            )));
            TextEdit::store_state(&ctx, id, state);
        }

        let mut layouter = move |ui: &Ui, buffer: &str, wrap_width: f32| -> Arc<egui::Galley> {
            let segments = highlighter.segments(buffer, doc_type, dictionary);
            let style = LayoutStyle {
                font_id: FontId::proportional(font_size),
                text_color: ui.visuals().text_color(),
                strong_color: ui.visuals().strong_text_color(),
            };
            let mut job = layout_job(buffer, &segments, &style);
            job.wrap.max_width = wrap_width;
            ui.fonts(|f| f.layout_job(job))
        };

        let text_output = ScrollArea::vertical()
            .id_source(id.with("scroll"))
            .auto_shrink([false, false])
            .show(ui, |ui| {
                TextEdit::multiline(text)
                    .id(id)
                    .frame(false)
                    .font(FontId::proportional(font_size))
                    .desired_width(f32::INFINITY)
                    .min_size(ui.available_size())
                    .lock_focus(true)
                    .interactive(interactive)
                    .layouter(&mut layouter)
                    .show(ui)
            })
            .inner;

        if request_focus && interactive {
            text_output.response.request_focus();
        }
        changed |= text_output.response.changed();

        // Remember which word was right-clicked for the context menu
        let target_key = id.with("spell_target");
        if text_output.response.secondary_clicked() {
            let target = text_output.response.interact_pointer_pos().and_then(|pos| {
                let cursor = text_output.galley.cursor_from_pos(pos - text_output.galley_pos);
                word_at(text, char_to_byte(text, cursor.ccursor.index))
            });
            ui.data_mut(|d| d.insert_temp(target_key, target));
        }

        let mut add_to_dictionary = None;
        let mut replacement: Option<(Range<usize>, String)> = None;
        if let Some(dictionary) = dictionary.filter(|_| interactive) {
            text_output.response.context_menu(|ui| {
                let stored = ui
                    .data(|d| d.get_temp::<Option<Range<usize>>>(target_key))
                    .flatten();
                let Some((range, word)) = menu_target(text, stored) else {
                    ui.label(RichText::new("No word under cursor").weak());
                    return;
                };
                if dictionary.check(&word) {
                    ui.label(RichText::new(format!("\"{}\" is spelled correctly", word)).weak());
                    return;
                }

                let suggestions = dictionary.suggest(&word);
                if suggestions.is_empty() {
                    ui.label(RichText::new("No suggestions").weak());
                }
                for suggestion in suggestions {
                    if ui.button(RichText::new(&suggestion).strong()).clicked() {
                        replacement = Some((range.clone(), suggestion));
                        ui.close_menu();
                    }
                }
                ui.separator();
                if ui.button("Add to dictionary").clicked() {
                    add_to_dictionary = Some(word);
                    ui.close_menu();
                }
            });
        }

        if let Some((range, word)) = replacement {
            debug!("Replacing misspelled word at {:?} with '{}'", range, word);
            text.replace_range(range, &word);
            changed = true;
        }

        let selection = text_output.cursor_range.map(|range| {
            let (a, b) = (range.primary.ccursor.index, range.secondary.ccursor.index);
            let (a, b) = if a <= b { (a, b) } else { (b, a) };
            (char_to_byte(text, a), char_to_byte(text, b))
        });

        EditorOutput {
            changed,
            selection: selection.or(selection_to_apply),
            add_to_dictionary,
        }
    }
}

fn typed_surround_key(input: &egui::InputState) -> Option<char> {
    input.events.iter().find_map(|event| match event {
        egui::Event::Text(t) => {
            let mut chars = t.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if is_surround_key(c) => Some(c),
                _ => None,
            }
        }
        _ => None,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Layout
// ─────────────────────────────────────────────────────────────────────────────

/// Colors and font the layout job is built with.
#[derive(Debug, Clone)]
pub struct LayoutStyle {
    pub font_id: FontId,
    pub text_color: Color32,
    /// Used for bold text without an explicit color
    pub strong_color: Color32,
}

/// Turn highlight segments into an egui layout job covering all of `text`.
pub fn layout_job(text: &str, segments: &[Segment], style: &LayoutStyle) -> LayoutJob {
    let mut job = LayoutJob::default();
    let plain = text_format(&CharFormat::default(), style);
    let mut covered = 0;

    for segment in segments {
        let Range { start, end } = segment.range;
        if start < covered || end > text.len() || start >= end {
            continue;
        }
        if start > covered {
            job.append(&text[covered..start], 0.0, plain.clone());
        }
        job.append(&text[start..end], 0.0, text_format(&segment.format, style));
        covered = end;
    }
    if covered < text.len() {
        job.append(&text[covered..], 0.0, plain);
    }
    job
}

fn text_format(format: &CharFormat, style: &LayoutStyle) -> TextFormat {
    let mut font_id = style.font_id.clone();
    let mut color = format.foreground.unwrap_or(style.text_color);

    // egui has no synthetic bold, so weight shows as the strong color
    match format.weight {
        Some(Weight::Bold) if format.foreground.is_none() => color = style.strong_color,
        Some(Weight::Black) => {
            if format.foreground.is_none() {
                color = style.strong_color;
            }
            font_id.size *= 1.1;
        }
        _ => {}
    }

    let underline = match format.underline {
        Some(Underline::Single) => Stroke::new(1.0, format.underline_color.unwrap_or(color)),
        Some(Underline::SpellCheck) => {
            Stroke::new(1.5, format.underline_color.unwrap_or(Color32::RED))
        }
        _ => Stroke::NONE,
    };

    TextFormat {
        font_id,
        color,
        italics: format.is_italic(),
        underline,
        ..Default::default()
    }
}

/// Byte range of the spell-checkable word around `byte`, if any.
///
/// Mirrors the spell pass: two or more ASCII letters bounded by non-word
/// characters.
pub fn word_at(text: &str, byte: usize) -> Option<Range<usize>> {
    if byte > text.len() || !text.is_char_boundary(byte) {
        return None;
    }
    let is_word = |c: char| c.is_alphanumeric() || c == '_';

    let start = text[..byte]
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_word(*c))
        .last()
        .map_or(byte, |(i, _)| i);
    let end = text[byte..]
        .char_indices()
        .take_while(|(_, c)| is_word(*c))
        .last()
        .map_or(byte, |(i, c)| byte + i + c.len_utf8());

    let word = &text[start..end];
    if word.len() >= 2 && word.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(start..end)
    } else {
        None
    }
}

/// The remembered context-menu word, if its range still slices `text`.
///
/// The buffer may have changed since the right click, leaving the range
/// past the end or inside a multi-byte character.
fn menu_target(text: &str, stored: Option<Range<usize>>) -> Option<(Range<usize>, String)> {
    let range = stored?;
    let word = text.get(range.clone())?;
    Some((range, word.to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::HighlightPalette;

    fn style() -> LayoutStyle {
        LayoutStyle {
            font_id: FontId::proportional(14.0),
            text_color: Color32::GRAY,
            strong_color: Color32::WHITE,
        }
    }

    #[test]
    fn test_layout_job_fills_gaps() {
        let text = "*hi* there";
        let segments = vec![Segment {
            range: 0..4,
            format: CharFormat {
                italic: Some(true),
                ..Default::default()
            },
        }];
        let job = layout_job(text, &segments, &style());
        assert_eq!(job.text, text);
        assert_eq!(job.sections.len(), 2);
        assert!(job.sections[0].format.italics);
        assert_eq!(job.sections[1].byte_range, 4..10);
        assert!(!job.sections[1].format.italics);
    }

    #[test]
    fn test_layout_job_bold_and_spell_underline() {
        let text = "ab cd";
        let segments = vec![
            Segment {
                range: 0..2,
                format: CharFormat {
                    weight: Some(Weight::Bold),
                    ..Default::default()
                },
            },
            Segment {
                range: 3..5,
                format: CharFormat {
                    underline: Some(Underline::SpellCheck),
                    underline_color: Some(Color32::RED),
                    ..Default::default()
                },
            },
        ];
        let job = layout_job(text, &segments, &style());
        assert_eq!(job.sections.len(), 3);
        assert_eq!(job.sections[0].format.color, Color32::WHITE);
        assert_eq!(job.sections[2].format.underline.color, Color32::RED);
        assert_eq!(job.sections[1].format.underline, Stroke::NONE);
    }

    #[test]
    fn test_layout_job_from_highlighter_covers_text() {
        let text = "# Title\n\nSome **bold** and `code`\n";
        let mut highlighter = DocumentHighlighter::new(HighlightPalette::default());
        let segments = highlighter.segments(text, DocumentType::Markdown, None);
        let job = layout_job(text, &segments, &style());
        assert_eq!(job.text, text);

        let mut end = 0;
        for section in &job.sections {
            assert_eq!(section.byte_range.start, end);
            end = section.byte_range.end;
        }
        assert_eq!(end, text.len());
    }

    #[test]
    fn test_layout_job_skips_bad_segments() {
        let segments = vec![Segment {
            range: 2..50,
            format: CharFormat::default(),
        }];
        let job = layout_job("abc", &segments, &style());
        assert_eq!(job.text, "abc");
    }

    #[test]
    fn test_word_at() {
        let text = "helo wrld, x 42abc";
        assert_eq!(word_at(text, 0), Some(0..4));
        assert_eq!(word_at(text, 2), Some(0..4));
        assert_eq!(word_at(text, 4), Some(0..4));
        assert_eq!(word_at(text, 7), Some(5..9));
        // single letter and mixed digits are not checked
        assert_eq!(word_at(text, 11), None);
        assert_eq!(word_at(text, 16), None);
    }

    #[test]
    fn test_word_at_non_ascii_neighbour() {
        let text = "café ok";
        assert_eq!(word_at(text, 1), None);
        assert_eq!(word_at(text, 7), Some(6..8));
    }

    #[test]
    fn test_menu_target_after_buffer_changed() {
        assert_eq!(menu_target("helo there", Some(0..4)), Some((0..4, "helo".to_string())));
        // the word was replaced by two three-byte characters
        assert_eq!(menu_target("日日", Some(0..4)), None);
        assert_eq!(menu_target("日日", Some(3..5)), None);
        assert_eq!(menu_target("ab", Some(0..4)), None);
        assert_eq!(menu_target("ab", None), None);
    }

    fn show_editor(
        ctx: &egui::Context,
        input: egui::RawInput,
        text: &mut String,
        highlighter: &mut DocumentHighlighter,
        interactive: bool,
    ) -> EditorOutput {
        let mut output = EditorOutput::default();
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                output = EditorWidget::new(text, highlighter, DocumentType::Markdown)
                    .id(egui::Id::new("editor_under_test"))
                    .request_focus(true)
                    .interactive(interactive)
                    .show(ui);
            });
        });
        output
    }

    #[test]
    fn test_non_interactive_editor_ignores_keys() {
        let ctx = egui::Context::default();
        let id = egui::Id::new("editor_under_test");
        let mut highlighter = DocumentHighlighter::new(HighlightPalette::default());
        let mut text = "draft".to_string();

        show_editor(&ctx, egui::RawInput::default(), &mut text, &mut highlighter, false);
        assert!(!ctx.memory(|m| m.has_focus(id)));

        let input = egui::RawInput {
            events: vec![
                egui::Event::Key {
                    key: egui::Key::Enter,
                    physical_key: None,
                    pressed: true,
                    repeat: false,
                    modifiers: egui::Modifiers::NONE,
                },
                egui::Event::Text("x".to_string()),
            ],
            ..Default::default()
        };
        let output = show_editor(&ctx, input, &mut text, &mut highlighter, false);
        assert!(!output.changed);
        assert_eq!(text, "draft");
        assert!(!ctx.memory(|m| m.has_focus(id)));
    }

    #[test]
    fn test_focused_editor_takes_edit_menu_paste() {
        let ctx = egui::Context::default();
        let id = egui::Id::new("editor_under_test");
        let mut highlighter = DocumentHighlighter::new(HighlightPalette::default());
        let mut text = "draft".to_string();

        show_editor(&ctx, egui::RawInput::default(), &mut text, &mut highlighter, true);
        assert!(ctx.memory(|m| m.has_focus(id)));

        let paste = crate::editor::EditCommand::Paste
            .to_event(Some(" pasted".to_string()))
            .unwrap();
        let input = egui::RawInput {
            events: vec![paste],
            ..Default::default()
        };
        let output = show_editor(&ctx, input, &mut text, &mut highlighter, true);
        assert!(output.changed);
        assert!(text.contains("pasted"));
        assert!(text.contains("draft"));
    }
}
