//! Read-only egui view of rendered preview blocks.

use eframe::egui::text::LayoutJob;
use eframe::egui::{self, Color32, FontId, RichText, ScrollArea, Stroke, TextFormat, Ui};

use super::render::{InlineSpan, PreviewBlock};
use crate::theme::ThemeColors;

const INDENT_PER_LEVEL: f32 = 18.0;

/// Heading size relative to body text, H1..H6.
fn heading_scale(level: u8) -> f32 {
    match level {
        1 => 1.9,
        2 => 1.55,
        3 => 1.3,
        4 => 1.15,
        5 => 1.05,
        _ => 1.0,
    }
}

/// Draw `blocks` in a vertical scroll area.
pub fn show_preview(ui: &mut Ui, blocks: &[PreviewBlock], colors: &ThemeColors, font_size: f32) {
    ScrollArea::vertical()
        .id_source("serum_preview_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.add_space(8.0);
            if blocks.is_empty() {
                ui.label(RichText::new("Nothing to preview").color(colors.text.muted).italics());
            }
            for block in blocks {
                show_block(ui, block, colors, font_size);
                ui.add_space(font_size * 0.5);
            }
        });
}

fn show_block(ui: &mut Ui, block: &PreviewBlock, colors: &ThemeColors, font_size: f32) {
    match block {
        PreviewBlock::Heading { level, spans } => {
            let size = font_size * heading_scale(*level);
            let job = spans_job(spans, colors, size, Some(colors.text.heading), ui.available_width());
            ui.label(job);
            if *level <= 2 {
                ui.add(egui::Separator::default().spacing(2.0));
            }
        }
        PreviewBlock::Paragraph { spans, quote_depth } => {
            quoted(ui, *quote_depth, colors, |ui| {
                let color = (*quote_depth > 0).then_some(colors.markup.quote_text);
                ui.label(spans_job(spans, colors, font_size, color, ui.available_width()));
            });
        }
        PreviewBlock::ListItem {
            depth,
            marker,
            checked,
            spans,
            quote_depth,
        } => {
            quoted(ui, *quote_depth, colors, |ui| {
                ui.horizontal_top(|ui| {
                    ui.add_space(INDENT_PER_LEVEL * (*depth as f32 + 1.0));
                    let marker = match checked {
                        Some(true) => "☑".to_string(),
                        Some(false) => "☐".to_string(),
                        None => marker.clone(),
                    };
                    ui.label(RichText::new(marker).size(font_size).color(colors.text.muted));
                    let width = ui.available_width();
                    ui.label(spans_job(spans, colors, font_size, None, width));
                });
            });
        }
        PreviewBlock::Code { info, literal } => {
            egui::Frame::none()
                .fill(colors.base.code_background)
                .stroke(Stroke::new(1.0, colors.base.border_subtle))
                .rounding(egui::Rounding::same(4.0))
                .inner_margin(egui::Margin::same(8.0))
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    if !info.is_empty() {
                        ui.label(RichText::new(info).small().color(colors.text.muted));
                    }
                    ui.label(
                        RichText::new(literal)
                            .font(FontId::monospace(font_size * 0.9))
                            .color(colors.markup.code_text),
                    );
                });
        }
        PreviewBlock::Table { header, rows } => {
            egui::Grid::new(ui.next_auto_id())
                .striped(true)
                .spacing([16.0, 4.0])
                .show(ui, |ui| {
                    for cell in header {
                        ui.label(RichText::new(cell).strong().size(font_size));
                    }
                    ui.end_row();
                    for row in rows {
                        for cell in row {
                            ui.label(RichText::new(cell).size(font_size));
                        }
                        ui.end_row();
                    }
                });
        }
        PreviewBlock::Html(html) => {
            ui.label(
                RichText::new(html.trim_end())
                    .font(FontId::monospace(font_size * 0.85))
                    .color(colors.text.muted),
            );
        }
        PreviewBlock::Footnote { name, spans } => {
            ui.horizontal_top(|ui| {
                ui.label(RichText::new(format!("[{}]", name)).small().color(colors.text.muted));
                let width = ui.available_width();
                ui.label(spans_job(spans, colors, font_size * 0.9, None, width));
            });
        }
        PreviewBlock::Rule => {
            ui.add(egui::Separator::default().spacing(font_size));
        }
    }
}

/// Indent and draw a bar per quote level.
fn quoted(ui: &mut Ui, depth: usize, colors: &ThemeColors, add_contents: impl FnOnce(&mut Ui)) {
    if depth == 0 {
        add_contents(ui);
        return;
    }
    ui.horizontal_top(|ui| {
        for _ in 0..depth {
            let (rect, _) = ui.allocate_exact_size(
                egui::vec2(INDENT_PER_LEVEL, ui.spacing().interact_size.y),
                egui::Sense::hover(),
            );
            ui.painter().vline(
                rect.left() + 2.0,
                rect.y_range(),
                Stroke::new(3.0, colors.markup.quote_border),
            );
        }
        ui.vertical(add_contents);
    });
}

fn spans_job(
    spans: &[InlineSpan],
    colors: &ThemeColors,
    size: f32,
    color: Option<Color32>,
    wrap_width: f32,
) -> LayoutJob {
    let mut job = LayoutJob::default();
    let base = color.unwrap_or(colors.text.primary);

    for span in spans {
        let style = &span.style;
        let font_id = if style.code {
            FontId::monospace(size * 0.92)
        } else {
            FontId::proportional(size)
        };
        let color = if style.link.is_some() {
            colors.text.link
        } else if style.code {
            colors.markup.code_text
        } else if style.strong && color.is_none() {
            colors.text.heading
        } else {
            base
        };
        let format = TextFormat {
            font_id,
            color,
            italics: style.emphasis,
            background: if style.code {
                colors.base.code_background
            } else {
                Color32::TRANSPARENT
            },
            underline: if style.link.is_some() {
                Stroke::new(1.0, colors.text.link)
            } else {
                Stroke::NONE
            },
            strikethrough: if style.strikethrough {
                Stroke::new(1.0, base)
            } else {
                Stroke::NONE
            },
            ..Default::default()
        };
        job.append(&span.text, 0.0, format);
    }
    job.wrap.max_width = wrap_width;
    job
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::render::InlineStyle;

    #[test]
    fn test_spans_job_styles() {
        let colors = ThemeColors::light();
        let spans = vec![
            InlineSpan {
                text: "plain ".to_string(),
                style: InlineStyle::default(),
            },
            InlineSpan {
                text: "link".to_string(),
                style: InlineStyle {
                    link: Some("https://x.org".to_string()),
                    ..Default::default()
                },
            },
            InlineSpan {
                text: " gone".to_string(),
                style: InlineStyle {
                    strikethrough: true,
                    emphasis: true,
                    ..Default::default()
                },
            },
        ];
        let job = spans_job(&spans, &colors, 14.0, None, 400.0);
        assert_eq!(job.text, "plain link gone");
        assert_eq!(job.sections.len(), 3);
        assert_eq!(job.sections[1].format.color, colors.text.link);
        assert_ne!(job.sections[1].format.underline, Stroke::NONE);
        assert!(job.sections[2].format.italics);
        assert_ne!(job.sections[2].format.strikethrough, Stroke::NONE);
        assert_eq!(job.wrap.max_width, 400.0);
    }

    #[test]
    fn test_heading_scale_decreases() {
        for level in 1..6 {
            assert!(heading_scale(level) > heading_scale(level + 1));
        }
    }
}
