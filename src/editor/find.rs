//! Find bar
//!
//! Forward search from the cursor that wraps around to the start of the
//! document. Matching is literal; case-insensitive search goes through an
//! escaped `(?i)` regex so byte offsets always refer to the original text.

use std::ops::Range;

use eframe::egui::{self, Color32, Key, RichText, Vec2};
use log::debug;
use regex::RegexBuilder;

// ─────────────────────────────────────────────────────────────────────────────
// Find State
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct FindState {
    pub query: String,
    pub case_sensitive: bool,
    /// Last match, used to report "not found" in the bar
    pub last_match: Option<Range<usize>>,
    /// Set after a search that found nothing
    pub not_found: bool,
}

impl FindState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the next occurrence starting at byte `from`, wrapping to the
    /// document start when nothing follows.
    pub fn find_next(&mut self, text: &str, from: usize) -> Option<Range<usize>> {
        let found = find_wrapping(text, &self.query, from, self.case_sensitive);
        self.not_found = found.is_none() && !self.query.is_empty();
        self.last_match = found.clone();
        found
    }
}

/// Stateless search used by [`FindState::find_next`].
pub fn find_wrapping(
    text: &str,
    query: &str,
    from: usize,
    case_sensitive: bool,
) -> Option<Range<usize>> {
    if query.is_empty() || text.is_empty() {
        return None;
    }

    let re = match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(!case_sensitive)
        .build()
    {
        Ok(re) => re,
        Err(e) => {
            debug!("Find pattern '{}' rejected: {}", query, e);
            return None;
        }
    };

    let from = crate::string_utils::floor_char_boundary(text, from.min(text.len()));
    re.find_at(text, from)
        .or_else(|| re.find(text))
        .map(|m| m.range())
}

// ─────────────────────────────────────────────────────────────────────────────
// Find Bar
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct FindBarOutput {
    pub next_requested: bool,
    pub close_requested: bool,
}

/// Floating single-line find window anchored to the top of the editor.
pub struct FindBar {
    focus_search: bool,
}

impl Default for FindBar {
    fn default() -> Self {
        Self::new()
    }
}

impl FindBar {
    pub fn new() -> Self {
        Self { focus_search: true }
    }

    pub fn request_focus(&mut self) {
        self.focus_search = true;
    }

    pub fn show(&mut self, ctx: &egui::Context, state: &mut FindState, is_dark: bool) -> FindBarOutput {
        let mut output = FindBarOutput::default();

        let (panel_bg, border_color, muted_color) = if is_dark {
            (
                Color32::from_rgb(45, 45, 45),
                Color32::from_rgb(70, 70, 70),
                Color32::from_rgb(140, 140, 140),
            )
        } else {
            (
                Color32::from_rgb(250, 250, 250),
                Color32::from_rgb(200, 200, 200),
                Color32::from_rgb(120, 120, 120),
            )
        };

        let frame = egui::Frame::none()
            .fill(panel_bg)
            .stroke(egui::Stroke::new(1.0, border_color))
            .inner_margin(egui::Margin::symmetric(12.0, 8.0))
            .rounding(egui::Rounding::same(6.0));

        egui::Window::new("Find")
            .id(egui::Id::new("serum_find_bar"))
            .title_bar(false)
            .resizable(false)
            .collapsible(false)
            .anchor(egui::Align2::RIGHT_TOP, [-16.0, 48.0])
            .frame(frame)
            .show(ctx, |ui| {
                let (escape, enter) =
                    ui.input(|i| (i.key_pressed(Key::Escape), i.key_pressed(Key::Enter)));
                if escape {
                    output.close_requested = true;
                }

                ui.horizontal(|ui| {
                    let response = ui.add_sized(
                        Vec2::new(220.0, 22.0),
                        egui::TextEdit::singleline(&mut state.query)
                            .id(egui::Id::new("serum_find_input"))
                            .hint_text("Find..."),
                    );
                    if self.focus_search {
                        response.request_focus();
                        self.focus_search = false;
                    }
                    if response.changed() {
                        state.not_found = false;
                    }
                    if enter && response.lost_focus() {
                        output.next_requested = true;
                        response.request_focus();
                    }

                    ui.checkbox(&mut state.case_sensitive, "Aa")
                        .on_hover_text("Case Sensitive");

                    if ui.button("Next").clicked() {
                        output.next_requested = true;
                    }

                    if state.not_found {
                        ui.label(RichText::new("Not found").size(12.0).color(muted_color));
                    }

                    if ui
                        .add(egui::Button::new(RichText::new("×").color(muted_color)).frame(false))
                        .on_hover_text("Close (Escape)")
                        .clicked()
                    {
                        output.close_requested = true;
                    }
                });
            });

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_forward_from_cursor() {
        let text = "one two one two";
        assert_eq!(find_wrapping(text, "two", 0, true), Some(4..7));
        assert_eq!(find_wrapping(text, "two", 5, true), Some(12..15));
    }

    #[test]
    fn test_find_wraps_to_start() {
        let text = "alpha beta";
        assert_eq!(find_wrapping(text, "alpha", 3, true), Some(0..5));
    }

    #[test]
    fn test_find_case_sensitivity() {
        let text = "Hello hello";
        assert_eq!(find_wrapping(text, "HELLO", 0, true), None);
        assert_eq!(find_wrapping(text, "HELLO", 1, false), Some(6..11));
    }

    #[test]
    fn test_find_treats_query_literally() {
        let text = "a.b axb";
        assert_eq!(find_wrapping(text, "a.b", 1, true), Some(0..3));
        assert_eq!(find_wrapping(text, "(", 0, true), None);
    }

    #[test]
    fn test_find_multibyte_offsets() {
        // lowercasing would change the byte length of 'İ'
        let text = "İstanbul straße";
        let found = find_wrapping(text, "STRASSE", 0, false);
        assert_eq!(found, None);
        let found = find_wrapping(text, "straße", 0, false).unwrap();
        assert_eq!(&text[found], "straße");
    }

    #[test]
    fn test_find_state_tracks_not_found() {
        let mut state = FindState::new();
        state.query = "zzz".to_string();
        assert!(state.find_next("abc", 0).is_none());
        assert!(state.not_found);

        state.query = "b".to_string();
        assert_eq!(state.find_next("abc", 0), Some(1..2));
        assert!(!state.not_found);
    }

    #[test]
    fn test_find_empty_query() {
        let mut state = FindState::new();
        assert!(state.find_next("abc", 0).is_none());
        assert!(!state.not_found);
    }
}
