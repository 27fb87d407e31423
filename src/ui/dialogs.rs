//! Modal dialogs: the unsaved-changes confirmation and the error message box.

use eframe::egui::{self, Color32, Key, RichText};

use crate::theme::ThemeColors;

/// An open modal dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageDialog {
    /// Continue / Cancel question
    Confirm { message: String },
    /// Single OK button
    Error { title: String, message: String },
}

/// What the user did with the dialog this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogResult {
    /// Still open
    None,
    Confirmed,
    Cancelled,
    /// The error box was acknowledged
    Dismissed,
}

impl MessageDialog {
    pub fn confirm(message: impl Into<String>) -> Self {
        Self::Confirm {
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Show the dialog and return the result.
    pub fn show(&self, ctx: &egui::Context, colors: &ThemeColors) -> DialogResult {
        let escape = ctx.input(|i| i.key_pressed(Key::Escape));
        let enter = ctx.input(|i| i.key_pressed(Key::Enter));

        match self {
            MessageDialog::Confirm { message } => {
                if escape {
                    return DialogResult::Cancelled;
                }
                if enter {
                    return DialogResult::Confirmed;
                }
                show_confirm_dialog(ctx, message, colors)
            }
            MessageDialog::Error { title, message } => {
                if escape || enter {
                    return DialogResult::Dismissed;
                }
                show_error_dialog(ctx, title, message, colors)
            }
        }
    }
}

fn dialog_frame(ctx: &egui::Context, colors: &ThemeColors) -> egui::Frame {
    egui::Frame::window(&ctx.style())
        .fill(colors.base.surface)
        .stroke(egui::Stroke::new(1.0, colors.base.border))
        .rounding(8.0)
}

fn show_confirm_dialog(ctx: &egui::Context, message: &str, colors: &ThemeColors) -> DialogResult {
    let mut result = DialogResult::None;

    egui::Window::new("Unsaved Changes")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .order(egui::Order::Foreground)
        .frame(dialog_frame(ctx, colors))
        .show(ctx, |ui| {
            ui.set_min_width(340.0);
            ui.add_space(8.0);
            ui.label(RichText::new(message).color(colors.text.primary));
            ui.add_space(12.0);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let continue_button =
                    egui::Button::new(RichText::new("Continue").color(Color32::WHITE))
                        .fill(colors.ui.warning);
                if ui.add(continue_button).clicked() {
                    result = DialogResult::Confirmed;
                }
                ui.add_space(8.0);
                if ui.button("Cancel").clicked() {
                    result = DialogResult::Cancelled;
                }
            });
            ui.add_space(4.0);
        });

    result
}

fn show_error_dialog(
    ctx: &egui::Context,
    title: &str,
    message: &str,
    colors: &ThemeColors,
) -> DialogResult {
    let mut result = DialogResult::None;

    egui::Window::new(title)
        .id(egui::Id::new("serum_error_dialog"))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .order(egui::Order::Foreground)
        .frame(dialog_frame(ctx, colors))
        .show(ctx, |ui| {
            ui.set_min_width(340.0);
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.label(RichText::new("⚠").size(22.0).color(colors.ui.error));
                ui.add_space(6.0);
                ui.label(RichText::new(message).color(colors.text.primary));
            });
            ui.add_space(12.0);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("OK").clicked() {
                    result = DialogResult::Dismissed;
                }
            });
            ui.add_space(4.0);
        });

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert_eq!(
            MessageDialog::confirm("Discard?"),
            MessageDialog::Confirm {
                message: "Discard?".to_string()
            }
        );
        assert_eq!(
            MessageDialog::error("Save failed", "disk full"),
            MessageDialog::Error {
                title: "Save failed".to_string(),
                message: "disk full".to_string()
            }
        );
    }

    #[test]
    fn test_open_dialog_reports_none_without_input() {
        let ctx = egui::Context::default();
        let dialog = MessageDialog::confirm("Discard?");
        let mut result = DialogResult::Confirmed;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            result = dialog.show(ctx, &ThemeColors::dark());
        });
        assert_eq!(result, DialogResult::None);
    }
}
