//! Preferences window
//!
//! Modal window editing `Settings` in place. Changes apply live; the app
//! persists them when the window reports a change.

use std::path::PathBuf;

use crate::config::{Settings, Theme};
use crate::export::list_templates;
use eframe::egui::{self, Color32, RichText, Ui};

/// Preferences sections for navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsSection {
    #[default]
    Appearance,
    Editor,
    Export,
}

impl SettingsSection {
    pub fn label(&self) -> &'static str {
        match self {
            SettingsSection::Appearance => "Appearance",
            SettingsSection::Editor => "Editor",
            SettingsSection::Export => "Export",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SettingsSection::Appearance => "🎨",
            SettingsSection::Editor => "📝",
            SettingsSection::Export => "📤",
        }
    }

    fn all() -> [SettingsSection; 3] {
        [
            SettingsSection::Appearance,
            SettingsSection::Editor,
            SettingsSection::Export,
        ]
    }
}

/// Result of showing the preferences window.
#[derive(Debug, Clone, Default)]
pub struct SettingsPanelOutput {
    /// Whether settings were modified.
    pub changed: bool,
    /// Spell-check or dictionary paths changed; the dictionary must reload.
    pub dictionary_changed: bool,
    pub close_requested: bool,
    pub reset_requested: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SettingsPanel {
    active_section: SettingsSection,
    /// Template names found in `templates_dir`, refreshed on open
    template_names: Vec<String>,
    templates_dir_input: String,
    system_dictionary_input: String,
    word_list_input: String,
}

impl SettingsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reload text inputs and the template list from `settings`. Call when
    /// the window opens.
    pub fn prepare(&mut self, settings: &Settings) {
        self.templates_dir_input = settings.templates_dir.display().to_string();
        self.system_dictionary_input = settings
            .system_dictionary
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        self.word_list_input = settings.word_list_path.display().to_string();
        self.refresh_templates(settings);
    }

    fn refresh_templates(&mut self, settings: &Settings) {
        self.template_names = list_templates(&settings.templates_dir)
            .into_iter()
            .map(|t| t.name)
            .collect();
    }

    /// Show the preferences as a modal window.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        settings: &mut Settings,
        is_dark: bool,
    ) -> SettingsPanelOutput {
        let mut output = SettingsPanelOutput::default();

        let screen_rect = ctx.screen_rect();
        let overlay_color = if is_dark {
            Color32::from_rgba_unmultiplied(0, 0, 0, 170)
        } else {
            Color32::from_rgba_unmultiplied(0, 0, 0, 110)
        };

        egui::Area::new(egui::Id::new("preferences_overlay"))
            .order(egui::Order::Middle)
            .fixed_pos(screen_rect.min)
            .show(ctx, |ui| {
                let response = ui.allocate_response(screen_rect.size(), egui::Sense::click());
                ui.painter().rect_filled(screen_rect, 0.0, overlay_color);
                if response.clicked() {
                    output.close_requested = true;
                }
            });

        egui::Window::new("⚙ Preferences")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .min_width(520.0)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    output.close_requested = true;
                }

                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.set_min_width(120.0);
                        for section in SettingsSection::all() {
                            let text = format!("{} {}", section.icon(), section.label());
                            let btn = ui.add_sized(
                                [110.0, 32.0],
                                egui::SelectableLabel::new(
                                    self.active_section == section,
                                    RichText::new(text).size(14.0),
                                ),
                            );
                            if btn.clicked() {
                                self.active_section = section;
                            }
                        }

                        ui.add_space((ui.available_height() - 40.0).max(0.0));
                        if ui
                            .add_sized([110.0, 28.0], egui::Button::new("↺ Reset All"))
                            .on_hover_text("Reset all preferences to defaults")
                            .clicked()
                        {
                            output.reset_requested = true;
                        }
                    });

                    ui.separator();

                    ui.vertical(|ui| {
                        ui.set_min_width(360.0);
                        ui.set_min_height(300.0);
                        match self.active_section {
                            SettingsSection::Appearance => {
                                output.changed |= self.show_appearance_section(ui, settings);
                            }
                            SettingsSection::Editor => {
                                let (changed, dictionary) = self.show_editor_section(ui, settings);
                                output.changed |= changed;
                                output.dictionary_changed |= dictionary;
                            }
                            SettingsSection::Export => {
                                output.changed |= self.show_export_section(ui, settings);
                            }
                        }
                    });
                });

                ui.separator();
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Close").clicked() {
                        output.close_requested = true;
                    }
                    ui.label(RichText::new("Preferences are saved automatically").small().weak());
                });
            });

        output
    }

    fn show_appearance_section(&mut self, ui: &mut Ui, settings: &mut Settings) -> bool {
        let mut changed = false;

        ui.heading("Appearance");
        ui.add_space(8.0);

        ui.label(RichText::new("Theme").strong());
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            for theme in Theme::all() {
                changed |= ui
                    .selectable_value(&mut settings.theme, *theme, theme.label())
                    .changed();
            }
        });

        ui.add_space(16.0);
        ui.separator();
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.label(RichText::new("Font Size").strong());
            ui.add_space(8.0);
            ui.label(format!("{}px", settings.font_size as u32));
        });
        ui.add_space(4.0);
        changed |= ui
            .add(
                egui::Slider::new(
                    &mut settings.font_size,
                    Settings::MIN_FONT_SIZE..=Settings::MAX_FONT_SIZE,
                )
                .show_value(false)
                .step_by(1.0),
            )
            .changed();

        ui.add_space(8.0);
        changed |= ui
            .checkbox(&mut settings.show_preview, "Show live preview")
            .changed();

        changed
    }

    /// Returns `(changed, dictionary_changed)`.
    fn show_editor_section(&mut self, ui: &mut Ui, settings: &mut Settings) -> (bool, bool) {
        let mut changed = false;
        let mut dictionary = false;

        ui.heading("Editor");
        ui.add_space(8.0);

        if ui
            .checkbox(&mut settings.spell_check, "Check spelling")
            .on_hover_text("Underline words missing from the dictionary")
            .changed()
        {
            changed = true;
            dictionary = true;
        }

        ui.add_space(8.0);
        ui.label(RichText::new("System dictionary").strong());
        let response = ui.add(
            egui::TextEdit::singleline(&mut self.system_dictionary_input)
                .hint_text(crate::spellcheck::DEFAULT_SYSTEM_DICTIONARY),
        );
        if response.lost_focus() {
            let trimmed = self.system_dictionary_input.trim();
            let value = (!trimmed.is_empty()).then(|| PathBuf::from(trimmed));
            if value != settings.system_dictionary {
                settings.system_dictionary = value;
                changed = true;
                dictionary = true;
            }
        }

        ui.add_space(4.0);
        ui.label(RichText::new("Personal word list").strong());
        if ui
            .text_edit_singleline(&mut self.word_list_input)
            .lost_focus()
        {
            let trimmed = self.word_list_input.trim();
            if !trimmed.is_empty() && PathBuf::from(trimmed) != settings.word_list_path {
                settings.word_list_path = PathBuf::from(trimmed);
                changed = true;
                dictionary = true;
            }
        }

        ui.add_space(16.0);
        ui.separator();
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.label(RichText::new("Preview delay").strong());
            ui.add_space(8.0);
            ui.label(format!("{} ms", settings.preview_delay_ms));
        });
        changed |= ui
            .add(
                egui::Slider::new(
                    &mut settings.preview_delay_ms,
                    0..=Settings::MAX_PREVIEW_DELAY_MS,
                )
                .show_value(false)
                .step_by(50.0),
            )
            .changed();

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui
                .button("Clear Recent Files")
                .on_hover_text("Remove all files from the recent files list")
                .clicked()
            {
                settings.recent_files.clear();
                changed = true;
            }
            if !settings.recent_files.is_empty() {
                ui.label(
                    RichText::new(format!("({} files)", settings.recent_files.len()))
                        .small()
                        .weak(),
                );
            }
        });

        (changed, dictionary)
    }

    fn show_export_section(&mut self, ui: &mut Ui, settings: &mut Settings) -> bool {
        let mut changed = false;

        ui.heading("Export");
        ui.add_space(8.0);

        ui.label(RichText::new("Templates folder").strong());
        if ui
            .text_edit_singleline(&mut self.templates_dir_input)
            .lost_focus()
        {
            let trimmed = self.templates_dir_input.trim();
            if !trimmed.is_empty() && PathBuf::from(trimmed) != settings.templates_dir {
                settings.templates_dir = PathBuf::from(trimmed);
                self.refresh_templates(settings);
                changed = true;
            }
        }

        ui.add_space(4.0);
        let selected = settings.template.clone().unwrap_or_else(|| "Built-in".to_string());
        egui::ComboBox::from_label("Template")
            .selected_text(selected)
            .show_ui(ui, |ui| {
                changed |= ui
                    .selectable_value(&mut settings.template, None, "Built-in")
                    .changed();
                for name in &self.template_names {
                    changed |= ui
                        .selectable_value(&mut settings.template, Some(name.clone()), name)
                        .changed();
                }
            });
        if self.template_names.is_empty() {
            ui.label(
                RichText::new("No templates found in this folder")
                    .small()
                    .weak(),
            );
        }

        ui.add_space(16.0);
        ui.separator();
        ui.add_space(8.0);

        ui.label(RichText::new("PDF converter").strong());
        changed |= ui
            .add(egui::TextEdit::singleline(&mut settings.pdf_command).hint_text("wkhtmltopdf"))
            .on_hover_text("Run as <command> - <output.pdf> with the HTML on stdin")
            .changed();

        ui.add_space(8.0);
        changed |= ui
            .checkbox(&mut settings.open_after_export, "Open file after export")
            .changed();

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_settings_panel_default() {
        let panel = SettingsPanel::new();
        assert_eq!(panel.active_section, SettingsSection::Appearance);
        assert!(panel.template_names.is_empty());
    }

    #[test]
    fn test_settings_section_label() {
        assert_eq!(SettingsSection::Appearance.label(), "Appearance");
        assert_eq!(SettingsSection::Editor.label(), "Editor");
        assert_eq!(SettingsSection::Export.label(), "Export");
    }

    #[test]
    fn test_prepare_reads_settings() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("memo")).unwrap();
        fs::write(dir.path().join("memo/memo.json"), r#"{"name": "Memo"}"#).unwrap();

        let settings = Settings {
            templates_dir: dir.path().to_path_buf(),
            system_dictionary: Some(PathBuf::from("/tmp/words")),
            ..Default::default()
        };
        let mut panel = SettingsPanel::new();
        panel.prepare(&settings);

        assert_eq!(panel.template_names, vec!["Memo".to_string()]);
        assert_eq!(panel.system_dictionary_input, "/tmp/words");
        assert_eq!(panel.word_list_input, "wordlist");
    }

    #[test]
    fn test_settings_panel_output_default() {
        let output = SettingsPanelOutput::default();
        assert!(!output.changed);
        assert!(!output.dictionary_changed);
        assert!(!output.close_requested);
        assert!(!output.reset_requested);
    }
}
