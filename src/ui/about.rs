//! About / Help window
//!
//! Application information plus the keyboard shortcut reference.

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::editor::{EditCommand, FormatCommand};

/// Keyboard shortcut category for organized display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutCategory {
    File,
    Edit,
    View,
    Insert,
}

impl ShortcutCategory {
    pub fn all() -> &'static [ShortcutCategory] {
        &[
            ShortcutCategory::File,
            ShortcutCategory::Edit,
            ShortcutCategory::View,
            ShortcutCategory::Insert,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShortcutCategory::File => "File",
            ShortcutCategory::Edit => "Edit",
            ShortcutCategory::View => "View",
            ShortcutCategory::Insert => "Insert",
        }
    }
}

/// A keyboard shortcut entry.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Shortcut {
    keys: &'static str,
    action: String,
}

impl Shortcut {
    fn new(keys: &'static str, action: impl Into<String>) -> Self {
        Self {
            keys,
            action: action.into(),
        }
    }
}

fn get_shortcuts(category: ShortcutCategory) -> Vec<Shortcut> {
    match category {
        ShortcutCategory::File => vec![
            Shortcut::new("Ctrl+N", "New"),
            Shortcut::new("Ctrl+O", "Open"),
            Shortcut::new("Ctrl+S", "Save"),
            Shortcut::new("Ctrl+Shift+S", "Save As"),
            Shortcut::new("Ctrl+W", "Close"),
        ],
        ShortcutCategory::Edit => EditCommand::ALL
            .iter()
            .map(|cmd| Shortcut::new(cmd.shortcut_label(), cmd.label()))
            .chain([
                Shortcut::new("Ctrl+F", "Find"),
                Shortcut::new("F3", "Find Next"),
                Shortcut::new("_ or *", "Surround selection"),
            ])
            .collect(),
        ShortcutCategory::View => vec![
            Shortcut::new("Ctrl+R", "Toggle Preview"),
            Shortcut::new("Ctrl+,", "Preferences"),
            Shortcut::new("F1", "About / Help"),
        ],
        ShortcutCategory::Insert => FormatCommand::ALL
            .iter()
            .map(|cmd| Shortcut::new(cmd.shortcut_label(), cmd.label()))
            .collect(),
    }
}

/// About window sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AboutSection {
    #[default]
    About,
    Shortcuts,
}

impl AboutSection {
    pub fn label(&self) -> &'static str {
        match self {
            AboutSection::About => "About",
            AboutSection::Shortcuts => "Shortcuts",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AboutPanelOutput {
    pub close_requested: bool,
}

#[derive(Debug, Clone, Default)]
pub struct AboutPanel {
    active_section: AboutSection,
}

impl AboutPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the window. Clicking the dimmed backdrop or Escape closes it.
    pub fn show(&mut self, ctx: &egui::Context, is_dark: bool) -> AboutPanelOutput {
        let mut output = AboutPanelOutput::default();

        let screen_rect = ctx.screen_rect();
        let overlay_color = if is_dark {
            Color32::from_rgba_unmultiplied(0, 0, 0, 170)
        } else {
            Color32::from_rgba_unmultiplied(0, 0, 0, 110)
        };

        egui::Area::new(egui::Id::new("about_overlay"))
            .order(egui::Order::Middle)
            .fixed_pos(screen_rect.min)
            .show(ctx, |ui| {
                let response = ui.allocate_response(screen_rect.size(), egui::Sense::click());
                ui.painter().rect_filled(screen_rect, 0.0, overlay_color);
                if response.clicked() {
                    output.close_requested = true;
                }
            });

        egui::Window::new("About Serum Writer")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .min_width(460.0)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    output.close_requested = true;
                }

                ui.horizontal(|ui| {
                    for section in [AboutSection::About, AboutSection::Shortcuts] {
                        ui.selectable_value(&mut self.active_section, section, section.label());
                    }
                });
                ui.separator();

                ui.vertical(|ui| {
                    ui.set_min_height(320.0);
                    match self.active_section {
                        AboutSection::About => show_about_section(ui),
                        AboutSection::Shortcuts => show_shortcuts_section(ui, is_dark),
                    }
                });

                ui.separator();
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Close").clicked() {
                        output.close_requested = true;
                    }
                });
            });

        output
    }
}

fn show_about_section(ui: &mut Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(12.0);
        ui.heading(RichText::new("Serum Writer").size(24.0).strong());
        ui.add_space(4.0);
        ui.label(
            RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                .size(14.0)
                .weak(),
        );
        ui.add_space(8.0);
        ui.label("A distraction-free Markdown writer with live preview");
        ui.add_space(16.0);
    });

    ui.separator();
    ui.add_space(8.0);
    ui.label(RichText::new("Built with").strong());
    ui.label("egui / eframe, comrak, rfd");
    ui.add_space(8.0);
    ui.label(
        RichText::new("Spelling uses the system word list plus your personal word list.")
            .small()
            .weak(),
    );
}

fn show_shortcuts_section(ui: &mut Ui, is_dark: bool) {
    let key_color = if is_dark {
        Color32::from_rgb(150, 190, 255)
    } else {
        Color32::from_rgb(40, 90, 170)
    };

    ScrollArea::vertical().show(ui, |ui| {
        for category in ShortcutCategory::all() {
            ui.add_space(6.0);
            ui.label(RichText::new(category.label()).strong().size(15.0));
            egui::Grid::new(("shortcuts", *category))
                .num_columns(2)
                .spacing([24.0, 4.0])
                .show(ui, |ui| {
                    for shortcut in get_shortcuts(*category) {
                        ui.label(RichText::new(shortcut.keys).monospace().color(key_color));
                        ui.label(shortcut.action);
                        ui.end_row();
                    }
                });
        }
    });
}
