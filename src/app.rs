//! Main application module for Serum Writer
//!
//! `SerumApp` implements `eframe::App`. Each frame it:
//! 1. handles border resizing and theme changes
//! 2. turns shortcuts, menu clicks and dropped files into [`AppAction`]s
//! 3. draws the title bar, menus, status bar, preview and editor
//! 4. carries out the collected actions and drains document events

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Instant;

use eframe::egui::{self, Key, Modifiers, RichText};
use log::{debug, info, warn};

use crate::config::{save_config_silent, Settings, Theme};
use crate::document::{DocumentEvent, EditorSession, PendingAction, Transition};
use crate::editor::{
    apply_format, read_clipboard, EditCommand, EditorWidget, FindBar, FindState, FormatCommand,
    TextStats,
};
use crate::error::{Error, ResultExt};
use crate::export::{export_document, CommandPdfRenderer, ExportFormat, ExportOptions};
use crate::files::dialogs::export_file_dialog;
use crate::files::{FilePicker, NativeFilePicker};
use crate::highlight::DocumentHighlighter;
use crate::plugins::{load_plugins, plugins_dir, PluginContext, PluginRegistry};
use crate::preview::{show_preview, Preview};
use crate::spellcheck::Dictionary;
use crate::theme::{ThemeColors, ThemeManager};
use crate::ui::{
    handle_window_resize, show_title_bar, AboutPanel, DialogResult, MessageDialog, SettingsPanel,
    WindowResizeState,
};

/// Deferred user commands, collected while drawing and run afterwards to
/// avoid borrowing the session inside UI closures.
#[derive(Debug, Clone, PartialEq)]
enum AppAction {
    New,
    Open,
    OpenPath(PathBuf),
    Save,
    SaveAs,
    Close,
    Exit,
    Export(ExportFormat),
    Format(FormatCommand),
    Edit(EditCommand),
    TogglePreview,
    ToggleSpellCheck,
    SetTheme(Theme),
    OpenFind,
    FindNext,
    OpenPreferences,
    OpenAbout,
    RunPlugin(String),
}

/// What the command line asked for.
#[derive(Debug, Clone, Default)]
pub struct StartupOptions {
    pub file: Option<PathBuf>,
    pub force_markdown: bool,
}

pub struct SerumApp {
    settings: Settings,
    session: EditorSession,
    /// Document events queued by the session's subscriber
    inbox: Rc<RefCell<Vec<DocumentEvent>>>,
    theme_manager: ThemeManager,
    highlighter: DocumentHighlighter,
    dictionary: Option<Dictionary>,
    preview: Preview,
    plugins: PluginRegistry,
    picker: NativeFilePicker,

    find_state: FindState,
    find_bar: FindBar,
    show_find: bool,
    settings_panel: SettingsPanel,
    show_settings: bool,
    about_panel: AboutPanel,
    show_about: bool,
    dialog: Option<MessageDialog>,
    window_resize_state: WindowResizeState,

    /// Editor selection in bytes as of the last frame
    selection: (usize, usize),
    pending_selection: Option<(usize, usize)>,
    focus_editor: bool,
    /// Edit menu input waiting for the editor to regain focus
    pending_events: Vec<egui::Event>,
    last_title: String,
    should_exit: bool,
}

impl SerumApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings, startup: StartupOptions) -> Self {
        info!("Initializing Serum Writer");

        let mut theme_manager = ThemeManager::new(settings.theme);
        theme_manager.apply_if_needed(&cc.egui_ctx);
        let colors = theme_manager.colors(&cc.egui_ctx);

        let mut session = EditorSession::new(startup.force_markdown);
        let inbox = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&inbox);
        session.subscribe("app", move |event| sink.borrow_mut().push(event.clone()));

        let mut app = Self {
            preview: Preview::new(settings.preview_delay_ms),
            highlighter: DocumentHighlighter::new(colors.highlight_palette()),
            dictionary: None,
            plugins: PluginRegistry::new(),
            picker: NativeFilePicker,
            find_state: FindState::new(),
            find_bar: FindBar::new(),
            show_find: false,
            settings_panel: SettingsPanel::new(),
            show_settings: false,
            about_panel: AboutPanel::new(),
            show_about: false,
            dialog: None,
            window_resize_state: WindowResizeState::new(),
            selection: (0, 0),
            pending_selection: None,
            focus_editor: true,
            pending_events: Vec::new(),
            last_title: String::new(),
            should_exit: false,
            settings,
            session,
            inbox,
            theme_manager,
        };

        app.reload_dictionary();
        app.load_plugins();
        app.restore_document(startup.file);
        app.drain_events();
        app.preview.refresh(app.session.text());
        app
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Startup
    // ─────────────────────────────────────────────────────────────────────────

    fn restore_document(&mut self, file: Option<PathBuf>) {
        if let Some(path) = file {
            if self.session.restore(&path) {
                return;
            }
            warn!("Could not open {}", path.display());
        }
        if let Some(last) = self.settings.last_file.clone() {
            if !self.session.restore(&last) {
                info!("Forgetting last file {}", last.display());
                self.settings.last_file = None;
            }
        }
    }

    fn reload_dictionary(&mut self) {
        self.dictionary = if self.settings.spell_check {
            Dictionary::load(
                self.settings.system_dictionary.as_deref(),
                &self.settings.word_list_path,
            )
            .ok_or_warn("Spell-check disabled")
        } else {
            None
        };
        self.highlighter.invalidate();
    }

    fn load_plugins(&mut self) {
        let Some(dir) = plugins_dir().ok_or_warn("Plugins unavailable") else {
            return;
        };
        for plugin in load_plugins(&dir) {
            if let Err(e) = self.plugins.register(Box::new(plugin)) {
                warn!("{}", e);
            }
        }
        if !self.plugins.is_empty() {
            let mut ctx = PluginContext::new(self.session.text_mut(), 0);
            self.plugins.init_all(&mut ctx);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn show_error(&mut self, title: &str, error: &Error) {
        warn!("{}: {}", title, error);
        self.dialog = Some(MessageDialog::error(title, error.to_string()));
    }

    fn handle_transition(&mut self, transition: Transition) {
        if let Transition::NeedsConfirmation(message) = transition {
            self.dialog = Some(MessageDialog::confirm(message));
        }
    }

    fn persist_settings(&self) {
        if !save_config_silent(&self.settings) {
            debug!("Settings not persisted");
        }
    }

    fn document_dir(&self) -> Option<PathBuf> {
        self.session
            .document()
            .path()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
    }

    fn preview_visible(&self) -> bool {
        self.settings.show_preview && self.session.doc_type().has_preview()
    }

    /// Replace the buffer after a command and move the selection.
    fn replace_text(&mut self, text: String, selection: (usize, usize)) {
        self.session.set_text(text);
        self.selection = selection;
        self.pending_selection = Some(selection);
        self.focus_editor = true;
        self.preview.mark_changed(Instant::now());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Actions
    // ─────────────────────────────────────────────────────────────────────────

    fn run_action(&mut self, action: AppAction, ctx: &egui::Context) {
        debug!("Action: {:?}", action);
        match action {
            AppAction::New => {
                let transition = self.session.request_new();
                self.handle_transition(transition);
            }
            AppAction::Open => {
                let start = self.document_dir();
                if let Some(path) = self.picker.pick_open(start.as_deref()) {
                    self.open_path(path);
                }
            }
            AppAction::OpenPath(path) => self.open_path(path),
            AppAction::Save => {
                if let Err(e) = self.session.save(&mut self.picker) {
                    self.show_error("Save failed", &e);
                }
            }
            AppAction::SaveAs => {
                if let Err(e) = self.session.save_as(&mut self.picker) {
                    self.show_error("Save failed", &e);
                }
            }
            AppAction::Close => {
                let transition = self.session.request_close();
                self.handle_transition(transition);
            }
            AppAction::Exit => self.request_exit(),
            AppAction::Export(format) => self.export(format, ctx),
            AppAction::Format(command) => {
                let result = apply_format(self.session.text(), self.selection, command);
                debug!("{} applied: {}", command.label(), result.applied);
                self.replace_text(result.text, result.selection);
            }
            AppAction::Edit(command) => {
                let clipboard = match command {
                    EditCommand::Paste => read_clipboard().ok_or_warn("Paste skipped"),
                    _ => None,
                };
                if let Some(event) = command.to_event(clipboard) {
                    self.pending_events.push(event);
                    self.focus_editor = true;
                }
            }
            AppAction::TogglePreview => {
                self.settings.show_preview = !self.settings.show_preview;
                if self.settings.show_preview {
                    self.preview.refresh(self.session.text());
                }
                self.persist_settings();
            }
            AppAction::ToggleSpellCheck => {
                self.settings.spell_check = !self.settings.spell_check;
                self.reload_dictionary();
                self.persist_settings();
            }
            AppAction::SetTheme(theme) => {
                self.settings.theme = theme;
                self.theme_manager.set_theme(theme);
                self.persist_settings();
            }
            AppAction::OpenFind => {
                self.show_find = true;
                self.find_bar.request_focus();
            }
            AppAction::FindNext => self.find_next(),
            AppAction::OpenPreferences => {
                self.settings_panel.prepare(&self.settings);
                self.show_settings = true;
            }
            AppAction::OpenAbout => self.show_about = true,
            AppAction::RunPlugin(name) => self.run_plugin(&name),
        }
    }

    fn open_path(&mut self, path: PathBuf) {
        match self.session.request_open(path.clone()) {
            Ok(transition) => self.handle_transition(transition),
            Err(e) => {
                if matches!(e, Error::FileNotFound(_)) {
                    self.settings.recent_files.retain(|p| p != &path);
                    self.persist_settings();
                }
                self.show_error("Could not open file", &e);
            }
        }
    }

    fn request_exit(&mut self) {
        match self.session.request_exit() {
            Transition::Done => self.should_exit = true,
            transition => self.handle_transition(transition),
        }
    }

    fn find_next(&mut self) {
        if self.find_state.query.is_empty() {
            self.show_find = true;
            self.find_bar.request_focus();
            return;
        }
        let from = self.selection.1;
        if let Some(range) = self.find_state.find_next(self.session.text(), from) {
            self.selection = (range.start, range.end);
            self.pending_selection = Some(self.selection);
        }
    }

    fn export(&mut self, format: ExportFormat, ctx: &egui::Context) {
        let options = ExportOptions::from_settings(&self.settings, format);
        let document = self.session.document();
        let title = document.title();
        let suggested = options.suggested_file_name(&document.display_name());
        let start = self.document_dir();

        let Some(output) =
            export_file_dialog(start.as_deref(), &suggested, format == ExportFormat::Pdf)
        else {
            debug!("Export cancelled");
            return;
        };

        let colors = self.theme_manager.colors(ctx);
        let renderer = CommandPdfRenderer::new(self.settings.pdf_command.clone());
        if let Err(e) = export_document(
            self.session.text(),
            &title,
            &colors,
            &options,
            &renderer,
            &output,
        ) {
            self.show_error("Export failed", &e);
        }
    }

    fn run_plugin(&mut self, name: &str) {
        let mut ctx = PluginContext::new(self.session.text_mut(), self.selection.1);
        let result = self.plugins.run(name, &mut ctx);
        let (changed, cursor) = (ctx.changed(), ctx.cursor());

        match result {
            Ok(()) if changed => {
                self.selection = (cursor, cursor);
                self.pending_selection = Some(self.selection);
                self.focus_editor = true;
                self.preview.mark_changed(Instant::now());
            }
            Ok(()) => {}
            Err(e) => self.show_error("Plugin failed", &e),
        }
    }

    /// Forward queued session events to settings, preview and plugins.
    fn drain_events(&mut self) {
        let events = std::mem::take(&mut *self.inbox.borrow_mut());
        for event in events {
            match &event {
                DocumentEvent::Opened(path) | DocumentEvent::Saved(path) => {
                    self.settings.add_recent_file(path.clone());
                    self.settings.last_file = Some(path.clone());
                    self.persist_settings();
                }
                DocumentEvent::Cleared | DocumentEvent::Closed => {
                    self.settings.last_file = None;
                }
                DocumentEvent::TypeChanged(doc_type) => {
                    debug!("Document type is now {}", doc_type.display_name());
                    self.highlighter.invalidate();
                }
            }
            if matches!(
                event,
                DocumentEvent::Opened(_) | DocumentEvent::Cleared | DocumentEvent::Closed
            ) {
                self.selection = (0, 0);
                self.pending_selection = Some((0, 0));
                self.preview.refresh(self.session.text());
            }
            self.plugins.dispatch(&event);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Input
    // ─────────────────────────────────────────────────────────────────────────

    /// Consume global shortcuts before the editor sees them.
    /// Replays queued Edit menu input once the editor holds focus again.
    ///
    /// Clicking a menu entry takes focus from the editor, which would make
    /// `TextEdit` ignore the event in the same frame.
    fn flush_edit_events(&mut self, ctx: &egui::Context) {
        if self.pending_events.is_empty() {
            return;
        }
        if self.dialog.is_some() {
            self.pending_events.clear();
            return;
        }
        if ctx.memory(|m| m.has_focus(editor_id())) {
            let events = std::mem::take(&mut self.pending_events);
            ctx.input_mut(|i| i.events.extend(events));
        } else {
            self.focus_editor = true;
            ctx.request_repaint();
        }
    }

    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) -> Vec<AppAction> {
        let mut actions = Vec::new();
        ctx.input_mut(|i| {
            i.events.retain(|event| {
                let egui::Event::Key {
                    key,
                    physical_key,
                    pressed: true,
                    modifiers,
                    ..
                } = event
                else {
                    return true;
                };
                // Shift+digit reports the shifted symbol as the logical key.
                let key = match physical_key {
                    Some(physical) if is_heading_digit(*physical) => *physical,
                    _ => *key,
                };
                match shortcut_action(*modifiers, key) {
                    Some(action) => {
                        debug!("Keyboard shortcut: {:?}", action);
                        actions.push(action);
                        false
                    }
                    None => true,
                }
            });
        });

        let dropped = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .find_map(|file| file.path.clone())
        });
        if let Some(path) = dropped {
            actions.push(AppAction::OpenPath(path));
        }
        actions
    }

    fn handle_close_request(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.viewport().close_requested()) && !self.should_exit {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.request_exit();
        }
    }

    fn track_window(&mut self, ctx: &egui::Context) {
        let (maximized, rect) =
            ctx.input(|i| (i.viewport().maximized.unwrap_or(false), i.viewport().inner_rect));
        self.settings.window_size.maximized = maximized;
        if let (false, Some(rect)) = (maximized, rect) {
            self.settings.window_size.width = rect.width();
            self.settings.window_size.height = rect.height();
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    fn render_menu_bar(&mut self, ctx: &egui::Context, actions: &mut Vec<AppAction>) {
        egui::TopBottomPanel::top("serum_menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    menu_item(ui, "New", "Ctrl+N", AppAction::New, actions);
                    menu_item(ui, "Open…", "Ctrl+O", AppAction::Open, actions);
                    ui.add_enabled_ui(!self.settings.recent_files.is_empty(), |ui| {
                        ui.menu_button("Open Recent", |ui| {
                            for path in &self.settings.recent_files {
                                if ui.button(path.display().to_string()).clicked() {
                                    actions.push(AppAction::OpenPath(path.clone()));
                                    ui.close_menu();
                                }
                            }
                        });
                    });
                    ui.separator();
                    menu_item(ui, "Save", "Ctrl+S", AppAction::Save, actions);
                    menu_item(ui, "Save As…", "Ctrl+Shift+S", AppAction::SaveAs, actions);
                    ui.separator();
                    for format in ExportFormat::all() {
                        let label = format!("Export {}…", format.label());
                        menu_item(ui, &label, "", AppAction::Export(*format), actions);
                    }
                    ui.separator();
                    menu_item(ui, "Close", "Ctrl+W", AppAction::Close, actions);
                    menu_item(ui, "Exit", "", AppAction::Exit, actions);
                });

                ui.menu_button("Edit", |ui| {
                    for command in EditCommand::ALL {
                        if matches!(command, EditCommand::Cut) {
                            ui.separator();
                        }
                        menu_item(
                            ui,
                            command.label(),
                            command.shortcut_label(),
                            AppAction::Edit(command),
                            actions,
                        );
                    }
                    ui.separator();
                    menu_item(ui, "Find…", "Ctrl+F", AppAction::OpenFind, actions);
                    menu_item(ui, "Find Next", "F3", AppAction::FindNext, actions);
                    ui.separator();
                    menu_item(ui, "Preferences…", "Ctrl+,", AppAction::OpenPreferences, actions);
                });

                ui.menu_button("Insert", |ui| {
                    for command in FormatCommand::ALL {
                        if matches!(command, FormatCommand::Bold) {
                            ui.separator();
                        }
                        menu_item(
                            ui,
                            &command.label(),
                            command.shortcut_label(),
                            AppAction::Format(command),
                            actions,
                        );
                    }
                });

                ui.menu_button("View", |ui| {
                    let mut show_preview = self.settings.show_preview;
                    if ui.checkbox(&mut show_preview, "Preview (Ctrl+R)").clicked() {
                        actions.push(AppAction::TogglePreview);
                        ui.close_menu();
                    }
                    let mut spell_check = self.settings.spell_check;
                    if ui.checkbox(&mut spell_check, "Check Spelling").clicked() {
                        actions.push(AppAction::ToggleSpellCheck);
                        ui.close_menu();
                    }
                    ui.separator();
                    for theme in Theme::all() {
                        if ui
                            .radio(self.settings.theme == *theme, theme.label())
                            .clicked()
                        {
                            actions.push(AppAction::SetTheme(*theme));
                            ui.close_menu();
                        }
                    }
                });

                ui.menu_button("Plugins", |ui| {
                    if self.plugins.is_empty() {
                        ui.label(RichText::new("No plugins installed").weak());
                    }
                    for (name, description, enabled) in self.plugins.plugins() {
                        let button = ui.add_enabled(enabled, egui::Button::new(name));
                        let button = if description.is_empty() {
                            button
                        } else {
                            button.on_hover_text(description)
                        };
                        if button.clicked() {
                            actions.push(AppAction::RunPlugin(name.to_string()));
                            ui.close_menu();
                        }
                    }
                });

                ui.menu_button("Help", |ui| {
                    menu_item(ui, "About", "F1", AppAction::OpenAbout, actions);
                });
            });
        });
    }

    fn render_status_bar(&self, ctx: &egui::Context, colors: &ThemeColors) {
        let stats = TextStats::from_text(self.session.text());
        egui::TopBottomPanel::bottom("serum_status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(self.session.status_label()).color(colors.text.secondary));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(self.session.doc_type().display_name());
                    ui.separator();
                    ui.label(stats.word_label())
                        .on_hover_text(stats.format_compact());
                    if self.settings.spell_check && self.dictionary.is_none() {
                        ui.separator();
                        ui.label(RichText::new("Spelling unavailable").color(colors.ui.warning));
                    }
                });
            });
        });
    }

    fn render_editor(&mut self, ctx: &egui::Context, colors: &ThemeColors) {
        if self.preview_visible() {
            egui::SidePanel::right("serum_preview")
                .resizable(true)
                .default_width(ctx.screen_rect().width() * 0.45)
                .frame(
                    egui::Frame::none()
                        .fill(colors.base.surface)
                        .inner_margin(egui::Margin::symmetric(16.0, 8.0)),
                )
                .show(ctx, |ui| {
                    show_preview(ui, self.preview.blocks(), colors, self.settings.font_size);
                });
        }

        let new_word = egui::CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(colors.base.background)
                    .inner_margin(egui::Margin::symmetric(16.0, 8.0)),
            )
            .show(ctx, |ui| {
                // A modal dialog owns the keyboard
                let interactive = self.dialog.is_none();
                let doc_type = self.session.doc_type();
                let dictionary = self
                    .dictionary
                    .as_ref()
                    .filter(|_| self.settings.spell_check);
                let output = EditorWidget::new(self.session.text_mut(), &mut self.highlighter, doc_type)
                    .id(editor_id())
                    .dictionary(dictionary)
                    .font_size(self.settings.font_size)
                    .select(self.pending_selection.take())
                    .request_focus(interactive && std::mem::take(&mut self.focus_editor))
                    .interactive(interactive)
                    .show(ui);

                if let Some(selection) = output.selection {
                    self.selection = selection;
                }
                if output.changed {
                    self.preview.mark_changed(Instant::now());
                }
                output.add_to_dictionary
            })
            .inner;

        if let Some(word) = new_word {
            self.add_to_dictionary(&word);
        }
    }

    fn add_to_dictionary(&mut self, word: &str) {
        let Some(dictionary) = self.dictionary.as_mut() else {
            return;
        };
        match dictionary.add(word) {
            Ok(true) => {
                info!("Added '{}' to the personal word list", word);
                self.highlighter.invalidate();
            }
            Ok(false) => debug!("'{}' already known", word),
            Err(e) => self.show_error("Could not update word list", &e),
        }
    }

    fn render_windows(&mut self, ctx: &egui::Context, colors: &ThemeColors) {
        let is_dark = colors.is_dark();

        if self.show_find {
            let output = self.find_bar.show(ctx, &mut self.find_state, is_dark);
            if output.next_requested {
                self.find_next();
            }
            if output.close_requested {
                self.show_find = false;
                self.focus_editor = true;
            }
        }

        if self.show_settings {
            let output = self.settings_panel.show(ctx, &mut self.settings, is_dark);
            if output.reset_requested {
                let recent = std::mem::take(&mut self.settings.recent_files);
                self.settings = Settings {
                    recent_files: recent,
                    ..Settings::default()
                };
                self.settings_panel.prepare(&self.settings);
            }
            if output.changed || output.reset_requested {
                self.settings.sanitize();
                self.theme_manager.set_theme(self.settings.theme);
                self.preview.set_delay(self.settings.preview_delay_ms);
                self.persist_settings();
            }
            if output.dictionary_changed || output.reset_requested {
                self.reload_dictionary();
            }
            if output.close_requested {
                self.show_settings = false;
            }
        }

        if self.show_about && self.about_panel.show(ctx, is_dark).close_requested {
            self.show_about = false;
        }

        if let Some(dialog) = &self.dialog {
            match dialog.show(ctx, colors) {
                DialogResult::None => {}
                DialogResult::Confirmed => {
                    self.dialog = None;
                    self.focus_editor = true;
                    match self.session.confirm() {
                        Ok(Some(PendingAction::Exit)) => self.should_exit = true,
                        Ok(_) => {}
                        Err(e) => self.show_error("Could not open file", &e),
                    }
                }
                DialogResult::Cancelled => {
                    self.dialog = None;
                    self.focus_editor = true;
                    self.session.decline();
                }
                DialogResult::Dismissed => {
                    self.dialog = None;
                    self.focus_editor = true;
                }
            }
        }
    }
}

fn editor_id() -> egui::Id {
    egui::Id::new("serum_editor")
}

/// Menu entry with right-aligned shortcut text.
fn menu_item(
    ui: &mut egui::Ui,
    label: &str,
    shortcut: &str,
    action: AppAction,
    actions: &mut Vec<AppAction>,
) {
    if ui
        .add(egui::Button::new(label).shortcut_text(shortcut))
        .clicked()
    {
        actions.push(action);
        ui.close_menu();
    }
}

fn is_heading_digit(key: Key) -> bool {
    matches!(
        key,
        Key::Num1 | Key::Num2 | Key::Num3 | Key::Num4 | Key::Num5 | Key::Num6
    )
}

/// Global shortcut table.
fn shortcut_action(modifiers: Modifiers, key: Key) -> Option<AppAction> {
    if modifiers.alt {
        return None;
    }
    if !modifiers.command {
        return match key {
            Key::F1 => Some(AppAction::OpenAbout),
            Key::F3 => Some(AppAction::FindNext),
            _ => None,
        };
    }

    let heading = |level| Some(AppAction::Format(FormatCommand::Heading(level)));
    let format = |command| Some(AppAction::Format(command));

    if modifiers.shift {
        match key {
            Key::S => Some(AppAction::SaveAs),
            Key::Num1 => heading(1),
            Key::Num2 => heading(2),
            Key::Num3 => heading(3),
            Key::Num4 => heading(4),
            Key::Num5 => heading(5),
            Key::Num6 => heading(6),
            Key::I => format(FormatCommand::Image),
            Key::L => format(FormatCommand::List),
            Key::Q => format(FormatCommand::Blockquote),
            Key::K => format(FormatCommand::CodeBlock),
            _ => None,
        }
    } else {
        match key {
            Key::N => Some(AppAction::New),
            Key::O => Some(AppAction::Open),
            Key::S => Some(AppAction::Save),
            Key::W => Some(AppAction::Close),
            Key::R => Some(AppAction::TogglePreview),
            Key::F => Some(AppAction::OpenFind),
            Key::Comma => Some(AppAction::OpenPreferences),
            Key::B => format(FormatCommand::Bold),
            Key::I => format(FormatCommand::Italic),
            Key::K => format(FormatCommand::Link),
            _ => None,
        }
    }
}

impl eframe::App for SerumApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        handle_window_resize(ctx, &mut self.window_resize_state);

        if self.theme_manager.apply_if_needed(ctx) {
            let palette = self.theme_manager.colors(ctx).highlight_palette();
            self.highlighter.set_palette(palette);
        }
        let colors = self.theme_manager.colors(ctx);

        let title = self.session.window_title();
        if title != self.last_title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.last_title = title;
        }

        self.track_window(ctx);
        self.handle_close_request(ctx);

        let mut actions = if self.dialog.is_none() {
            self.handle_keyboard_shortcuts(ctx)
        } else {
            Vec::new()
        };
        self.flush_edit_events(ctx);

        if show_title_bar(ctx, &self.last_title, &colors, &self.window_resize_state)
            .close_requested
        {
            actions.push(AppAction::Exit);
        }
        self.render_menu_bar(ctx, &mut actions);
        self.render_status_bar(ctx, &colors);
        self.render_editor(ctx, &colors);
        self.render_windows(ctx, &colors);

        for action in actions {
            self.run_action(action, ctx);
        }
        self.drain_events();

        if self.preview_visible() {
            if let Some(remaining) = self.preview.update(self.session.text(), Instant::now()) {
                ctx.request_repaint_after(remaining);
            }
        }

        if self.should_exit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application exiting");
        self.settings.last_file = self.session.document().path().map(Path::to_path_buf);
        self.persist_settings();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl() -> Modifiers {
        Modifiers::COMMAND
    }

    fn ctrl_shift() -> Modifiers {
        Modifiers::COMMAND | Modifiers::SHIFT
    }

    #[test]
    fn test_file_shortcuts() {
        assert_eq!(shortcut_action(ctrl(), Key::N), Some(AppAction::New));
        assert_eq!(shortcut_action(ctrl(), Key::S), Some(AppAction::Save));
        assert_eq!(shortcut_action(ctrl_shift(), Key::S), Some(AppAction::SaveAs));
        assert_eq!(shortcut_action(ctrl(), Key::W), Some(AppAction::Close));
    }

    #[test]
    fn test_format_shortcuts() {
        assert_eq!(
            shortcut_action(ctrl_shift(), Key::Num3),
            Some(AppAction::Format(FormatCommand::Heading(3)))
        );
        assert_eq!(
            shortcut_action(ctrl(), Key::K),
            Some(AppAction::Format(FormatCommand::Link))
        );
        assert_eq!(
            shortcut_action(ctrl_shift(), Key::K),
            Some(AppAction::Format(FormatCommand::CodeBlock))
        );
        assert_eq!(
            shortcut_action(ctrl_shift(), Key::I),
            Some(AppAction::Format(FormatCommand::Image))
        );
    }

    #[test]
    fn test_shortcuts_match_menu_labels() {
        for command in FormatCommand::ALL {
            let label = command.shortcut_label();
            let shift = label.contains("Shift");
            let key_name = label.rsplit('+').next().unwrap();
            let key = Key::from_name(key_name).unwrap();
            let modifiers = if shift { ctrl_shift() } else { ctrl() };
            assert_eq!(
                shortcut_action(modifiers, key),
                Some(AppAction::Format(command)),
                "{}",
                label
            );
        }
    }

    #[test]
    fn test_plain_keys_are_not_shortcuts() {
        assert_eq!(shortcut_action(Modifiers::NONE, Key::S), None);
        assert_eq!(shortcut_action(Modifiers::NONE, Key::F1), Some(AppAction::OpenAbout));
        assert_eq!(shortcut_action(Modifiers::ALT | Modifiers::COMMAND, Key::S), None);
    }

    #[test]
    fn test_edit_keys_reach_the_editor() {
        for command in EditCommand::ALL {
            let key_name = command.shortcut_label().rsplit('+').next().unwrap();
            let key = Key::from_name(key_name).unwrap();
            assert_eq!(shortcut_action(ctrl(), key), None, "{}", command.label());
        }
        assert_eq!(shortcut_action(ctrl_shift(), Key::Z), None);
    }
}
