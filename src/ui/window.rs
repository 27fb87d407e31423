//! Frameless window chrome
//!
//! The native decorations are disabled, so the writer draws its own title
//! bar (drag to move, double-click to maximize, minimize/maximize/close
//! buttons) and turns presses near the window border into native resizes.
//!
//! Call [`handle_window_resize`] at the start of every frame, before any
//! panel is laid out, then [`show_title_bar`] as the first top panel.

use eframe::egui::{
    self, Align2, Color32, CursorIcon, FontId, Pos2, Rect, ResizeDirection, RichText, Sense,
    Stroke, ViewportCommand,
};

use crate::theme::ThemeColors;

/// Width of the grab band along each edge, in points.
const RESIZE_BORDER: f32 = 5.0;

/// Corners get a larger grab square.
const CORNER_GRAB: f32 = 10.0;

const TITLE_BUTTON_SIZE: egui::Vec2 = egui::vec2(44.0, 28.0);

const CLOSE_HOVER: Color32 = Color32::from_rgb(210, 40, 45);

// ─────────────────────────────────────────────────────────────────────────────
// Edge Resize
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct WindowResizeState {
    hovered: Option<ResizeDirection>,
    resizing: bool,
}

impl WindowResizeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer is over a border or a resize is in progress; the title bar
    /// must not start a window drag.
    pub fn is_busy(&self) -> bool {
        self.resizing || self.hovered.is_some()
    }
}

/// Returns `true` while a resize started by the border is in progress.
pub fn handle_window_resize(ctx: &egui::Context, state: &mut WindowResizeState) -> bool {
    let (maximized, pointer, pressed, down) = ctx.input(|i| {
        (
            i.viewport().maximized.unwrap_or(false),
            i.pointer.hover_pos(),
            i.pointer.primary_pressed(),
            i.pointer.primary_down(),
        )
    });

    if maximized {
        *state = WindowResizeState::default();
        return false;
    }

    if state.resizing {
        if !down {
            *state = WindowResizeState::default();
        }
        return state.resizing;
    }

    state.hovered = pointer.and_then(|pos| resize_direction(ctx.screen_rect(), pos));

    if let Some(direction) = state.hovered {
        ctx.set_cursor_icon(cursor_for(direction));
        if pressed {
            ctx.send_viewport_cmd(ViewportCommand::BeginResize(direction));
            state.resizing = true;
        }
    }
    state.resizing
}

/// Which border (if any) `pos` is grabbing.
fn resize_direction(window: Rect, pos: Pos2) -> Option<ResizeDirection> {
    if !window.expand(1.0).contains(pos) {
        return None;
    }

    // -1: near min edge, 1: near max edge, 0: neither
    let band = |value: f32, min: f32, max: f32, width: f32| -> i8 {
        if value < min + width {
            -1
        } else if value > max - width {
            1
        } else {
            0
        }
    };

    let corner_x = band(pos.x, window.min.x, window.max.x, CORNER_GRAB);
    let corner_y = band(pos.y, window.min.y, window.max.y, CORNER_GRAB);
    let edge_x = band(pos.x, window.min.x, window.max.x, RESIZE_BORDER);
    let edge_y = band(pos.y, window.min.y, window.max.y, RESIZE_BORDER);

    // A corner needs the pointer on at least one edge band.
    let on_edge = edge_x != 0 || edge_y != 0;
    match (corner_x, corner_y) {
        (-1, -1) if on_edge => return Some(ResizeDirection::NorthWest),
        (1, -1) if on_edge => return Some(ResizeDirection::NorthEast),
        (-1, 1) if on_edge => return Some(ResizeDirection::SouthWest),
        (1, 1) if on_edge => return Some(ResizeDirection::SouthEast),
        _ => {}
    }

    match (edge_x, edge_y) {
        (-1, _) => Some(ResizeDirection::West),
        (1, _) => Some(ResizeDirection::East),
        (_, -1) => Some(ResizeDirection::North),
        (_, 1) => Some(ResizeDirection::South),
        _ => None,
    }
}

fn cursor_for(direction: ResizeDirection) -> CursorIcon {
    match direction {
        ResizeDirection::North => CursorIcon::ResizeNorth,
        ResizeDirection::South => CursorIcon::ResizeSouth,
        ResizeDirection::East => CursorIcon::ResizeEast,
        ResizeDirection::West => CursorIcon::ResizeWest,
        ResizeDirection::NorthEast => CursorIcon::ResizeNorthEast,
        ResizeDirection::NorthWest => CursorIcon::ResizeNorthWest,
        ResizeDirection::SouthEast => CursorIcon::ResizeSouthEast,
        ResizeDirection::SouthWest => CursorIcon::ResizeSouthWest,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Title Bar
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct TitleBarOutput {
    /// The close button was clicked; the app decides whether to exit.
    pub close_requested: bool,
}

/// Draw the custom title bar as a top panel.
pub fn show_title_bar(
    ctx: &egui::Context,
    title: &str,
    colors: &ThemeColors,
    resize_state: &WindowResizeState,
) -> TitleBarOutput {
    let mut output = TitleBarOutput::default();
    let maximized = ctx.input(|i| i.viewport().maximized.unwrap_or(false));
    let text_color = colors.text.primary;

    egui::TopBottomPanel::top("serum_title_bar")
        .frame(
            egui::Frame::none()
                .fill(colors.base.surface)
                .inner_margin(egui::Margin::ZERO),
        )
        .show_separator_line(false)
        .show(ctx, |ui| {
            ui.spacing_mut().item_spacing.x = 0.0;
            ui.horizontal(|ui| {
                ui.add_space(10.0);
                ui.label(RichText::new("✒").size(14.0).color(colors.ui.accent));
                ui.add_space(8.0);
                ui.label(RichText::new(title).size(12.0).color(text_color));

                // Everything between the title and the buttons drags the window.
                let buttons_width = TITLE_BUTTON_SIZE.x * 3.0;
                let mut drag_rect = ui.available_rect_before_wrap();
                drag_rect.max.x -= buttons_width;
                drag_rect.max.y = drag_rect.min.y + TITLE_BUTTON_SIZE.y;
                let drag = ui.interact(
                    drag_rect,
                    ui.id().with("title_drag"),
                    Sense::click_and_drag(),
                );
                if drag.double_clicked() {
                    ctx.send_viewport_cmd(ViewportCommand::Maximized(!maximized));
                } else if drag.drag_started() && !resize_state.is_busy() {
                    ctx.send_viewport_cmd(ViewportCommand::StartDrag);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if title_button(ui, "×", text_color, colors.base.hover, Some(CLOSE_HOVER))
                        .on_hover_text("Close")
                        .clicked()
                    {
                        output.close_requested = true;
                    }

                    let (icon, tip) = if maximized {
                        ("❐", "Restore")
                    } else {
                        ("□", "Maximize")
                    };
                    if title_button(ui, icon, text_color, colors.base.hover, None)
                        .on_hover_text(tip)
                        .clicked()
                    {
                        ctx.send_viewport_cmd(ViewportCommand::Maximized(!maximized));
                    }

                    if title_button(ui, "—", text_color, colors.base.hover, None)
                        .on_hover_text("Minimize")
                        .clicked()
                    {
                        ctx.send_viewport_cmd(ViewportCommand::Minimized(true));
                    }
                });
            });
        });

    output
}

fn title_button(
    ui: &mut egui::Ui,
    glyph: &str,
    color: Color32,
    hover: Color32,
    danger: Option<Color32>,
) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(TITLE_BUTTON_SIZE, Sense::click());
    let painter = ui.painter();

    let glyph_color = if response.hovered() {
        let fill = danger.unwrap_or(hover);
        painter.rect_filled(rect, 0.0, fill);
        if danger.is_some() {
            Color32::WHITE
        } else {
            color
        }
    } else {
        color
    };

    if glyph == "—" {
        let c = rect.center();
        painter.line_segment(
            [egui::pos2(c.x - 5.0, c.y), egui::pos2(c.x + 5.0, c.y)],
            Stroke::new(1.5, glyph_color),
        );
    } else {
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            glyph,
            FontId::proportional(15.0),
            glyph_color,
        );
    }
    response
}
