//! UI components for Serum Writer
//!
//! Window chrome and the modal windows layered over the editor.

mod about;
mod dialogs;
mod settings;
mod window;

pub use about::AboutPanel;
pub use dialogs::{DialogResult, MessageDialog};
pub use settings::SettingsPanel;
pub use window::{handle_window_resize, show_title_bar, WindowResizeState};
