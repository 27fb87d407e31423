//! Clipboard and history commands of the Edit menu
//!
//! `TextEdit` already implements these for the keyboard. The menu entries
//! replay the matching input event into the focused editor instead of
//! touching the buffer themselves, so undo history stays in one place.

use arboard::Clipboard;
use eframe::egui::{Event, Key, Modifiers};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditCommand {
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
}

impl EditCommand {
    /// Edit menu order.
    pub const ALL: [EditCommand; 5] = [
        Self::Undo,
        Self::Redo,
        Self::Cut,
        Self::Copy,
        Self::Paste,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Undo => "Undo",
            Self::Redo => "Redo",
            Self::Cut => "Cut",
            Self::Copy => "Copy",
            Self::Paste => "Paste",
        }
    }

    pub fn shortcut_label(&self) -> &'static str {
        match self {
            Self::Undo => "Ctrl+Z",
            Self::Redo => "Ctrl+Y",
            Self::Cut => "Ctrl+X",
            Self::Copy => "Ctrl+C",
            Self::Paste => "Ctrl+V",
        }
    }

    /// The input event `TextEdit` reacts to for this command.
    ///
    /// Paste needs the clipboard contents; `None` there yields no event.
    pub fn to_event(self, clipboard_text: Option<String>) -> Option<Event> {
        let command_key = |key| Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers: Modifiers::COMMAND,
        };
        match self {
            Self::Undo => Some(command_key(Key::Z)),
            Self::Redo => Some(command_key(Key::Y)),
            Self::Cut => Some(Event::Cut),
            Self::Copy => Some(Event::Copy),
            Self::Paste => clipboard_text
                .filter(|text| !text.is_empty())
                .map(Event::Paste),
        }
    }
}

/// Current text on the system clipboard.
pub fn read_clipboard() -> Result<String> {
    let mut clipboard = Clipboard::new().map_err(|e| Error::Clipboard(e.to_string()))?;
    clipboard
        .get_text()
        .map_err(|e| Error::Clipboard(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_commands_are_command_keys() {
        let Some(Event::Key { key, modifiers, pressed, .. }) = EditCommand::Undo.to_event(None)
        else {
            panic!("undo should be a key event");
        };
        assert_eq!(key, Key::Z);
        assert!(modifiers.command);
        assert!(pressed);

        assert!(matches!(
            EditCommand::Redo.to_event(None),
            Some(Event::Key { key: Key::Y, .. })
        ));
    }

    #[test]
    fn test_clipboard_commands() {
        assert_eq!(EditCommand::Copy.to_event(None), Some(Event::Copy));
        assert_eq!(EditCommand::Cut.to_event(None), Some(Event::Cut));
        assert_eq!(
            EditCommand::Paste.to_event(Some("pasted".to_string())),
            Some(Event::Paste("pasted".to_string()))
        );
        assert_eq!(EditCommand::Paste.to_event(None), None);
        assert_eq!(EditCommand::Paste.to_event(Some(String::new())), None);
    }

    #[test]
    fn test_labels_cover_all_commands() {
        for command in EditCommand::ALL {
            assert!(command.shortcut_label().starts_with("Ctrl+"));
            assert!(!command.label().is_empty());
        }
    }
}
