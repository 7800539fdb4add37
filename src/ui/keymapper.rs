//! Key mapping for terminal input
//!
//! Converts crossterm key and mouse events into prompt actions.

use bitflags::bitflags;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::ui::editor::EditorKey;

bitflags! {
    /// Modifier keys
    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
    }
}

impl From<KeyModifiers> for Modifiers {
    fn from(mods: KeyModifiers) -> Self {
        let mut result = Modifiers::empty();
        if mods.contains(KeyModifiers::SHIFT) {
            result |= Modifiers::SHIFT;
        }
        if mods.contains(KeyModifiers::CONTROL) {
            result |= Modifiers::CTRL;
        }
        if mods.contains(KeyModifiers::ALT) {
            result |= Modifiers::ALT;
        }
        result
    }
}

/// Action produced by a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Forward to the line editor
    Editor(EditorKey),
    /// Scroll the history one page up
    PageUp,
    /// Scroll the history one page down
    PageDown,
    /// Paste from the system clipboard
    Paste,
    /// Leave the application
    Quit,
}

/// Action produced by a mouse event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAction {
    /// Left click at (column, row)
    Click(u16, u16),
    /// Pointer moved to (column, row)
    Hover(u16, u16),
    ScrollUp,
    ScrollDown,
}

/// Lines scrolled per wheel notch
pub const WHEEL_LINES: usize = 3;

/// Key mapper for converting terminal events to actions
pub struct KeyMapper;

impl KeyMapper {
    /// Map a crossterm KeyEvent to an action
    pub fn map(event: &KeyEvent) -> Option<KeyAction> {
        // Windows reports releases too
        if event.kind == KeyEventKind::Release {
            return None;
        }

        let mods = Modifiers::from(event.modifiers);

        match event.code {
            KeyCode::Char(ch) => Self::map_char(ch, mods),

            KeyCode::Enter => Some(KeyAction::Editor(EditorKey::Enter)),
            KeyCode::Backspace => Some(KeyAction::Editor(EditorKey::Backspace)),
            KeyCode::Delete => Some(KeyAction::Editor(EditorKey::Delete)),
            KeyCode::Tab => Some(KeyAction::Editor(EditorKey::Tab)),
            KeyCode::Esc => Some(KeyAction::Editor(EditorKey::Esc)),

            // Arrow keys
            KeyCode::Up => Some(KeyAction::Editor(EditorKey::Up)),
            KeyCode::Down => Some(KeyAction::Editor(EditorKey::Down)),
            KeyCode::Left => Some(KeyAction::Editor(EditorKey::Left)),
            KeyCode::Right => Some(KeyAction::Editor(EditorKey::Right)),

            // Navigation keys
            KeyCode::Home => Some(KeyAction::Editor(EditorKey::Home)),
            KeyCode::End => Some(KeyAction::Editor(EditorKey::End)),
            KeyCode::PageUp => Some(KeyAction::PageUp),
            KeyCode::PageDown => Some(KeyAction::PageDown),

            _ => None,
        }
    }

    /// Map a character with modifiers
    fn map_char(ch: char, mods: Modifiers) -> Option<KeyAction> {
        if mods.contains(Modifiers::CTRL) && !mods.contains(Modifiers::ALT) {
            return match ch.to_ascii_lowercase() {
                'c' | 'd' => Some(KeyAction::Quit),
                'v' => Some(KeyAction::Paste),
                // Readline-style line editing
                'a' => Some(KeyAction::Editor(EditorKey::Home)),
                'e' => Some(KeyAction::Editor(EditorKey::End)),
                'p' => Some(KeyAction::Editor(EditorKey::Up)),
                'n' => Some(KeyAction::Editor(EditorKey::Down)),
                _ => None,
            };
        }

        // Alt combinations are not bound
        if mods.contains(Modifiers::ALT) {
            return None;
        }

        Some(KeyAction::Editor(EditorKey::Char(ch)))
    }

    /// Map a crossterm MouseEvent to an action
    pub fn map_mouse(event: &MouseEvent) -> Option<MouseAction> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                Some(MouseAction::Click(event.column, event.row))
            }
            MouseEventKind::Moved => Some(MouseAction::Hover(event.column, event.row)),
            MouseEventKind::ScrollUp => Some(MouseAction::ScrollUp),
            MouseEventKind::ScrollDown => Some(MouseAction::ScrollDown),
            _ => None,
        }
    }

    /// Normalize pasted text into a single prompt line
    pub fn paste_key(text: &str) -> Option<EditorKey> {
        let line: String = text
            .chars()
            .map(|c| if c == '\n' || c == '\t' { ' ' } else { c })
            .filter(|c| !c.is_control())
            .collect();
        if line.is_empty() {
            None
        } else {
            Some(EditorKey::Paste(line))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_char_keys() {
        assert_eq!(
            KeyMapper::map(&key(KeyCode::Char('a'), KeyModifiers::NONE)),
            Some(KeyAction::Editor(EditorKey::Char('a')))
        );
        assert_eq!(
            KeyMapper::map(&key(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some(KeyAction::Editor(EditorKey::Char('A')))
        );
        assert_eq!(KeyMapper::map(&key(KeyCode::Char('x'), KeyModifiers::ALT)), None);
    }

    #[test]
    fn test_ctrl_keys() {
        assert_eq!(
            KeyMapper::map(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(KeyAction::Quit)
        );
        assert_eq!(
            KeyMapper::map(&key(KeyCode::Char('d'), KeyModifiers::CONTROL)),
            Some(KeyAction::Quit)
        );
        assert_eq!(
            KeyMapper::map(&key(KeyCode::Char('v'), KeyModifiers::CONTROL)),
            Some(KeyAction::Paste)
        );
        assert_eq!(
            KeyMapper::map(&key(KeyCode::Char('a'), KeyModifiers::CONTROL)),
            Some(KeyAction::Editor(EditorKey::Home))
        );
        assert_eq!(KeyMapper::map(&key(KeyCode::Char('z'), KeyModifiers::CONTROL)), None);
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(
            KeyMapper::map(&key(KeyCode::Up, KeyModifiers::NONE)),
            Some(KeyAction::Editor(EditorKey::Up))
        );
        assert_eq!(
            KeyMapper::map(&key(KeyCode::PageUp, KeyModifiers::NONE)),
            Some(KeyAction::PageUp)
        );
        assert_eq!(KeyMapper::map(&key(KeyCode::F(5), KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_release_ignored() {
        let mut event = key(KeyCode::Enter, KeyModifiers::NONE);
        event.kind = KeyEventKind::Release;
        assert_eq!(KeyMapper::map(&event), None);
    }

    #[test]
    fn test_mouse_mapping() {
        let event = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 4,
            row: 7,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(KeyMapper::map_mouse(&event), Some(MouseAction::Click(4, 7)));

        let event = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(KeyMapper::map_mouse(&event), Some(MouseAction::ScrollDown));

        let event = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Right),
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(KeyMapper::map_mouse(&event), None);
    }

    #[test]
    fn test_paste_flattens_lines() {
        assert_eq!(
            KeyMapper::paste_key("/about\r\nmore"),
            Some(EditorKey::Paste("/about more".to_string()))
        );
        assert_eq!(KeyMapper::paste_key("\r"), None);
    }
}
