//! Autocomplete menu for the line editor.
//!
//! The menu is derived from the editor buffer and the command table. It
//! appears while the buffer is a partial command name and lists the
//! commands that start with it.
//!
//! # Features
//!
//! - Selection tracks the candidate by name, so narrowing the buffer keeps
//!   the same command highlighted while it is still listed
//! - Keyboard navigation (↑/↓) wraps in both directions
//! - Esc dismisses the menu until the buffer is edited again
//!
//! # Example
//!
//! ```ignore
//! let mut menu = CompletionMenu::new();
//! menu.recompute("/h", &table);
//! menu.down();
//! let picked = menu.confirm();
//! ```

use crate::content::{CommandTable, COMMAND_PREFIX};

/// Visible menu contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuState {
    /// Matching command names in table order
    pub candidates: Vec<String>,
    /// Index of the highlighted candidate
    pub selected: usize,
}

impl MenuState {
    /// Currently highlighted command name
    pub fn selected_candidate(&self) -> Option<&str> {
        self.candidates.get(self.selected).map(String::as_str)
    }
}

/// Autocomplete menu state and behavior.
#[derive(Debug, Default)]
pub struct CompletionMenu {
    /// Active menu, if any
    state: Option<MenuState>,
    /// Last candidate chosen by navigation
    selected_name: Option<String>,
    /// Suppresses the menu until the next buffer edit
    dismissed: bool,
}

impl CompletionMenu {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the menu is currently shown
    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&MenuState> {
        self.state.as_ref()
    }

    #[allow(dead_code)]
    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    /// Rebuild the menu for a new buffer value
    pub fn recompute(&mut self, buffer: &str, table: &CommandTable) {
        self.state = self.derive(buffer, table);
    }

    fn derive(&self, buffer: &str, table: &CommandTable) -> Option<MenuState> {
        if self.dismissed || !buffer.starts_with(COMMAND_PREFIX) {
            return None;
        }

        let needle = buffer.to_lowercase();
        // A complete command needs no suggestions
        if table.contains(&needle) {
            return None;
        }

        let candidates: Vec<String> = table
            .names()
            .filter(|name| name.starts_with(&needle))
            .map(str::to_string)
            .collect();
        if candidates.is_empty() {
            return None;
        }

        let selected = self
            .selected_name
            .as_ref()
            .and_then(|name| candidates.iter().position(|c| c == name))
            .unwrap_or(0);
        Some(MenuState {
            candidates,
            selected,
        })
    }

    /// Re-enable recomputation after a user edit
    pub fn on_edit(&mut self) {
        self.dismissed = false;
    }

    /// Move selection up
    pub fn up(&mut self) {
        if let Some(state) = self.state.as_mut() {
            let len = state.candidates.len();
            state.selected = if state.selected == 0 { len - 1 } else { state.selected - 1 };
            self.selected_name = Some(state.candidates[state.selected].clone());
        }
    }

    /// Move selection down
    pub fn down(&mut self) {
        if let Some(state) = self.state.as_mut() {
            let len = state.candidates.len();
            state.selected = if state.selected + 1 >= len { 0 } else { state.selected + 1 };
            self.selected_name = Some(state.candidates[state.selected].clone());
        }
    }

    /// Highlight a candidate by index (mouse hover)
    pub fn select(&mut self, index: usize) {
        if let Some(state) = self.state.as_mut() {
            if let Some(name) = state.candidates.get(index) {
                state.selected = index;
                self.selected_name = Some(name.clone());
            }
        }
    }

    /// Take the highlighted candidate and forget the tracked selection
    pub fn confirm(&mut self) -> Option<String> {
        let picked = self
            .state
            .as_ref()
            .and_then(MenuState::selected_candidate)
            .map(str::to_string);
        self.selected_name = None;
        picked
    }

    /// Hide the menu until the buffer is edited again
    pub fn dismiss(&mut self) {
        self.state = None;
        self.selected_name = None;
        self.dismissed = true;
    }
}
