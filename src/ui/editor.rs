//! Single-line command editor.
//!
//! Owns the input buffer, the submission history and the autocomplete menu.
//! Keys are handled in priority order:
//!
//! 1. Menu active: ↑/↓ move the highlight, Tab/Enter fill the buffer with
//!    the highlighted command (without submitting), Esc dismisses the menu
//!    and clears the buffer.
//! 2. Enter submits the buffer, unless the session is busy.
//! 3. ↑/↓ walk the submission history.
//!
//! The editor never looks at command semantics beyond the prefix check the
//! menu needs; submissions are handed to the caller as raw strings.

use crate::content::CommandTable;
use crate::history::CommandHistory;

use super::menu::CompletionMenu;

/// Editor-level key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorKey {
    Char(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    Up,
    Down,
    Tab,
    Enter,
    Esc,
    /// Text inserted at the caret in one edit
    Paste(String),
}

/// Editor state
#[derive(Debug, Default)]
pub struct EditorState {
    /// Text being composed
    pub buffer: String,
    /// Caret position, in chars
    pub caret: usize,
    /// Previous submissions and recall cursor
    pub history: CommandHistory,
    /// Autocomplete menu derived from `buffer`
    pub menu: CompletionMenu,
    /// Whether keystrokes reach the editor
    pub focused: bool,
}

/// Line editor
#[derive(Debug, Default)]
pub struct LineEditor {
    state: EditorState,
}

impl LineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &str {
        &self.state.buffer
    }

    pub fn caret(&self) -> usize {
        self.state.caret
    }

    #[allow(dead_code)]
    pub fn history(&self) -> &CommandHistory {
        &self.state.history
    }

    pub fn menu(&self) -> &CompletionMenu {
        &self.state.menu
    }

    pub fn is_focused(&self) -> bool {
        self.state.focused
    }

    /// Focus-request hook
    pub fn focus(&mut self) {
        self.state.focused = true;
    }

    /// Handle one key.
    ///
    /// Returns the raw submitted line when the key submits the buffer.
    pub fn handle_key(&mut self, key: EditorKey, busy: bool, table: &CommandTable) -> Option<String> {
        if !self.state.focused {
            return None;
        }

        if self.state.menu.is_active() {
            match key {
                EditorKey::Up => {
                    self.state.menu.up();
                    return None;
                }
                EditorKey::Down => {
                    self.state.menu.down();
                    return None;
                }
                EditorKey::Tab | EditorKey::Enter => {
                    if let Some(command) = self.state.menu.confirm() {
                        self.replace_buffer(command, table);
                    }
                    return None;
                }
                EditorKey::Esc => {
                    self.state.menu.dismiss();
                    self.replace_buffer(String::new(), table);
                    return None;
                }
                _ => {}
            }
        }

        match key {
            EditorKey::Enter => {
                if busy {
                    return None;
                }
                return Some(self.submit(table));
            }
            EditorKey::Up => {
                if let Some(recalled) = self.state.history.recall_older().map(str::to_string) {
                    self.replace_buffer(recalled, table);
                }
            }
            EditorKey::Down => {
                let recalled = self
                    .state
                    .history
                    .recall_newer()
                    .map(str::to_string)
                    .unwrap_or_default();
                self.replace_buffer(recalled, table);
            }
            EditorKey::Esc => self.replace_buffer(String::new(), table),
            EditorKey::Tab => {}
            EditorKey::Char(ch) => self.insert(&ch.to_string(), table),
            EditorKey::Paste(text) => {
                let text: String = text.chars().filter(|c| !c.is_control()).collect();
                self.insert(&text, table);
            }
            EditorKey::Backspace => {
                if self.state.caret > 0 {
                    let at = self.byte_offset(self.state.caret - 1);
                    self.state.buffer.remove(at);
                    self.state.caret -= 1;
                    self.edited(table);
                }
            }
            EditorKey::Delete => {
                if self.state.caret < self.char_len() {
                    let at = self.byte_offset(self.state.caret);
                    self.state.buffer.remove(at);
                    self.edited(table);
                }
            }
            EditorKey::Left => self.state.caret = self.state.caret.saturating_sub(1),
            EditorKey::Right => self.state.caret = (self.state.caret + 1).min(self.char_len()),
            EditorKey::Home => self.state.caret = 0,
            EditorKey::End => self.state.caret = self.char_len(),
        }
        None
    }

    /// Fill the buffer with the menu candidate at `index` (mouse pick)
    pub fn pick_candidate(&mut self, index: usize, table: &CommandTable) {
        self.state.menu.select(index);
        if let Some(command) = self.state.menu.confirm() {
            self.replace_buffer(command, table);
            self.focus();
        }
    }

    /// Highlight the menu candidate at `index` (mouse hover)
    pub fn hover_candidate(&mut self, index: usize) {
        self.state.menu.select(index);
    }

    fn submit(&mut self, table: &CommandTable) -> String {
        let raw = std::mem::take(&mut self.state.buffer);
        self.state.caret = 0;
        self.state.history.add(raw.clone());
        self.state.menu.recompute("", table);
        raw
    }

    /// Insert at the caret as a user edit
    fn insert(&mut self, text: &str, table: &CommandTable) {
        if text.is_empty() {
            return;
        }
        let at = self.byte_offset(self.state.caret);
        self.state.buffer.insert_str(at, text);
        self.state.caret += text.chars().count();
        self.edited(table);
    }

    /// Buffer changed by the user: dismissal no longer applies
    fn edited(&mut self, table: &CommandTable) {
        self.state.menu.on_edit();
        self.state.menu.recompute(&self.state.buffer, table);
    }

    /// Buffer overwritten by recall or completion
    fn replace_buffer(&mut self, text: String, table: &CommandTable) {
        self.state.buffer = text;
        self.state.caret = self.char_len();
        self.state.menu.recompute(&self.state.buffer, table);
    }

    fn char_len(&self) -> usize {
        self.state.buffer.chars().count()
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.state
            .buffer
            .char_indices()
            .nth(char_idx)
            .map_or(self.state.buffer.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CommandTable {
        CommandTable::new("welcome")
            .with_command("/about", "About", "about")
            .with_command("/skills", "Skills", "skills")
            .with_command("/stack", "Stack", "stack")
            .with_command("/help", "Help", "help")
            .with_command("/history", "History", "history")
            .with_reset("Clear")
    }

    fn editor() -> LineEditor {
        let mut editor = LineEditor::new();
        editor.focus();
        editor
    }

    fn type_str(editor: &mut LineEditor, text: &str, table: &CommandTable) {
        for ch in text.chars() {
            editor.handle_key(EditorKey::Char(ch), false, table);
        }
    }

    fn submit(editor: &mut LineEditor, text: &str, table: &CommandTable) -> Option<String> {
        type_str(editor, text, table);
        // Exact commands never show the menu, so Enter submits
        editor.handle_key(EditorKey::Enter, false, table)
    }

    #[test]
    fn test_submit_raw_and_clear() {
        let table = table();
        let mut editor = editor();
        type_str(&mut editor, "  Hello ", &table);
        let submitted = editor.handle_key(EditorKey::Enter, false, &table);
        assert_eq!(submitted.as_deref(), Some("  Hello "));
        assert_eq!(editor.buffer(), "");
        assert_eq!(editor.history().iter().next(), Some("  Hello "));
        assert_eq!(editor.history().cursor(), None);
    }

    #[test]
    fn test_busy_ignores_enter() {
        let table = table();
        let mut editor = editor();
        type_str(&mut editor, "/about", &table);
        assert_eq!(editor.handle_key(EditorKey::Enter, true, &table), None);
        assert_eq!(editor.buffer(), "/about");
        assert!(editor.history().is_empty());
    }

    #[test]
    fn test_history_recall() {
        let table = table();
        let mut editor = editor();
        submit(&mut editor, "/about", &table);
        submit(&mut editor, "/skills", &table);

        editor.handle_key(EditorKey::Up, false, &table);
        assert_eq!(editor.buffer(), "/skills");
        editor.handle_key(EditorKey::Up, false, &table);
        assert_eq!(editor.buffer(), "/about");
        editor.handle_key(EditorKey::Up, false, &table);
        assert_eq!(editor.buffer(), "/about");

        editor.handle_key(EditorKey::Down, false, &table);
        assert_eq!(editor.buffer(), "/skills");
        editor.handle_key(EditorKey::Down, false, &table);
        assert_eq!(editor.buffer(), "");
        assert_eq!(editor.history().cursor(), None);
        assert_eq!(editor.history().len(), 2);
    }

    #[test]
    fn test_menu_confirm_fills_without_submitting() {
        let table = table();
        let mut editor = editor();
        type_str(&mut editor, "/h", &table);
        assert!(editor.menu().is_active());

        editor.handle_key(EditorKey::Down, false, &table);
        let submitted = editor.handle_key(EditorKey::Enter, false, &table);
        assert_eq!(submitted, None);
        assert_eq!(editor.buffer(), "/history");
        assert!(!editor.menu().is_active());
        assert!(editor.history().is_empty());

        // Now a complete command; Enter submits it
        let submitted = editor.handle_key(EditorKey::Enter, false, &table);
        assert_eq!(submitted.as_deref(), Some("/history"));
    }

    #[test]
    fn test_tab_completes() {
        let table = table();
        let mut editor = editor();
        type_str(&mut editor, "/ab", &table);
        editor.handle_key(EditorKey::Tab, false, &table);
        assert_eq!(editor.buffer(), "/about");
        assert_eq!(editor.caret(), 6);
    }

    #[test]
    fn test_menu_navigation_does_not_touch_history() {
        let table = table();
        let mut editor = editor();
        submit(&mut editor, "/about", &table);
        type_str(&mut editor, "/s", &table);
        editor.handle_key(EditorKey::Up, false, &table);
        assert_eq!(editor.buffer(), "/s");
        assert_eq!(editor.history().cursor(), None);
        assert_eq!(editor.menu().state().unwrap().selected_candidate(), Some("/stack"));
    }

    #[test]
    fn test_escape_dismisses_and_clears() {
        let table = table();
        let mut editor = editor();
        type_str(&mut editor, "/s", &table);
        editor.handle_key(EditorKey::Esc, false, &table);
        assert_eq!(editor.buffer(), "");
        assert!(!editor.menu().is_active());
        assert!(editor.menu().is_dismissed());

        // Next edit re-enables the menu
        type_str(&mut editor, "/s", &table);
        assert!(editor.menu().is_active());
    }

    #[test]
    fn test_selection_persists_across_edits() {
        let table = table();
        let mut editor = editor();
        type_str(&mut editor, "/", &table);
        // /about, /skills, ... : move to /skills
        editor.handle_key(EditorKey::Down, false, &table);
        assert_eq!(editor.menu().state().unwrap().selected_candidate(), Some("/skills"));

        type_str(&mut editor, "s", &table);
        let state = editor.menu().state().unwrap();
        assert_eq!(state.candidates, vec!["/skills", "/stack"]);
        assert_eq!(state.selected_candidate(), Some("/skills"));

        editor.handle_key(EditorKey::Backspace, false, &table);
        type_str(&mut editor, "h", &table);
        assert_eq!(editor.menu().state().unwrap().selected, 0);
    }

    #[test]
    fn test_caret_editing() {
        let table = table();
        let mut editor = editor();
        type_str(&mut editor, "héllo", &table);
        editor.handle_key(EditorKey::Home, false, &table);
        editor.handle_key(EditorKey::Delete, false, &table);
        editor.handle_key(EditorKey::End, false, &table);
        editor.handle_key(EditorKey::Left, false, &table);
        editor.handle_key(EditorKey::Backspace, false, &table);
        assert_eq!(editor.buffer(), "élo");
        assert_eq!(editor.caret(), 2);

        editor.handle_key(EditorKey::Paste("x\ny".to_string()), false, &table);
        assert_eq!(editor.buffer(), "élxyo");
    }

    #[test]
    fn test_unfocused_ignores_keys() {
        let table = table();
        let mut editor = LineEditor::new();
        editor.handle_key(EditorKey::Char('a'), false, &table);
        assert_eq!(editor.buffer(), "");
        assert_eq!(editor.handle_key(EditorKey::Enter, false, &table), None);
    }

    #[test]
    fn test_pick_candidate() {
        let table = table();
        let mut editor = editor();
        type_str(&mut editor, "/s", &table);
        editor.pick_candidate(1, &table);
        assert_eq!(editor.buffer(), "/stack");
    }
}
