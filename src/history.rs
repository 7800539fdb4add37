//! Command history for the line editor
//!
//! Stores every submitted line (newest first) and walks through them with
//! the up/down keys. Recall never changes the stored entries.

use std::collections::VecDeque;

/// Submitted command lines plus the recall cursor
#[derive(Debug, Default)]
pub struct CommandHistory {
    /// Raw submissions, most recent first
    entries: VecDeque<String>,
    /// Index of the recalled entry (None = not recalling)
    cursor: Option<usize>,
}

impl CommandHistory {
    /// Create an empty history
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submission verbatim and stop recalling.
    ///
    /// Empty and repeated lines are kept; nothing is deduplicated.
    pub fn add(&mut self, command: String) {
        self.entries.push_front(command);
        self.cursor = None;
    }

    /// Step one entry older, stopping at the oldest.
    /// Returns the recalled text, or None if the history is empty.
    pub fn recall_older(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() - 1;
        let next = match self.cursor {
            Some(idx) => (idx + 1).min(last),
            None => 0,
        };
        self.cursor = Some(next);
        self.entries.get(next).map(String::as_str)
    }

    /// Step one entry newer.
    /// Returns None once stepped past the newest entry (cursor back to none).
    pub fn recall_newer(&mut self) -> Option<&str> {
        match self.cursor {
            Some(idx) if idx > 0 => {
                self.cursor = Some(idx - 1);
                self.entries.get(idx - 1).map(String::as_str)
            }
            _ => {
                self.cursor = None;
                None
            }
        }
    }

    /// Current recall position
    #[allow(dead_code)]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Entries, most recent first
    #[allow(dead_code)]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Get entry count
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
