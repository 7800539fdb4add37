//! Output history entries.

use super::format::DisplayBlock;

/// Presentation class of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleTag {
    /// Echo of a submitted command
    Command,
    /// Error output
    Error,
}

/// Display payload of an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryContent {
    /// Pre-rendered block from the formatter
    Block(DisplayBlock),
    /// Plain text line
    Text(String),
}

/// One unit of rendered history.
///
/// Entries are never modified after they are appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputEntry {
    content: EntryContent,
    style: Option<StyleTag>,
}

impl OutputEntry {
    pub fn block(block: DisplayBlock, style: Option<StyleTag>) -> Self {
        Self {
            content: EntryContent::Block(block),
            style,
        }
    }

    pub fn text(text: impl Into<String>, style: Option<StyleTag>) -> Self {
        Self {
            content: EntryContent::Text(text.into()),
            style,
        }
    }

    /// Echo of a raw submission, kept verbatim
    pub fn command_echo(raw: &str) -> Self {
        Self::text(raw, Some(StyleTag::Command))
    }

    pub fn content(&self) -> &EntryContent {
        &self.content
    }

    pub fn style(&self) -> Option<StyleTag> {
        self.style
    }

    /// Plain text rendition (block lines joined by newlines)
    pub fn plain_text(&self) -> String {
        match &self.content {
            EntryContent::Block(block) => block.plain_text(),
            EntryContent::Text(text) => text.clone(),
        }
    }
}
