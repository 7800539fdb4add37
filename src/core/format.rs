//! Document formatting.
//!
//! Turns one document of marked-up text into an ordered sequence of
//! [`DisplayBlock`]s. The session only depends on the [`TextFormatter`]
//! trait; [`MarkdownFormatter`] is the default implementation.
//!
//! # Block Model
//!
//! ```text
//! document ──▶ [DisplayBlock, DisplayBlock, ...]
//!                   │
//!                   ├── lines: [StyledLine]  (spans with SpanFlags)
//!                   └── links: [Link]        (spans point at links by index)
//! ```

use bitflags::bitflags;
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::content::COMMAND_PREFIX;

/// Width of a horizontal rule, in columns
const RULE_WIDTH: usize = 40;

bitflags! {
    /// Inline style flags of a span
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct SpanFlags: u8 {
        const BOLD    = 0b0000_0001;
        const ITALIC  = 0b0000_0010;
        const CODE    = 0b0000_0100;
        const LINK    = 0b0000_1000;
        const HEADING = 0b0001_0000;
        const STRIKE  = 0b0010_0000;
        const MUTED   = 0b0100_0000;
    }
}

/// A run of text sharing one style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub text: String,
    pub flags: SpanFlags,
    /// Index into the owning block's `links`
    pub link: Option<usize>,
}

/// One display line of a block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledLine {
    pub spans: Vec<StyledSpan>,
}

impl StyledLine {
    /// Concatenated text of all spans
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// A hyperlink inside a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    /// Target lies outside the session and opens in a new external context
    pub external: bool,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        let href = href.into();
        let external = !href.starts_with(COMMAND_PREFIX);
        Self { href, external }
    }

    /// Internal navigation link that is submitted as a command when activated
    pub fn is_command(&self) -> bool {
        !self.external
    }
}

/// Structural kind of a block, for presentation only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    Heading(u8),
    List,
    CodeBlock,
    Quote,
    Rule,
    Table,
}

/// One opaque, order-preserving unit of formatted output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayBlock {
    pub kind: BlockKind,
    pub lines: Vec<StyledLine>,
    pub links: Vec<Link>,
}

impl DisplayBlock {
    /// Plain text of the block, one line per display line
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(StyledLine::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Link referenced by a span, if any
    pub fn link_for(&self, span: &StyledSpan) -> Option<&Link> {
        span.link.and_then(|idx| self.links.get(idx))
    }
}

/// Converts a document into display blocks.
///
/// Implementations must preserve block order and must not fail; a document
/// with no content yields an empty sequence.
pub trait TextFormatter {
    fn format(&self, document: &str) -> Vec<DisplayBlock>;
}

/// Markdown formatter built on pulldown-cmark.
///
/// Every top-level Markdown element becomes one block. Single newlines inside
/// a paragraph are kept as line breaks. Raw HTML is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl TextFormatter for MarkdownFormatter {
    fn format(&self, document: &str) -> Vec<DisplayBlock> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);

        let mut builder = BlockBuilder::default();
        for event in Parser::new_ext(document, options) {
            builder.process_event(event);
        }
        builder.finish()
    }
}

/// Open list and its next item number (None for bullets)
#[derive(Debug, Clone, Copy)]
struct ListLevel {
    next_number: Option<u64>,
}

/// Event sink collecting blocks
#[derive(Default)]
struct BlockBuilder {
    blocks: Vec<DisplayBlock>,
    /// Nesting depth of open tags; 0 between top-level blocks
    depth: usize,
    kind: Option<BlockKind>,
    lines: Vec<StyledLine>,
    links: Vec<Link>,
    current: Vec<StyledSpan>,
    flag_stack: Vec<SpanFlags>,
    active_link: Option<usize>,
    lists: Vec<ListLevel>,
    quote_depth: usize,
    in_code_block: bool,
    table_row: Vec<String>,
    table_cell: String,
    in_table_cell: bool,
}

impl BlockBuilder {
    fn flags(&self) -> SpanFlags {
        self.flag_stack.last().copied().unwrap_or_default()
    }

    fn push_flags(&mut self, extra: SpanFlags) {
        let flags = self.flags() | extra;
        self.flag_stack.push(flags);
    }

    fn pop_flags(&mut self) {
        self.flag_stack.pop();
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => {
                if self.depth == 0 {
                    self.open_block(block_kind(&tag));
                }
                self.depth += 1;
                self.start_tag(tag);
            }
            Event::End(tag) => {
                self.end_tag(tag);
                self.depth = self.depth.saturating_sub(1);
                if self.depth == 0 {
                    self.close_block();
                }
            }
            Event::Text(text) => self.add_text(&text),
            Event::Code(code) => {
                if self.in_table_cell {
                    self.table_cell.push_str(&code);
                } else {
                    let flags = self.flags() | SpanFlags::CODE;
                    self.push_span(&code, flags);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if self.in_table_cell {
                    self.table_cell.push(' ');
                } else {
                    self.flush_line();
                }
            }
            Event::Rule => {
                let top_level = self.depth == 0;
                if top_level {
                    self.open_block(BlockKind::Rule);
                }
                self.flush_line();
                self.push_span(&"─".repeat(RULE_WIDTH), SpanFlags::MUTED);
                self.flush_line();
                if top_level {
                    self.close_block();
                }
            }
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.push_span(marker, SpanFlags::MUTED);
            }
            // Raw HTML, footnotes and math have no terminal rendering
            _ => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { .. } => self.push_flags(SpanFlags::HEADING | SpanFlags::BOLD),
            Tag::Emphasis => self.push_flags(SpanFlags::ITALIC),
            Tag::Strong => self.push_flags(SpanFlags::BOLD),
            Tag::Strikethrough => self.push_flags(SpanFlags::STRIKE),
            Tag::Link { dest_url, .. } => {
                self.links.push(Link::new(dest_url.to_string()));
                self.active_link = Some(self.links.len() - 1);
                self.push_flags(SpanFlags::LINK);
            }
            Tag::CodeBlock(_) => {
                self.in_code_block = true;
                self.push_flags(SpanFlags::CODE);
            }
            Tag::BlockQuote(_) => {
                self.flush_line();
                self.quote_depth += 1;
            }
            Tag::List(start) => {
                self.flush_line();
                self.lists.push(ListLevel { next_number: start });
            }
            Tag::Item => {
                self.flush_line();
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(ListLevel { next_number: Some(n) }) => {
                        let marker = format!("{}. ", n);
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.push_span(&format!("{}{}", indent, marker), SpanFlags::MUTED);
            }
            Tag::TableCell => {
                self.in_table_cell = true;
                self.table_cell.clear();
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) | TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.pop_flags();
            }
            TagEnd::Link => {
                self.active_link = None;
                self.pop_flags();
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.pop_flags();
                self.flush_line();
            }
            TagEnd::Paragraph | TagEnd::Item => self.flush_line(),
            TagEnd::BlockQuote(_) => {
                self.flush_line();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            TagEnd::List(_) => {
                self.flush_line();
                self.lists.pop();
            }
            TagEnd::TableCell => {
                self.in_table_cell = false;
                let cell = std::mem::take(&mut self.table_cell);
                self.table_row.push(cell.trim().to_string());
            }
            TagEnd::TableHead | TagEnd::TableRow => {
                let row = std::mem::take(&mut self.table_row);
                self.push_span(&row.join("  "), SpanFlags::empty());
                self.flush_line();
            }
            _ => {}
        }
    }

    fn add_text(&mut self, text: &str) {
        if self.in_table_cell {
            self.table_cell.push_str(text);
            return;
        }

        if self.in_code_block {
            // Code block text carries its own newlines
            let mut parts = text.split('\n').peekable();
            while let Some(part) = parts.next() {
                if !part.is_empty() {
                    let flags = self.flags();
                    self.push_span(part, flags);
                }
                if parts.peek().is_some() {
                    self.flush_line();
                }
            }
            return;
        }

        let flags = self.flags();
        self.push_span(text, flags);
    }

    fn push_span(&mut self, text: &str, flags: SpanFlags) {
        if text.is_empty() {
            return;
        }
        if self.current.is_empty() && self.quote_depth > 0 {
            self.current.push(StyledSpan {
                text: "│ ".repeat(self.quote_depth),
                flags: SpanFlags::MUTED,
                link: None,
            });
        }

        let link = self.active_link;
        // Merge with the previous span when the style is identical
        if let Some(last) = self.current.last_mut() {
            if last.flags == flags && last.link == link {
                last.text.push_str(text);
                return;
            }
        }
        self.current.push(StyledSpan {
            text: text.to_string(),
            flags,
            link,
        });
    }

    fn flush_line(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let spans = std::mem::take(&mut self.current);
        self.lines.push(StyledLine { spans });
    }

    fn open_block(&mut self, kind: BlockKind) {
        self.close_block();
        self.kind = Some(kind);
    }

    fn close_block(&mut self) {
        self.flush_line();
        let Some(kind) = self.kind.take() else {
            return;
        };
        let lines = std::mem::take(&mut self.lines);
        let links = std::mem::take(&mut self.links);
        self.flag_stack.clear();
        self.active_link = None;
        self.lists.clear();
        self.quote_depth = 0;
        self.in_code_block = false;

        if lines.is_empty() {
            return;
        }
        self.blocks.push(DisplayBlock { kind, lines, links });
    }

    fn finish(mut self) -> Vec<DisplayBlock> {
        self.close_block();
        self.blocks
    }
}

/// Block kind for a top-level opening tag
fn block_kind(tag: &Tag<'_>) -> BlockKind {
    match tag {
        Tag::Heading { level, .. } => BlockKind::Heading(heading_number(*level)),
        Tag::List(_) => BlockKind::List,
        Tag::CodeBlock(_) => BlockKind::CodeBlock,
        Tag::BlockQuote(_) => BlockKind::Quote,
        Tag::Table(_) => BlockKind::Table,
        _ => BlockKind::Paragraph,
    }
}

fn heading_number(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(doc: &str) -> Vec<DisplayBlock> {
        MarkdownFormatter::new().format(doc)
    }

    #[test]
    fn test_empty_document() {
        assert!(format("").is_empty());
        assert!(format("   \n\n  ").is_empty());
    }

    #[test]
    fn test_block_order() {
        let blocks = format("# Title\n\nFirst paragraph.\n\n- one\n- two\n\nLast.");
        let kinds: Vec<BlockKind> = blocks.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![
                BlockKind::Heading(1),
                BlockKind::Paragraph,
                BlockKind::List,
                BlockKind::Paragraph,
            ]
        );
        assert_eq!(blocks[0].plain_text(), "Title");
        assert_eq!(blocks[2].plain_text(), "• one\n• two");
        assert_eq!(blocks[3].plain_text(), "Last.");
    }

    #[test]
    fn test_soft_break_is_line_break() {
        let blocks = format("line one\nline two");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines.len(), 2);
        assert_eq!(blocks[0].lines[1].text(), "line two");
    }

    #[test]
    fn test_links_are_classified() {
        let blocks = format("See [/about](/about) or [site](https://example.com).");
        let block = &blocks[0];
        assert_eq!(block.links.len(), 2);
        assert!(block.links[0].is_command());
        assert_eq!(block.links[0].href, "/about");
        assert!(block.links[1].external);

        let link_span = block.lines[0]
            .spans
            .iter()
            .find(|s| s.text == "/about")
            .unwrap();
        assert!(link_span.flags.contains(SpanFlags::LINK));
        assert_eq!(block.link_for(link_span).unwrap().href, "/about");
    }

    #[test]
    fn test_ordered_list_numbers() {
        let blocks = format("3. three\n4. four");
        assert_eq!(blocks[0].plain_text(), "3. three\n4. four");
    }

    #[test]
    fn test_code_block_lines() {
        let blocks = format("```\nfn main() {}\nlet x = 1;\n```");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::CodeBlock);
        assert_eq!(blocks[0].lines.len(), 2);
        assert!(blocks[0].lines[0].spans[0].flags.contains(SpanFlags::CODE));
    }

    #[test]
    fn test_rule_and_table() {
        let blocks = format("a\n\n---\n\n| k | v |\n|---|---|\n| x | y |");
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[1].kind, BlockKind::Rule);
        assert_eq!(blocks[2].kind, BlockKind::Table);
        assert_eq!(blocks[2].plain_text(), "k  v\nx  y");
    }

    #[test]
    fn test_input_not_mutated() {
        let doc = String::from("**bold** text");
        let _ = format(&doc);
        assert_eq!(doc, "**bold** text");
    }
}
