//! Terminal renderer for the session screen.
//!
//! The screen has two regions:
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ history (scrollable)         │
//! │ ...                          │
//! │   ┌──────────────────────┐   │
//! │   │ /help    Commands    │   │  ← autocomplete menu overlay
//! │   └──────────────────────┘   │
//! │ ❯ /he_                       │  ← prompt line
//! └──────────────────────────────┘
//! ```
//!
//! History entries are laid out into wrapped [`ViewLine`]s by the pure
//! [`layout_history`] function; the renderer only windows and paints them.
//! Every painted link and menu item is recorded in a [`HitMap`] so mouse
//! clicks can be resolved against the last frame.
//!
//! Frames use synchronized updates to prevent tearing:
//!
//! ```text
//! begin_frame()  → Hide cursor, disable autowrap, start sync
//!     ↓
//! render content → History, menu, prompt
//!     ↓
//! end_frame()    → Place cursor, enable autowrap, end sync, flush
//! ```

use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{
        DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    },
    execute,
    style::{Attribute, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::config::{Color, ColorScheme};
use crate::content::CommandTable;
use crate::core::entry::{EntryContent, OutputEntry, StyleTag};
use crate::core::format::{DisplayBlock, Link, SpanFlags, StyledLine};
use crate::ui::editor::LineEditor;

/// Prompt shown before the buffer and before echoed commands
pub const PROMPT: &str = "❯ ";

/// Shown in an empty prompt
pub const PLACEHOLDER: &str = "Type a command...";

/// Begin a render frame (synchronized update, hide cursor, disable autowrap)
fn begin_frame<W: Write>(out: &mut W) -> io::Result<()> {
    write!(out, "\x1b[?2026h")?; // Begin synchronized update
    write!(out, "\x1b[?7l")?; // Disable autowrap
    execute!(out, Hide)?;
    Ok(())
}

/// End a render frame (place cursor, enable autowrap, end synchronized update, flush)
fn end_frame<W: Write>(out: &mut W, cursor: Option<(u16, u16)>) -> io::Result<()> {
    if let Some((col, row)) = cursor {
        execute!(out, MoveTo(col, row), Show)?;
    }
    write!(out, "\x1b[?7h")?; // Enable autowrap
    write!(out, "\x1b[?2026l")?; // End synchronized update
    out.flush()?;
    Ok(())
}

/// Color role of a painted segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Text,
    Muted,
    Heading,
    Link,
    Code,
    Command,
    Error,
    Prompt,
}

impl Tone {
    fn color(self, cs: &ColorScheme) -> Color {
        match self {
            Tone::Text => cs.text,
            Tone::Muted => cs.muted,
            Tone::Heading => cs.heading,
            Tone::Link => cs.link,
            Tone::Code => cs.code,
            Tone::Command => cs.command,
            Tone::Error => cs.error,
            Tone::Prompt => cs.prompt,
        }
    }
}

/// Run of text painted with one style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub tone: Tone,
    pub bold: bool,
    pub italic: bool,
    pub strike: bool,
    /// Link target, for hit testing
    pub link: Option<Link>,
}

impl Segment {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
            bold: false,
            italic: false,
            strike: false,
            link: None,
        }
    }

    fn with_text(&self, text: String) -> Self {
        Self {
            text,
            link: self.link.clone(),
            ..*self
        }
    }

    fn width(&self) -> usize {
        self.text.width()
    }
}

/// One screen row of history
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewLine {
    pub segments: Vec<Segment>,
}

impl ViewLine {
    /// Concatenated text of all segments
    #[allow(dead_code)]
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Lay out the whole history for a given screen width.
///
/// Echoed commands get the prompt prefix. Each block entry is followed by a
/// blank line. Lines longer than `width` wrap at character boundaries.
pub fn layout_history(history: &[OutputEntry], width: usize) -> Vec<ViewLine> {
    let mut lines = Vec::new();
    for entry in history {
        match entry.content() {
            EntryContent::Text(text) => {
                let segments = match entry.style() {
                    Some(StyleTag::Command) => vec![
                        Segment::new(PROMPT, Tone::Prompt),
                        Segment::new(text.as_str(), Tone::Command),
                    ],
                    Some(StyleTag::Error) => vec![Segment::new(text.as_str(), Tone::Error)],
                    None => vec![Segment::new(text.as_str(), Tone::Text)],
                };
                lines.extend(wrap_segments(segments, width));
            }
            EntryContent::Block(block) => {
                for line in &block.lines {
                    lines.extend(wrap_segments(block_segments(block, line, entry.style()), width));
                }
                lines.push(ViewLine::default());
            }
        }
    }
    lines
}

// Map formatter spans to painted segments
fn block_segments(block: &DisplayBlock, line: &StyledLine, style: Option<StyleTag>) -> Vec<Segment> {
    line.spans
        .iter()
        .map(|span| {
            let flags = span.flags;
            let tone = if flags.contains(SpanFlags::LINK) {
                Tone::Link
            } else if flags.contains(SpanFlags::CODE) {
                Tone::Code
            } else if flags.contains(SpanFlags::HEADING) {
                Tone::Heading
            } else if flags.contains(SpanFlags::MUTED) {
                Tone::Muted
            } else if style == Some(StyleTag::Error) {
                Tone::Error
            } else {
                Tone::Text
            };
            Segment {
                text: span.text.clone(),
                tone,
                bold: flags.contains(SpanFlags::BOLD),
                italic: flags.contains(SpanFlags::ITALIC),
                strike: flags.contains(SpanFlags::STRIKE),
                link: block.link_for(span).cloned(),
            }
        })
        .collect()
}

/// Split segments into rows no wider than `width` columns
pub fn wrap_segments(segments: Vec<Segment>, width: usize) -> Vec<ViewLine> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = ViewLine::default();
    let mut used = 0;

    for segment in segments {
        let mut piece = String::new();
        for ch in segment.text.chars() {
            let w = ch.width().unwrap_or(0);
            if used + w > width && used > 0 {
                if !piece.is_empty() {
                    current.segments.push(segment.with_text(std::mem::take(&mut piece)));
                }
                lines.push(std::mem::take(&mut current));
                used = 0;
            }
            piece.push(ch);
            used += w;
        }
        if !piece.is_empty() {
            current.segments.push(segment.with_text(piece));
        }
    }
    lines.push(current);
    lines
}

/// Index range of the lines visible in a window of `rows` rows,
/// `scroll` lines above the bottom. Returns the clamped scroll too.
pub fn visible_window(total: usize, rows: usize, scroll: usize) -> (std::ops::Range<usize>, usize) {
    let max_scroll = total.saturating_sub(rows);
    let scroll = scroll.min(max_scroll);
    let end = total - scroll;
    let start = end.saturating_sub(rows);
    (start..end, scroll)
}

/// Truncate `text` to at most `width` columns
fn truncate_to_width(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out
}

/// Clickable thing on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    /// Link in the history
    Link(Link),
    /// Autocomplete candidate by index
    MenuItem(usize),
}

#[derive(Debug, Clone)]
struct HitRegion {
    row: u16,
    start: u16,
    end: u16,
    target: HitTarget,
}

/// Clickable regions of the last frame
#[derive(Debug, Default)]
pub struct HitMap {
    regions: Vec<HitRegion>,
}

impl HitMap {
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    /// Register columns `start..end` of `row`
    pub fn push(&mut self, row: u16, start: u16, end: u16, target: HitTarget) {
        if start < end {
            self.regions.push(HitRegion { row, start, end, target });
        }
    }

    /// Topmost target at a cell (later regions are painted over earlier ones)
    pub fn hit_test(&self, col: u16, row: u16) -> Option<&HitTarget> {
        self.regions
            .iter()
            .rev()
            .find(|r| r.row == row && col >= r.start && col < r.end)
            .map(|r| &r.target)
    }
}

/// Placement of the autocomplete popup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuGeometry {
    pub x: u16,
    pub y: u16,
    /// Inner width, borders excluded
    pub content_width: u16,
    /// First candidate shown
    pub first: usize,
    /// Number of candidates shown
    pub count: usize,
}

impl MenuGeometry {
    /// Total height including borders
    pub fn height(&self) -> u16 {
        self.count as u16 + 2
    }
}

/// Fit a popup listing `items` (name, description) above `prompt_row`
pub fn menu_geometry(
    items: &[(&str, &str)],
    selected: usize,
    screen_width: u16,
    prompt_row: u16,
) -> Option<MenuGeometry> {
    let max_items = prompt_row.saturating_sub(2) as usize;
    if items.is_empty() || max_items == 0 || screen_width < 6 {
        return None;
    }

    let name_width = items.iter().map(|(n, _)| n.width()).max().unwrap_or(0);
    let desc_width = items.iter().map(|(_, d)| d.width()).max().unwrap_or(0);
    let wanted = name_width + 2 + desc_width + 2;
    let x = PROMPT.width() as u16;
    let available = screen_width.saturating_sub(x + 2) as usize;
    let content_width = wanted.min(available) as u16;

    let count = items.len().min(max_items);
    // Keep the selection inside the visible slice
    let first = if selected >= count { selected + 1 - count } else { 0 };

    Some(MenuGeometry {
        x,
        y: prompt_row - (count as u16 + 2),
        content_width,
        first,
        count,
    })
}

/// Session screen renderer
pub struct Renderer {
    initialized: bool,
    pub color_scheme: ColorScheme,
    /// Lines scrolled up from the bottom of the history
    scroll: usize,
    /// Rows available to the history in the last frame
    history_rows: usize,
    hits: HitMap,
}

impl Renderer {
    pub fn with_color_scheme(color_scheme: ColorScheme) -> Self {
        Self {
            initialized: false,
            color_scheme,
            scroll: 0,
            history_rows: 0,
            hits: HitMap::default(),
        }
    }

    /// Initialize the terminal for rendering
    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableBracketedPaste,
            Clear(ClearType::All),
            MoveTo(0, 0)
        )?;
        stdout.flush()?;
        self.initialized = true;
        Ok(())
    }

    /// Cleanup the terminal
    pub fn cleanup(&mut self) -> io::Result<()> {
        if !self.initialized {
            return Ok(());
        }
        self.initialized = false;

        let mut stdout = io::stdout();
        execute!(
            stdout,
            DisableBracketedPaste,
            DisableMouseCapture,
            ResetColor,
            Show,
            LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Jump to the newest history line
    pub fn scroll_to_bottom(&mut self) {
        self.scroll = 0;
    }

    /// Scroll towards older lines
    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    /// Scroll towards newer lines
    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// Rows in one page of history
    pub fn page_size(&self) -> usize {
        self.history_rows.max(1)
    }

    /// Resolve a click against the last frame
    pub fn hit_test(&self, col: u16, row: u16) -> Option<&HitTarget> {
        self.hits.hit_test(col, row)
    }

    /// Paint a full frame
    pub fn render(
        &mut self,
        history: &[OutputEntry],
        editor: &LineEditor,
        table: &CommandTable,
        busy: bool,
    ) -> io::Result<()> {
        let (width, height) = terminal::size()?;
        if width == 0 || height == 0 {
            return Ok(());
        }
        let prompt_row = height - 1;
        self.history_rows = prompt_row as usize;
        self.hits.clear();

        let lines = layout_history(history, width as usize);
        let (range, scroll) = visible_window(lines.len(), self.history_rows, self.scroll);
        self.scroll = scroll;

        let mut stdout = io::stdout().lock();
        begin_frame(&mut stdout)?;
        let result = self.paint(&mut stdout, &lines[range], editor, table, busy, width, prompt_row);
        let cursor = result.as_ref().ok().copied().flatten();
        // Always end frame, even on error
        let _ = end_frame(&mut stdout, cursor);
        result.map(|_| ())
    }

    #[allow(clippy::too_many_arguments)]
    fn paint<W: Write>(
        &mut self,
        out: &mut W,
        lines: &[ViewLine],
        editor: &LineEditor,
        table: &CommandTable,
        busy: bool,
        width: u16,
        prompt_row: u16,
    ) -> io::Result<Option<(u16, u16)>> {
        // History region, top-aligned
        for row in 0..prompt_row {
            execute!(out, MoveTo(0, row), ResetColor)?;
            if let Some(line) = lines.get(row as usize) {
                self.paint_line(out, line, row)?;
            }
            execute!(out, ResetColor, Clear(ClearType::UntilNewLine))?;
        }

        if let Some(state) = editor.menu().state() {
            let items: Vec<(&str, &str)> = state
                .candidates
                .iter()
                .map(|name| (name.as_str(), table.description(name).unwrap_or("")))
                .collect();
            if let Some(geometry) = menu_geometry(&items, state.selected, width, prompt_row) {
                self.paint_menu(out, &items, state.selected, geometry)?;
            }
        }

        self.paint_prompt(out, editor, busy, width, prompt_row)
    }

    fn paint_line<W: Write>(&mut self, out: &mut W, line: &ViewLine, row: u16) -> io::Result<()> {
        let mut col: u16 = 0;
        for segment in &line.segments {
            self.paint_segment(out, segment)?;
            let end = col.saturating_add(segment.width() as u16);
            if let Some(link) = &segment.link {
                self.hits.push(row, col, end, HitTarget::Link(link.clone()));
            }
            col = end;
        }
        Ok(())
    }

    fn paint_segment<W: Write>(&self, out: &mut W, segment: &Segment) -> io::Result<()> {
        let fg = segment.tone.color(&self.color_scheme).to_crossterm();
        execute!(out, SetAttribute(Attribute::Reset), SetForegroundColor(fg))?;
        if segment.bold {
            execute!(out, SetAttribute(Attribute::Bold))?;
        }
        if segment.italic {
            execute!(out, SetAttribute(Attribute::Italic))?;
        }
        if segment.strike {
            execute!(out, SetAttribute(Attribute::CrossedOut))?;
        }
        if segment.link.is_some() {
            execute!(out, SetAttribute(Attribute::Underlined))?;
        }
        write!(out, "{}", segment.text)?;
        Ok(())
    }

    /// Render the autocomplete menu
    fn paint_menu<W: Write>(
        &mut self,
        out: &mut W,
        items: &[(&str, &str)],
        selected: usize,
        geometry: MenuGeometry,
    ) -> io::Result<()> {
        let cs = &self.color_scheme;
        let content_width = geometry.content_width as usize;
        let name_width = items.iter().map(|(n, _)| n.width()).max().unwrap_or(0);

        let menu_bg = cs.menu_bg.to_crossterm();
        let menu_fg = cs.menu_fg.to_crossterm();
        let border = cs.menu_border.to_crossterm();
        let description = cs.menu_description.to_crossterm();
        let selected_bg = cs.menu_selected_bg.to_crossterm();
        let selected_fg = cs.menu_selected_fg.to_crossterm();

        let (x, y) = (geometry.x, geometry.y);
        execute!(out, SetAttribute(Attribute::Reset))?;

        // Top border: ┌────────┐
        execute!(out, MoveTo(x, y), SetBackgroundColor(menu_bg), SetForegroundColor(border))?;
        write!(out, "┌{}┐", "─".repeat(content_width))?;

        let visible = items.iter().enumerate().skip(geometry.first).take(geometry.count);
        for (offset, (index, (name, desc))) in visible.enumerate() {
            let row = y + 1 + offset as u16;
            execute!(out, MoveTo(x, row), SetBackgroundColor(menu_bg), SetForegroundColor(border))?;
            write!(out, "│")?;

            let (bg, fg, desc_fg) = if index == selected {
                (selected_bg, selected_fg, selected_fg)
            } else {
                (menu_bg, menu_fg, description)
            };

            // Format: " /name   description "
            let name_cell = format!(" {:<width$}  ", name, width = name_width);
            let name_cell = truncate_to_width(&name_cell, content_width);
            let desc_cell = truncate_to_width(desc, content_width - name_cell.width());
            let padding = content_width - name_cell.width() - desc_cell.width();
            execute!(out, SetBackgroundColor(bg), SetForegroundColor(fg))?;
            write!(out, "{}", name_cell)?;
            execute!(out, SetForegroundColor(desc_fg))?;
            write!(out, "{}{:padding$}", desc_cell, "", padding = padding)?;

            execute!(out, SetBackgroundColor(menu_bg), SetForegroundColor(border))?;
            write!(out, "│")?;

            self.hits
                .push(row, x, x + geometry.content_width + 2, HitTarget::MenuItem(index));
        }

        // Bottom border: └────────┘
        execute!(out, MoveTo(x, y + geometry.height() - 1))?;
        write!(out, "└{}┘", "─".repeat(content_width))?;

        execute!(out, ResetColor)?;
        Ok(())
    }

    /// Render the prompt line; returns the cursor cell when focused
    fn paint_prompt<W: Write>(
        &self,
        out: &mut W,
        editor: &LineEditor,
        busy: bool,
        width: u16,
        row: u16,
    ) -> io::Result<Option<(u16, u16)>> {
        let cs = &self.color_scheme;
        let prompt_color = if busy { cs.placeholder } else { cs.prompt };

        execute!(
            out,
            MoveTo(0, row),
            SetAttribute(Attribute::Reset),
            SetForegroundColor(prompt_color.to_crossterm())
        )?;
        if busy {
            execute!(out, SetAttribute(Attribute::Dim))?;
        }
        write!(out, "{}", PROMPT)?;
        execute!(out, SetAttribute(Attribute::Reset))?;

        let prompt_width = PROMPT.width();
        let available = (width as usize).saturating_sub(prompt_width + 1);
        let buffer = editor.buffer();

        // Keep the caret in view on long input
        let caret_width: usize = buffer
            .chars()
            .take(editor.caret())
            .map(|c| c.width().unwrap_or(0))
            .sum();
        let skip_width = caret_width.saturating_sub(available);
        let mut offset = 0;
        let mut start = 0;
        for (i, ch) in buffer.char_indices() {
            if offset >= skip_width {
                start = i;
                break;
            }
            offset += ch.width().unwrap_or(0);
            start = i + ch.len_utf8();
        }
        let visible = &buffer[start..];

        if buffer.is_empty() {
            execute!(out, SetForegroundColor(cs.placeholder.to_crossterm()))?;
            write!(out, "{}", truncate_to_width(PLACEHOLDER, available))?;
        } else {
            execute!(out, SetForegroundColor(cs.text.to_crossterm()))?;
            write!(out, "{}", truncate_to_width(visible, available))?;
        }
        execute!(out, ResetColor, Clear(ClearType::UntilNewLine))?;

        if !editor.is_focused() {
            return Ok(None);
        }
        let col = prompt_width + caret_width.saturating_sub(offset);
        Ok(Some((col.min(width as usize - 1) as u16, row)))
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::format::{MarkdownFormatter, TextFormatter};

    fn texts(lines: &[ViewLine]) -> Vec<String> {
        lines.iter().map(ViewLine::text).collect()
    }

    #[test]
    fn test_layout_echo_and_errors() {
        let history = vec![
            OutputEntry::command_echo("/nope"),
            OutputEntry::text("Command not found: /nope", Some(StyleTag::Error)),
        ];
        let lines = layout_history(&history, 80);
        assert_eq!(texts(&lines), vec!["❯ /nope", "Command not found: /nope"]);
        assert_eq!(lines[0].segments[0].tone, Tone::Prompt);
        assert_eq!(lines[0].segments[1].tone, Tone::Command);
        assert_eq!(lines[1].segments[0].tone, Tone::Error);
    }

    #[test]
    fn test_layout_blocks_followed_by_blank() {
        let formatter = MarkdownFormatter::new();
        let history: Vec<OutputEntry> = formatter
            .format("# Title\n\nBody text")
            .into_iter()
            .map(|b| OutputEntry::block(b, None))
            .collect();
        let lines = layout_history(&history, 80);
        assert_eq!(texts(&lines), vec!["Title", "", "Body text", ""]);
        assert_eq!(lines[0].segments[0].tone, Tone::Heading);
        assert!(lines[0].segments[0].bold);
    }

    #[test]
    fn test_layout_links_carry_targets() {
        let formatter = MarkdownFormatter::new();
        let blocks = formatter.format("See [/about](/about) or [site](https://example.com)");
        let history = vec![OutputEntry::block(blocks[0].clone(), None)];
        let lines = layout_history(&history, 80);

        let links: Vec<&Link> = lines[0].segments.iter().filter_map(|s| s.link.as_ref()).collect();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].href, "/about");
        assert!(!links[0].external);
        assert!(links[1].external);
    }

    #[test]
    fn test_wrap_at_width() {
        let lines = wrap_segments(
            vec![Segment::new("abc", Tone::Text), Segment::new("defgh", Tone::Code)],
            4,
        );
        assert_eq!(texts(&lines), vec!["abcd", "efgh"]);
        assert_eq!(lines[0].segments.len(), 2);
        assert_eq!(lines[1].segments[0].tone, Tone::Code);
    }

    #[test]
    fn test_wrap_wide_chars() {
        let lines = wrap_segments(vec![Segment::new("日本語", Tone::Text)], 4);
        assert_eq!(texts(&lines), vec!["日本", "語"]);

        let lines = wrap_segments(Vec::new(), 10);
        assert_eq!(lines, vec![ViewLine::default()]);
    }

    #[test]
    fn test_visible_window() {
        assert_eq!(visible_window(3, 10, 0), (0..3, 0));
        assert_eq!(visible_window(30, 10, 0), (20..30, 0));
        assert_eq!(visible_window(30, 10, 5), (15..25, 5));
        // Scroll clamps at the top
        assert_eq!(visible_window(30, 10, 100), (0..10, 20));
    }

    #[test]
    fn test_hit_map() {
        let mut hits = HitMap::default();
        let link = Link::new("/about");
        hits.push(2, 4, 10, HitTarget::Link(link.clone()));
        hits.push(2, 8, 20, HitTarget::MenuItem(1));

        assert_eq!(hits.hit_test(5, 2), Some(&HitTarget::Link(link)));
        // Menu painted later wins
        assert_eq!(hits.hit_test(9, 2), Some(&HitTarget::MenuItem(1)));
        assert_eq!(hits.hit_test(20, 2), None);
        assert_eq!(hits.hit_test(5, 3), None);
    }

    #[test]
    fn test_menu_geometry() {
        let items = [("/help", "List commands"), ("/history", "Past roles")];
        let g = menu_geometry(&items, 0, 80, 20).unwrap();
        assert_eq!(g.count, 2);
        assert_eq!(g.y + g.height(), 20);
        assert_eq!(g.content_width as usize, "/history".len() + 2 + "List commands".len() + 2);

        // Short screen shows a slice around the selection
        let g = menu_geometry(&items, 1, 80, 3).unwrap();
        assert_eq!(g.count, 1);
        assert_eq!(g.first, 1);

        assert_eq!(menu_geometry(&items, 0, 80, 2), None);
        assert_eq!(menu_geometry(&[], 0, 80, 20), None);
    }
}
