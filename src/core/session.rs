//! Session management
//!
//! The session controller owns the output history, dispatches submitted
//! lines against the command table and drives the sequencer. Side effects
//! on the surrounding UI (focusing the editor, scrolling to the newest
//! entry) go through injected [`Effects`] callbacks.
//!
//! # Dispatch
//!
//! ```text
//! submit(raw)
//! ├── echo raw (tagged command)
//! ├── "/clear"        → cancel in-flight reveal, clear history, reveal welcome
//! ├── known command   → reveal its document
//! ├── ""              → nothing else
//! └── anything else   → reveal "Command not found" + help hint (tagged error)
//! ```

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::content::{normalize, CommandTable, COMMAND_PREFIX, HELP_COMMAND};

use super::entry::{OutputEntry, StyleTag};
use super::format::TextFormatter;
use super::sequencer::{RevealHandle, Sequencer, DEFAULT_REVEAL_DELAY};

/// Default delay between a submission and the editor refocus
pub const DEFAULT_REFOCUS_DELAY: Duration = Duration::from_millis(50);

/// Callbacks the controller invokes on the surrounding UI
pub struct Effects {
    focus: Box<dyn FnMut()>,
    scroll_to_bottom: Box<dyn FnMut()>,
}

impl Effects {
    pub fn new(focus: impl FnMut() + 'static, scroll_to_bottom: impl FnMut() + 'static) -> Self {
        Self {
            focus: Box::new(focus),
            scroll_to_bottom: Box::new(scroll_to_bottom),
        }
    }

    /// Effects that do nothing (headless use)
    pub fn none() -> Self {
        Self::new(|| {}, || {})
    }
}

/// Timing knobs
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub reveal_delay: Duration,
    pub refocus_delay: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            reveal_delay: DEFAULT_REVEAL_DELAY,
            refocus_delay: DEFAULT_REFOCUS_DELAY,
        }
    }
}

/// What a submission led to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Refused: a reveal is still running
    Ignored,
    /// Empty input, echo only
    Empty,
    /// History cleared and the welcome document re-revealed
    Reset,
    /// Command content is being revealed
    Revealed,
    /// Unknown command, error lines are being revealed
    NotFound,
}

/// Output history of one session
#[derive(Debug, Default)]
pub struct SessionState {
    history: Vec<OutputEntry>,
}

impl SessionState {
    pub fn history(&self) -> &[OutputEntry] {
        &self.history
    }

    fn push(&mut self, entry: OutputEntry) {
        self.history.push(entry);
    }

    fn clear(&mut self) {
        self.history = Vec::new();
    }
}

/// Session controller
pub struct Session {
    state: SessionState,
    table: CommandTable,
    formatter: Box<dyn TextFormatter>,
    sequencer: Sequencer,
    effects: Effects,
    refocus_delay: Duration,
    /// Pending editor refocus
    refocus_at: Option<Instant>,
    started: bool,
}

impl Session {
    pub fn new(
        table: CommandTable,
        formatter: Box<dyn TextFormatter>,
        effects: Effects,
        options: SessionOptions,
    ) -> Self {
        Self {
            state: SessionState::default(),
            table,
            formatter,
            sequencer: Sequencer::new(options.reveal_delay),
            effects,
            refocus_delay: options.refocus_delay,
            refocus_at: None,
            started: false,
        }
    }

    pub fn history(&self) -> &[OutputEntry] {
        self.state.history()
    }

    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    /// True while a reveal batch is running
    pub fn is_busy(&self) -> bool {
        self.sequencer.is_busy()
    }

    /// Handle of the running reveal batch
    #[allow(dead_code)]
    pub fn current_reveal(&self) -> Option<RevealHandle> {
        self.sequencer.current()
    }

    /// Reveal the welcome document and focus the editor. Runs once.
    pub fn start(&mut self, now: Instant) {
        if self.started {
            return;
        }
        self.started = true;
        info!("Session started ({} commands)", self.table.entries().len());

        self.reveal_welcome(now);
        (self.effects.focus)();
    }

    /// Dispatch one raw line from the editor
    pub fn submit(&mut self, raw: &str, now: Instant) -> Dispatch {
        let command = normalize(raw);
        let is_reset = self.table.is_reset(&command);

        if self.is_busy() && !is_reset {
            debug!("Submission refused while busy: {:?}", raw);
            return Dispatch::Ignored;
        }

        self.append(OutputEntry::command_echo(raw));

        let dispatch = if is_reset {
            if let Some(handle) = self.sequencer.current() {
                self.sequencer.cancel(handle);
                info!("Reset cancelled reveal batch {}", handle.id());
            }
            self.state.clear();
            (self.effects.scroll_to_bottom)();
            self.reveal_welcome(now);
            Dispatch::Reset
        } else if let Some(content) = self.table.get(&command).and_then(|e| e.content.clone()) {
            debug!("Dispatching {}", command);
            let result = self.sequencer.reveal_document(self.formatter.as_ref(), &content, now);
            self.report(result);
            Dispatch::Revealed
        } else if command.is_empty() {
            Dispatch::Empty
        } else {
            debug!("Unknown command: {}", command);
            let lines = [
                format!("Command not found: {}", command),
                format!("Type {} for available commands.", HELP_COMMAND),
            ];
            let result = self.sequencer.reveal_lines(lines, Some(StyleTag::Error), now);
            self.report(result);
            Dispatch::NotFound
        };

        self.refocus_at = Some(now + self.refocus_delay);
        self.pump(now);
        dispatch
    }

    /// Activate a link inside a display block.
    ///
    /// Command links go through [`Session::submit`], busy admission included;
    /// external links are left to the caller.
    pub fn activate_link(&mut self, href: &str, now: Instant) -> Dispatch {
        if !href.starts_with(COMMAND_PREFIX) {
            return Dispatch::Ignored;
        }
        self.submit(href, now)
    }

    /// Advance timers. Returns true if the history changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let changed = self.pump(now);

        if let Some(at) = self.refocus_at {
            if now >= at {
                self.refocus_at = None;
                (self.effects.focus)();
            }
        }
        changed
    }

    /// Earliest time at which [`Session::tick`] has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.sequencer.next_deadline(), self.refocus_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn reveal_welcome(&mut self, now: Instant) {
        let result = self
            .sequencer
            .reveal_document(self.formatter.as_ref(), self.table.welcome(), now);
        self.report(result);
        self.pump(now);
    }

    fn report(&mut self, result: super::sequencer::Result<Option<RevealHandle>>) {
        if let Err(e) = result {
            warn!("Reveal not started: {}", e);
            self.append(OutputEntry::text(e.to_string(), Some(StyleTag::Error)));
        }
    }

    /// Emit due entries, scrolling after each one
    fn pump(&mut self, now: Instant) -> bool {
        let state = &mut self.state;
        let effects = &mut self.effects;
        let outcome = self.sequencer.tick(now, &mut |entry| {
            state.push(entry);
            (effects.scroll_to_bottom)();
        });
        if outcome.finished {
            (self.effects.scroll_to_bottom)();
        }
        outcome.emitted > 0
    }

    fn append(&mut self, entry: OutputEntry) {
        self.state.push(entry);
        (self.effects.scroll_to_bottom)();
    }
}
