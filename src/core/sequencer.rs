//! Incremental reveal of output.
//!
//! A reveal batch is a queue of entries emitted one at a time, separated by a
//! fixed delay. The sequencer does not own a timer; the event loop calls
//! [`Sequencer::tick`] with the current time and the sequencer emits every
//! entry that has come due.
//!
//! # Timeline
//!
//! ```text
//! t0            t0+d          t0+2d   ...   t0+(n-1)d     t0+nd
//! │ entry 0     │ entry 1     │             │ entry n-1   │ busy = false
//! └─────────────┴─────────────┴─────  ...  ─┴─────────────┘
//! ```
//!
//! Busy stays raised for one delay after the last entry so the caller can
//! react (scroll) before new input is admitted.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::debug;

use super::entry::{OutputEntry, StyleTag};
use super::format::TextFormatter;

/// Default delay between two revealed entries
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(25);

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SequencerError {
    #[error("reveal batch {0} is still in flight")]
    Busy(u64),
}

pub type Result<T> = std::result::Result<T, SequencerError>;

/// Identifies one reveal batch; used to cancel it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RevealHandle(u64);

impl RevealHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Result of one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Entries handed to the sink during this tick
    pub emitted: usize,
    /// The in-flight batch completed during this tick
    pub finished: bool,
}

/// In-flight batch state
struct Batch {
    handle: RevealHandle,
    pending: VecDeque<OutputEntry>,
    next_due: Instant,
}

/// Reveal scheduler
pub struct Sequencer {
    delay: Duration,
    batch: Option<Batch>,
    next_id: u64,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new(DEFAULT_REVEAL_DELAY)
    }
}

impl Sequencer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            batch: None,
            next_id: 1,
        }
    }

    /// True while a batch has entries left or is waiting out its final delay
    pub fn is_busy(&self) -> bool {
        self.batch.is_some()
    }

    /// Handle of the in-flight batch
    pub fn current(&self) -> Option<RevealHandle> {
        self.batch.as_ref().map(|b| b.handle)
    }

    /// Entries not yet emitted
    #[allow(dead_code)]
    pub fn remaining(&self) -> usize {
        self.batch.as_ref().map_or(0, |b| b.pending.len())
    }

    /// Time at which the next tick has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        self.batch.as_ref().map(|b| b.next_due)
    }

    /// Format a document and reveal its blocks.
    ///
    /// Returns `Ok(None)` for a document that formats to nothing; the
    /// sequencer is not busy afterwards.
    pub fn reveal_document(
        &mut self,
        formatter: &dyn TextFormatter,
        document: &str,
        now: Instant,
    ) -> Result<Option<RevealHandle>> {
        let entries = formatter
            .format(document)
            .into_iter()
            .map(|block| OutputEntry::block(block, None))
            .collect();
        self.begin(entries, now)
    }

    /// Reveal plain text lines, all carrying the same style tag
    pub fn reveal_lines<I, S>(
        &mut self,
        lines: I,
        style: Option<StyleTag>,
        now: Instant,
    ) -> Result<Option<RevealHandle>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = lines
            .into_iter()
            .map(|line| OutputEntry::text(line, style))
            .collect();
        self.begin(entries, now)
    }

    fn begin(&mut self, pending: VecDeque<OutputEntry>, now: Instant) -> Result<Option<RevealHandle>> {
        if let Some(batch) = &self.batch {
            return Err(SequencerError::Busy(batch.handle.0));
        }
        if pending.is_empty() {
            return Ok(None);
        }

        let handle = RevealHandle(self.next_id);
        self.next_id += 1;
        debug!("Reveal batch {} started ({} entries)", handle.0, pending.len());

        self.batch = Some(Batch {
            handle,
            pending,
            next_due: now,
        });
        Ok(Some(handle))
    }

    /// Drop the batch identified by `handle` if it is still in flight.
    /// Returns true if something was cancelled.
    pub fn cancel(&mut self, handle: RevealHandle) -> bool {
        match &self.batch {
            Some(batch) if batch.handle == handle => {
                debug!(
                    "Reveal batch {} cancelled ({} entries dropped)",
                    handle.0,
                    batch.pending.len()
                );
                self.batch = None;
                true
            }
            _ => false,
        }
    }

    /// Emit every entry that is due at `now` into `sink`
    pub fn tick(&mut self, now: Instant, sink: &mut dyn FnMut(OutputEntry)) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        while let Some(batch) = self.batch.as_mut() {
            if now < batch.next_due {
                break;
            }
            match batch.pending.pop_front() {
                Some(entry) => {
                    sink(entry);
                    outcome.emitted += 1;
                    batch.next_due += self.delay;
                }
                None => {
                    debug!("Reveal batch {} finished", batch.handle.0);
                    self.batch = None;
                    outcome.finished = true;
                }
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::format::MarkdownFormatter;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn collect(seq: &mut Sequencer, now: Instant, out: &mut Vec<OutputEntry>) -> TickOutcome {
        seq.tick(now, &mut |e| out.push(e))
    }

    #[test]
    fn test_empty_document_is_not_busy() {
        let mut seq = Sequencer::default();
        let handle = seq
            .reveal_document(&MarkdownFormatter::new(), "", Instant::now())
            .unwrap();
        assert!(handle.is_none());
        assert!(!seq.is_busy());
    }

    #[test]
    fn test_entries_spaced_by_delay() {
        let t0 = Instant::now();
        let mut seq = Sequencer::new(ms(25));
        let mut out = Vec::new();
        seq.reveal_lines(["a", "b", "c"], None, t0).unwrap();
        assert!(seq.is_busy());

        assert_eq!(collect(&mut seq, t0, &mut out).emitted, 1);
        assert_eq!(collect(&mut seq, t0 + ms(10), &mut out).emitted, 0);
        assert_eq!(collect(&mut seq, t0 + ms(25), &mut out).emitted, 1);
        assert_eq!(collect(&mut seq, t0 + ms(50), &mut out).emitted, 1);

        // Last entry out, busy until one more delay passes
        assert!(seq.is_busy());
        assert_eq!(seq.remaining(), 0);
        let outcome = collect(&mut seq, t0 + ms(75), &mut out);
        assert!(outcome.finished);
        assert!(!seq.is_busy());

        let texts: Vec<String> = out.iter().map(OutputEntry::plain_text).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_late_tick_catches_up() {
        let t0 = Instant::now();
        let mut seq = Sequencer::new(ms(25));
        let mut out = Vec::new();
        seq.reveal_lines(["a", "b"], Some(StyleTag::Error), t0).unwrap();

        let outcome = collect(&mut seq, t0 + ms(500), &mut out);
        assert_eq!(outcome.emitted, 2);
        assert!(outcome.finished);
        assert!(out.iter().all(|e| e.style() == Some(StyleTag::Error)));
    }

    #[test]
    fn test_overlapping_batch_rejected() {
        let t0 = Instant::now();
        let mut seq = Sequencer::default();
        let handle = seq.reveal_lines(["a"], None, t0).unwrap().unwrap();
        let err = seq.reveal_lines(["b"], None, t0).unwrap_err();
        assert_eq!(err, SequencerError::Busy(handle.id()));
    }

    #[test]
    fn test_cancel() {
        let t0 = Instant::now();
        let mut seq = Sequencer::default();
        let mut out = Vec::new();
        let handle = seq.reveal_lines(["a", "b", "c"], None, t0).unwrap().unwrap();
        collect(&mut seq, t0, &mut out);

        assert!(seq.cancel(handle));
        assert!(!seq.is_busy());
        assert!(!seq.cancel(handle));

        collect(&mut seq, t0 + ms(1000), &mut out);
        assert_eq!(out.len(), 1);

        // A fresh batch gets a new handle
        let next = seq.reveal_lines(["d"], None, t0).unwrap().unwrap();
        assert_ne!(next, handle);
    }

    #[test]
    fn test_zero_delay_drains_in_one_tick() {
        let t0 = Instant::now();
        let mut seq = Sequencer::new(Duration::ZERO);
        let mut out = Vec::new();
        seq.reveal_document(&MarkdownFormatter::new(), "one\n\ntwo\n\nthree", t0)
            .unwrap();
        let outcome = collect(&mut seq, t0, &mut out);
        assert_eq!(outcome.emitted, 3);
        assert!(outcome.finished);
    }
}
