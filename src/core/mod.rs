//! Session engine.
//!
//! This module contains the display-independent core:
//!
//! - **entry**: immutable output history entries
//! - **format**: document → display block formatting
//! - **sequencer**: timed, one-at-a-time reveal of entries
//! - **session**: controller owning history and command dispatch
//!
//! # Architecture
//!
//! ```text
//! Session
//! ├── SessionState (output history)
//! ├── CommandTable (name → document)
//! ├── TextFormatter (document → blocks)
//! ├── Sequencer (reveal batch + busy flag)
//! └── Effects (focus / scroll callbacks)
//! ```

pub mod entry;
pub mod format;
pub mod sequencer;
pub mod session;
