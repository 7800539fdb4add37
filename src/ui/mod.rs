//! User interface rendering and input handling.
//!
//! This module provides all UI-related functionality:
//!
//! - **editor**: Single-line command editor with history recall
//! - **menu**: Autocomplete menu for command names
//! - **keymapper**: Keyboard and mouse input to editor/app action mapping
//! - **renderer**: History, menu overlay and prompt drawing

pub mod editor;
pub mod keymapper;
pub mod menu;
pub mod renderer;

pub use editor::{EditorKey, LineEditor};
pub use keymapper::{KeyAction, KeyMapper, MouseAction, WHEEL_LINES};
pub use renderer::{HitTarget, Renderer};
