//! Terminal input module (engine-facing).
//!
//! This module is intentionally independent of any UI framework. It maps
//! `crossterm` key events into [`crate::types::BoardAction`]. Mouse clicks
//! need the board layout to decode and are handled by the view.

pub mod map;

pub use tui_match3_types as types;

pub use map::{handle_key_event, should_quit};
