//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains the match-three board rules: the token grid,
//! selection and swaps, run detection, clearing with gravity refill, and
//! scoring. It has **no dependencies** on terminal I/O or input devices,
//! making it:
//!
//! - **Deterministic**: Same seed produces identical boards and cascades
//! - **Testable**: Token sources can be scripted to pin down exact refills
//! - **Portable**: Can run in any environment (terminal, GUI, headless)
//!
//! # Module Structure
//!
//! - [`board`]: flat row-major token grid with segment collapse operations
//! - [`engine`]: selection, swaps, run sweeps, and the resolve loop
//! - [`error`]: typed errors for out-of-range input, bad swaps, and divergence
//! - [`rng`]: the token source trait and a seeded LCG
//! - [`snapshot`]: a copy of the observable state for renderers
//!
//! # Game Rules
//!
//! - **Swap**: a selected cell swaps with one of its 4-neighbours
//! - **Run**: three or more equal tokens in a row or column
//! - **Clear**: cells above a run fall into the gap, new tokens enter at the top
//! - **Score**: each cleared run adds its length
//! - **Cascade**: refills that form new runs are cleared in later passes
//! - **Stable start**: a new board never contains a run
//!
//! # Example
//!
//! ```
//! use tui_match3_core::{BoardEngine, Interaction};
//! use tui_match3_types::{BoardConfig, Position};
//!
//! let mut engine = BoardEngine::with_seed(BoardConfig::default(), 12345).unwrap();
//! assert_eq!(engine.score(), 0);
//!
//! // First click selects, a click on a neighbour swaps and resolves
//! let first = engine.interact(Position::new(2, 2)).unwrap();
//! assert_eq!(first, Interaction::Selected(Position::new(2, 2)));
//!
//! let second = engine.interact(Position::new(2, 3)).unwrap();
//! assert!(matches!(second, Interaction::Swapped(_)));
//! assert_eq!(engine.selection(), None);
//!
//! // The board is stable again
//! assert!(!engine.detect_and_clear(true));
//! ```

pub mod board;
pub mod engine;
pub mod error;
pub mod rng;
pub mod snapshot;

pub use tui_match3_types as types;

// Re-export commonly used types for convenience
pub use board::Grid;
pub use engine::{BoardEngine, ClearedRun, Interaction, ResolveOutcome};
pub use error::{BoardError, BoardResult, SwapRejection};
pub use rng::{SimpleRng, TokenSource};
pub use snapshot::BoardSnapshot;
