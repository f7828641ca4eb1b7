//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, terminal rendering, input mapping).
//!
//! # Board Dimensions
//!
//! The default playfield matches the classic match-three layout:
//!
//! - **Width**: 8 columns (indexed 0-7)
//! - **Height**: 8 rows (indexed 0-7)
//! - **Tokens**: 5 distinct values (0-4)
//!
//! Positions are `(row, col)` with row 0 at the top. Gravity pulls tokens
//! towards higher row indices and fresh tokens enter at row 0.
//!
//! # Limits
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MIN_TOKENS` | 2 | Fewer token values make runs unavoidable |
//! | `MAX_TOKENS` | 16 | Upper bound on distinct token values |
//! | `MAX_DIMENSION` | 64 | Upper bound on width and height |
//! | `MIN_RUN` | 3 | Shortest sequence that counts as a run |
//! | `TICK_MS` | 16 | Frame loop interval (~60 FPS) |
//!
//! # Examples
//!
//! ```
//! use tui_match3_types::{BoardAction, BoardConfig, Position};
//!
//! let config = BoardConfig::default();
//! assert_eq!((config.width, config.height, config.max_val), (8, 8, 5));
//! assert!(config.validate().is_ok());
//!
//! let a = Position::new(2, 2);
//! assert!(a.is_adjacent(Position::new(2, 3)));
//! assert!(!a.is_adjacent(Position::new(3, 3)));
//!
//! assert_eq!(BoardAction::from_str("newGame"), Some(BoardAction::NewGame));
//! ```

use std::fmt;

use arrayvec::ArrayVec;

/// Default board width in cells (8 columns)
pub const DEFAULT_WIDTH: u8 = 8;

/// Default board height in cells (8 rows)
pub const DEFAULT_HEIGHT: u8 = 8;

/// Default number of distinct token values (0..5)
pub const DEFAULT_TOKENS: u8 = 5;

/// Minimum number of distinct token values.
///
/// With a single value every line of three or more cells is a run.
pub const MIN_TOKENS: u8 = 2;

/// Maximum number of distinct token values.
pub const MAX_TOKENS: u8 = 16;

/// Maximum width or height of the board.
pub const MAX_DIMENSION: u8 = 64;

/// Shortest sequence of equal tokens that is cleared.
pub const MIN_RUN: usize = 3;

/// Frame loop interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// A token value occupying a board cell.
pub type Token = u8;

/// A cell coordinate on the board.
///
/// `row` ranges over `0..height`, `col` over `0..width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Check whether the position lies inside a `width` x `height` board
    pub fn in_bounds(&self, width: usize, height: usize) -> bool {
        self.row < height && self.col < width
    }

    /// Check whether `other` is a 4-neighbour of this position.
    ///
    /// True iff the two positions share a row or a column and differ by
    /// exactly one on the other axis. Diagonal and identical positions are not
    /// adjacent.
    pub fn is_adjacent(&self, other: Position) -> bool {
        let dr = self.row.abs_diff(other.row);
        let dc = self.col.abs_diff(other.col);
        (dr == 0 && dc == 1) || (dr == 1 && dc == 0)
    }

    /// In-bounds 4-neighbours in up, down, left, right order.
    pub fn neighbours(&self, width: usize, height: usize) -> ArrayVec<Position, 4> {
        let mut out = ArrayVec::new();
        if !self.in_bounds(width, height) {
            return out;
        }
        if self.row > 0 {
            out.push(Position::new(self.row - 1, self.col));
        }
        if self.row + 1 < height {
            out.push(Position::new(self.row + 1, self.col));
        }
        if self.col > 0 {
            out.push(Position::new(self.row, self.col - 1));
        }
        if self.col + 1 < width {
            out.push(Position::new(self.row, self.col + 1));
        }
        out
    }

    /// Move by one cell in `dir`, staying inside the board.
    ///
    /// Returns the position unchanged at an edge.
    pub fn step(&self, dir: Direction, width: usize, height: usize) -> Position {
        match dir {
            Direction::Up => Position::new(self.row.saturating_sub(1), self.col),
            Direction::Down => Position::new((self.row + 1).min(height.saturating_sub(1)), self.col),
            Direction::Left => Position::new(self.row, self.col.saturating_sub(1)),
            Direction::Right => Position::new(self.row, (self.col + 1).min(width.saturating_sub(1))),
        }
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Scan axis of a run
///
/// - **Row**: horizontal run, `line` is the row index
/// - **Column**: vertical run, `line` is the column index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Row,
    Column,
}

impl Axis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Row => "row",
            Axis::Column => "column",
        }
    }
}

/// Cursor movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Player actions produced by the input layer
///
/// Cursor movement and activation stand in for pointer input; mouse clicks
/// are decoded straight to a [`Position`] by the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardAction {
    /// Move the cursor one cell
    Cursor(Direction),
    /// Select the cell under the cursor, or swap with the selection
    Activate,
    /// Drop the current selection
    ClearSelection,
    /// Regenerate the board and reset the score
    NewGame,
}

impl BoardAction {
    /// Parse action from string
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_match3_types::{BoardAction, Direction};
    ///
    /// assert_eq!(BoardAction::from_str("up"), Some(BoardAction::Cursor(Direction::Up)));
    /// assert_eq!(BoardAction::from_str("ACTIVATE"), Some(BoardAction::Activate));
    /// assert_eq!(BoardAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" => Some(BoardAction::Cursor(Direction::Up)),
            "down" => Some(BoardAction::Cursor(Direction::Down)),
            "left" => Some(BoardAction::Cursor(Direction::Left)),
            "right" => Some(BoardAction::Cursor(Direction::Right)),
            "activate" => Some(BoardAction::Activate),
            "clearselection" => Some(BoardAction::ClearSelection),
            "newgame" => Some(BoardAction::NewGame),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardAction::Cursor(Direction::Up) => "up",
            BoardAction::Cursor(Direction::Down) => "down",
            BoardAction::Cursor(Direction::Left) => "left",
            BoardAction::Cursor(Direction::Right) => "right",
            BoardAction::Activate => "activate",
            BoardAction::ClearSelection => "clearSelection",
            BoardAction::NewGame => "newGame",
        }
    }
}

/// Board dimensions and token range.
///
/// `max_val` is exclusive: cells hold values in `0..max_val`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardConfig {
    pub width: u8,
    pub height: u8,
    pub max_val: u8,
}

impl BoardConfig {
    pub fn new(width: u8, height: u8, max_val: u8) -> Self {
        Self {
            width,
            height,
            max_val,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Check dimensions and token range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0
            || self.height == 0
            || self.width > MAX_DIMENSION
            || self.height > MAX_DIMENSION
        {
            return Err(ConfigError::BadDimensions {
                width: self.width as usize,
                height: self.height as usize,
            });
        }
        if self.max_val < MIN_TOKENS || self.max_val > MAX_TOKENS {
            return Err(ConfigError::TokenRange {
                max_val: self.max_val,
            });
        }
        Ok(())
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, DEFAULT_TOKENS)
    }
}

/// Rejected board configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Width or height is zero or above [`MAX_DIMENSION`]
    BadDimensions { width: usize, height: usize },
    /// `max_val` outside `MIN_TOKENS..=MAX_TOKENS`
    TokenRange { max_val: u8 },
    /// A row of an explicit layout has the wrong length
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A cell of an explicit layout holds a value `>= max_val`
    TokenOutOfRange {
        position: Position,
        value: Token,
        max_val: u8,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::BadDimensions { width, height } => write!(
                f,
                "board must be between 1x1 and {MAX_DIMENSION}x{MAX_DIMENSION}, got {width}x{height}"
            ),
            ConfigError::TokenRange { max_val } => write!(
                f,
                "token count must be between {MIN_TOKENS} and {MAX_TOKENS}, got {max_val}"
            ),
            ConfigError::RaggedRows {
                row,
                expected,
                found,
            } => write!(f, "row {row} has {found} cells, expected {expected}"),
            ConfigError::TokenOutOfRange {
                position,
                value,
                max_val,
            } => write!(f, "token {value} at {position} is not below {max_val}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_classic_board() {
        let config = BoardConfig::default();
        assert_eq!(config.width, 8);
        assert_eq!(config.height, 8);
        assert_eq!(config.max_val, 5);
        assert_eq!(config.cell_count(), 64);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn config_rejects_single_token() {
        assert_eq!(
            BoardConfig::new(8, 8, 1).validate(),
            Err(ConfigError::TokenRange { max_val: 1 })
        );
        assert_eq!(
            BoardConfig::new(8, 8, 0).validate(),
            Err(ConfigError::TokenRange { max_val: 0 })
        );
        assert!(BoardConfig::new(8, 8, MIN_TOKENS).validate().is_ok());
    }

    #[test]
    fn config_rejects_empty_board() {
        assert!(matches!(
            BoardConfig::new(0, 8, 5).validate(),
            Err(ConfigError::BadDimensions { .. })
        ));
        assert!(matches!(
            BoardConfig::new(8, 0, 5).validate(),
            Err(ConfigError::BadDimensions { .. })
        ));
        assert!(matches!(
            BoardConfig::new(MAX_DIMENSION + 1, 8, 5).validate(),
            Err(ConfigError::BadDimensions { .. })
        ));
    }

    #[test]
    fn adjacency_is_orthogonal_only() {
        let p = Position::new(2, 2);
        assert!(p.is_adjacent(Position::new(1, 2)));
        assert!(p.is_adjacent(Position::new(3, 2)));
        assert!(p.is_adjacent(Position::new(2, 1)));
        assert!(p.is_adjacent(Position::new(2, 3)));

        assert!(!p.is_adjacent(p));
        assert!(!p.is_adjacent(Position::new(3, 3)));
        assert!(!p.is_adjacent(Position::new(1, 1)));
        assert!(!p.is_adjacent(Position::new(2, 4)));
        assert!(!p.is_adjacent(Position::new(0, 2)));
    }

    #[test]
    fn neighbours_are_clipped_at_edges() {
        let corner = Position::new(0, 0).neighbours(8, 8);
        assert_eq!(
            corner.as_slice(),
            &[Position::new(1, 0), Position::new(0, 1)]
        );

        let center = Position::new(4, 4).neighbours(8, 8);
        assert_eq!(center.len(), 4);
        assert!(center.iter().all(|n| n.is_adjacent(Position::new(4, 4))));

        assert!(Position::new(8, 0).neighbours(8, 8).is_empty());
    }

    #[test]
    fn step_stays_on_board() {
        let p = Position::new(0, 7);
        assert_eq!(p.step(Direction::Up, 8, 8), p);
        assert_eq!(p.step(Direction::Right, 8, 8), p);
        assert_eq!(p.step(Direction::Down, 8, 8), Position::new(1, 7));
        assert_eq!(p.step(Direction::Left, 8, 8), Position::new(0, 6));
    }

    #[test]
    fn action_string_roundtrip() {
        for action in [
            BoardAction::Cursor(Direction::Up),
            BoardAction::Cursor(Direction::Down),
            BoardAction::Cursor(Direction::Left),
            BoardAction::Cursor(Direction::Right),
            BoardAction::Activate,
            BoardAction::ClearSelection,
            BoardAction::NewGame,
        ] {
            assert_eq!(BoardAction::from_str(action.as_str()), Some(action));
        }
    }
}
