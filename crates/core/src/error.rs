//! Error types for board operations.

use thiserror::Error;

use crate::types::{ConfigError, Position};

/// Why a swap was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapRejection {
    /// No cell is selected
    NoSelection,
    /// The target is not a 4-neighbour of the selection
    NotNeighbour { from: Position, to: Position },
}

impl std::fmt::Display for SwapRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwapRejection::NoSelection => write!(f, "no cell is selected"),
            SwapRejection::NotNeighbour { from, to } => {
                write!(f, "{to} is not a neighbour of {from}")
            }
        }
    }
}

/// Errors reported by [`BoardEngine`](crate::BoardEngine).
///
/// An operation that returns an error leaves the board as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    /// The coordinate is outside the board
    #[error("position {position} is outside the {width}x{height} board")]
    OutOfRange {
        position: Position,
        width: usize,
        height: usize,
    },

    /// The swap target or selection state does not allow a swap
    #[error("invalid swap: {0}")]
    InvalidSwap(SwapRejection),

    /// The resolve loop kept finding runs past its pass limit
    #[error("board did not stabilise after {passes} resolve passes")]
    ResolutionDivergence { passes: usize },

    /// The board configuration or explicit layout was rejected
    #[error("invalid board configuration: {0}")]
    Config(#[from] ConfigError),
}

pub type BoardResult<T> = Result<T, BoardError>;
