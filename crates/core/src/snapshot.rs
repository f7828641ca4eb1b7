use crate::types::{Position, Token};

/// Observable board state for renderers and other readers.
///
/// Filled by [`BoardEngine::snapshot_into`](crate::BoardEngine::snapshot_into),
/// which reuses the `cells` allocation across frames.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BoardSnapshot {
    pub width: usize,
    pub height: usize,
    pub max_val: u8,
    /// Row-major tokens
    pub cells: Vec<Token>,
    pub selection: Option<Position>,
    pub score: u32,
    pub board_id: u32,
    /// FNV-1a 64 over `cells`
    pub board_hash: u64,
}

impl BoardSnapshot {
    pub fn get(&self, pos: Position) -> Option<Token> {
        if !pos.in_bounds(self.width, self.height) {
            return None;
        }
        self.cells.get(pos.row * self.width + pos.col).copied()
    }

    pub fn hash_cells(cells: &[Token]) -> u64 {
        // FNV-1a 64-bit.
        let mut h: u64 = 0xcbf29ce484222325;
        for &b in cells {
            h ^= b as u64;
            h = h.wrapping_mul(0x00000100000001B3);
        }
        h
    }

    pub fn clear(&mut self) {
        self.width = 0;
        self.height = 0;
        self.max_val = 0;
        self.cells.clear();
        self.selection = None;
        self.score = 0;
        self.board_id = 0;
        self.board_hash = Self::hash_cells(&[]);
    }
}
