//! Board module - manages the token grid
//!
//! The grid is `width` columns by `height` rows, each cell holding a token
//! value. Uses a flat vector in row-major order for cache locality.
//! Coordinates: (row, col) where row 0 is the top line and gravity points
//! towards higher rows.

use crate::types::{Position, Token};

/// The token grid - `width` x `height` cells using flat storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    /// Flat array of cells, row-major order (row * width + col)
    cells: Vec<Token>,
}

impl Grid {
    /// Create a grid filled with `token`
    pub fn filled(width: usize, height: usize, token: Token) -> Self {
        Self {
            width,
            height,
            cells: vec![token; width * height],
        }
    }

    /// Create a grid from row slices.
    ///
    /// Callers validate that all rows share the same length.
    pub(crate) fn from_rows_unchecked(rows: &[Vec<Token>]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(width * height);
        for row in rows {
            cells.extend_from_slice(row);
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Overwrite `self` with `other`, reusing the cell allocation
    pub(crate) fn copy_from(&mut self, other: &Grid) {
        self.width = other.width;
        self.height = other.height;
        self.cells.clone_from(&other.cells);
    }

    /// Calculate flat index from a position
    #[inline(always)]
    fn index(&self, pos: Position) -> Option<usize> {
        if !pos.in_bounds(self.width, self.height) {
            return None;
        }
        Some(pos.row * self.width + pos.col)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the token at `pos`
    /// Returns None if out of bounds
    pub fn get(&self, pos: Position) -> Option<Token> {
        self.index(pos).map(|idx| self.cells[idx])
    }

    /// Set the token at `pos`
    /// Returns false if out of bounds
    pub fn set(&mut self, pos: Position, token: Token) -> bool {
        match self.index(pos) {
            Some(idx) => {
                self.cells[idx] = token;
                true
            }
            None => false,
        }
    }

    /// Exchange two cells
    /// Returns false (leaving the grid untouched) if either is out of bounds
    pub fn swap(&mut self, a: Position, b: Position) -> bool {
        match (self.index(a), self.index(b)) {
            (Some(ia), Some(ib)) => {
                self.cells.swap(ia, ib);
                true
            }
            _ => false,
        }
    }

    /// Get a row as a slice
    pub fn row(&self, row: usize) -> Option<&[Token]> {
        if row >= self.height {
            return None;
        }
        let start = row * self.width;
        Some(&self.cells[start..start + self.width])
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Token]> {
        self.cells.chunks(self.width.max(1))
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Token] {
        &self.cells
    }

    /// Overwrite every cell with a value from `fill`
    pub fn fill_with(&mut self, mut fill: impl FnMut() -> Token) {
        for cell in &mut self.cells {
            *cell = fill();
        }
    }

    /// Shift the column range `[start, end]` of rows `0..=row` down by one
    /// row and refill row 0 of that range from `fill`.
    ///
    /// This removes the cells of `row` in that range.
    pub fn collapse_row_segment(
        &mut self,
        row: usize,
        start: usize,
        end: usize,
        mut fill: impl FnMut() -> Token,
    ) {
        debug_assert!(row < self.height && start <= end && end < self.width);
        let width = self.width;
        let len = end - start + 1;

        // copy_within handles the row-to-row copy without a temporary
        for r in (1..=row).rev() {
            let src = (r - 1) * width + start;
            let dst = r * width + start;
            self.cells.copy_within(src..src + len, dst);
        }

        for cell in &mut self.cells[start..start + len] {
            *cell = fill();
        }
    }

    /// Remove rows `[start, end]` of column `col`: cells above the segment
    /// fall by the segment length and the freed top cells are refilled from
    /// `fill`.
    pub fn collapse_column_segment(
        &mut self,
        col: usize,
        start: usize,
        end: usize,
        mut fill: impl FnMut() -> Token,
    ) {
        debug_assert!(col < self.width && start <= end && end < self.height);
        let width = self.width;
        let delta = end - start + 1;

        // Walk bottom-up so each source is read before it is overwritten
        for r in (0..start).rev() {
            self.cells[(r + delta) * width + col] = self.cells[r * width + col];
        }

        for r in 0..delta {
            self.cells[r * width + col] = fill();
        }
    }
}
