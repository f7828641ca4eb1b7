//! Board engine - owns the grid, selection, and score
//!
//! This module ties together the grid, the token source, and the run
//! resolution rules. It handles selection, swaps, run detection, the
//! clear-and-refill step, and the capped fixed-point resolve loop.
//!
//! # Resolution
//!
//! [`BoardEngine::detect_and_clear`] performs one pass: a row sweep followed by
//! a column sweep. Each sweep walks a line once, tracking the current run.
//! When the token changes after a run of [`MIN_RUN`] or more, that run is
//! cleared immediately and the sweep continues from the cell that broke it.
//! A run still open at the end of the line is flushed there.
//!
//! Clearing removes the run's cells, lets the cells above fall into the gap,
//! and refills the freed top cells from the token source. Refills can form
//! new runs, so [`BoardEngine::resolve_until_stable`] repeats passes until one
//! finds nothing.

use tracing::{debug, error, info, trace, warn};

use crate::board::Grid;
use crate::error::{BoardError, BoardResult, SwapRejection};
use crate::rng::{SimpleRng, TokenSource};
use crate::snapshot::BoardSnapshot;
use crate::types::{Axis, BoardConfig, ConfigError, Position, Token, MAX_DIMENSION, MIN_RUN};

/// Lower bound on resolve passes per attempt.
pub const MIN_RESOLVE_PASSES: usize = 256;

/// Resolve passes allowed per board cell, when that exceeds the lower bound.
pub const RESOLVE_PASSES_PER_CELL: usize = 4;

/// Full refills tried before giving up on reaching a stable board.
pub const MAX_REGENERATIONS: usize = 8;

/// A run removed during a resolve pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClearedRun {
    pub axis: Axis,
    /// Row index for [`Axis::Row`], column index for [`Axis::Column`]
    pub line: usize,
    /// First cell of the run along the line
    pub start: usize,
    /// Last cell of the run along the line (inclusive)
    pub end: usize,
    pub token: Token,
}

impl ClearedRun {
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Board positions covered by the run, in scan order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (self.start..=self.end).map(move |k| match self.axis {
            Axis::Row => Position::new(self.line, k),
            Axis::Column => Position::new(k, self.line),
        })
    }
}

/// Summary of a resolve loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolveOutcome {
    /// Number of detect-and-clear passes, including the final empty one
    pub passes: usize,
    pub runs_cleared: usize,
    pub cells_cleared: usize,
    /// The loop hit its pass limit and the board was refilled from scratch
    pub regenerated: bool,
}

impl ResolveOutcome {
    pub fn changed(&self) -> bool {
        self.runs_cleared > 0 || self.regenerated
    }
}

/// Result of [`BoardEngine::interact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// The position became the selection
    Selected(Position),
    /// The position was swapped with the selection and the board resolved
    Swapped(ResolveOutcome),
}

/// Match-three board state.
///
/// Scoring is passed explicitly to every resolve call: the initial
/// stabilisation never awards points, play does.
#[derive(Debug, Clone)]
pub struct BoardEngine<R: TokenSource = SimpleRng> {
    grid: Grid,
    config: BoardConfig,
    selection: Option<Position>,
    score: u32,
    rng: R,
    /// Generation counter, bumped on every regeneration
    board_id: u32,
    /// Runs cleared by the most recent detect-and-clear pass
    last_cleared: Vec<ClearedRun>,
    /// Grid at the start of the current resolve, restored if it fails
    checkpoint: Grid,
}

impl BoardEngine<SimpleRng> {
    /// Create a stable board driven by a seeded [`SimpleRng`]
    pub fn with_seed(config: BoardConfig, seed: u32) -> BoardResult<Self> {
        Self::new(config, SimpleRng::new(seed))
    }
}

impl<R: TokenSource> BoardEngine<R> {
    /// Create a board with random tokens and no runs.
    ///
    /// Fails with [`BoardError::Config`] for an invalid configuration and with
    /// [`BoardError::ResolutionDivergence`] if no stable board could be
    /// produced.
    pub fn new(config: BoardConfig, rng: R) -> BoardResult<Self> {
        config.validate()?;

        let mut engine = Self {
            grid: Grid::filled(config.width as usize, config.height as usize, 0),
            config,
            selection: None,
            score: 0,
            rng,
            board_id: 0,
            last_cleared: Vec::new(),
            checkpoint: Grid::filled(0, 0, 0),
        };
        engine.fill_stable()?;
        info!(
            width = config.width,
            height = config.height,
            max_val = config.max_val,
            "board initialized"
        );
        Ok(engine)
    }

    /// Create a board with an explicit layout, rows top to bottom.
    ///
    /// The layout is taken as is: no runs are resolved.
    pub fn from_rows(rows: &[Vec<Token>], max_val: u8, rng: R) -> BoardResult<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let bad_dimensions = ConfigError::BadDimensions { width, height };
        if width > MAX_DIMENSION as usize || height > MAX_DIMENSION as usize {
            return Err(bad_dimensions.into());
        }
        let config = BoardConfig::new(width as u8, height as u8, max_val);
        config.validate()?;

        for (r, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(ConfigError::RaggedRows {
                    row: r,
                    expected: width,
                    found: row.len(),
                }
                .into());
            }
            if let Some(c) = row.iter().position(|&v| v >= max_val) {
                return Err(ConfigError::TokenOutOfRange {
                    position: Position::new(r, c),
                    value: row[c],
                    max_val,
                }
                .into());
            }
        }

        Ok(Self {
            grid: Grid::from_rows_unchecked(rows),
            config,
            selection: None,
            score: 0,
            rng,
            board_id: 0,
            last_cleared: Vec::new(),
            checkpoint: Grid::filled(0, 0, 0),
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn max_val(&self) -> u8 {
        self.config.max_val
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn selection(&self) -> Option<Position> {
        self.selection
    }

    pub fn board_id(&self) -> u32 {
        self.board_id
    }

    pub fn last_cleared(&self) -> &[ClearedRun] {
        &self.last_cleared
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// Token at `pos`
    pub fn token(&self, pos: Position) -> BoardResult<Token> {
        self.grid.get(pos).ok_or_else(|| self.out_of_range(pos))
    }

    /// Replace the board with fresh random content, resetting score and
    /// selection.
    ///
    /// On failure the previous board is kept.
    pub fn regenerate(&mut self) -> BoardResult<ResolveOutcome> {
        let outcome = self.fill_stable()?;
        self.score = 0;
        self.selection = None;
        self.board_id = self.board_id.wrapping_add(1);
        info!(board_id = self.board_id, "board regenerated");
        Ok(outcome)
    }

    /// Arm `pos` for a swap, replacing any earlier selection
    pub fn select(&mut self, pos: Position) -> BoardResult<()> {
        self.check_bounds(pos)?;
        self.selection = Some(pos);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Check whether `pos` is a 4-neighbour of the selection.
    ///
    /// False when nothing is selected or `pos` is off the board.
    pub fn are_neighbours(&self, pos: Position) -> bool {
        if !pos.in_bounds(self.width(), self.height()) {
            return false;
        }
        self.selection.is_some_and(|sel| sel.is_adjacent(pos))
    }

    /// Exchange the tokens at `pos` and the selection, then clear the
    /// selection.
    ///
    /// Does not resolve runs or change the score.
    pub fn swap(&mut self, pos: Position) -> BoardResult<()> {
        self.check_bounds(pos)?;
        let sel = self
            .selection
            .ok_or(BoardError::InvalidSwap(SwapRejection::NoSelection))?;
        if !sel.is_adjacent(pos) {
            return Err(BoardError::InvalidSwap(SwapRejection::NotNeighbour {
                from: sel,
                to: pos,
            }));
        }

        self.grid.swap(sel, pos);
        self.selection = None;
        debug!(from = %sel, to = %pos, "swapped");
        Ok(())
    }

    /// Pointer-style interaction: swap with the selection when `pos` is its
    /// neighbour and resolve with scoring, otherwise select `pos`.
    pub fn interact(&mut self, pos: Position) -> BoardResult<Interaction> {
        if let Some(sel) = self.selection.filter(|_| self.are_neighbours(pos)) {
            self.swap(pos)?;
            match self.resolve_until_stable(true) {
                Ok(outcome) => Ok(Interaction::Swapped(outcome)),
                Err(err) => {
                    // Undo the swap so a failed interaction changes nothing
                    self.grid.swap(sel, pos);
                    self.selection = Some(sel);
                    Err(err)
                }
            }
        } else {
            self.select(pos)?;
            Ok(Interaction::Selected(pos))
        }
    }

    /// Run one row sweep and one column sweep, clearing every run found.
    ///
    /// Returns whether anything was cleared. With `scoring` set, each cleared
    /// run adds its length to the score.
    pub fn detect_and_clear(&mut self, scoring: bool) -> bool {
        self.last_cleared.clear();
        self.sweep(Axis::Row, scoring);
        self.sweep(Axis::Column, scoring);
        !self.last_cleared.is_empty()
    }

    /// Repeat [`detect_and_clear`](Self::detect_and_clear) until a pass finds
    /// no runs.
    ///
    /// The loop is capped. When the cap is hit the board is refilled from
    /// scratch without scoring (score is kept, selection dropped) and the
    /// outcome reports `regenerated`. Fails only if refilling cannot produce a
    /// stable board either; grid, score, and selection are then restored to
    /// their values before the call.
    pub fn resolve_until_stable(&mut self, scoring: bool) -> BoardResult<ResolveOutcome> {
        let score = self.score;
        let selection = self.selection;
        self.checkpoint.copy_from(&self.grid);

        let partial = match self.resolve_capped(scoring) {
            Ok(outcome) => return Ok(outcome),
            Err(partial) => partial,
        };
        error!(
            passes = partial.passes,
            runs = partial.runs_cleared,
            "resolve loop diverged, refilling board"
        );
        self.selection = None;

        match self.fill_stable() {
            Ok(refill) => Ok(ResolveOutcome {
                passes: partial.passes + refill.passes,
                runs_cleared: partial.runs_cleared + refill.runs_cleared,
                cells_cleared: partial.cells_cleared + refill.cells_cleared,
                regenerated: true,
            }),
            Err(err) => {
                std::mem::swap(&mut self.grid, &mut self.checkpoint);
                self.score = score;
                self.selection = selection;
                Err(err)
            }
        }
    }

    /// Copy the observable state into `snap`, reusing its allocation
    pub fn snapshot_into(&self, snap: &mut BoardSnapshot) {
        snap.width = self.width();
        snap.height = self.height();
        snap.max_val = self.config.max_val;
        snap.cells.clear();
        snap.cells.extend_from_slice(self.grid.cells());
        snap.selection = self.selection;
        snap.score = self.score;
        snap.board_id = self.board_id;
        snap.board_hash = BoardSnapshot::hash_cells(&snap.cells);
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let mut snap = BoardSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }

    fn resolve_cap(&self) -> usize {
        MIN_RESOLVE_PASSES.max(RESOLVE_PASSES_PER_CELL * self.config.cell_count())
    }

    /// Resolve loop bounded by [`resolve_cap`](Self::resolve_cap). The error
    /// carries the work done before giving up.
    fn resolve_capped(&mut self, scoring: bool) -> Result<ResolveOutcome, ResolveOutcome> {
        let cap = self.resolve_cap();
        let mut outcome = ResolveOutcome::default();

        while outcome.passes < cap {
            let changed = self.detect_and_clear(scoring);
            outcome.passes += 1;
            if !changed {
                return Ok(outcome);
            }
            outcome.runs_cleared += self.last_cleared.len();
            outcome.cells_cleared += self.last_cleared.iter().map(ClearedRun::len).sum::<usize>();
            trace!(
                pass = outcome.passes,
                runs = self.last_cleared.len(),
                "resolve pass"
            );
        }

        Err(outcome)
    }

    /// Fill every cell at random and resolve without scoring, retrying with a
    /// full refill when a resolve attempt hits its cap.
    ///
    /// Restores the previous grid if every attempt diverges.
    fn fill_stable(&mut self) -> BoardResult<ResolveOutcome> {
        let backup = self.grid.clone();
        let mut passes = 0;

        for attempt in 0..MAX_REGENERATIONS {
            let max_val = self.config.max_val;
            let rng = &mut self.rng;
            self.grid.fill_with(|| rng.next_token(max_val));

            match self.resolve_capped(false) {
                Ok(mut outcome) => {
                    outcome.passes += passes;
                    outcome.regenerated = attempt > 0;
                    return Ok(outcome);
                }
                Err(partial) => {
                    passes += partial.passes;
                    warn!(attempt, passes = partial.passes, "initial resolve hit pass limit");
                }
            }
        }

        self.grid = backup;
        self.last_cleared.clear();
        Err(BoardError::ResolutionDivergence { passes })
    }

    /// One sweep over every line of `axis`.
    fn sweep(&mut self, axis: Axis, scoring: bool) {
        let (lines, len) = match axis {
            Axis::Row => (self.height(), self.width()),
            Axis::Column => (self.width(), self.height()),
        };

        for line in 0..lines {
            let mut start = 0;
            let mut color = self.token_on_line(axis, line, 0);
            let mut length = 0;

            for k in 0..len {
                // Re-read: a clear earlier on this line may have refilled cells
                let current = self.token_on_line(axis, line, k);

                if length >= MIN_RUN && current != color {
                    self.clear_run(
                        ClearedRun {
                            axis,
                            line,
                            start,
                            end: k - 1,
                            token: color,
                        },
                        scoring,
                    );
                    length = 0;
                    start = k;
                    color = current;
                }

                if current == color {
                    length += 1;
                } else {
                    color = current;
                    length = 1;
                    start = k;
                }
            }

            if length >= MIN_RUN {
                self.clear_run(
                    ClearedRun {
                        axis,
                        line,
                        start,
                        end: len - 1,
                        token: color,
                    },
                    scoring,
                );
            }
        }
    }

    #[inline(always)]
    fn token_on_line(&self, axis: Axis, line: usize, k: usize) -> Token {
        let width = self.grid.width();
        let idx = match axis {
            Axis::Row => line * width + k,
            Axis::Column => k * width + line,
        };
        self.grid.cells()[idx]
    }

    fn clear_run(&mut self, run: ClearedRun, scoring: bool) {
        let max_val = self.config.max_val;
        let rng = &mut self.rng;
        let fill = || rng.next_token(max_val);
        match run.axis {
            Axis::Row => self.grid.collapse_row_segment(run.line, run.start, run.end, fill),
            Axis::Column => self.grid.collapse_column_segment(run.line, run.start, run.end, fill),
        }

        if scoring {
            self.score = self.score.saturating_add(run.len() as u32);
        }
        debug!(
            axis = run.axis.as_str(),
            line = run.line,
            start = run.start,
            end = run.end,
            token = run.token,
            scoring,
            "cleared run"
        );
        self.last_cleared.push(run);
    }

    fn check_bounds(&self, pos: Position) -> BoardResult<()> {
        if pos.in_bounds(self.width(), self.height()) {
            Ok(())
        } else {
            Err(self.out_of_range(pos))
        }
    }

    fn out_of_range(&self, pos: Position) -> BoardError {
        BoardError::OutOfRange {
            position: pos,
            width: self.width(),
            height: self.height(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays a fixed token script, then repeats its last value
    struct Scripted {
        tokens: Vec<Token>,
        at: usize,
    }

    impl Scripted {
        fn new(tokens: &[Token]) -> Self {
            Self {
                tokens: tokens.to_vec(),
                at: 0,
            }
        }
    }

    impl TokenSource for Scripted {
        fn next_token(&mut self, max_val: u8) -> Token {
            let t = self.tokens[self.at.min(self.tokens.len() - 1)];
            self.at += 1;
            t % max_val
        }
    }

    fn rows(rows: &[&[Token]]) -> Vec<Vec<Token>> {
        rows.iter().map(|r| r.to_vec()).collect()
    }

    #[test]
    fn test_sweep_flushes_run_at_end_of_line() {
        // 0 1 2 2 2 -> run [2, 4] is only closed by the end of the row
        let mut e =
            BoardEngine::from_rows(&rows(&[&[0, 1, 2, 2, 2]]), 5, Scripted::new(&[3, 4, 3]))
                .unwrap();
        assert!(e.detect_and_clear(true));
        assert_eq!(
            e.last_cleared(),
            &[ClearedRun {
                axis: Axis::Row,
                line: 0,
                start: 2,
                end: 4,
                token: 2
            }]
        );
        assert_eq!(e.grid().cells(), &[0, 1, 3, 4, 3]);
        assert_eq!(e.score(), 3);
    }

    #[test]
    fn test_sweep_clears_two_runs_on_one_line() {
        let mut e = BoardEngine::from_rows(
            &rows(&[&[1, 1, 1, 2, 2, 2, 2]]),
            5,
            Scripted::new(&[0, 3, 0, 3, 4, 3, 4]),
        )
        .unwrap();
        assert!(e.detect_and_clear(true));

        let runs: Vec<(usize, usize)> = e.last_cleared().iter().map(|r| (r.start, r.end)).collect();
        assert_eq!(runs, vec![(0, 2), (3, 6)]);
        assert_eq!(e.grid().cells(), &[0, 3, 0, 3, 4, 3, 4]);
        assert_eq!(e.score(), 7);
    }

    #[test]
    fn test_run_of_two_is_ignored() {
        let mut e =
            BoardEngine::from_rows(&rows(&[&[1, 1, 0, 0, 1]]), 2, SimpleRng::new(1)).unwrap();
        let before = e.grid().clone();
        assert!(!e.detect_and_clear(true));
        assert_eq!(e.grid(), &before);
        assert_eq!(e.score(), 0);
    }

    #[test]
    fn test_row_clear_pulls_down_rows_above() {
        let mut e = BoardEngine::from_rows(
            &rows(&[
                &[0, 1, 2, 0],
                &[1, 2, 0, 1],
                &[3, 3, 3, 2],
            ]),
            5,
            Scripted::new(&[4, 4, 0]),
        )
        .unwrap();
        assert!(e.detect_and_clear(false));

        assert_eq!(e.grid().row(0), Some(&[4, 4, 0, 0][..]));
        assert_eq!(e.grid().row(1), Some(&[0, 1, 2, 1][..]));
        assert_eq!(e.grid().row(2), Some(&[1, 2, 0, 2][..]));
        assert_eq!(e.score(), 0);
    }

    #[test]
    fn test_column_clear_drops_cells_above_by_run_length() {
        let mut e = BoardEngine::from_rows(
            &rows(&[&[0], &[1], &[2], &[2], &[2], &[3]]),
            5,
            Scripted::new(&[4, 0, 4]),
        )
        .unwrap();
        assert!(e.detect_and_clear(true));

        assert_eq!(e.grid().cells(), &[4, 0, 4, 0, 1, 3]);
        assert_eq!(e.score(), 3);
        assert_eq!(e.last_cleared()[0].axis, Axis::Column);
    }

    #[test]
    fn test_cleared_run_positions() {
        let run = ClearedRun {
            axis: Axis::Column,
            line: 2,
            start: 1,
            end: 3,
            token: 0,
        };
        let positions: Vec<Position> = run.positions().collect();
        assert_eq!(
            positions,
            vec![Position::new(1, 2), Position::new(2, 2), Position::new(3, 2)]
        );
        assert_eq!(run.len(), 3);
    }

    #[test]
    fn test_resolve_cap_scales_with_board() {
        let small = BoardEngine::with_seed(BoardConfig::new(3, 3, 5), 1).unwrap();
        assert_eq!(small.resolve_cap(), MIN_RESOLVE_PASSES);

        let large = BoardEngine::with_seed(BoardConfig::new(64, 64, 5), 1).unwrap();
        assert_eq!(large.resolve_cap(), 64 * 64 * RESOLVE_PASSES_PER_CELL);
    }
}
