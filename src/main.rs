//! Terminal match-three runner (default binary).
//!
//! This is the primary gameplay entrypoint.
//! It uses crossterm for keyboard and mouse input and a custom
//! framebuffer-based renderer (no widget/layout library).

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEventKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tui_match3::core::{BoardEngine, BoardSnapshot, Interaction};
use tui_match3::input::{handle_key_event, should_quit};
use tui_match3::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use tui_match3::types::{
    BoardAction, BoardConfig, Position, DEFAULT_HEIGHT, DEFAULT_TOKENS, DEFAULT_WIDTH, TICK_MS,
};

#[derive(Parser, Debug)]
#[command(name = "tui-match3")]
#[command(about = "Match-three puzzle in the terminal")]
struct Args {
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: u8,

    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: u8,

    /// Number of distinct token values
    #[arg(long, default_value_t = DEFAULT_TOKENS)]
    tokens: u8,

    /// RNG seed; taken from the clock when omitted
    #[arg(long)]
    seed: Option<u32>,

    /// Write logs to this file (filter with RUST_LOG, default "info")
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let config = BoardConfig::new(args.width, args.height, args.tokens);
    let seed = args.seed.unwrap_or_else(clock_seed);

    // Build the board before entering raw mode so errors print normally.
    let engine = BoardEngine::with_seed(config, seed).with_context(|| {
        format!(
            "cannot create a {}x{} board with {} tokens",
            args.width, args.height, args.tokens
        )
    })?;
    info!(seed, config = ?engine.config(), "starting game");

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, Session::new(engine));

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout and stderr belong to the raw-mode screen.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
        .unwrap_or(1)
}

fn run(term: &mut TerminalRenderer, mut session: Session) -> Result<()> {
    let view = GameView::default();
    let mut snap = BoardSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let viewport = Viewport::new(w, h);
        session.engine.snapshot_into(&mut snap);
        view.render_into(&snap, Some(session.cursor), viewport, &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        session.apply(action)?;
                    }
                }
                Event::Mouse(mouse) if mouse.kind == MouseEventKind::Up(MouseButton::Left) => {
                    let clicked =
                        view.decode_click(viewport, snap.width, snap.height, mouse.column, mouse.row);
                    if let Some(pos) = clicked {
                        session.click(pos)?;
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            session.tick()?;
        }
    }
}

/// Engine plus the keyboard cursor.
struct Session {
    engine: BoardEngine,
    cursor: Position,
}

impl Session {
    fn new(engine: BoardEngine) -> Self {
        Self {
            engine,
            cursor: Position::new(0, 0),
        }
    }

    fn apply(&mut self, action: BoardAction) -> Result<()> {
        match action {
            BoardAction::Cursor(dir) => {
                self.cursor = self
                    .cursor
                    .step(dir, self.engine.width(), self.engine.height());
            }
            BoardAction::Activate => self.click(self.cursor)?,
            BoardAction::ClearSelection => self.engine.clear_selection(),
            BoardAction::NewGame => {
                // `--seed <rng_state>` starts on the same board
                let rng_state = self.engine.rng().state();
                self.engine.regenerate()?;
                info!(rng_state, "new game");
            }
        }
        Ok(())
    }

    fn click(&mut self, pos: Position) -> Result<()> {
        self.cursor = pos;
        if let Interaction::Swapped(outcome) = self.engine.interact(pos)? {
            info!(
                runs = outcome.runs_cleared,
                cells = outcome.cells_cleared,
                score = self.engine.score(),
                "swap resolved"
            );
        }
        Ok(())
    }

    /// Per-frame resolve; a no-op on a stable board.
    fn tick(&mut self) -> Result<()> {
        let outcome = self.engine.resolve_until_stable(true)?;
        if outcome.changed() {
            info!(runs = outcome.runs_cleared, score = self.engine.score(), "tick resolved");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_match3::types::Direction;

    fn session() -> Session {
        Session::new(BoardEngine::with_seed(BoardConfig::default(), 42).unwrap())
    }

    #[test]
    fn cursor_moves_and_stops_at_edges() {
        let mut s = session();
        s.apply(BoardAction::Cursor(Direction::Up)).unwrap();
        s.apply(BoardAction::Cursor(Direction::Left)).unwrap();
        assert_eq!(s.cursor, Position::new(0, 0));

        for _ in 0..20 {
            s.apply(BoardAction::Cursor(Direction::Right)).unwrap();
            s.apply(BoardAction::Cursor(Direction::Down)).unwrap();
        }
        assert_eq!(s.cursor, Position::new(7, 7));
    }

    #[test]
    fn activate_selects_then_swaps_with_neighbour() {
        let mut s = session();
        s.apply(BoardAction::Activate).unwrap();
        assert_eq!(s.engine.selection(), Some(Position::new(0, 0)));

        s.apply(BoardAction::Cursor(Direction::Right)).unwrap();
        s.apply(BoardAction::Activate).unwrap();
        assert_eq!(s.engine.selection(), None);
        assert!(!s.engine.detect_and_clear(true));
    }

    #[test]
    fn activate_on_far_cell_moves_selection() {
        let mut s = session();
        s.apply(BoardAction::Activate).unwrap();
        s.cursor = Position::new(5, 5);
        s.apply(BoardAction::Activate).unwrap();
        assert_eq!(s.engine.selection(), Some(Position::new(5, 5)));

        s.apply(BoardAction::ClearSelection).unwrap();
        assert_eq!(s.engine.selection(), None);
    }

    #[test]
    fn new_game_resets_score_and_bumps_board_id() {
        let mut s = session();
        s.apply(BoardAction::NewGame).unwrap();
        assert_eq!(s.engine.score(), 0);
        assert_eq!(s.engine.board_id(), 1);
    }

    #[test]
    fn new_game_is_reproducible_from_logged_state() {
        let mut s = session();
        let rng_state = s.engine.rng().state();
        s.apply(BoardAction::NewGame).unwrap();

        let replay = BoardEngine::with_seed(s.engine.config(), rng_state).unwrap();
        assert_eq!(replay.grid(), s.engine.grid());
    }

    #[test]
    fn tick_on_stable_board_changes_nothing() {
        let mut s = session();
        let before = s.engine.grid().clone();
        s.tick().unwrap();
        assert_eq!(s.engine.grid(), &before);
        assert_eq!(s.engine.score(), 0);
    }
}
