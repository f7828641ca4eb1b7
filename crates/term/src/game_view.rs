//! GameView: maps a `core::BoardSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! The view also owns the inverse mapping, [`GameView::decode_click`], which
//! turns a terminal cell under the mouse into a board position. Both use the
//! same [`BoardLayout`], so what is drawn is what is clickable.

use crate::core::BoardSnapshot;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Position, Token};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Where the board frame sits inside a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardLayout {
    /// Top-left corner of the border
    pub start_x: u16,
    pub start_y: u16,
    /// Border size including the border itself
    pub frame_w: u16,
    pub frame_h: u16,
}

/// Token colors; token `t` uses entry `t % len`.
const PALETTE: [Rgb; 8] = [
    Rgb::new(239, 19, 19),   // red
    Rgb::new(255, 204, 0),   // yellow
    Rgb::new(57, 252, 18),   // green
    Rgb::new(18, 182, 252),  // blue
    Rgb::new(252, 18, 249),  // magenta
    Rgb::new(80, 220, 220),  // cyan
    Rgb::new(255, 140, 0),   // orange
    Rgb::new(235, 235, 235), // white
];

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const CURSOR_BG: Rgb = Rgb::new(90, 90, 110);
const SELECTED_BG: Rgb = Rgb::new(200, 200, 200);

/// A lightweight terminal renderer for the match-three board.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Place a `width` x `height` board in `viewport`.
    pub fn layout(&self, viewport: Viewport, width: usize, height: usize) -> BoardLayout {
        let frame_w = (width as u16).saturating_mul(self.cell_w).saturating_add(2);
        let frame_h = (height as u16).saturating_mul(self.cell_h).saturating_add(2);

        // Leave room for the side panel when the viewport allows it
        let panel_w = if viewport.width >= frame_w.saturating_add(2 + SIDE_PANEL_W) {
            SIDE_PANEL_W + 2
        } else {
            0
        };
        let start_x = viewport.width.saturating_sub(frame_w.saturating_add(panel_w)) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };

        BoardLayout {
            start_x,
            start_y,
            frame_w,
            frame_h,
        }
    }

    /// Translate a terminal cell to a board position.
    ///
    /// Returns `None` for the border, the side panel, and anything else
    /// outside the board.
    pub fn decode_click(
        &self,
        viewport: Viewport,
        width: usize,
        height: usize,
        x: u16,
        y: u16,
    ) -> Option<Position> {
        let layout = self.layout(viewport, width, height);
        let inner_x = x.checked_sub(layout.start_x + 1)?;
        let inner_y = y.checked_sub(layout.start_y + 1)?;

        let col = (inner_x / self.cell_w) as usize;
        let row = (inner_y / self.cell_h) as usize;
        let pos = Position::new(row, col);
        pos.in_bounds(width, height).then_some(pos)
    }

    /// Render the board into an existing framebuffer.
    ///
    /// This is the allocation-free hot path. Callers can reuse a framebuffer
    /// across frames and only resize when the terminal size changes.
    pub fn render_into(
        &self,
        snap: &BoardSnapshot,
        cursor: Option<Position>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let layout = self.layout(viewport, snap.width, snap.height);
        let border = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
        self.draw_border(fb, layout, border);

        for row in 0..snap.height {
            for col in 0..snap.width {
                let pos = Position::new(row, col);
                if let Some(token) = snap.get(pos) {
                    self.draw_token(fb, layout, pos, token, CellMark::None);
                }
            }
        }

        // Swap targets around the selection, then the selection itself
        if let Some(sel) = snap.selection {
            for n in sel.neighbours(snap.width, snap.height) {
                if let Some(token) = snap.get(n) {
                    self.draw_token(fb, layout, n, token, CellMark::Hint);
                }
            }
            if let Some(token) = snap.get(sel) {
                self.draw_token(fb, layout, sel, token, CellMark::Selected);
            }
        }

        if let Some(cur) = cursor {
            if let Some(token) = snap.get(cur) {
                self.draw_token(fb, layout, cur, token, CellMark::Cursor);
            }
        }

        self.draw_side_panel(fb, snap, viewport, layout);
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        snap: &BoardSnapshot,
        cursor: Option<Position>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, cursor, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, layout: BoardLayout, style: CellStyle) {
        let BoardLayout {
            start_x: x,
            start_y: y,
            frame_w: w,
            frame_h: h,
        } = layout;
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_token(
        &self,
        fb: &mut FrameBuffer,
        layout: BoardLayout,
        pos: Position,
        token: Token,
        mark: CellMark,
    ) {
        let fg = token_color(token);
        let (ch, style) = match mark {
            CellMark::None => (token_glyph(token), CellStyle::new(fg, BOARD_BG)),
            CellMark::Hint => ('▓', CellStyle::new(fg, BOARD_BG).dim()),
            CellMark::Selected => ('▒', CellStyle::new(fg, SELECTED_BG).bold()),
            CellMark::Cursor => (token_glyph(token), CellStyle::new(fg, CURSOR_BG).bold()),
        };

        let px = (layout.start_x + 1)
            .saturating_add((pos.col as u16).saturating_mul(self.cell_w));
        let py = (layout.start_y + 1)
            .saturating_add((pos.row as u16).saturating_mul(self.cell_h));
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);

        // Bracket the cursor cell when there is room for it
        if mark == CellMark::Cursor && self.cell_w >= 2 {
            let bracket = CellStyle::new(Rgb::new(255, 255, 255), CURSOR_BG).bold();
            fb.put_char(px, py, '[', bracket);
            fb.put_char(px + self.cell_w - 1, py, ']', bracket);
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &BoardSnapshot,
        viewport: Viewport,
        layout: BoardLayout,
    ) {
        let panel_x = layout
            .start_x
            .saturating_add(layout.frame_w)
            .saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < SIDE_PANEL_W {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), Rgb::new(0, 0, 0)).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
        let help = value.dim();

        let mut y = layout.start_y;
        fb.put_str(panel_x, y, "SCORE", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, snap.score, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "GAME", label);
        y = y.saturating_add(1);
        let x = fb.put_str(panel_x, y, "#", value);
        fb.put_u32(x, y, snap.board_id.wrapping_add(1), value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "SELECTED", label);
        y = y.saturating_add(1);
        match snap.selection {
            Some(sel) => {
                let x = fb.put_u32(panel_x, y, sel.row as u32, value);
                let x = fb.put_str(x, y, ",", value);
                fb.put_u32(x, y, sel.col as u32, value);
            }
            None => {
                fb.put_str(panel_x, y, "-", value);
            }
        }
        y = y.saturating_add(2);

        for line in HELP_LINES {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, line, help);
            y = y.saturating_add(1);
        }
    }
}

const SIDE_PANEL_W: u16 = 16;

const HELP_LINES: [&str; 5] = [
    "arrows  move",
    "space   select",
    "esc     deselect",
    "n       new game",
    "q       quit",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellMark {
    None,
    Hint,
    Selected,
    Cursor,
}

fn token_color(token: Token) -> Rgb {
    PALETTE[token as usize % PALETTE.len()]
}

/// Solid block for the first palette cycle, a hex digit beyond it so that
/// tokens sharing a color stay distinguishable.
fn token_glyph(token: Token) -> char {
    if (token as usize) < PALETTE.len() {
        '█'
    } else {
        char::from_digit(token as u32 % 16, 16).unwrap_or('?')
    }
}
