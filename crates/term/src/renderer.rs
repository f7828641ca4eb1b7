//! TerminalRenderer: pushes framebuffers to a terminal as crossterm commands.
//!
//! A frame is written in full when there is no previous frame of the same
//! size (first frame, resize, or after [`TerminalRenderer::invalidate`]).
//! Otherwise only the spans of cells that differ are rewritten.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor, event,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};

pub struct TerminalRenderer<W: Write = io::Stdout> {
    out: W,
    prev: Option<FrameBuffer>,
    buf: Vec<u8>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            prev: None,
            buf: Vec::with_capacity(32 * 1024),
        }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Raw mode, alternate screen, mouse reporting, hidden cursor.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(event::EnableMouseCapture)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()
    }

    /// Undo [`enter`](Self::enter) in reverse order.
    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(event::DisableMouseCapture)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Make the next draw a full redraw (the terminal contents are unknown,
    /// e.g. after a resize).
    pub fn invalidate(&mut self) {
        self.prev = None;
    }

    /// Draw `fb` and keep it as the diff base for the next frame.
    ///
    /// On return `fb` holds the previous frame's buffer (same size, stale
    /// contents), so a caller can render into it again without allocating.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.buf.clear();
        let mut spare = match self.prev.take() {
            Some(prev) if same_size(&prev, fb) => {
                encode_diff_into(&prev, fb, &mut self.buf)?;
                prev
            }
            _ => {
                encode_full_into(fb, &mut self.buf)?;
                FrameBuffer::new(fb.width(), fb.height())
            }
        };
        self.flush_buf()?;

        std::mem::swap(&mut spare, fb);
        self.prev = Some(spare);
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.out.write_all(&self.buf)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Encode a clear-and-redraw of the whole frame into `out`.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let mut pen = Pen::new(out);
    let width = fb.width() as usize;
    if width > 0 {
        for (y, row) in fb.cells().chunks(width).enumerate() {
            pen.out.queue(cursor::MoveTo(0, y as u16))?;
            pen.cells(row)?;
        }
    }
    pen.finish()
}

/// Encode only the cells of `next` that differ from `prev` into `out`.
///
/// Frames of different sizes fall back to a full redraw.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    if !same_size(prev, next) {
        return encode_full_into(next, out);
    }

    let mut pen = Pen::new(out);
    for_each_changed_span(prev, next, |x, y, cells| {
        pen.out.queue(cursor::MoveTo(x, y))?;
        pen.cells(cells)
    })?;
    pen.finish()
}

fn same_size(a: &FrameBuffer, b: &FrameBuffer) -> bool {
    a.width() == b.width() && a.height() == b.height()
}

/// Writes cells, switching style only when it changes.
struct Pen<'a> {
    out: &'a mut Vec<u8>,
    style: Option<CellStyle>,
}

impl<'a> Pen<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self { out, style: None }
    }

    fn cells(&mut self, cells: &[Cell]) -> Result<()> {
        for cell in cells {
            if self.style != Some(cell.style) {
                queue_style(self.out, cell.style)?;
                self.style = Some(cell.style);
            }
            self.out.queue(Print(cell.ch))?;
        }
        Ok(())
    }

    fn finish(self) -> Result<()> {
        self.out.queue(ResetColor)?;
        self.out.queue(SetAttribute(Attribute::Reset))?;
        Ok(())
    }
}

fn queue_style(out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(SetForegroundColor(to_color(style.fg)))?;
    out.queue(SetBackgroundColor(to_color(style.bg)))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    if style.dim {
        out.queue(SetAttribute(Attribute::Dim))?;
    }
    Ok(())
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Call `f(x, y, cells)` for each maximal horizontal span where `next`
/// differs from `prev`. Both frames must be the same size.
fn for_each_changed_span(
    prev: &FrameBuffer,
    next: &FrameBuffer,
    mut f: impl FnMut(u16, u16, &[Cell]) -> Result<()>,
) -> Result<()> {
    let width = next.width() as usize;
    if width == 0 {
        return Ok(());
    }

    let rows = prev.cells().chunks(width).zip(next.cells().chunks(width));
    for (y, (old, new)) in rows.enumerate() {
        let mut x = 0;
        while x < width {
            if old[x] == new[x] {
                x += 1;
                continue;
            }
            let start = x;
            while x < width && old[x] != new[x] {
                x += 1;
            }
            f(start as u16, y as u16, &new[start..x])?;
        }
    }
    Ok(())
}
