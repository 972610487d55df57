//! Character-grid renderer
//!
//! Rasterizes the arena onto a fixed grid of cells and writes it to any
//! `io::Write`, with optional terminal colours.

use std::io::Write;

use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

use super::palette::{Neon, Palette};
use super::{Frame, Renderer};
use crate::error::Result;

fn terminal_color(neon: Neon) -> Color {
    match neon {
        Neon::Cyan => Color::Cyan,
        Neon::Magenta => Color::Magenta,
        Neon::Yellow => Color::Yellow,
        Neon::Green => Color::Green,
        Neon::Orange => Color::DarkYellow,
        Neon::Red => Color::Red,
        Neon::White => Color::White,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    glyph: char,
    color: Option<Neon>,
}

const EMPTY: Cell = Cell {
    glyph: ' ',
    color: None,
};

pub struct TextRenderer<W: Write> {
    out: W,
    cols: usize,
    rows: usize,
    color: bool,
    palette: Palette,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W, cols: usize, rows: usize) -> Self {
        Self {
            out,
            cols: cols.max(1),
            rows: rows.max(1),
            color: false,
            palette: Palette::default(),
        }
    }

    /// Emit terminal colour codes
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Map every entity onto the grid. Each entity covers at least one cell.
    fn rasterize(&self, frame: &Frame<'_>) -> Vec<Vec<Cell>> {
        let mut grid = vec![vec![EMPTY; self.cols]; self.rows];
        let sx = self.cols as f32 / frame.arena.width;
        let sy = self.rows as f32 / frame.arena.height;

        let mut entities: Vec<_> = frame.entities.iter().filter(|e| !e.is_removed()).collect();
        entities.sort_by_key(|e| Palette::layer(e.category));

        for entity in entities {
            let rect = entity.rect();
            if rect.right() <= 0.0
                || rect.bottom() <= 0.0
                || rect.left() >= frame.arena.width
                || rect.top() >= frame.arena.height
            {
                continue;
            }
            let style = self.palette.style(entity);
            let cell = Cell {
                glyph: style.glyph,
                color: Some(style.color),
            };
            let x0 = ((rect.left() * sx).floor().max(0.0) as usize).min(self.cols - 1);
            let y0 = ((rect.top() * sy).floor().max(0.0) as usize).min(self.rows - 1);
            let x1 = ((rect.right() * sx).ceil() as usize).clamp(x0 + 1, self.cols);
            let y1 = ((rect.bottom() * sy).ceil() as usize).clamp(y0 + 1, self.rows);
            for row in &mut grid[y0..y1] {
                for slot in &mut row[x0..x1] {
                    *slot = cell;
                }
            }
        }
        grid
    }

    fn write_cell(&mut self, cell: Cell) -> Result<()> {
        match cell.color {
            Some(neon) if self.color => {
                queue!(
                    self.out,
                    SetForegroundColor(terminal_color(neon)),
                    Print(cell.glyph),
                    ResetColor
                )?;
            }
            _ => write!(self.out, "{}", cell.glyph)?,
        }
        Ok(())
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn draw(&mut self, frame: &Frame<'_>) -> Result<()> {
        let grid = self.rasterize(frame);
        let border = format!("+{}+", "-".repeat(self.cols));

        writeln!(self.out, "{border}")?;
        for row in grid {
            write!(self.out, "|")?;
            for cell in row {
                self.write_cell(cell)?;
            }
            writeln!(self.out, "|")?;
        }
        writeln!(self.out, "{border}")?;

        let mut status = format!("{}  frame {}  {}", frame.game, frame.frame, frame.score_line());
        for (label, value) in &frame.hud {
            status.push_str(&format!("  {label} {value}"));
        }
        writeln!(self.out, "{status}")?;

        if let Some(overlay) = &frame.overlay {
            writeln!(self.out, ">> {}", overlay.title)?;
            if let Some(detail) = &overlay.detail {
                writeln!(self.out, "   {detail}")?;
            }
            if let Some(prompt) = overlay.prompt {
                writeln!(self.out, "   {prompt}")?;
            }
        }
        self.out.flush()?;
        Ok(())
    }
}
