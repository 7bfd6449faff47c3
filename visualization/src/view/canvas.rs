//! Depth-tested character canvas
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt;

use crate::palette::{Rgb, ANSI_RESET};
use crate::view::ViewError;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    glyph: char,
    depth: f32,
    color: Option<Rgb>,
}

impl Cell {
    const BLANK: Cell = Cell {
        glyph: ' ',
        depth: f32::INFINITY,
        color: None,
    };
}

/// Grid of glyphs where each cell keeps the nearest thing drawn into it.
///
/// Depth is whatever the caller wants it to be: view-space depth for the
/// cloud, a drawing priority for flat frames. Lower wins.
#[derive(Debug, Clone)]
pub struct CharCanvas {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl CharCanvas {
    pub fn new(width: usize, height: usize) -> Result<Self, ViewError> {
        if width == 0 || height == 0 {
            return Err(ViewError::EmptyCanvas { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![Cell::BLANK; width * height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    /// Draws `glyph` at a fractional position if nothing nearer is there.
    /// Returns whether the cell changed; positions off the canvas are
    /// ignored.
    pub fn plot(&mut self, x: f32, y: f32, depth: f32, glyph: char, color: Option<Rgb>) -> bool {
        if !(x >= 0.0 && y >= 0.0) {
            return false;
        }
        let (col, row) = (x as usize, y as usize);
        if col >= self.width || row >= self.height {
            return false;
        }

        let cell = &mut self.cells[row * self.width + col];
        if depth >= cell.depth {
            return false;
        }
        *cell = Cell { glyph, depth, color };
        true
    }

    /// Outline of an axis-aligned ellipse centered on `center`
    pub fn ellipse(
        &mut self,
        center: (f32, f32),
        radii: (f32, f32),
        depth: f32,
        glyph: char,
        color: Option<Rgb>,
    ) {
        let circumference = std::f32::consts::TAU * radii.0.max(radii.1);
        let samples = (circumference * 2.0).ceil().clamp(8.0, 4096.0) as usize;
        for i in 0..samples {
            let angle = std::f32::consts::TAU * i as f32 / samples as f32;
            self.plot(
                center.0 + radii.0 * angle.cos(),
                center.1 + radii.1 * angle.sin(),
                depth,
                glyph,
                color,
            );
        }
    }

    pub fn glyph_at(&self, col: usize, row: usize) -> Option<char> {
        (col < self.width && row < self.height).then(|| self.cells[row * self.width + col].glyph)
    }

    /// Cells holding anything other than a blank
    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|c| c.depth.is_finite()).count()
    }

    /// Renders rows separated by newlines, with trailing blanks trimmed.
    /// Colored cells get ANSI escapes when `color` is set.
    pub fn render(&self, color: bool) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.height);
        for (i, row) in self.cells.chunks(self.width).enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let used = row
                .iter()
                .rposition(|c| c.glyph != ' ')
                .map_or(0, |last| last + 1);
            for cell in &row[..used] {
                match cell.color.filter(|_| color) {
                    Some(rgb) => {
                        out.push_str(&rgb.ansi_fg());
                        out.push(cell.glyph);
                        out.push_str(ANSI_RESET);
                    }
                    None => out.push(cell.glyph),
                }
            }
        }
        out
    }
}

impl fmt::Display for CharCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}
