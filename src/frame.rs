// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::canvas::{Canvas, Texel};
use crate::palette::{quantize, terminal_color};
use crate::runtime::ColorMode;

/// Composited brightness below which a cell is shown blank.
pub const GHOST_FLOOR: f32 = 0.04;

/// Which canvas a composited cell's glyph came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Blank,
    Trail,
    Head,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub layer: Layer,
}

impl Cell {
    pub fn blank(bg: Option<Color>) -> Self {
        Self {
            ch: ' ',
            fg: None,
            bg,
            layer: Layer::Blank,
        }
    }

    /// Head glyphs are emitted bold.
    pub fn bold(&self) -> bool {
        self.layer == Layer::Head
    }
}

/// The terminal-facing cell grid, rebuilt from the canvases every tick.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cells: Vec<Cell>,
    bg: Option<Color>,
    dirty_all: bool,
    dirty_map: Vec<bool>,
    dirty: Vec<usize>,
}

impl Frame {
    pub fn new(width: u16, height: u16, bg: Option<Color>) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::blank(bg); len],
            bg,
            dirty_all: true,
            dirty_map: vec![false; len],
            dirty: Vec::new(),
        }
    }

    pub fn is_dirty_all(&self) -> bool {
        self.dirty_all
    }

    pub fn dirty_indices(&self) -> &[usize] {
        &self.dirty
    }

    pub fn has_changes(&self) -> bool {
        self.dirty_all || !self.dirty.is_empty()
    }

    pub fn clear_dirty(&mut self) {
        if self.dirty_all {
            self.dirty_all = false;
            self.dirty_map.fill(false);
        } else {
            for &i in &self.dirty {
                self.dirty_map[i] = false;
            }
        }
        self.dirty.clear();
    }

    pub fn cell_at_index(&self, i: usize) -> Cell {
        self.cells.get(i).copied().unwrap_or(Cell::blank(self.bg))
    }

    #[cfg(test)]
    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[y as usize * self.width as usize + x as usize])
    }

    fn set_index(&mut self, i: usize, cell: Cell) {
        if self.cells[i] == cell {
            return;
        }
        self.cells[i] = cell;
        if !self.dirty_all && !self.dirty_map[i] {
            self.dirty_map[i] = true;
            self.dirty.push(i);
        }
    }

    /// Head over trail, source-over, on a black page.
    pub fn compose(&mut self, trail: &Canvas, head: &Canvas, mode: ColorMode) {
        let len = self.cells.len();
        for i in 0..len {
            let h = head.texel_at_index(i);
            let t = trail.texel_at_index(i);

            let keep = 1.0 - h.alpha;
            let rgb = [
                h.rgb[0] + t.rgb[0] * keep,
                h.rgb[1] + t.rgb[1] * keep,
                h.rgb[2] + t.rgb[2] * keep,
            ];
            let on_head = h.alpha > 0.0 && h.ch != ' ';
            let ch = if on_head { h.ch } else { t.ch };
            let mixed = Texel {
                ch,
                rgb,
                alpha: h.alpha + t.alpha * keep,
            };

            let cell = if ch == ' ' || mixed.intensity() < GHOST_FLOOR {
                Cell::blank(self.bg)
            } else {
                Cell {
                    ch,
                    fg: terminal_color(mode, quantize(mixed.rgb)),
                    bg: self.bg,
                    layer: if on_head { Layer::Head } else { Layer::Trail },
                }
            };
            self.set_index(i, cell);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{CellMetrics, ViewportSurfaces};
    use crate::glyph::{GLYPH_FONT, HEAD_STYLE, TRAIL_STYLE};
    use crate::surface::{FillStyle, Surface};

    const METRICS: CellMetrics = CellMetrics {
        width: 12.0,
        height: 16.0,
    };

    fn surfaces() -> ViewportSurfaces {
        ViewportSurfaces::new(3, 2, METRICS)
    }

    #[test]
    fn head_glyph_wins_and_is_bold() {
        let mut s = surfaces();
        s.trail.fill_text("T", 0.0, 6.0, GLYPH_FONT, TRAIL_STYLE);
        s.head.fill_text("H", 0.0, 6.0, GLYPH_FONT, HEAD_STYLE);

        let mut f = Frame::new(3, 2, None);
        f.compose(&s.trail, &s.head, ColorMode::TrueColor);

        let c = f.get(0, 0).unwrap();
        assert_eq!(c.ch, 'H');
        assert_eq!(c.layer, Layer::Head);
        assert!(c.bold());
        // 0.8 white over opaque green: (204, 255, 204)
        assert_eq!(
            c.fg,
            Some(Color::Rgb {
                r: 204,
                g: 255,
                b: 204
            })
        );
    }

    #[test]
    fn trail_shows_through_after_head_is_cleared() {
        let mut s = surfaces();
        s.trail.fill_text("T", 12.0, 22.0, GLYPH_FONT, TRAIL_STYLE);
        s.trail.fill_rect(FillStyle::rgba(0, 0, 0, 0.05));
        s.head.clear_rect();

        let mut f = Frame::new(3, 2, Some(Color::Black));
        f.compose(&s.trail, &s.head, ColorMode::TrueColor);

        let c = f.get(1, 1).unwrap();
        assert_eq!(c.ch, 'T');
        assert_eq!(c.layer, Layer::Trail);
        assert!(!c.bold());
        assert_eq!(c.bg, Some(Color::Black));
        assert_eq!(c.fg, Some(Color::Rgb { r: 0, g: 242, b: 0 }));
    }

    #[test]
    fn faded_ghosts_render_blank() {
        let mut s = surfaces();
        s.trail.fill_text("T", 0.0, 6.0, GLYPH_FONT, TRAIL_STYLE);
        for _ in 0..80 {
            s.trail.fill_rect(FillStyle::rgba(0, 0, 0, 0.05));
        }
        let mut f = Frame::new(3, 2, None);
        f.compose(&s.trail, &s.head, ColorMode::TrueColor);
        let c = f.get(0, 0).unwrap();
        assert_eq!(c, Cell::blank(None));
        assert_eq!(c.layer, Layer::Blank);
    }

    #[test]
    fn only_changed_cells_become_dirty() {
        let mut s = surfaces();
        let mut f = Frame::new(3, 2, None);
        f.compose(&s.trail, &s.head, ColorMode::Color256);
        assert!(f.is_dirty_all());
        f.clear_dirty();

        f.compose(&s.trail, &s.head, ColorMode::Color256);
        assert!(!f.has_changes());

        s.head.fill_text("Z", 24.0, 22.0, GLYPH_FONT, HEAD_STYLE);
        f.compose(&s.trail, &s.head, ColorMode::Color256);
        assert_eq!(f.dirty_indices(), &[5]);
    }
}
