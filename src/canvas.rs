// Copyright (c) 2026 rezky_nightky

use crate::surface::{FillStyle, Font, Surface, Viewport};

/// Virtual pixels covered by one terminal cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellMetrics {
    pub width: f64,
    pub height: f64,
}

/// Premultiplied color plus the glyph last painted into the cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Texel {
    pub ch: char,
    pub rgb: [f32; 3],
    pub alpha: f32,
}

impl Texel {
    pub const CLEAR: Texel = Texel {
        ch: ' ',
        rgb: [0.0; 3],
        alpha: 0.0,
    };

    fn blend(&mut self, style: FillStyle) {
        let a = style.a.clamp(0.0, 1.0);
        let keep = 1.0 - a;
        let src = [style.r, style.g, style.b];
        for (dst, s) in self.rgb.iter_mut().zip(src) {
            *dst = (s as f32 / 255.0) * a + *dst * keep;
        }
        self.alpha = a + self.alpha * keep;
    }

    /// Brightest premultiplied channel, 0..=1.
    pub fn intensity(&self) -> f32 {
        self.rgb.iter().copied().fold(0.0, f32::max)
    }
}

/// A pixel-addressed drawing surface backed by a terminal-sized cell grid.
pub struct Canvas {
    cols: u16,
    rows: u16,
    metrics: CellMetrics,
    texels: Vec<Texel>,
}

impl Canvas {
    pub fn new(cols: u16, rows: u16, metrics: CellMetrics) -> Self {
        Self {
            cols,
            rows,
            metrics,
            texels: vec![Texel::CLEAR; cols as usize * rows as usize],
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.cols as f64 * self.metrics.width,
            height: self.rows as f64 * self.metrics.height,
        }
    }

    #[cfg(test)]
    pub fn texel(&self, col: u16, row: u16) -> Option<&Texel> {
        self.index(col, row).map(|i| &self.texels[i])
    }

    pub fn texel_at_index(&self, i: usize) -> Texel {
        self.texels.get(i).copied().unwrap_or(Texel::CLEAR)
    }

    fn index(&self, col: u16, row: u16) -> Option<usize> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(row as usize * self.cols as usize + col as usize)
    }

    /// Cell holding the glyph whose baseline sits at `(x, y)`.
    fn locate(&self, x: f64, y: f64, font: Font) -> Option<(u16, u16)> {
        let col = (x / self.metrics.width).floor();
        let row = ((y - font.size_px / 2.0) / self.metrics.height).floor();
        if !col.is_finite() || !row.is_finite() || col < 0.0 || row < 0.0 {
            return None;
        }
        if col >= self.cols as f64 || row >= self.rows as f64 {
            return None;
        }
        Some((col as u16, row as u16))
    }
}

impl Surface for Canvas {
    fn fill_rect(&mut self, style: FillStyle) {
        for t in &mut self.texels {
            t.blend(style);
        }
    }

    fn clear_rect(&mut self) {
        self.texels.fill(Texel::CLEAR);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: Font, style: FillStyle) {
        let Some((col, row)) = self.locate(x, y, font) else {
            return;
        };
        for (offset, ch) in text.chars().enumerate() {
            let Some(i) = self.index(col.saturating_add(offset as u16), row) else {
                break;
            };
            let t = &mut self.texels[i];
            t.ch = ch;
            t.blend(style);
        }
    }
}

/// The two same-sized canvases the rain paints on.
pub struct ViewportSurfaces {
    pub trail: Canvas,
    pub head: Canvas,
}

impl ViewportSurfaces {
    pub fn new(cols: u16, rows: u16, metrics: CellMetrics) -> Self {
        Self {
            trail: Canvas::new(cols, rows, metrics),
            head: Canvas::new(cols, rows, metrics),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.trail.viewport()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::GLYPH_FONT;

    const METRICS: CellMetrics = CellMetrics {
        width: 12.0,
        height: 16.0,
    };

    #[test]
    fn viewport_scales_cells_by_metrics() {
        let c = Canvas::new(100, 50, METRICS);
        assert_eq!(
            c.viewport(),
            Viewport {
                width: 1200.0,
                height: 800.0
            }
        );
    }

    #[test]
    fn text_lands_in_the_cell_under_its_center() {
        let mut c = Canvas::new(10, 10, METRICS);
        c.fill_text("Q", 25.0, 6.0 + 16.0 * 3.0, GLYPH_FONT, FillStyle::rgb(0, 255, 0));
        let t = c.texel(2, 3).unwrap();
        assert_eq!(t.ch, 'Q');
        assert_eq!(t.alpha, 1.0);
        assert_eq!(t.rgb, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn text_outside_the_grid_is_dropped() {
        let mut c = Canvas::new(4, 4, METRICS);
        let style = FillStyle::rgb(255, 255, 255);
        c.fill_text("A", 10.0, -40.0, GLYPH_FONT, style);
        c.fill_text("A", -1.0, 20.0, GLYPH_FONT, style);
        c.fill_text("A", 48.0, 20.0, GLYPH_FONT, style);
        c.fill_text("A", 10.0, 6.0 + 64.0, GLYPH_FONT, style);
        assert!((0..16).all(|i| c.texel_at_index(i) == Texel::CLEAR));
    }

    #[test]
    fn low_alpha_fill_dims_without_erasing() {
        let mut c = Canvas::new(1, 1, METRICS);
        c.fill_text("K", 0.0, 6.0, GLYPH_FONT, FillStyle::rgb(0, 255, 0));
        c.fill_rect(FillStyle::rgba(0, 0, 0, 0.05));
        let t = c.texel(0, 0).unwrap();
        assert_eq!(t.ch, 'K');
        assert!((t.rgb[1] - 0.95).abs() < 1e-6);
        assert!((t.alpha - 1.0).abs() < 1e-6);

        for _ in 0..100 {
            c.fill_rect(FillStyle::rgba(0, 0, 0, 0.05));
        }
        let t = c.texel(0, 0).unwrap();
        assert!(t.intensity() < 0.01);
        assert!(t.intensity() > 0.0);
    }

    #[test]
    fn fill_over_empty_cell_builds_up_black() {
        let mut c = Canvas::new(1, 1, METRICS);
        c.fill_rect(FillStyle::rgba(0, 0, 0, 0.5));
        c.fill_rect(FillStyle::rgba(0, 0, 0, 0.5));
        let t = c.texel(0, 0).unwrap();
        assert_eq!(t.alpha, 0.75);
        assert_eq!(t.intensity(), 0.0);
    }

    #[test]
    fn clear_resets_everything() {
        let mut c = Canvas::new(2, 2, METRICS);
        c.fill_text("AB", 0.0, 6.0, GLYPH_FONT, FillStyle::rgba(255, 255, 255, 0.8));
        assert_eq!(c.texel(1, 0).unwrap().ch, 'B');
        c.clear_rect();
        assert_eq!(c.texel(0, 0), Some(&Texel::CLEAR));
        assert_eq!(c.texel(1, 0), Some(&Texel::CLEAR));
    }
}
