// Copyright (c) 2026 rezky_nightky

use crate::glyph::FallingGlyph;
use crate::random::{uniform_float, RandomSource};
use crate::surface::Viewport;

pub const COLUMN_SPACING: f64 = 12.0;
pub const GLYPHS_PER_COLUMN: usize = 2;

pub struct GlyphField {
    glyphs: Vec<FallingGlyph>,
}

impl GlyphField {
    pub fn new<R: RandomSource + ?Sized>(viewport: Viewport, rng: &mut R) -> Self {
        let columns = (viewport.width.max(0.0) / COLUMN_SPACING).floor() as usize;
        let mut glyphs = Vec::with_capacity(columns * GLYPHS_PER_COLUMN);
        for col in 0..columns {
            let x = col as f64 * COLUMN_SPACING;
            for _ in 0..GLYPHS_PER_COLUMN {
                let y = uniform_float(rng, -viewport.height, 0.0);
                glyphs.push(FallingGlyph::spawn(x, y, rng));
            }
        }
        Self { glyphs }
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    #[cfg(test)]
    pub fn iter(&self) -> std::slice::Iter<'_, FallingGlyph> {
        self.glyphs.iter()
    }

    pub fn iter_rev_mut(&mut self) -> std::iter::Rev<std::slice::IterMut<'_, FallingGlyph>> {
        self.glyphs.iter_mut().rev()
    }
}
