// Copyright (c) 2026 rezky_nightky

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Straight (non-premultiplied) RGBA fill.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FillStyle {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl FillStyle {
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 1.0)
    }
}

/// Glyphs are monospace; one character fills one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Font {
    pub size_px: f64,
}

/// The drawing operations the rain consumes.
pub trait Surface {
    /// Source-over fill of the whole surface.
    fn fill_rect(&mut self, style: FillStyle);

    /// Reset the whole surface to transparent.
    fn clear_rect(&mut self);

    /// `y` is the text baseline.
    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: Font, style: FillStyle);
}

#[cfg(test)]
pub mod testing {
    use super::{FillStyle, Font, Surface};

    #[derive(Clone, Debug, PartialEq)]
    pub enum Op {
        Fill(FillStyle),
        Clear,
        Text {
            text: String,
            x: f64,
            y: f64,
            font: Font,
            style: FillStyle,
        },
    }

    #[derive(Default)]
    pub struct RecordingSurface {
        pub ops: Vec<Op>,
    }

    impl Surface for RecordingSurface {
        fn fill_rect(&mut self, style: FillStyle) {
            self.ops.push(Op::Fill(style));
        }

        fn clear_rect(&mut self) {
            self.ops.push(Op::Clear);
        }

        fn fill_text(&mut self, text: &str, x: f64, y: f64, font: Font, style: FillStyle) {
            self.ops.push(Op::Text {
                text: text.to_string(),
                x,
                y,
                font,
                style,
            });
        }
    }
}
