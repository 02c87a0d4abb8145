// Copyright (c) 2026 rezky_nightky

use crate::random::{uniform_float, uniform_int, RandomSource};
use crate::surface::{FillStyle, Font, Surface};

pub const ALPHABET: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

pub const GLYPH_FONT: Font = Font { size_px: 12.0 };

/// Fill for the faded trail layer.
pub const TRAIL_STYLE: FillStyle = FillStyle::rgb(0x00, 0xFF, 0x00);
/// Fill for the head layer, redrawn from scratch every tick.
pub const HEAD_STYLE: FillStyle = FillStyle::rgba(255, 255, 255, 0.8);

pub const SPAWN_SPEED: (f64, f64) = (1.0, 5.0);
pub const REENTRY_SPEED: (f64, f64) = (2.0, 5.0);
pub const REENTRY_Y: (f64, f64) = (-100.0, 0.0);

#[derive(Clone, Debug, PartialEq)]
pub struct FallingGlyph {
    x: f64,
    pub y: f64,
    pub speed: f64,
    pub value: char,
}

impl FallingGlyph {
    pub fn spawn<R: RandomSource + ?Sized>(x: f64, y: f64, rng: &mut R) -> Self {
        let mut g = Self {
            x,
            y,
            speed: SPAWN_SPEED.0,
            value: ALPHABET[0],
        };
        g.resample(rng);
        g
    }

    #[cfg(test)]
    pub fn x(&self) -> f64 {
        self.x
    }

    fn resample<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        let idx = uniform_int(rng, 0, ALPHABET.len() as i64);
        self.value = ALPHABET[idx as usize];
        self.speed = uniform_float(rng, SPAWN_SPEED.0, SPAWN_SPEED.1);
    }

    /// Returns true when the glyph fell past `viewport_height` and re-entered from the top.
    pub fn advance_and_draw<S, R>(
        &mut self,
        trail: &mut S,
        head: &mut S,
        rng: &mut R,
        viewport_height: f64,
    ) -> bool
    where
        S: Surface + ?Sized,
        R: RandomSource + ?Sized,
    {
        self.resample(rng);

        let mut buf = [0u8; 4];
        let text = self.value.encode_utf8(&mut buf);
        trail.fill_text(text, self.x, self.y, GLYPH_FONT, TRAIL_STYLE);
        head.fill_text(text, self.x, self.y, GLYPH_FONT, HEAD_STYLE);

        self.y += self.speed;
        if self.y > viewport_height {
            self.y = uniform_float(rng, REENTRY_Y.0, REENTRY_Y.1);
            self.speed = uniform_float(rng, REENTRY_SPEED.0, REENTRY_SPEED.1);
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::testing::{CycleSource, FixedSource};
    use crate::random::SeededSource;
    use crate::surface::testing::{Op, RecordingSurface};

    #[test]
    fn spawn_samples_value_and_speed() {
        let g = FallingGlyph::spawn(24.0, -50.0, &mut FixedSource(0.5));
        assert_eq!(g.x(), 24.0);
        assert_eq!(g.y, -50.0);
        assert_eq!(g.speed, 3.0);
        assert_eq!(g.value, 'N');
    }

    #[test]
    fn draws_once_on_each_surface_at_current_position() {
        let mut rng = FixedSource(0.0);
        let mut g = FallingGlyph::spawn(12.0, 40.0, &mut rng);
        let mut trail = RecordingSurface::default();
        let mut head = RecordingSurface::default();

        g.advance_and_draw(&mut trail, &mut head, &mut rng, 800.0);

        let expect = |style| Op::Text {
            text: "A".to_string(),
            x: 12.0,
            y: 40.0,
            font: GLYPH_FONT,
            style,
        };
        assert_eq!(trail.ops, vec![expect(TRAIL_STYLE)]);
        assert_eq!(head.ops, vec![expect(HEAD_STYLE)]);
        assert_eq!(g.y, 41.0);
    }

    #[test]
    fn last_letter_is_reachable() {
        let mut rng = FixedSource(0.999_999);
        let mut g = FallingGlyph::spawn(0.0, -10.0, &mut rng);
        let mut trail = RecordingSurface::default();
        let mut head = RecordingSurface::default();
        g.advance_and_draw(&mut trail, &mut head, &mut rng, 800.0);
        assert_eq!(g.value, 'Z');
    }

    #[test]
    fn every_letter_appears_over_many_ticks() {
        let mut rng = SeededSource::from_seed(42);
        let mut g = FallingGlyph::spawn(0.0, -10.0, &mut rng);
        let mut trail = RecordingSurface::default();
        let mut head = RecordingSurface::default();
        let mut seen = [false; 26];
        for _ in 0..5000 {
            g.advance_and_draw(&mut trail, &mut head, &mut rng, 800.0);
            assert!(g.value.is_ascii_uppercase());
            seen[(g.value as u8 - b'A') as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn y_increases_by_speed_or_wraps() {
        let mut rng = SeededSource::from_seed(3);
        let mut g = FallingGlyph::spawn(0.0, -300.0, &mut rng);
        let mut trail = RecordingSurface::default();
        let mut head = RecordingSurface::default();
        for _ in 0..2000 {
            let before = g.y;
            let wrapped = g.advance_and_draw(&mut trail, &mut head, &mut rng, 600.0);
            if wrapped {
                assert!((-100.0..0.0).contains(&g.y));
                assert!((2.0..5.0).contains(&g.speed));
            } else {
                assert!((1.0..5.0).contains(&g.speed));
                assert_eq!(g.y, before + g.speed);
            }
        }
    }

    #[test]
    fn falling_past_bottom_reenters_above_viewport() {
        let height = 800.0;
        let mut rng = FixedSource(0.9);
        let mut g = FallingGlyph::spawn(0.0, height - 1.0, &mut rng);
        let mut trail = RecordingSurface::default();
        let mut head = RecordingSurface::default();

        let wrapped = g.advance_and_draw(&mut trail, &mut head, &mut rng, height);

        assert!(wrapped);
        assert!((-100.0..0.0).contains(&g.y));
        assert!((2.0..5.0).contains(&g.speed));
    }

    #[test]
    fn exactly_at_bottom_does_not_wrap() {
        // value, speed = 1 + 0.25 * 4 = 2
        let mut rng = CycleSource::new(&[0.0, 0.25]);
        let mut g = FallingGlyph::spawn(0.0, 798.0, &mut rng);
        let mut trail = RecordingSurface::default();
        let mut head = RecordingSurface::default();
        assert!(!g.advance_and_draw(&mut trail, &mut head, &mut rng, 800.0));
        assert_eq!(g.y, 800.0);
    }
}
