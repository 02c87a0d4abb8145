// Copyright (c) 2026 rezky_nightky

use crate::error::Result;
use crate::field::GlyphField;
use crate::random::RandomSource;
use crate::surface::{FillStyle, Surface, Viewport};

pub const DEFAULT_FADE_ALPHA: f32 = 0.05;

/// What the loop needs from whoever owns the display.
pub trait FrameHost<S: ?Sized> {
    /// Show the surfaces as left by the last tick.
    fn present(&mut self, trail: &S, head: &S) -> Result<()>;

    /// Suspend until the next display frame. `false` once the host is gone.
    fn request_frame(&mut self) -> Result<bool>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
}

pub struct RenderLoop<R> {
    field: GlyphField,
    rng: R,
    viewport: Viewport,
    fade: FillStyle,
    state: LoopState,
    ticks: u64,
}

impl<R: RandomSource> RenderLoop<R> {
    pub fn new(viewport: Viewport, mut rng: R) -> Self {
        let field = GlyphField::new(viewport, &mut rng);
        Self {
            field,
            rng,
            viewport,
            fade: FillStyle::rgba(0, 0, 0, DEFAULT_FADE_ALPHA),
            state: LoopState::Idle,
            ticks: 0,
        }
    }

    pub fn set_fade_alpha(&mut self, alpha: f32) {
        self.fade.a = alpha.clamp(0.0, 1.0);
    }

    #[cfg(test)]
    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn field(&self) -> &GlyphField {
        &self.field
    }

    /// Idle to Running; later calls are no-ops.
    pub fn start(&mut self) {
        if self.state == LoopState::Idle {
            self.state = LoopState::Running;
        }
    }

    pub fn tick<S: Surface + ?Sized>(&mut self, trail: &mut S, head: &mut S) {
        trail.fill_rect(self.fade);
        head.clear_rect();

        let height = self.viewport.height;
        for glyph in self.field.iter_rev_mut() {
            glyph.advance_and_draw(&mut *trail, &mut *head, &mut self.rng, height);
        }
        self.ticks += 1;
    }

    pub fn run<S, H>(&mut self, trail: &mut S, head: &mut S, host: &mut H) -> Result<()>
    where
        S: Surface + ?Sized,
        H: FrameHost<S>,
    {
        self.start();
        loop {
            self.tick(&mut *trail, &mut *head);
            host.present(&*trail, &*head)?;
            if !host.request_frame()? {
                return Ok(());
            }
        }
    }
}
