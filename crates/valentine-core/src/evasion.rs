//! Placement and trigger policy for the dodging button.

use crate::config::EvasionConfig;
use glam::Vec2;
use instant::Instant;
use rand::Rng;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

/// Element bounding box in viewport (client) coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width * 0.5, self.top + self.height * 0.5)
    }
}

/// New fixed-position `left`/`top` for the element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub left: f32,
    pub top: f32,
}

/// What the web layer should do with a click that reached the element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Trailing click right after a press-dodge: swallow it.
    Suppressed,
    /// Click with no preceding press: dodge now and swallow it.
    Dodged,
    /// Policy lets the click reach the host's own handler.
    PassThrough,
}

/// Pick a random placement that keeps `size` fully inside the padded viewport.
///
/// When the viewport is too small for the element the range collapses to `pad`.
pub fn random_placement<R: Rng + ?Sized>(
    rng: &mut R,
    viewport: Viewport,
    size: Vec2,
    pad: f32,
) -> Placement {
    Placement {
        left: sample_axis(rng, pad, viewport.width - size.x - pad),
        top: sample_axis(rng, pad, viewport.height - size.y - pad),
    }
}

fn sample_axis<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    let hi = hi.max(lo);
    if hi > lo {
        rng.gen_range(lo..=hi)
    } else {
        lo
    }
}

#[derive(Clone, Debug)]
pub struct Evader {
    cfg: EvasionConfig,
    floating: bool,
    placement: Option<Placement>,
    last_dodge: Option<Instant>,
}

impl Evader {
    pub fn new(cfg: EvasionConfig) -> Self {
        Self {
            cfg,
            floating: false,
            placement: None,
            last_dodge: None,
        }
    }

    pub fn config(&self) -> &EvasionConfig {
        &self.cfg
    }

    pub fn set_config(&mut self, cfg: EvasionConfig) {
        self.cfg = cfg;
    }

    /// True once the element has been detached into a fixed position.
    pub fn is_floating(&self) -> bool {
        self.floating
    }

    pub fn placement(&self) -> Option<Placement> {
        self.placement
    }

    pub fn reposition<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        viewport: Viewport,
        size: Vec2,
        now: Instant,
    ) -> Placement {
        let placement = random_placement(rng, viewport, size, self.cfg.padding_px);
        self.floating = true;
        self.placement = Some(placement);
        self.last_dodge = Some(now);
        placement
    }

    /// Pointer-down / touch-start on the element. One physical tap delivers
    /// both events, so a press inside the debounce window is the same tap.
    pub fn on_press<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        viewport: Viewport,
        size: Vec2,
        now: Instant,
    ) -> Option<Placement> {
        if self.within_debounce(now) {
            return None;
        }
        Some(self.reposition(rng, viewport, size, now))
    }

    /// Click fallback. A click inside the debounce window after a dodge is the
    /// synthetic tail of the press and never re-triggers.
    pub fn on_click<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        viewport: Viewport,
        size: Vec2,
        now: Instant,
    ) -> (ClickOutcome, Option<Placement>) {
        if self.within_debounce(now) {
            return if self.cfg.suppress_accidental_accept {
                (ClickOutcome::Suppressed, None)
            } else {
                (ClickOutcome::PassThrough, None)
            };
        }
        let placement = self.reposition(rng, viewport, size, now);
        if self.cfg.suppress_accidental_accept {
            (ClickOutcome::Dodged, Some(placement))
        } else {
            (ClickOutcome::PassThrough, Some(placement))
        }
    }

    /// Pointer moved somewhere on the page; dodge if it came too close.
    pub fn on_pointer_move<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        pointer: Vec2,
        rect: Rect,
        viewport: Viewport,
        now: Instant,
    ) -> Option<Placement> {
        if !self.is_near(pointer, rect) || self.within_debounce(now) {
            return None;
        }
        Some(self.reposition(rng, viewport, Vec2::new(rect.width, rect.height), now))
    }

    pub fn is_near(&self, pointer: Vec2, rect: Rect) -> bool {
        match self.cfg.proximity_radius_px {
            Some(radius) => pointer.distance(rect.center()) <= radius,
            None => false,
        }
    }

    /// Keep a floating element inside a resized viewport.
    pub fn on_resize<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        viewport: Viewport,
        size: Vec2,
        now: Instant,
    ) -> Option<Placement> {
        if !self.floating {
            return None;
        }
        Some(self.reposition(rng, viewport, size, now))
    }

    fn within_debounce(&self, now: Instant) -> bool {
        match self.last_dodge {
            Some(at) if now >= at => now - at < Duration::from_millis(self.cfg.debounce_ms),
            Some(_) => true,
            None => false,
        }
    }
}
