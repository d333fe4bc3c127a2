use crate::config::ParallaxConfig;
use glam::Vec2;

/// Background translation for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BgTransform {
    pub tx: f32,
    pub ty: f32,
    pub zoom: f32,
}

impl BgTransform {
    pub fn to_css(&self) -> String {
        format!(
            "translate3d({:.2}px, {:.2}px, 0) scale({})",
            self.tx, self.ty, self.zoom
        )
    }
}

/// Damped follower of the pointer/tilt target.
///
/// Inputs overwrite `target` (last writer wins); `step` runs once per frame.
#[derive(Clone, Debug)]
pub struct Parallax {
    cfg: ParallaxConfig,
    /// Normalized target in `[-1, 1]`.
    target: Vec2,
    /// Smoothed follower value.
    offset: Vec2,
}

impl Parallax {
    pub fn new(cfg: ParallaxConfig) -> Self {
        Self {
            cfg,
            target: Vec2::ZERO,
            offset: Vec2::ZERO,
        }
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn set_config(&mut self, cfg: ParallaxConfig) {
        self.cfg = cfg;
    }

    /// Pointer or touch position in client pixels.
    pub fn set_target_from_client(&mut self, x: f32, y: f32, viewport_w: f32, viewport_h: f32) {
        if viewport_w <= 0.0 || viewport_h <= 0.0 {
            return;
        }
        self.target = Vec2::new(
            normalize_axis(x / viewport_w),
            normalize_axis(y / viewport_h),
        );
    }

    /// Device orientation in degrees (left/right `gamma`, front/back `beta`).
    pub fn set_target_from_tilt(&mut self, gamma: f32, beta: f32) {
        if !gamma.is_finite() || !beta.is_finite() {
            return;
        }
        self.target = Vec2::new(
            (gamma / self.cfg.tilt_gamma_range).clamp(-1.0, 1.0),
            (beta / self.cfg.tilt_beta_range).clamp(-1.0, 1.0),
        );
    }

    pub fn step(&mut self) -> BgTransform {
        self.offset += (self.target - self.offset) * self.cfg.damping;
        BgTransform {
            tx: self.offset.x * self.cfg.scale_px,
            ty: self.offset.y * self.cfg.scale_px,
            zoom: self.cfg.zoom,
        }
    }
}

#[inline]
fn normalize_axis(frac: f32) -> f32 {
    ((frac - 0.5) * 2.0).clamp(-1.0, 1.0)
}
