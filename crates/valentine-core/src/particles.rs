//! Celebration particles: spawn in bursts, integrate per frame, draw, expire.
//!
//! The system never touches the DOM. Drawing goes through [`Surface`], which
//! the web front-end implements on top of a 2D canvas context.

use glam::Vec2;
use rand::prelude::*;
use std::collections::VecDeque;
use std::f32::consts::TAU;

/// Range the initial speed multiplier is drawn from.
pub const SPEED_JITTER: (f32, f32) = (0.55, 1.15);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Square,
    Heart,
}

impl Shape {
    /// Initial lifetime range in seconds.
    pub fn life_range(self) -> (f32, f32) {
        match self {
            Shape::Square => (0.8, 1.4),
            Shape::Heart => (1.1, 1.7),
        }
    }

    /// Drawn size range in device pixels (before DPR scaling).
    pub fn size_range(self) -> (f32, f32) {
        match self {
            Shape::Square => (3.0, 7.0),
            Shape::Heart => (9.0, 16.0),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds left; the particle is dropped once this reaches zero.
    pub life: f32,
    pub initial_life: f32,
    pub gravity: f32,
    pub shape: Shape,
    pub rotation: f32,
    pub spin: f32,
    pub size: f32,
    /// Palette slot, assigned cyclically at spawn.
    pub color_index: usize,
}

impl Particle {
    /// Alpha derived from remaining lifetime, in `[0, 1]`.
    #[inline]
    pub fn opacity(&self) -> f32 {
        if self.initial_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.initial_life).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Semi-implicit Euler step. Returns false once expired.
    pub fn integrate(&mut self, dt: f32) -> bool {
        self.vel.y += self.gravity * dt;
        self.pos += self.vel * dt;
        self.rotation += self.spin * dt;
        self.life -= dt;
        self.is_alive()
    }
}

/// One batch of particles sharing a center and kinematics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BurstParams {
    /// Center in CSS pixels.
    pub center: Vec2,
    pub count: usize,
    /// Base speed in CSS pixels per second.
    pub base_speed: f32,
    /// Downward acceleration in CSS pixels per second squared.
    pub gravity: f32,
    pub shape: Shape,
}

/// Drawing target for particles.
pub trait Surface {
    fn clear(&mut self);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    fn rotate(&mut self, radians: f32);
    fn set_fill(&mut self, rgb: [u8; 3], alpha: f32);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    /// Cover the whole drawing area, ignoring the current transform.
    fn fill_viewport(&mut self, rgb: [u8; 3], alpha: f32);
    /// Fill a closed path: start point followed by cubic segments
    /// `(control1, control2, end)`.
    fn fill_cubic_path(&mut self, start: Vec2, segments: &[[Vec2; 3]]);
}

/// Heart outline for a given size, centered near the origin: two mirrored
/// cubic segments from the top notch down to the tip and back.
pub fn heart_path(size: f32) -> (Vec2, [[Vec2; 3]; 2]) {
    let s = size;
    let notch = Vec2::new(0.0, -0.25 * s);
    let tip = Vec2::new(0.0, 0.6 * s);
    let right = [
        Vec2::new(0.5 * s, -0.75 * s),
        Vec2::new(1.1 * s, -0.05 * s),
        tip,
    ];
    let left = [
        Vec2::new(-1.1 * s, -0.05 * s),
        Vec2::new(-0.5 * s, -0.75 * s),
        notch,
    ];
    (notch, [right, left])
}

pub struct ParticleSystem {
    particles: VecDeque<Particle>,
    max_particles: usize,
    palette: Vec<[u8; 3]>,
    spawned: usize,
    rng: StdRng,
}

impl ParticleSystem {
    pub fn new(max_particles: usize, palette: Vec<[u8; 3]>, rng: StdRng) -> Self {
        let palette = if palette.is_empty() {
            vec![[255, 255, 255]]
        } else {
            palette
        };
        Self {
            particles: VecDeque::new(),
            max_particles: max_particles.max(1),
            palette,
            spawned: 0,
            rng,
        }
    }

    pub fn with_seed(max_particles: usize, palette: Vec<[u8; 3]>, seed: u64) -> Self {
        Self::new(max_particles, palette, StdRng::seed_from_u64(seed))
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Spawn `params.count` particles at `params.center * dpr`.
    ///
    /// Returns how many older particles were evicted to stay under the cap.
    pub fn burst(&mut self, params: &BurstParams, dpr: f32) -> usize {
        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        let center = params.center * dpr;
        let (life_lo, life_hi) = params.shape.life_range();
        let (size_lo, size_hi) = params.shape.size_range();

        for _ in 0..params.count {
            let angle = self.rng.gen_range(0.0..TAU);
            let speed =
                params.base_speed * self.rng.gen_range(SPEED_JITTER.0..SPEED_JITTER.1) * dpr;
            let life = self.rng.gen_range(life_lo..life_hi);
            let color_index = self.spawned % self.palette.len();
            self.spawned = self.spawned.wrapping_add(1);
            self.particles.push_back(Particle {
                pos: center,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life,
                initial_life: life,
                gravity: params.gravity * dpr,
                shape: params.shape,
                rotation: self.rng.gen_range(0.0..TAU),
                spin: self.rng.gen_range(-6.0..6.0),
                size: self.rng.gen_range(size_lo..size_hi) * dpr,
                color_index,
            });
        }

        let mut evicted = 0;
        while self.particles.len() > self.max_particles {
            self.particles.pop_front();
            evicted += 1;
        }
        if evicted > 0 {
            log::debug!("[fx] particle cap reached, evicted {} oldest", evicted);
        }
        evicted
    }

    /// Advance every particle by `dt` seconds and drop the expired ones.
    pub fn step(&mut self, dt: f32) {
        self.particles.retain_mut(|p| p.integrate(dt));
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.clear();
        for p in self.particles.iter().filter(|p| p.is_alive()) {
            let rgb = self.palette[p.color_index % self.palette.len()];
            surface.save();
            surface.translate(p.pos.x, p.pos.y);
            surface.rotate(p.rotation);
            surface.set_fill(rgb, p.opacity());
            match p.shape {
                Shape::Square => {
                    let half = p.size * 0.5;
                    surface.fill_rect(-half, -half, p.size, p.size);
                }
                Shape::Heart => {
                    let (start, segments) = heart_path(p.size);
                    surface.fill_cubic_path(start, &segments);
                }
            }
            surface.restore();
        }
    }
}
