//! Celebration sequencing on top of the particle system.

use crate::clock::FrameClock;
use crate::config::{CelebrationConfig, ParticleConfig};
use crate::evasion::Viewport;
use crate::particles::{BurstParams, ParticleSystem, Shape, Surface};
use glam::Vec2;
use instant::Instant;
use rand::rngs::StdRng;
use smallvec::SmallVec;
use std::time::Duration;

/// Burst with a delay relative to the `celebrate` call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduledBurst {
    pub delay: Duration,
    pub params: BurstParams,
}

pub type BurstPlan = SmallVec<[ScheduledBurst; 16]>;

/// Whether the render loop should request another frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Idle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Celebrated {
    /// The loop was idle and the caller has to start it.
    pub start_loop: bool,
    pub bursts: usize,
}

const FLASH_RGB: [u8; 3] = [255, 255, 255];

// (x offset as viewport fraction, y offset in px, count, base speed, gravity)
const SQUARE_SPREAD: [(f32, f32, usize, f32, f32); 5] = [
    (-0.30, 40.0, 36, 480.0, 900.0),
    (-0.15, 10.0, 42, 520.0, 900.0),
    (0.00, 0.0, 54, 560.0, 900.0),
    (0.15, 10.0, 42, 520.0, 900.0),
    (0.30, 40.0, 36, 480.0, 900.0),
];
const HEART_SPREAD: [(f32, f32, usize, f32, f32); 3] = [
    (-0.12, 20.0, 12, 300.0, 520.0),
    (0.00, 0.0, 16, 340.0, 520.0),
    (0.12, 20.0, 12, 300.0, 520.0),
];
const SECOND_WAVE: [(f32, f32, usize, f32, f32, Shape); 4] = [
    (-0.22, -30.0, 30, 460.0, 900.0, Shape::Square),
    (0.22, -30.0, 30, 460.0, 900.0, Shape::Square),
    (-0.06, -10.0, 10, 280.0, 520.0, Shape::Heart),
    (0.06, -10.0, 10, 280.0, 520.0, Shape::Heart),
];

/// Compose the celebration: a wide square spread and a tighter heart spread
/// around the upper-middle of the viewport, optionally followed by a second wave.
pub fn celebration_plan(cfg: &CelebrationConfig, viewport: Viewport) -> BurstPlan {
    let center = Vec2::new(
        viewport.width * cfg.center_x_frac,
        viewport.height * cfg.center_y_frac,
    );
    let at = |dx: f32, dy: f32| center + Vec2::new(dx * viewport.width, dy);

    let mut plan = BurstPlan::new();
    for (dx, dy, count, base_speed, gravity) in SQUARE_SPREAD {
        plan.push(ScheduledBurst {
            delay: Duration::ZERO,
            params: BurstParams {
                center: at(dx, dy),
                count,
                base_speed,
                gravity,
                shape: Shape::Square,
            },
        });
    }
    for (dx, dy, count, base_speed, gravity) in HEART_SPREAD {
        plan.push(ScheduledBurst {
            delay: Duration::ZERO,
            params: BurstParams {
                center: at(dx, dy),
                count,
                base_speed,
                gravity,
                shape: Shape::Heart,
            },
        });
    }
    if cfg.second_wave_ms > 0 {
        let delay = Duration::from_millis(cfg.second_wave_ms);
        for (dx, dy, count, base_speed, gravity, shape) in SECOND_WAVE {
            plan.push(ScheduledBurst {
                delay,
                params: BurstParams {
                    center: at(dx, dy),
                    count,
                    base_speed,
                    gravity,
                    shape,
                },
            });
        }
    }
    plan
}

/// Idle until `celebrate`, then Active until every particle and every
/// delayed burst is gone.
pub struct Fx {
    system: ParticleSystem,
    clock: FrameClock,
    cfg: CelebrationConfig,
    pending: Vec<(Instant, BurstParams)>,
    flash_until: Option<Instant>,
    flash_alpha: f32,
    dpr: f32,
    running: bool,
}

impl Fx {
    pub fn new(particles: &ParticleConfig, cfg: CelebrationConfig, rng: StdRng) -> Self {
        Self {
            system: ParticleSystem::new(particles.max_particles, particles.palette.clone(), rng),
            clock: FrameClock::new(particles.max_dt, particles.first_frame_dt),
            cfg,
            pending: Vec::new(),
            flash_until: None,
            flash_alpha: 0.0,
            dpr: 1.0,
            running: false,
        }
    }

    pub fn system(&self) -> &ParticleSystem {
        &self.system
    }

    pub fn pending_bursts(&self) -> usize {
        self.pending.len()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Queue a single burst for the next frame.
    pub fn burst(&mut self, params: BurstParams, now: Instant, dpr: f32) -> bool {
        self.dpr = dpr;
        self.pending.push((now, params));
        self.wake()
    }

    /// Seed the full celebration. Overlaps anything already on screen.
    pub fn celebrate(&mut self, now: Instant, viewport: Viewport, dpr: f32) -> Celebrated {
        self.dpr = dpr;
        let plan = celebration_plan(&self.cfg, viewport);
        log::info!(
            "[fx] celebrate: {} bursts queued, {} particles active",
            plan.len(),
            self.system.len()
        );
        let bursts = plan.len();
        for b in plan {
            self.pending.push((now + b.delay, b.params));
        }
        if self.cfg.flash_alpha > 0.0 && self.cfg.flash_ms > 0 {
            self.flash_until = Some(now + Duration::from_millis(self.cfg.flash_ms));
        }
        Celebrated {
            start_loop: self.wake(),
            bursts,
        }
    }

    fn wake(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.clock.reset();
        true
    }

    /// One display frame: release due bursts, integrate, report loop state.
    pub fn frame(&mut self, now: Instant) -> LoopState {
        if !self.running {
            return LoopState::Idle;
        }
        let dpr = self.dpr;
        let system = &mut self.system;
        self.pending.retain(|(due, params)| {
            if *due <= now {
                system.burst(params, dpr);
                false
            } else {
                true
            }
        });

        let dt = self.clock.tick(now);
        self.system.step(dt);

        self.flash_alpha = match self.flash_until {
            Some(until) if now < until => self.cfg.flash_alpha,
            _ => {
                self.flash_until = None;
                0.0
            }
        };

        if self.system.is_empty() && self.pending.is_empty() && self.flash_until.is_none() {
            self.running = false;
            log::debug!("[fx] drained, loop idle");
            LoopState::Idle
        } else {
            LoopState::Running
        }
    }

    /// Alpha of the white screen flash for the current frame, `0` when off.
    pub fn flash_alpha(&self) -> f32 {
        self.flash_alpha
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        self.system.render(surface);
        if self.flash_alpha > 0.0 {
            surface.fill_viewport(FLASH_RGB, self.flash_alpha);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const VIEW: Viewport = Viewport {
        width: 800.0,
        height: 600.0,
    };

    #[test]
    fn plan_centers_upper_middle() {
        let plan = celebration_plan(&CelebrationConfig::default(), VIEW);
        let mid = plan
            .iter()
            .find(|b| b.params.shape == Shape::Square && b.params.count == 54)
            .unwrap();
        assert!(mid.params.center.distance(Vec2::new(400.0, 210.0)) < 1e-3);
        assert!(plan.iter().any(|b| b.params.shape == Shape::Heart));
        assert!(plan.iter().any(|b| !b.delay.is_zero()));
    }

    #[test]
    fn second_wave_can_be_disabled() {
        let cfg = CelebrationConfig {
            second_wave_ms: 0,
            ..CelebrationConfig::default()
        };
        let plan = celebration_plan(&cfg, VIEW);
        assert!(plan.iter().all(|b| b.delay.is_zero()));
    }

    #[test]
    fn idle_fx_does_nothing() {
        let mut fx = Fx::new(
            &ParticleConfig::default(),
            CelebrationConfig::default(),
            StdRng::seed_from_u64(1),
        );
        assert_eq!(fx.frame(Instant::now()), LoopState::Idle);
        assert!(fx.system().is_empty());
    }
}
