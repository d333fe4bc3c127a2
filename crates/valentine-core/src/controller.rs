//! Single owner of all page effect state.
//!
//! The web front-end keeps one `Controller` behind `Rc<RefCell<_>>` and hands
//! it to every listener and frame callback instead of sharing globals.

use crate::config::{CelebrationConfig, Config, ParticleConfig};
use crate::evasion::{ClickOutcome, Evader, Placement, Rect, Viewport};
use crate::fx::{Celebrated, Fx, LoopState};
use crate::parallax::{BgTransform, Parallax};
use crate::particles::Surface;
use crate::reveal::RevealFlag;
use glam::Vec2;
use instant::Instant;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Independently wired pieces of page setup. A step that failed to wire stays
/// unbound and is retried by the next `initialize`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetupStep {
    ParallaxInputs,
    DodgeInputs,
    ParallaxLoop,
}

impl SetupStep {
    pub const ALL: [SetupStep; 3] = [
        SetupStep::ParallaxInputs,
        SetupStep::DodgeInputs,
        SetupStep::ParallaxLoop,
    ];

    #[inline]
    fn bit(self) -> u8 {
        1 << self as u8
    }
}

pub struct Controller {
    config: Config,
    parallax: Parallax,
    evader: Evader,
    fx: Fx,
    /// Particle/celebration settings received while the loop was running.
    pending_fx: Option<(ParticleConfig, CelebrationConfig)>,
    reveal: RevealFlag,
    rng: StdRng,
    bound: u8,
}

impl Controller {
    pub fn new(config: Config, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let fx_rng = StdRng::seed_from_u64(rng.next_u64());
        Self {
            parallax: Parallax::new(config.parallax.clone()),
            evader: Evader::new(config.evasion.clone()),
            fx: Fx::new(&config.particles, config.celebration.clone(), fx_rng),
            pending_fx: None,
            reveal: RevealFlag::new(),
            rng,
            bound: 0,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Swap tunables. Active particles keep their kinematics; the new particle
    /// and celebration settings apply to the next idle-to-active transition.
    pub fn set_config(&mut self, config: Config) {
        self.parallax.set_config(config.parallax.clone());
        self.evader.set_config(config.evasion.clone());
        self.pending_fx = Some((config.particles.clone(), config.celebration.clone()));
        self.apply_pending_fx();
        self.config = config;
    }

    /// Rebuild the particle engine from deferred settings, only while idle.
    fn apply_pending_fx(&mut self) {
        if self.fx.is_running() {
            return;
        }
        if let Some((particles, celebration)) = self.pending_fx.take() {
            let fx_rng = StdRng::seed_from_u64(self.rng.next_u64());
            self.fx = Fx::new(&particles, celebration, fx_rng);
        }
    }

    /// Returns `true` while any setup step is still unbound; the caller then
    /// wires each step for which [`Controller::needs`] holds and reports
    /// success with [`Controller::mark_bound`].
    pub fn initialize(&mut self) -> bool {
        if self.is_bound() {
            return false;
        }
        log::info!("[setup] binding page effects");
        true
    }

    pub fn needs(&self, step: SetupStep) -> bool {
        self.bound & step.bit() == 0
    }

    pub fn mark_bound(&mut self, step: SetupStep) {
        self.bound |= step.bit();
    }

    pub fn is_bound(&self) -> bool {
        SetupStep::ALL.iter().all(|s| !self.needs(*s))
    }

    // ---------------- parallax ----------------
    pub fn pointer_moved(&mut self, client: Vec2, viewport: Viewport) {
        self.parallax
            .set_target_from_client(client.x, client.y, viewport.width, viewport.height);
    }

    pub fn tilted(&mut self, gamma: f32, beta: f32) {
        self.parallax.set_target_from_tilt(gamma, beta);
    }

    pub fn parallax_frame(&mut self) -> BgTransform {
        self.parallax.step()
    }

    /// Step the follower and hand the transform to `target`. With no target
    /// (background layer absent) the follower holds still.
    pub fn parallax_frame_into<T: ?Sized>(
        &mut self,
        target: Option<&T>,
        apply: impl FnOnce(&T, BgTransform),
    ) -> bool {
        match target {
            Some(t) => {
                let transform = self.parallax.step();
                apply(t, transform);
                true
            }
            None => false,
        }
    }

    pub fn parallax(&self) -> &Parallax {
        &self.parallax
    }

    // ---------------- dodge ----------------
    pub fn dodge_press(
        &mut self,
        viewport: Viewport,
        size: Vec2,
        now: Instant,
    ) -> Option<Placement> {
        self.evader.on_press(&mut self.rng, viewport, size, now)
    }

    pub fn dodge_click(
        &mut self,
        viewport: Viewport,
        size: Vec2,
        now: Instant,
    ) -> (ClickOutcome, Option<Placement>) {
        self.evader.on_click(&mut self.rng, viewport, size, now)
    }

    pub fn dodge_proximity(
        &mut self,
        pointer: Vec2,
        rect: Rect,
        viewport: Viewport,
        now: Instant,
    ) -> Option<Placement> {
        self.evader
            .on_pointer_move(&mut self.rng, pointer, rect, viewport, now)
    }

    pub fn dodge_resize(&mut self, viewport: Viewport, size: Vec2, now: Instant) -> Option<Placement> {
        self.evader.on_resize(&mut self.rng, viewport, size, now)
    }

    pub fn evader(&self) -> &Evader {
        &self.evader
    }

    // ---------------- celebration ----------------
    pub fn celebrate(&mut self, now: Instant, viewport: Viewport, dpr: f32) -> Celebrated {
        self.apply_pending_fx();
        self.fx.celebrate(now, viewport, dpr)
    }

    pub fn fx_frame(&mut self, now: Instant) -> LoopState {
        self.fx.frame(now)
    }

    pub fn render_fx<S: Surface + ?Sized>(&self, surface: &mut S) {
        self.fx.render(surface);
    }

    pub fn fx(&self) -> &Fx {
        &self.fx
    }

    pub fn fx_mut(&mut self) -> &mut Fx {
        &mut self.fx
    }

    // ---------------- reveal ----------------
    pub fn reveal(&self) -> &RevealFlag {
        &self.reveal
    }

    pub fn reveal_mut(&mut self) -> &mut RevealFlag {
        &mut self.reveal
    }
}
