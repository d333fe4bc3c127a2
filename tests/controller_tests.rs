// Host-side tests for the controller that owns all page effect state.

use glam::Vec2;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use valentine_core::*;

const VIEW: Viewport = Viewport {
    width: 800.0,
    height: 600.0,
};

fn make_controller() -> Controller {
    Controller::new(Config::default(), 7)
}

/// Mirrors the web layer: wire every unbound step, marking it only when `ok`
/// accepts it. Returns how many steps were wired by this call.
fn setup(ctl: &mut Controller, mut ok: impl FnMut(SetupStep) -> bool) -> usize {
    if !ctl.initialize() {
        return 0;
    }
    let mut wired = 0;
    for step in SetupStep::ALL {
        if ctl.needs(step) && ok(step) {
            ctl.mark_bound(step);
            wired += 1;
        }
    }
    wired
}

fn loops_started(ctl: &mut Controller) -> usize {
    let before = ctl.needs(SetupStep::ParallaxLoop);
    setup(ctl, |_| true);
    usize::from(before && !ctl.needs(SetupStep::ParallaxLoop))
}

#[test]
fn initialize_binds_exactly_once() {
    let mut ctl = make_controller();
    let wired: usize = (0..25).map(|_| setup(&mut ctl, |_| true)).sum();
    assert_eq!(wired, SetupStep::ALL.len());
    assert!(ctl.is_bound());
    assert!(!ctl.initialize());
}

#[test]
fn failed_setup_step_is_retried_on_next_call() {
    let mut ctl = make_controller();
    let wired = setup(&mut ctl, |step| step != SetupStep::DodgeInputs);
    assert_eq!(wired, 2);
    assert!(!ctl.is_bound());
    assert!(ctl.needs(SetupStep::DodgeInputs));
    assert!(!ctl.needs(SetupStep::ParallaxInputs));

    // Only the missing step is wired again; nothing is installed twice.
    let mut retried = Vec::new();
    setup(&mut ctl, |step| {
        retried.push(step);
        true
    });
    assert_eq!(retried, vec![SetupStep::DodgeInputs]);
    assert!(ctl.is_bound());
    assert_eq!(setup(&mut ctl, |_| true), 0);
}

#[test]
fn parallax_rate_does_not_depend_on_setup_calls() {
    // The web layer starts one parallax loop per successful `initialize`, so
    // the number of frames driven per display refresh equals `binds`.
    fn offset_after(setup_calls: usize) -> f32 {
        let mut ctl = make_controller();
        let binds: usize = (0..setup_calls).map(|_| loops_started(&mut ctl)).sum();
        ctl.pointer_moved(Vec2::new(800.0, 300.0), VIEW);
        let mut last = BgTransform {
            tx: 0.0,
            ty: 0.0,
            zoom: 1.0,
        };
        for _refresh in 0..30 {
            for _ in 0..binds {
                last = ctl.parallax_frame();
            }
        }
        last.tx
    }
    let once = offset_after(1);
    assert_eq!(offset_after(0), 0.0);
    assert!(once > 0.0);
    assert_eq!(offset_after(5), once);
    assert_eq!(offset_after(40), once);
}

#[test]
fn pointer_and_tilt_are_last_writer_wins() {
    let mut ctl = make_controller();
    ctl.pointer_moved(Vec2::new(0.0, 0.0), VIEW);
    ctl.tilted(10.0, 0.0);
    assert_eq!(ctl.parallax().target(), Vec2::new(0.5, 0.0));
    ctl.pointer_moved(Vec2::new(400.0, 600.0), VIEW);
    assert_eq!(ctl.parallax().target(), Vec2::new(0.0, 1.0));
}

#[test]
fn reveal_flag_mirrors_show_class_and_reverts() {
    let mut ctl = make_controller();
    let body_on = Rc::new(RefCell::new(false));
    let b = body_on.clone();
    ctl.reveal_mut().on_flag_changed(move |on| *b.borrow_mut() = on);

    // Initial sync with the overlay already visible (e.g. after reload).
    ctl.reveal_mut().sync(true);
    assert!(*body_on.borrow());
    ctl.reveal_mut().sync(false);
    assert!(!*body_on.borrow());
    assert!(!ctl.reveal().get());
}

#[test]
fn celebrate_twice_simulates_union() {
    let mut cfg = Config::default();
    cfg.celebration.second_wave_ms = 0;
    let mut ctl = Controller::new(cfg.clone(), 3);
    let per_call: usize = celebration_plan(&cfg.celebration, VIEW)
        .iter()
        .map(|b| b.params.count)
        .sum();

    let t0 = Instant::now();
    assert!(ctl.celebrate(t0, VIEW, 2.0).start_loop);
    assert!(!ctl.celebrate(t0, VIEW, 2.0).start_loop);
    assert_eq!(ctl.fx_frame(t0), LoopState::Running);
    assert_eq!(ctl.fx().system().len(), per_call * 2);
}

#[test]
fn dodge_click_policy_follows_config() {
    let size = Vec2::new(100.0, 40.0);
    let t0 = Instant::now();

    let mut strict = make_controller();
    assert!(strict.dodge_press(VIEW, size, t0).is_some());
    let (outcome, _) = strict.dodge_click(VIEW, size, t0 + Duration::from_millis(100));
    assert_eq!(outcome, ClickOutcome::Suppressed);

    let mut lenient = Controller::new(
        Config::from_json(r#"{"evasion": {"suppress_accidental_accept": false}}"#).unwrap(),
        7,
    );
    assert!(lenient.dodge_press(VIEW, size, t0).is_some());
    let (outcome, moved) = lenient.dodge_click(VIEW, size, t0 + Duration::from_millis(100));
    assert_eq!(outcome, ClickOutcome::PassThrough);
    assert!(moved.is_none());
}

#[test]
fn set_config_while_idle_applies_new_particle_cap() {
    let mut ctl = make_controller();
    let mut cfg = Config::default();
    cfg.particles.max_particles = 50;
    cfg.celebration.second_wave_ms = 0;
    ctl.set_config(cfg);
    let t0 = Instant::now();
    ctl.celebrate(t0, VIEW, 1.0);
    ctl.fx_frame(t0);
    assert_eq!(ctl.fx().system().len(), 50);
}

#[test]
fn set_config_while_running_applies_on_next_celebration() {
    let mut cfg = Config::default();
    cfg.celebration.second_wave_ms = 0;
    let mut ctl = Controller::new(cfg.clone(), 11);
    let per_call: usize = celebration_plan(&cfg.celebration, VIEW)
        .iter()
        .map(|b| b.params.count)
        .sum();

    let t0 = Instant::now();
    assert!(ctl.celebrate(t0, VIEW, 1.0).start_loop);
    assert_eq!(ctl.fx_frame(t0), LoopState::Running);

    let mut small = cfg.clone();
    small.particles.max_particles = 50;
    ctl.set_config(small);
    assert_eq!(ctl.config().particles.max_particles, 50);
    // Particles already in flight keep running under the old engine.
    assert_eq!(ctl.fx().system().len(), per_call);

    let mut now = t0;
    let mut frames = 0;
    while ctl.fx_frame(now) == LoopState::Running {
        now += Duration::from_millis(16);
        frames += 1;
        assert!(frames < 10_000, "celebration never drained");
    }
    assert!(!ctl.fx().is_running());

    assert!(ctl.celebrate(now, VIEW, 1.0).start_loop);
    ctl.fx_frame(now);
    assert_eq!(ctl.fx().system().len(), 50);
}

#[test]
fn parallax_holds_still_without_background_layer() {
    let mut ctl = make_controller();
    ctl.pointer_moved(Vec2::new(800.0, 600.0), VIEW);
    for _ in 0..20 {
        let drawn = ctl.parallax_frame_into(None::<&()>, |_, _| unreachable!());
        assert!(!drawn);
    }
    assert_eq!(ctl.parallax().offset(), Vec2::ZERO);

    // Once the layer appears the follower starts from rest, not mid-way.
    let mut applied = None;
    assert!(ctl.parallax_frame_into(Some(&()), |_, t| applied = Some(t)));
    let first = applied.unwrap();
    assert!(first.tx > 0.0);
    assert!(ctl.parallax().offset().x < 0.1);
}
