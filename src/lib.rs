#![cfg(target_arch = "wasm32")]
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use valentine_core::{Config, Controller, SetupStep};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

mod canvas;
mod constants;
mod dom;
mod events;
mod frame;
mod overlay;

thread_local! {
    static CONTROLLER: Rc<RefCell<Controller>> =
        Rc::new(RefCell::new(Controller::new(Config::default(), entropy_seed())));
}

fn controller() -> Rc<RefCell<Controller>> {
    CONTROLLER.with(Rc::clone)
}

fn entropy_seed() -> u64 {
    let mut buf = [0u8; 8];
    match getrandom::getrandom(&mut buf) {
        Ok(()) => u64::from_le_bytes(buf),
        Err(_) => (js_sys::Math::random() * u64::MAX as f64) as u64,
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("valentine-web starting");

    // Fallback for hosts that never call `valentineSetup` themselves.
    spawn_local(async move {
        if let Err(e) = dom::document_ready().await {
            log::error!("dom ready error: {:?}", e);
            return;
        }
        initialize();
    });
    Ok(())
}

/// Host entry point, called once the page markup exists. Idempotent: each
/// listener group and the parallax loop is installed once; a group that failed
/// to wire is retried on the next call.
#[wasm_bindgen(js_name = valentineSetup)]
pub fn initialize() {
    let ctl = controller();
    if ctl.borrow_mut().initialize() {
        for step in SetupStep::ALL {
            if !ctl.borrow().needs(step) {
                continue;
            }
            match wire(&ctl, step) {
                Ok(()) => ctl.borrow_mut().mark_bound(step),
                Err(e) => log::error!("setup error ({:?}): {:?}", step, e),
            }
        }
    }
    if let Err(e) = overlay::observe(&ctl) {
        log::warn!("reveal observer unavailable: {:?}", e);
    }
}

fn wire(ctl: &Rc<RefCell<Controller>>, step: SetupStep) -> anyhow::Result<()> {
    match step {
        SetupStep::ParallaxInputs => events::pointer::wire_parallax_inputs(ctl),
        SetupStep::DodgeInputs => events::dodge::wire_dodge(ctl),
        SetupStep::ParallaxLoop => {
            frame::start_parallax_loop(ctl.clone());
            Ok(())
        }
    }
}

/// Host entry point for the affirmative choice. Overlaps any celebration that
/// is still running.
#[wasm_bindgen(js_name = startCelebration)]
pub fn celebrate() {
    let ctl = controller();
    overlay::sync(&ctl);

    let Some(surface) = canvas::CanvasSurface::acquire() else {
        return;
    };
    let Some(vp) = dom::viewport() else {
        return;
    };
    let dpr = dom::device_pixel_ratio() as f32;
    let celebrated = ctl.borrow_mut().celebrate(Instant::now(), vp, dpr);
    if celebrated.start_loop {
        frame::start_fx_loop(ctl, surface);
    }
}

/// Replace the effect tunables with a (possibly partial) JSON document.
/// Invalid input is logged and the current configuration is kept.
#[wasm_bindgen]
pub fn configure(json: &str) -> bool {
    match Config::from_json(json) {
        Ok(cfg) => {
            controller().borrow_mut().set_config(cfg);
            log::info!("[config] applied");
            true
        }
        Err(e) => {
            log::warn!("[config] rejected: {}", e);
            false
        }
    }
}
