use crate::canvas::CanvasSurface;
use crate::constants::BG_SELECTOR;
use crate::dom;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use valentine_core::{Controller, LoopState};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type Tick = Rc<RefCell<dyn FnMut() -> bool>>;

/// Drive `tick` from requestAnimationFrame until it returns `false`.
///
/// Each frame schedules a fresh one-shot callback, so a stopped loop leaves
/// nothing behind and can be started again later.
pub fn start_loop(tick: impl FnMut() -> bool + 'static) {
    let tick: Tick = Rc::new(RefCell::new(tick));
    request_frame(tick);
}

fn request_frame(tick: Tick) {
    let next = tick.clone();
    let cb = Closure::once_into_js(move || {
        let again = {
            let mut f = next.borrow_mut();
            (*f)()
        };
        if again {
            request_frame(next);
        }
    });
    if let Some(w) = web::window() {
        _ = w.request_animation_frame(cb.unchecked_ref());
    }
}

/// Background parallax: runs for the lifetime of the page.
pub fn start_parallax_loop(ctl: Rc<RefCell<Controller>>) {
    let mut bg: Option<web::HtmlElement> = None;
    start_loop(move || {
        if bg.as_ref().map_or(true, |el| !el.is_connected()) {
            bg = dom::query(BG_SELECTOR).and_then(|el| el.dyn_into::<web::HtmlElement>().ok());
        }
        ctl.borrow_mut()
            .parallax_frame_into(bg.as_ref(), |el, transform| {
                _ = el.style().set_property("transform", &transform.to_css());
            });
        true
    });
}

/// Particle loop: stops on its own once the celebration has drained.
pub fn start_fx_loop(ctl: Rc<RefCell<Controller>>, mut surface: CanvasSurface) {
    start_loop(move || {
        let mut c = ctl.borrow_mut();
        let state = c.fx_frame(Instant::now());
        c.render_fx(&mut surface);
        state == LoopState::Running
    });
}
