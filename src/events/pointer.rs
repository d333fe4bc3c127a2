use crate::constants::{EV_MOUSE_MOVE, EV_ORIENTATION, EV_TOUCH_MOVE};
use crate::dom;
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;
use valentine_core::Controller;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Parallax inputs: mouse, touch, and device tilt. All last-writer-wins on the
/// controller's target; the parallax loop picks it up on the next frame.
pub fn wire_parallax_inputs(ctl: &Rc<RefCell<Controller>>) -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;

    let c = ctl.clone();
    dom::listen(&window, EV_MOUSE_MOVE, true, move |ev: web::MouseEvent| {
        let client = Vec2::new(ev.client_x() as f32, ev.client_y() as f32);
        set_target(&c, client);
    })?;

    let c = ctl.clone();
    dom::listen(&window, EV_TOUCH_MOVE, true, move |ev: web::TouchEvent| {
        if let Some(client) = first_touch(&ev) {
            set_target(&c, client);
        }
    })?;

    wire_tilt(&window, ctl);
    Ok(())
}

fn set_target(ctl: &Rc<RefCell<Controller>>, client: Vec2) {
    if let Some(vp) = dom::viewport() {
        ctl.borrow_mut().pointer_moved(client, vp);
    }
}

#[inline]
pub fn first_touch(ev: &web::TouchEvent) -> Option<Vec2> {
    let t = ev.touches().get(0)?;
    Some(Vec2::new(t.client_x() as f32, t.client_y() as f32))
}

// Tilt is optional: browsers without orientation events simply never fire it,
// and events with null gamma/beta are ignored.
fn wire_tilt(window: &web::Window, ctl: &Rc<RefCell<Controller>>) {
    let c = ctl.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::DeviceOrientationEvent| {
        if let (Some(gamma), Some(beta)) = (ev.gamma(), ev.beta()) {
            c.borrow_mut().tilted(gamma as f32, beta as f32);
        }
    }) as Box<dyn FnMut(_)>);
    if window
        .add_event_listener_with_callback_and_bool(
            EV_ORIENTATION,
            closure.as_ref().unchecked_ref(),
            true,
        )
        .is_ok()
    {
        closure.forget();
    }
}
