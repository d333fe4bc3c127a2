use crate::constants::{
    id_selector, DODGE_BUTTON_ID, EV_CLICK, EV_POINTER_DOWN, EV_POINTER_MOVE, EV_RESIZE,
    EV_TOUCH_START,
};
use crate::dom;
use glam::Vec2;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use valentine_core::{ClickOutcome, Controller, Placement, Rect};
use wasm_bindgen::JsCast;
use web_sys as web;

/// Dodge wiring. Listeners sit on the window in the capture phase and match
/// the button by id, so a button rendered (or re-rendered) after setup is
/// still covered.
pub fn wire_dodge(ctl: &Rc<RefCell<Controller>>) -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;

    let c = ctl.clone();
    dom::listen_capture(&window, EV_POINTER_DOWN, move |ev: web::PointerEvent| {
        if let Some(btn) = dodge_target(&ev) {
            press(&c, &btn);
        }
    })?;

    let c = ctl.clone();
    dom::listen_capture(&window, EV_TOUCH_START, move |ev: web::TouchEvent| {
        if let Some(btn) = dodge_target(&ev) {
            press(&c, &btn);
        }
    })?;

    let c = ctl.clone();
    dom::listen_capture(&window, EV_CLICK, move |ev: web::MouseEvent| {
        let Some(btn) = dodge_target(&ev) else {
            return;
        };
        let Some(vp) = dom::viewport() else {
            return;
        };
        let (outcome, placement) = c.borrow_mut().dodge_click(vp, element_size(&btn), Instant::now());
        if let Some(p) = placement {
            apply(&btn, p);
        }
        match outcome {
            ClickOutcome::Suppressed | ClickOutcome::Dodged => {
                ev.prevent_default();
                ev.stop_immediate_propagation();
            }
            ClickOutcome::PassThrough => {}
        }
    })?;

    let c = ctl.clone();
    dom::listen(&window, EV_POINTER_MOVE, true, move |ev: web::PointerEvent| {
        if c.borrow().evader().config().proximity_radius_px.is_none() {
            return;
        }
        let (Some(btn), Some(vp)) = (dom::html_element_by_id(DODGE_BUTTON_ID), dom::viewport())
        else {
            return;
        };
        let pointer = Vec2::new(ev.client_x() as f32, ev.client_y() as f32);
        let moved = c
            .borrow_mut()
            .dodge_proximity(pointer, rect_of(&btn), vp, Instant::now());
        if let Some(p) = moved {
            apply(&btn, p);
        }
    })?;

    let c = ctl.clone();
    dom::listen(&window, EV_RESIZE, true, move |_: web::Event| {
        let (Some(btn), Some(vp)) = (dom::html_element_by_id(DODGE_BUTTON_ID), dom::viewport())
        else {
            return;
        };
        let moved = c.borrow_mut().dodge_resize(vp, element_size(&btn), Instant::now());
        if let Some(p) = moved {
            apply(&btn, p);
        }
    })?;

    Ok(())
}

fn press(ctl: &Rc<RefCell<Controller>>, btn: &web::HtmlElement) {
    if let Some(vp) = dom::viewport() {
        let moved = ctl.borrow_mut().dodge_press(vp, element_size(btn), Instant::now());
        if let Some(p) = moved {
            apply(btn, p);
        }
    }
}

/// The dodge button if the event originated on it or inside it.
fn dodge_target<E: AsRef<web::Event>>(ev: &E) -> Option<web::HtmlElement> {
    ev.as_ref()
        .target()?
        .dyn_into::<web::Element>()
        .ok()?
        .closest(&id_selector(DODGE_BUTTON_ID))
        .ok()
        .flatten()?
        .dyn_into::<web::HtmlElement>()
        .ok()
}

fn rect_of(el: &web::HtmlElement) -> Rect {
    let r = el.get_bounding_client_rect();
    Rect {
        left: r.left() as f32,
        top: r.top() as f32,
        width: r.width() as f32,
        height: r.height() as f32,
    }
}

fn element_size(el: &web::HtmlElement) -> Vec2 {
    let r = rect_of(el);
    Vec2::new(r.width, r.height)
}

fn apply(el: &web::HtmlElement, p: Placement) {
    let style = el.style();
    _ = style.set_property("position", "fixed");
    _ = style.set_property("left", &format!("{}px", p.left.floor()));
    _ = style.set_property("top", &format!("{}px", p.top.floor()));
    _ = style.set_property("z-index", "50");
}
