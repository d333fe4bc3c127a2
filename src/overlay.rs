use crate::constants::{BODY_REVEAL_CLASS, REVEAL_SELECTOR, REVEAL_SHOW_CLASS};
use crate::dom;
use std::cell::RefCell;
use std::rc::Rc;
use valentine_core::Controller;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

thread_local! {
    static OBSERVER: RefCell<Option<web::MutationObserver>> = const { RefCell::new(None) };
}

/// Whether the reveal overlay currently carries its `show` class.
#[inline]
pub fn is_revealed(document: &web::Document) -> bool {
    document
        .query_selector(REVEAL_SELECTOR)
        .ok()
        .flatten()
        .map(|el| el.class_list().contains(REVEAL_SHOW_CLASS))
        .unwrap_or(false)
}

/// Mirror the overlay state into the controller's reveal flag.
pub fn sync(ctl: &Rc<RefCell<Controller>>) {
    if let Some(document) = dom::window_document() {
        let revealed = is_revealed(&document);
        ctl.borrow_mut().reveal_mut().sync(revealed);
    }
}

/// Subscribe the body class toggle and start watching `class` attributes under
/// `<body>`. Safe to call repeatedly; only the first call with a body present
/// installs anything.
pub fn observe(ctl: &Rc<RefCell<Controller>>) -> anyhow::Result<()> {
    if OBSERVER.with(|o| o.borrow().is_some()) {
        sync(ctl);
        return Ok(());
    }
    let Some(body) = dom::window_document().and_then(|d| d.body()) else {
        return Ok(());
    };

    ctl.borrow_mut().reveal_mut().on_flag_changed(|on| {
        if let Some(body) = dom::window_document().and_then(|d| d.body()) {
            _ = body.class_list().toggle_with_force(BODY_REVEAL_CLASS, on);
        }
    });

    let c = ctl.clone();
    let callback = Closure::wrap(Box::new(move |_records: JsValue, _obs: JsValue| {
        sync(&c);
    }) as Box<dyn FnMut(JsValue, JsValue)>);
    let observer = web::MutationObserver::new(callback.as_ref().unchecked_ref())
        .map_err(|e| anyhow::anyhow!("MutationObserver: {:?}", e))?;
    callback.forget();

    let init = web::MutationObserverInit::new();
    init.set_subtree(true);
    init.set_attributes(true);
    let filter = js_sys::Array::of1(&JsValue::from_str("class"));
    init.set_attribute_filter(&filter);
    observer
        .observe_with_options(&body, &init)
        .map_err(|e| anyhow::anyhow!("observe body: {:?}", e))?;

    OBSERVER.with(|o| *o.borrow_mut() = Some(observer));
    log::debug!("[reveal] observing {}", REVEAL_SELECTOR);

    // The overlay may already be showing (e.g. restored after reload).
    sync(ctl);
    Ok(())
}
