use crate::constants::{DEFAULT_DPR, EV_DOM_READY};
use valentine_core::Viewport;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn query(selector: &str) -> Option<web::Element> {
    window_document().and_then(|d| d.query_selector(selector).ok().flatten())
}

#[inline]
pub fn html_element_by_id(id: &str) -> Option<web::HtmlElement> {
    window_document()
        .and_then(|d| d.get_element_by_id(id))
        .and_then(|el| el.dyn_into::<web::HtmlElement>().ok())
}

/// Layout viewport in CSS pixels.
pub fn viewport() -> Option<Viewport> {
    let w = web::window()?;
    let width = w.inner_width().ok()?.as_f64()?;
    let height = w.inner_height().ok()?.as_f64()?;
    Some(Viewport {
        width: width as f32,
        height: height as f32,
    })
}

pub fn device_pixel_ratio() -> f64 {
    web::window()
        .map(|w| w.device_pixel_ratio())
        .filter(|dpr| dpr.is_finite() && *dpr > 0.0)
        .unwrap_or(DEFAULT_DPR)
}

/// Match the canvas backing store to the viewport times devicePixelRatio.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(vp) = viewport() {
        let dpr = device_pixel_ratio();
        let w_px = (vp.width as f64 * dpr).floor() as u32;
        let h_px = (vp.height as f64 * dpr).floor() as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

pub fn passive_options() -> web::AddEventListenerOptions {
    let opts = web::AddEventListenerOptions::new();
    opts.set_passive(true);
    opts
}

/// Attach a listener that lives for the rest of the page.
pub fn listen<E>(
    target: &web::EventTarget,
    event: &str,
    passive: bool,
    handler: impl FnMut(E) + 'static,
) -> anyhow::Result<()>
where
    E: JsCast + 'static,
    E: wasm_bindgen::convert::FromWasmAbi,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    let res = if passive {
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            closure.as_ref().unchecked_ref(),
            &passive_options(),
        )
    } else {
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
    };
    res.map_err(|e| anyhow::anyhow!("add {} listener: {:?}", event, e))?;
    closure.forget();
    Ok(())
}

/// Capture-phase variant of [`listen`], so the handler runs before any
/// listener the host attached to the element itself.
pub fn listen_capture<E>(
    target: &web::EventTarget,
    event: &str,
    handler: impl FnMut(E) + 'static,
) -> anyhow::Result<()>
where
    E: JsCast + 'static,
    E: wasm_bindgen::convert::FromWasmAbi,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    target
        .add_event_listener_with_callback_and_bool(event, closure.as_ref().unchecked_ref(), true)
        .map_err(|e| anyhow::anyhow!("add {} capture listener: {:?}", event, e))?;
    closure.forget();
    Ok(())
}

/// Resolves once the document has been parsed.
pub async fn document_ready() -> anyhow::Result<()> {
    let document = window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    if document.ready_state() != "loading" {
        return Ok(());
    }
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let on_ready = Closure::once_into_js(move || {
            _ = resolve.call0(&JsValue::NULL);
        });
        _ = document.add_event_listener_with_callback(EV_DOM_READY, on_ready.unchecked_ref());
    });
    JsFuture::from(promise)
        .await
        .map_err(|e| anyhow::anyhow!("dom ready: {:?}", e))?;
    Ok(())
}
