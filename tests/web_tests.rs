// Browser tests for the DOM wiring (wasm-pack test --headless --firefox).
#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys as web;

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web::Document {
    web::window().unwrap().document().unwrap()
}

async fn next_microtask() {
    JsFuture::from(js_sys::Promise::resolve(&JsValue::NULL))
        .await
        .unwrap();
}

#[wasm_bindgen_test]
async fn reveal_class_is_mirrored_onto_body() {
    let doc = document();
    let body = doc.body().unwrap();
    let meme = doc.create_element("div").unwrap();
    meme.set_class_name("meme");
    body.append_child(&meme).unwrap();

    valentine_web::initialize();
    valentine_web::initialize();

    meme.class_list().add_1("show").unwrap();
    next_microtask().await;
    assert!(body.class_list().contains("meme-on"));

    meme.class_list().remove_1("show").unwrap();
    next_microtask().await;
    assert!(!body.class_list().contains("meme-on"));

    meme.remove();
}

#[wasm_bindgen_test]
async fn overlay_visible_before_setup_marks_body_at_once() {
    let doc = document();
    let body = doc.body().unwrap();
    let meme = doc.create_element("div").unwrap();
    meme.set_class_name("meme show");
    body.append_child(&meme).unwrap();

    valentine_web::initialize();
    assert!(body.class_list().contains("meme-on"));

    meme.class_list().remove_1("show").unwrap();
    next_microtask().await;
    assert!(!body.class_list().contains("meme-on"));
    meme.remove();
}

#[wasm_bindgen_test]
fn celebrate_without_canvas_is_a_no_op() {
    valentine_web::celebrate();
}

#[wasm_bindgen_test]
fn configure_rejects_bad_json() {
    assert!(!valentine_web::configure("{oops"));
    assert!(valentine_web::configure(r#"{"evasion": {"padding_px": 20}}"#));
}
