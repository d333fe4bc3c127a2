// Host-side checks for the DOM contract constants.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;

#[test]
fn selectors_have_expected_prefixes() {
    assert!(BG_SELECTOR.starts_with('.'));
    assert!(REVEAL_SELECTOR.starts_with('.'));
    assert!(!DODGE_BUTTON_ID.starts_with('#'));
    assert!(!FX_CANVAS_ID.starts_with('#'));
}

#[test]
fn id_selector_prefixes_hash() {
    assert_eq!(id_selector(DODGE_BUTTON_ID), "#noBtn");
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn class_names_are_bare() {
    for name in [REVEAL_SHOW_CLASS, BODY_REVEAL_CLASS] {
        assert!(!name.is_empty());
        assert!(!name.contains(' ') && !name.starts_with('.'));
    }
    assert!(DEFAULT_DPR > 0.0);
}
