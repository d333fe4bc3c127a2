/// DOM contract with the host page.
///
/// Selectors and class names the front-end looks up at runtime. Absence of any
/// of these elements disables the matching effect without error.
// Background layer moved by the parallax loop
pub const BG_SELECTOR: &str = ".bg";

// Dodging "No" button
pub const DODGE_BUTTON_ID: &str = "noBtn";

// Full-viewport canvas for the celebration particles
pub const FX_CANVAS_ID: &str = "fx";

// Reveal overlay and the class that marks it visible
pub const REVEAL_SELECTOR: &str = ".meme";
pub const REVEAL_SHOW_CLASS: &str = "show";

// Class mirrored onto <body> while the reveal overlay is visible
pub const BODY_REVEAL_CLASS: &str = "meme-on";

// Listener names
pub const EV_POINTER_MOVE: &str = "pointermove";
pub const EV_MOUSE_MOVE: &str = "mousemove";
pub const EV_TOUCH_MOVE: &str = "touchmove";
pub const EV_TOUCH_START: &str = "touchstart";
pub const EV_POINTER_DOWN: &str = "pointerdown";
pub const EV_CLICK: &str = "click";
pub const EV_RESIZE: &str = "resize";
pub const EV_ORIENTATION: &str = "deviceorientation";
pub const EV_DOM_READY: &str = "DOMContentLoaded";

/// Fallback when the browser reports a non-positive devicePixelRatio.
pub const DEFAULT_DPR: f64 = 1.0;

/// `#id` form of an element id, for `closest()` lookups.
#[inline]
pub fn id_selector(id: &str) -> String {
    format!("#{}", id)
}
