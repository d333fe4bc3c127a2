use crate::constants::{EV_RESIZE, FX_CANVAS_ID};
use crate::dom;
use glam::Vec2;
use std::cell::Cell;
use valentine_core::Surface;
use wasm_bindgen::JsCast;
use web_sys as web;

thread_local! {
    static RESIZE_BOUND: Cell<bool> = const { Cell::new(false) };
}

/// 2D canvas implementation of the particle drawing surface.
pub struct CanvasSurface {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Look up the effect canvas and its 2D context. `None` disables the
    /// particle path.
    pub fn acquire() -> Option<Self> {
        let canvas = dom::window_document()?
            .get_element_by_id(FX_CANVAS_ID)?
            .dyn_into::<web::HtmlCanvasElement>()
            .ok()?;
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .ok()?;
        bind_resize_once(&canvas);
        Some(Self { canvas, ctx })
    }
}

fn bind_resize_once(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    if RESIZE_BOUND.with(|b| b.replace(true)) {
        return;
    }
    let Some(window) = web::window() else {
        return;
    };
    let result = dom::listen(&window, EV_RESIZE, true, move |_: web::Event| {
        if let Some(canvas) = dom::window_document()
            .and_then(|d| d.get_element_by_id(FX_CANVAS_ID))
            .and_then(|el| el.dyn_into::<web::HtmlCanvasElement>().ok())
        {
            dom::sync_canvas_backing_size(&canvas);
        }
    });
    if let Err(e) = result {
        log::warn!("[fx] canvas resize wiring failed: {:?}", e);
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self) {
        self.ctx.clear_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, x: f32, y: f32) {
        _ = self.ctx.translate(x as f64, y as f64);
    }

    fn rotate(&mut self, radians: f32) {
        _ = self.ctx.rotate(radians as f64);
    }

    fn set_fill(&mut self, rgb: [u8; 3], alpha: f32) {
        let style = format!(
            "rgba({},{},{},{:.3})",
            rgb[0],
            rgb[1],
            rgb[2],
            alpha.clamp(0.0, 1.0)
        );
        self.ctx.set_fill_style_str(&style);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn fill_viewport(&mut self, rgb: [u8; 3], alpha: f32) {
        self.ctx.save();
        _ = self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        self.set_fill(rgb, alpha);
        self.ctx.fill_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
        self.ctx.restore();
    }

    fn fill_cubic_path(&mut self, start: Vec2, segments: &[[Vec2; 3]]) {
        self.ctx.begin_path();
        self.ctx.move_to(start.x as f64, start.y as f64);
        for [c1, c2, end] in segments {
            self.ctx.bezier_curve_to(
                c1.x as f64,
                c1.y as f64,
                c2.x as f64,
                c2.y as f64,
                end.x as f64,
                end.y as f64,
            );
        }
        self.ctx.close_path();
        self.ctx.fill();
    }
}
