use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, CssStyleDeclaration, HtmlCanvasElement};

use crate::error::OverlayError;
use crate::surface::{Rgba, Surface};

/// A `<canvas>` drawn through its 2D context. Blur and opacity are CSS
/// properties on the element, so the compositor applies them.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    blur_px: Option<f64>,
}

impl CanvasSurface {
    /// Grab the 2D context and pin the canvas over its container.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, OverlayError> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(|e| OverlayError::SurfaceUnavailable(format!("{e:?}")))?
            .ok_or_else(|| OverlayError::SurfaceUnavailable("canvas has no 2d context".into()))?
            .dyn_into()
            .map_err(|_| OverlayError::SurfaceUnavailable("context is not 2d".into()))?;

        let style = canvas.style();
        set_css(&style, "position", "absolute")?;
        set_css(&style, "top", "0")?;
        set_css(&style, "left", "0")?;

        Ok(Self { canvas, ctx, blur_px: None })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

fn set_css(style: &CssStyleDeclaration, name: &str, value: &str) -> Result<(), OverlayError> {
    style
        .set_property(name, value)
        .map_err(|e| OverlayError::Draw(format!("setting {name}: {e:?}")))
}

impl Surface for CanvasSurface {
    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn set_blur(&mut self, radius_px: f64) -> Result<(), OverlayError> {
        // Same filter every frame; skip the style write.
        if self.blur_px == Some(radius_px) {
            return Ok(());
        }
        set_css(&self.canvas.style(), "filter", &format!("blur({radius_px}px)"))?;
        self.blur_px = Some(radius_px);
        Ok(())
    }

    fn set_opacity(&mut self, opacity: f64) -> Result<(), OverlayError> {
        set_css(&self.canvas.style(), "opacity", &opacity.to_string())
    }

    fn clear(&mut self) {
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, w as f64, h as f64);
    }

    fn set_fill(&mut self, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.fill_rect(x, y, width, height);
    }
}
