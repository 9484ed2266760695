use rand::rngs::SmallRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use super::browser::BrowserHost;
use super::canvas::CanvasSurface;
use crate::config::RendererOptions;
use crate::error::OverlayError;
use crate::noise::SPECKLE_SIZE;
use crate::overlay::{NoiseOverlay, Phase};

type CanvasOverlay = NoiseOverlay<CanvasSurface, SmallRng, BrowserHost>;

/// JS handle: `new VcrOverlay(canvas, '{"fps": 30}')`.
#[wasm_bindgen]
pub struct VcrOverlay {
    inner: CanvasOverlay,
}

#[wasm_bindgen]
impl VcrOverlay {
    /// Throws if the canvas has no 2D context or the options are invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, options: Option<String>) -> Result<VcrOverlay, JsValue> {
        let options = match options.as_deref() {
            Some(json) if !json.trim().is_empty() => RendererOptions::from_json(json)?,
            _ => RendererOptions::default(),
        };
        Ok(Self { inner: mount(canvas, &options)? })
    }

    pub fn start(&mut self) -> Result<(), JsValue> {
        Ok(self.inner.start()?)
    }

    pub fn stop(&mut self) {
        self.inner.stop();
    }

    pub fn resize(&mut self) {
        self.inner.resize();
    }

    #[wasm_bindgen(js_name = renderFrame)]
    pub fn render_frame(&mut self, radius: Option<f64>) -> Result<(), JsValue> {
        self.inner.render_frame(radius.unwrap_or(SPECKLE_SIZE))?;
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.inner.phase() == Phase::Running
    }

    pub fn destroy(self) {
        self.inner.destroy();
    }
}

fn mount(canvas: HtmlCanvasElement, options: &RendererOptions) -> Result<CanvasOverlay, OverlayError> {
    let surface = CanvasSurface::new(canvas)?;
    let host = BrowserHost::new()?;
    NoiseOverlay::new(surface, seeded_rng(), host, options)
}

fn seeded_rng() -> SmallRng {
    let seed = (js_sys::Math::random() * u64::MAX as f64) as u64 ^ js_sys::Date::now() as u64;
    SmallRng::seed_from_u64(seed)
}
