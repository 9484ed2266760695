use thiserror::Error;

/// Everything that can go wrong while mounting or driving the overlay.
#[derive(Debug, Error)]
pub enum OverlayError {
    /// No 2D drawing context could be obtained from the surface.
    #[error("surface unavailable: {0}")]
    SurfaceUnavailable(String),
    /// Resize events cannot be observed on this host.
    #[error("resize event source unavailable: {0}")]
    EventSource(String),
    /// The host refused to schedule the draw loop.
    #[error("could not schedule draw loop: {0}")]
    Schedule(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A frame failed mid-run (e.g. the surface was detached).
    #[error("draw failed: {0}")]
    Draw(String),
}

#[cfg(target_arch = "wasm32")]
impl From<OverlayError> for wasm_bindgen::JsValue {
    fn from(err: OverlayError) -> Self {
        wasm_bindgen::JsError::new(&err.to_string()).into()
    }
}
