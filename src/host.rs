//! The environment the overlay runs in: who drives the redraw loop and who
//! reports viewport resizes.

use std::time::Duration;

use crate::config::RendererConfig;
use crate::error::OverlayError;

/// How the host should repeat the draw callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cadence {
    /// Once per display refresh; the next frame is requested after the
    /// current callback returns.
    FrameSynced,
    /// Fixed-period timer.
    Interval(Duration),
}

impl Cadence {
    pub fn for_config(config: &RendererConfig) -> Result<Self, OverlayError> {
        if config.is_frame_synced() {
            return Ok(Cadence::FrameSynced);
        }
        config.frame_period().map(Cadence::Interval).ok_or_else(|| {
            OverlayError::Schedule(format!("no timer period for {} fps", config.target_fps))
        })
    }
}

/// One draw. An `Err` ends the loop and is surfaced to the host's
/// unhandled-error path.
pub type Tick = Box<dyn FnMut() -> Result<(), OverlayError>>;

/// Called with the new viewport size on every resize event.
pub type ResizeCallback = Box<dyn FnMut(u32, u32)>;

/// Scheduling and viewport services.
///
/// Handles are opaque and single-use: each one is passed back to exactly one
/// `cancel`/`unlisten_resize` call.
pub trait Host {
    type Loop;
    type Listener;

    /// Current container/viewport size in pixels.
    fn viewport_size(&self) -> (u32, u32);

    fn schedule(&mut self, cadence: Cadence, tick: Tick) -> Result<Self::Loop, OverlayError>;

    /// Cancel synchronously; no tick runs afterwards.
    fn cancel(&mut self, handle: Self::Loop);

    fn listen_resize(&mut self, on_resize: ResizeCallback) -> Result<Self::Listener, OverlayError>;

    fn unlisten_resize(&mut self, listener: Self::Listener);
}
