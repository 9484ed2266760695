//! The noise overlay renderer and its lifecycle.
//!
//! ```text
//! Uninitialized --start--> Running --stop/destroy--> Stopped
//!                           ^  |                        |
//!                           +--+ resize                 |
//!                           +-----------start-----------+
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};
use rand::Rng;

use crate::config::{RendererConfig, RendererOptions};
use crate::error::OverlayError;
use crate::host::{Cadence, Host};
use crate::noise::{self, FrameStats, SPECKLE_SIZE};
use crate::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Running,
    Stopped,
}

/// State shared between the overlay and the callbacks it hands to the host.
struct Painter<S, R> {
    surface: S,
    rng: R,
    config: RendererConfig,
}

impl<S: Surface, R: Rng> Painter<S, R> {
    fn render(&mut self, radius: f64) -> Result<FrameStats, OverlayError> {
        noise::render_frame(&mut self.surface, &mut self.rng, &self.config, radius)
    }
}

/// Draws VCR tracking noise onto a surface, redrawing on a host-driven loop.
///
/// At most one loop handle and one resize listener are live at a time; both
/// are released on [`stop`](Self::stop), [`destroy`](Self::destroy) or drop.
pub struct NoiseOverlay<S: Surface, R: Rng, H: Host> {
    painter: Rc<RefCell<Painter<S, R>>>,
    config: RendererConfig,
    host: H,
    active: Option<H::Loop>,
    resize_listener: Option<H::Listener>,
    phase: Phase,
}

impl<S, R, H> NoiseOverlay<S, R, H>
where
    S: Surface + 'static,
    R: Rng + 'static,
    H: Host,
{
    /// Build from partial options, filling the rest with defaults.
    pub fn new(surface: S, rng: R, host: H, options: &RendererOptions) -> Result<Self, OverlayError> {
        let config = RendererConfig::from_options(options)?;
        Self::with_config(surface, rng, host, config)
    }

    /// Apply the opacity, register for resize events and size the surface
    /// to the viewport. Nothing is drawn until [`start`](Self::start).
    pub fn with_config(
        mut surface: S,
        rng: R,
        host: H,
        config: RendererConfig,
    ) -> Result<Self, OverlayError> {
        config.validate()?;
        surface.set_opacity(config.opacity)?;

        let mut overlay = Self {
            painter: Rc::new(RefCell::new(Painter { surface, rng, config })),
            config,
            host,
            active: None,
            resize_listener: None,
            phase: Phase::Uninitialized,
        };
        overlay.listen()?;
        overlay.resize();
        Ok(overlay)
    }

    /// Begin redrawing. A loop that is already live is cancelled first.
    pub fn start(&mut self) -> Result<(), OverlayError> {
        if let Some(handle) = self.active.take() {
            warn!("noise loop restarted while running; cancelling the previous one");
            self.host.cancel(handle);
        }
        if self.resize_listener.is_none() {
            self.listen()?;
            self.resize();
        }

        let cadence = Cadence::for_config(&self.config)?;
        let painter = Rc::clone(&self.painter);
        let handle = self.host.schedule(
            cadence,
            Box::new(move || painter.borrow_mut().render(SPECKLE_SIZE).map(drop)),
        )?;
        self.active = Some(handle);
        self.phase = Phase::Running;
        debug!("noise loop started ({cadence:?})");
        Ok(())
    }

    fn listen(&mut self) -> Result<(), OverlayError> {
        let painter = Rc::clone(&self.painter);
        let listener = self.host.listen_resize(Box::new(move |width, height| {
            painter.borrow_mut().surface.set_size(width, height);
            debug!("overlay resized to {width}x{height}");
        }))?;
        self.resize_listener = Some(listener);
        Ok(())
    }
}

impl<S: Surface, R: Rng, H: Host> NoiseOverlay<S, R, H> {
    /// Cancel the loop and release the resize listener. Safe to repeat and
    /// safe before `start`.
    pub fn stop(&mut self) {
        if let Some(handle) = self.active.take() {
            self.host.cancel(handle);
            debug!("noise loop stopped");
        }
        if let Some(listener) = self.resize_listener.take() {
            self.host.unlisten_resize(listener);
        }
        self.phase = Phase::Stopped;
    }

    /// Match the surface's pixel size to the viewport.
    pub fn resize(&mut self) {
        let (width, height) = self.host.viewport_size();
        self.painter.borrow_mut().surface.set_size(width, height);
    }

    /// Draw one frame immediately, outside the loop.
    pub fn render_frame(&mut self, radius: f64) -> Result<FrameStats, OverlayError> {
        self.painter.borrow_mut().render(radius)
    }

    pub fn destroy(mut self) {
        self.stop();
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Borrow the surface, e.g. to read back pixels.
    pub fn with_surface<T>(&self, f: impl FnOnce(&S) -> T) -> T {
        f(&self.painter.borrow().surface)
    }
}

impl<S: Surface, R: Rng, H: Host> Drop for NoiseOverlay<S, R, H> {
    fn drop(&mut self) {
        self.stop();
    }
}
