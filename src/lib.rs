//! Analog "retro TV" tracking noise rendered over a video.
//!
//! The renderer itself is platform-neutral: it paints through [`Surface`] and
//! is driven by a [`Host`]. The browser pieces live in `wasm` and are only
//! compiled for wasm32; [`raster::PixelSurface`] covers everything else.

pub mod channels;
pub mod config;
pub mod error;
pub mod host;
pub mod noise;
pub mod overlay;
pub mod random;
pub mod raster;
pub mod surface;

pub use channels::{ChannelLineup, ChannelOptions};
pub use config::{RendererConfig, RendererOptions};
pub use error::OverlayError;
pub use host::{Cadence, Host};
pub use overlay::{NoiseOverlay, Phase};
pub use surface::{Rgba, Surface};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use std::cell::RefCell;

    use wasm_bindgen::prelude::*;

    mod bindings;
    mod browser;
    mod canvas;
    mod channels;

    pub use bindings::VcrOverlay;
    pub use browser::{BrowserHost, BrowserListener, BrowserLoop};
    pub use canvas::CanvasSurface;
    pub use channels::ChannelRotator;

    use crate::channels::ChannelLineup;

    thread_local! {
        // Auto-mounted pieces live as long as the page.
        static MOUNTED: RefCell<Option<VcrOverlay>> = const { RefCell::new(None) };
        static ROTATOR: RefCell<Option<ChannelRotator>> = const { RefCell::new(None) };
    }

    /// Rotate `#tv` through its `data-channels` lineup behind `#snow`.
    fn mount_channels(document: &web_sys::Document) -> Result<(), JsValue> {
        let Some(screen) = document.get_element_by_id("tv") else {
            return Ok(());
        };
        let Some(json) = screen.get_attribute("data-channels") else {
            return Ok(());
        };
        let Some(snow) = document.get_element_by_id("snow") else {
            log::warn!("#tv has a channel lineup but there is no #snow layer; not rotating");
            return Ok(());
        };
        let lineup = ChannelLineup::from_json(&json)?;
        log::info!("rotating through {} channels", lineup.len());
        let rotator = ChannelRotator::new(screen, snow.dyn_into::<web_sys::HtmlElement>()?, lineup)?;
        ROTATOR.with(|slot| *slot.borrow_mut() = Some(rotator));
        Ok(())
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        mount_channels(&document)?;

        let Some(element) = document.get_element_by_id("vcr") else {
            log::info!("no #vcr canvas on the page; waiting for a script to create VcrOverlay");
            return Ok(());
        };
        let options = element.get_attribute("data-vcr");
        let canvas = element.dyn_into::<web_sys::HtmlCanvasElement>()?;

        let mut overlay = VcrOverlay::new(canvas, options)?;
        overlay.start()?;
        MOUNTED.with(|slot| *slot.borrow_mut() = Some(overlay));
        Ok(())
    }
}
