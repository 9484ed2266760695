//! Renderer configuration: the partial, user-facing [`RendererOptions`] and
//! the validated [`RendererConfig`] the renderer actually runs with.

use std::time::Duration;

use serde::Deserialize;

use crate::error::OverlayError;

/// Redraw rates at or above this use the per-frame callback instead of a timer.
pub const FRAME_SYNCED_FPS: f64 = 60.0;

/// Longest timer period a browser `setInterval` accepts (i32 milliseconds).
pub const MAX_FRAME_PERIOD_MS: f64 = i32::MAX as f64;

/// Upper bound on speckles per band and frame.
pub const MAX_SPECKLE_COUNT: u32 = 100_000;

/// Immutable once built; swap it by constructing a new renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RendererConfig {
    pub target_fps: f64,
    pub blur_radius_px: f64,
    pub opacity: f64,
    /// Lower bound (exclusive of a 3px margin) of the bottom noise band.
    pub band_top_y: f64,
    /// Upper bound (exclusive of a 3px margin) of the top noise band.
    pub band_bottom_y: f64,
    pub speckle_count: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            target_fps: 60.0,
            blur_radius_px: 1.0,
            opacity: 1.0,
            band_top_y: 220.0,
            band_bottom_y: 220.0,
            speckle_count: 70,
        }
    }
}

impl RendererConfig {
    /// Fill the gaps in `options` with defaults and validate the result.
    pub fn from_options(options: &RendererOptions) -> Result<Self, OverlayError> {
        let defaults = Self::default();
        let config = Self {
            target_fps: options.fps.unwrap_or(defaults.target_fps),
            blur_radius_px: options.blur.unwrap_or(defaults.blur_radius_px),
            opacity: options.opacity.unwrap_or(defaults.opacity),
            band_top_y: options.band_top_y.unwrap_or(defaults.band_top_y),
            band_bottom_y: options.band_bottom_y.unwrap_or(defaults.band_bottom_y),
            speckle_count: options.speckle_count.unwrap_or(defaults.speckle_count),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), OverlayError> {
        if !self.target_fps.is_finite() || self.target_fps <= 0.0 {
            return Err(invalid("fps", self.target_fps, "a positive number"));
        }
        if self.frame_period_ms() > MAX_FRAME_PERIOD_MS {
            return Err(invalid("fps", self.target_fps, "a frame period of at most i32::MAX ms"));
        }
        if !self.blur_radius_px.is_finite() || self.blur_radius_px < 0.0 {
            return Err(invalid("blur", self.blur_radius_px, "a non-negative number"));
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(invalid("opacity", self.opacity, "within [0, 1]"));
        }
        for (name, value) in [("bandTopY", self.band_top_y), ("bandBottomY", self.band_bottom_y)] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(name, value, "a non-negative pixel offset"));
            }
        }
        if self.speckle_count > MAX_SPECKLE_COUNT {
            return Err(OverlayError::InvalidConfig(format!(
                "speckleCount = {}, expected at most {MAX_SPECKLE_COUNT}",
                self.speckle_count
            )));
        }
        Ok(())
    }

    /// True when the loop should ride the display's frame callback.
    pub fn is_frame_synced(&self) -> bool {
        self.target_fps >= FRAME_SYNCED_FPS
    }

    /// Timer period used below [`FRAME_SYNCED_FPS`].
    pub fn frame_period_ms(&self) -> f64 {
        1000.0 / self.target_fps
    }

    /// [`frame_period_ms`](Self::frame_period_ms) as a `Duration`, if it fits.
    pub fn frame_period(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(self.frame_period_ms() / 1000.0).ok()
    }
}

fn invalid(field: &str, value: f64, expected: &str) -> OverlayError {
    OverlayError::InvalidConfig(format!("{field} = {value}, expected {expected}"))
}

/// Partial configuration as handed over by a page script or the CLI.
///
/// Keys follow the JS naming (`bandTopY`, `speckleCount`, ...); the older
/// `miny`, `miny2` and `num` spellings are accepted too.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RendererOptions {
    pub fps: Option<f64>,
    pub blur: Option<f64>,
    pub opacity: Option<f64>,
    #[serde(alias = "miny")]
    pub band_top_y: Option<f64>,
    #[serde(alias = "miny2")]
    pub band_bottom_y: Option<f64>,
    #[serde(alias = "num")]
    pub speckle_count: Option<u32>,
}

impl RendererOptions {
    pub fn from_json(json: &str) -> Result<Self, OverlayError> {
        serde_json::from_str(json).map_err(|e| OverlayError::InvalidConfig(e.to_string()))
    }

    /// Overlay every field set in `other` on top of `self`.
    pub fn merge(self, other: RendererOptions) -> Self {
        Self {
            fps: other.fps.or(self.fps),
            blur: other.blur.or(self.blur),
            opacity: other.opacity.or(self.opacity),
            band_top_y: other.band_top_y.or(self.band_top_y),
            band_bottom_y: other.band_bottom_y.or(self.band_bottom_y),
            speckle_count: other.speckle_count.or(self.speckle_count),
        }
    }
}
