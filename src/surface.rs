use crate::error::OverlayError;

/// Straight (non-premultiplied) RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

impl Rgba {
    pub const WHITE: Rgba = Rgba(255, 255, 255, 255);

    /// `#rrggbb` / `rgba(...)` form understood by canvas fill styles.
    pub fn to_css(self) -> String {
        let Rgba(r, g, b, a) = self;
        if a == 255 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("rgba({r}, {g}, {b}, {:.3})", a as f64 / 255.0)
        }
    }
}

/// A 2D drawing surface the noise renderer paints into.
///
/// Coordinates are in surface pixels, origin top-left. Rectangles with a
/// zero dimension paint nothing.
pub trait Surface {
    /// Current backing-store size in pixels.
    fn size(&self) -> (u32, u32);

    fn set_size(&mut self, width: u32, height: u32);

    /// Post-process blur applied to the whole surface, in CSS pixels.
    fn set_blur(&mut self, radius_px: f64) -> Result<(), OverlayError>;

    /// Overlay transparency in `[0, 1]`.
    fn set_opacity(&mut self, opacity: f64) -> Result<(), OverlayError>;

    fn clear(&mut self);

    fn set_fill(&mut self, color: Rgba);

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
}
