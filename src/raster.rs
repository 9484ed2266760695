//! Software surface: a premultiplied RGBA framebuffer that the noise can be
//! painted into off-screen (preview frames, tests).

use crate::error::OverlayError;
use crate::surface::{Rgba, Surface};

#[derive(Clone)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    /// Premultiplied RGBA, row-major, `width * height` entries.
    pixels: Vec<[u8; 4]>,
    fill: Rgba,
    blur_px: f64,
    opacity: f64,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 4]; width as usize * height as usize],
            fill: Rgba::WHITE,
            blur_px: 0.0,
            opacity: 1.0,
        }
    }

    /// Premultiplied pixel at `(x, y)`, if inside.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    /// Number of pixels with non-zero alpha.
    pub fn coverage(&self) -> usize {
        self.pixels.iter().filter(|p| p[3] > 0).count()
    }

    pub fn blur_px(&self) -> f64 {
        self.blur_px
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// The surface as it would be composited: blur applied as a box blur of
    /// the configured radius, opacity folded into alpha, straight RGBA.
    pub fn composite(&self) -> Vec<[u8; 4]> {
        let radius = self.blur_px.round() as usize;
        let mut out = self.pixels.clone();
        if radius > 0 && !out.is_empty() {
            box_blur(&mut out, self.width as usize, self.height as usize, radius);
        }
        for px in &mut out {
            let a = px[3];
            if a == 0 {
                *px = [0; 4];
                continue;
            }
            for c in &mut px[..3] {
                *c = ((*c as u32 * 255 + a as u32 / 2) / a as u32).min(255) as u8;
            }
            px[3] = (a as f64 * self.opacity).round() as u8;
        }
        out
    }

    /// [`composite`](Self::composite) packed into an `image` buffer.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn to_image(&self) -> image::RgbaImage {
        let raw: Vec<u8> = self.composite().into_iter().flatten().collect();
        image::RgbaImage::from_raw(self.width, self.height, raw)
            .unwrap_or_else(|| image::RgbaImage::new(self.width, self.height))
    }

    fn premultiplied_fill(&self) -> [u8; 4] {
        let Rgba(r, g, b, a) = self.fill;
        let pm = |c: u8| ((c as u32 * a as u32 + 127) / 255) as u8;
        [pm(r), pm(g), pm(b), a]
    }
}

impl Surface for PixelSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Resizing discards the contents, like a canvas does.
    fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![[0; 4]; width as usize * height as usize];
    }

    fn set_blur(&mut self, radius_px: f64) -> Result<(), OverlayError> {
        self.blur_px = radius_px.max(0.0);
        Ok(())
    }

    fn set_opacity(&mut self, opacity: f64) -> Result<(), OverlayError> {
        self.opacity = opacity.clamp(0.0, 1.0);
        Ok(())
    }

    fn clear(&mut self) {
        self.pixels.fill([0; 4]);
    }

    fn set_fill(&mut self, color: Rgba) {
        self.fill = color;
    }

    /// Source-over fill of the pixels whose centres fall inside the rect.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        let x0 = x.round().max(0.0) as i64;
        let y0 = y.round().max(0.0) as i64;
        let x1 = ((x + width).round() as i64).min(self.width as i64);
        let y1 = ((y + height).round() as i64).min(self.height as i64);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let src = self.premultiplied_fill();
        let inv = 255 - src[3] as u32;
        let stride = self.width as usize;
        for py in y0 as usize..y1 as usize {
            for px in x0 as usize..x1 as usize {
                let dst = &mut self.pixels[py * stride + px];
                for c in 0..4 {
                    dst[c] = (src[c] as u32 + (dst[c] as u32 * inv + 127) / 255).min(255) as u8;
                }
            }
        }
    }
}

/// Separable box blur, horizontal then vertical, clamping at the edges.
fn box_blur(pixels: &mut [[u8; 4]], width: usize, height: usize, radius: usize) {
    let mut tmp = vec![[0u8; 4]; pixels.len()];
    blur_pass(pixels, &mut tmp, width, height, radius, true);
    blur_pass(&tmp, pixels, width, height, radius, false);
}

fn blur_pass(
    src: &[[u8; 4]],
    dst: &mut [[u8; 4]],
    width: usize,
    height: usize,
    radius: usize,
    horizontal: bool,
) {
    let (lines, len) = if horizontal { (height, width) } else { (width, height) };
    let at = |line: usize, i: usize| if horizontal { line * width + i } else { i * width + line };
    let window = (2 * radius + 1) as u32;

    for line in 0..lines {
        let mut sum = [0u32; 4];
        // Prime the window centred on index 0 with edge clamping.
        for k in 0..=2 * radius {
            let i = k.saturating_sub(radius).min(len - 1);
            let p = src[at(line, i)];
            for c in 0..4 {
                sum[c] += p[c] as u32;
            }
        }
        for i in 0..len {
            let out = &mut dst[at(line, i)];
            for c in 0..4 {
                out[c] = ((sum[c] + window / 2) / window) as u8;
            }
            let leaving = src[at(line, i.saturating_sub(radius))];
            let entering = src[at(line, (i + radius + 1).min(len - 1))];
            for c in 0..4 {
                sum[c] = sum[c] + entering[c] as u32 - leaving[c] as u32;
            }
        }
    }
}
