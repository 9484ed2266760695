//! VCR tracking noise: bright speckles scattered over two horizontal bands,
//! each dragging a comet-like tail of shrinking squares sideways.
//!
//! A frame is first planned as a list of [`Streak`]s and then painted, so the
//! geometry can be inspected without a real drawing surface.

use rand::Rng;

use crate::config::{RendererConfig, MAX_SPECKLE_COUNT};
use crate::error::OverlayError;
use crate::random::{random_direction, random_int, random_offset};
use crate::surface::{Rgba, Surface};

/// Side length of a head speckle in pixels.
pub const SPECKLE_SIZE: f64 = 2.0;
/// Gap kept between a band boundary and the first speckle row.
pub const BAND_MARGIN: f64 = 3.0;
pub const MAX_TAIL_STEPS: usize = 50;
/// Size lost per tail step.
const TAIL_SHRINK: f64 = 0.1;
/// Horizontal advance per tail step, in whole pixels.
const TAIL_STRIDE: (f64, f64) = (1.0, 4.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Square {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    /// Between the top edge and `band_bottom_y`.
    Upper,
    /// Between `band_top_y` and the bottom edge.
    Lower,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tail {
    /// `1` trails right, `-1` trails left; fixed for the whole tail.
    pub direction: i8,
    pub steps: Vec<Square>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Streak {
    pub band: Band,
    pub head: Square,
    pub tail: Tail,
}

/// What one frame put on the surface. Zero-size squares are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub speckles: usize,
    pub tail_squares: usize,
}

/// Generate a tail starting at `(x, y)`.
///
/// The square size follows `random_int(radius - 0.01, radius)` while the
/// radius shrinks by 0.1 per step; once that goes negative the size is
/// clamped to zero and the step paints nothing.
pub fn tail<R: Rng + ?Sized>(rng: &mut R, x: f64, y: f64, radius: f64) -> Tail {
    let n = random_int(rng, 1.0, MAX_TAIL_STEPS as f64) as usize;
    let direction = random_direction(rng);

    let mut steps = Vec::with_capacity(n);
    let mut x = x;
    let mut radius = radius;
    for _ in 0..n {
        let size = random_int(rng, radius - 0.01, radius).max(0) as f64;
        let dx = random_int(rng, TAIL_STRIDE.0, TAIL_STRIDE.1) as f64 * f64::from(direction);
        radius -= TAIL_SHRINK;
        x += dx;
        steps.push(Square { x, y, size });
    }
    Tail { direction, steps }
}

/// Plan one frame on a `width` x `height` surface.
///
/// Produces `speckle_count + 1` streaks per band, interleaved lower/upper,
/// sharing an x coordinate pairwise.
pub fn scatter<R: Rng + ?Sized>(
    rng: &mut R,
    config: &RendererConfig,
    width: u32,
    height: u32,
    radius: f64,
) -> Vec<Streak> {
    let (width, height) = (f64::from(width), f64::from(height));
    let pairs = usize::try_from(config.speckle_count).map_or(usize::MAX, |n| n.saturating_add(1));
    let mut streaks = Vec::with_capacity(pairs.min(MAX_SPECKLE_COUNT as usize + 1) * 2);

    for _ in 0..pairs {
        let x = random_offset(rng, width);
        let y1 = random_int(rng, config.band_top_y + BAND_MARGIN, height) as f64;
        let y2 = random_int(rng, 0.0, config.band_bottom_y - BAND_MARGIN) as f64;

        let lower = tail(rng, x, y1, radius);
        let upper = tail(rng, x, y2, radius);
        streaks.push(Streak {
            band: Band::Lower,
            head: Square { x, y: y1, size: radius },
            tail: lower,
        });
        streaks.push(Streak {
            band: Band::Upper,
            head: Square { x, y: y2, size: radius },
            tail: upper,
        });
    }
    streaks
}

/// Paint a planned frame with the current fill colour.
pub fn paint<S: Surface + ?Sized>(surface: &mut S, streaks: &[Streak]) -> FrameStats {
    let mut stats = FrameStats::default();
    for streak in streaks {
        if fill_square(surface, &streak.head) {
            stats.speckles += 1;
        }
        for step in &streak.tail.steps {
            if fill_square(surface, step) {
                stats.tail_squares += 1;
            }
        }
    }
    stats
}

fn fill_square<S: Surface + ?Sized>(surface: &mut S, square: &Square) -> bool {
    if square.size <= 0.0 {
        return false;
    }
    surface.fill_rect(square.x, square.y, square.size, square.size);
    true
}

/// Blur, clear and repaint the whole surface with a fresh noise field.
pub fn render_frame<S, R>(
    surface: &mut S,
    rng: &mut R,
    config: &RendererConfig,
    radius: f64,
) -> Result<FrameStats, OverlayError>
where
    S: Surface + ?Sized,
    R: Rng + ?Sized,
{
    surface.set_blur(config.blur_radius_px)?;
    surface.clear();
    surface.set_fill(Rgba::WHITE);

    let (width, height) = surface.size();
    let streaks = scatter(rng, config, width, height, radius);
    Ok(paint(surface, &streaks))
}
