use rand::Rng;

/// Uniform integer in `[ceil(min), floor(max)]`.
///
/// When rounding leaves the range inverted (e.g. `random_int(1.99, 1.9)`),
/// the result is `ceil(min)`.
pub fn random_int<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> i64 {
    let lo = min.ceil() as i64;
    let hi = max.floor() as i64;
    if hi <= lo {
        return lo;
    }
    rng.gen_range(lo..=hi)
}

/// Uniform real in `[0, extent)`; zero for an empty extent.
pub fn random_offset<R: Rng + ?Sized>(rng: &mut R, extent: f64) -> f64 {
    rng.gen::<f64>() * extent
}

/// `+1` or `-1` with equal odds.
pub fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> i8 {
    if rng.gen_bool(0.5) { 1 } else { -1 }
}
