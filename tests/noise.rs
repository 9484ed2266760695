#![cfg(not(target_arch = "wasm32"))]

mod common;

use common::{Op, RecordingSurface};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use vcr_wasm::noise::{self, Band, MAX_TAIL_STEPS, SPECKLE_SIZE};
use vcr_wasm::{RendererConfig, Rgba};

fn config(speckle_count: u32, band: f64) -> RendererConfig {
    RendererConfig {
        target_fps: 30.0,
        band_top_y: band,
        band_bottom_y: band,
        speckle_count,
        ..RendererConfig::default()
    }
}

#[test]
fn one_extra_speckle_pair_per_frame() {
    let mut rng = SmallRng::seed_from_u64(1);
    for count in [0, 1, 7, 70] {
        let streaks = noise::scatter(&mut rng, &config(count, 220.0), 800, 600, SPECKLE_SIZE);
        let lower = streaks.iter().filter(|s| s.band == Band::Lower).count();
        let upper = streaks.iter().filter(|s| s.band == Band::Upper).count();
        assert_eq!(lower, count as usize + 1);
        assert_eq!(upper, count as usize + 1);
    }
}

#[test]
fn speckles_stay_inside_their_bands() {
    let mut rng = SmallRng::seed_from_u64(2);
    let cfg = config(70, 220.0);
    for _ in 0..20 {
        for streak in noise::scatter(&mut rng, &cfg, 1024, 768, SPECKLE_SIZE) {
            let y = streak.head.y;
            match streak.band {
                Band::Lower => assert!((223.0..=768.0).contains(&y), "lower y {y}"),
                Band::Upper => assert!((0.0..=217.0).contains(&y), "upper y {y}"),
            }
            assert!((0.0..1024.0).contains(&streak.head.x));
            assert_eq!(streak.head.size, SPECKLE_SIZE);
        }
    }
}

#[test]
fn paired_speckles_share_a_column() {
    let mut rng = SmallRng::seed_from_u64(3);
    let streaks = noise::scatter(&mut rng, &config(10, 100.0), 300, 300, SPECKLE_SIZE);
    for pair in streaks.chunks(2) {
        assert_eq!(pair[0].head.x, pair[1].head.x);
        assert_ne!(pair[0].band, pair[1].band);
    }
}

#[test]
fn tails_run_one_way_for_up_to_fifty_steps() {
    let mut rng = SmallRng::seed_from_u64(4);
    let mut lengths = Vec::new();
    for _ in 0..500 {
        let tail = noise::tail(&mut rng, 100.0, 40.0, SPECKLE_SIZE);
        assert!((1..=MAX_TAIL_STEPS).contains(&tail.steps.len()));
        assert!(tail.direction == 1 || tail.direction == -1);

        let mut prev = 100.0;
        for step in &tail.steps {
            let dx = (step.x - prev) * f64::from(tail.direction);
            assert!((1.0..=4.0).contains(&dx), "step of {dx} against direction");
            assert_eq!(step.y, 40.0);
            prev = step.x;
        }
        lengths.push(tail.steps.len());
    }
    assert!(lengths.contains(&1) || lengths.iter().any(|&n| n < 5));
    assert!(lengths.iter().any(|&n| n > 45));
}

#[test]
fn tail_squares_shrink_to_zero_and_never_below() {
    let mut rng = SmallRng::seed_from_u64(5);
    for _ in 0..200 {
        let tail = noise::tail(&mut rng, 0.0, 0.0, SPECKLE_SIZE);
        assert_eq!(tail.steps[0].size, SPECKLE_SIZE);
        for pair in tail.steps.windows(2) {
            assert!(pair[1].size <= pair[0].size);
        }
        assert!(tail.steps.iter().all(|s| s.size >= 0.0));
    }
}

#[test]
fn long_tails_fade_out() {
    // Past ~30 steps the size has rounded down to nothing.
    let mut rng = SmallRng::seed_from_u64(6);
    let tail = (0..1_000)
        .map(|_| noise::tail(&mut rng, 0.0, 0.0, SPECKLE_SIZE))
        .find(|t| t.steps.len() >= 40)
        .expect("a long tail within 1000 draws");
    assert_eq!(tail.steps[39].size, 0.0);
}

#[test]
fn render_frame_blurs_clears_then_paints_white() {
    let mut surface = RecordingSurface::new(320, 240);
    let mut rng = SmallRng::seed_from_u64(7);
    let cfg = RendererConfig { blur_radius_px: 3.0, ..config(5, 100.0) };

    let stats = noise::render_frame(&mut surface, &mut rng, &cfg, SPECKLE_SIZE).unwrap();

    assert_eq!(&surface.ops[..3], &[Op::Blur(3.0), Op::Clear, Op::Fill(Rgba::WHITE)]);
    assert_eq!(stats.speckles, 12);
    assert_eq!(surface.rects().len(), stats.speckles + stats.tail_squares);
    assert!(surface.rects().iter().all(|&(_, _, w, h)| w > 0.0 && w == h));
}

#[test]
fn small_surface_scenario() {
    let mut surface = RecordingSurface::new(200, 200);
    let mut rng = SmallRng::seed_from_u64(8);
    let cfg = config(2, 100.0);

    let stats = noise::render_frame(&mut surface, &mut rng, &cfg, SPECKLE_SIZE).unwrap();

    assert_eq!(stats.speckles, 6);
    for (_, y, _, _) in surface.rects() {
        assert!(
            (103.0..=200.0).contains(&y) || (0.0..=97.0).contains(&y),
            "square at y={y} falls in the clear middle"
        );
    }
}

#[test]
fn zero_size_steps_are_not_painted() {
    let mut rng = SmallRng::seed_from_u64(9);
    let streaks = noise::scatter(&mut rng, &config(30, 100.0), 400, 400, SPECKLE_SIZE);
    let painted: usize = streaks
        .iter()
        .map(|s| s.tail.steps.iter().filter(|q| q.size > 0.0).count())
        .sum();

    let mut surface = RecordingSurface::new(400, 400);
    let stats = noise::paint(&mut surface, &streaks);

    assert_eq!(stats.tail_squares, painted);
    assert_eq!(surface.rects().len(), streaks.len() + painted);
}

#[test]
fn empty_surface_still_draws_the_full_count() {
    let mut surface = RecordingSurface::new(0, 0);
    let mut rng = SmallRng::seed_from_u64(10);
    let stats = noise::render_frame(&mut surface, &mut rng, &config(3, 220.0), SPECKLE_SIZE).unwrap();
    assert_eq!(stats.speckles, 8);
}

#[test]
fn zero_radius_frame_counts_nothing_painted() {
    let mut surface = RecordingSurface::new(200, 200);
    let mut rng = SmallRng::seed_from_u64(12);
    let stats = noise::render_frame(&mut surface, &mut rng, &config(4, 100.0), 0.0).unwrap();
    assert_eq!(stats, noise::FrameStats::default());
    assert!(surface.rects().is_empty());
}
