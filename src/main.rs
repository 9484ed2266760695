//! Host-side preview: `cargo run -- --frames 8 --out preview` paints the
//! tracking noise off-screen and writes each frame as a PNG, so the look can
//! be tuned without a browser.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    preview::run()
}

// The browser entry point lives in the library.
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod preview {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use anyhow::Context;
    use clap::Parser;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use tracing_subscriber::EnvFilter;
    use vcr_wasm::noise::SPECKLE_SIZE;
    use vcr_wasm::raster::PixelSurface;
    use vcr_wasm::{Cadence, Host, NoiseOverlay, RendererOptions};

    #[derive(Parser, Debug)]
    #[command(name = "vcr_wasm", about = "Render VCR tracking-noise frames to PNG")]
    struct Args {
        #[arg(long, default_value_t = 720)]
        width: u32,
        #[arg(long, default_value_t = 540)]
        height: u32,
        #[arg(long, default_value_t = 1)]
        frames: u32,
        /// Fixed seed for reproducible output; defaults to the clock.
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value = "preview")]
        out: PathBuf,
        /// Options as JSON, e.g. '{"bandTopY": 400, "speckleCount": 40}'.
        #[arg(long)]
        options: Option<String>,
        #[arg(long)]
        fps: Option<f64>,
        #[arg(long)]
        blur: Option<f64>,
        #[arg(long)]
        opacity: Option<f64>,
        #[arg(long)]
        band_top: Option<f64>,
        #[arg(long)]
        band_bottom: Option<f64>,
        #[arg(long)]
        speckles: Option<u32>,
        /// Honour RUST_LOG and default to debug output.
        #[arg(short, long)]
        verbose: bool,
    }

    impl Args {
        fn renderer_options(&self) -> anyhow::Result<RendererOptions> {
            let base = match &self.options {
                Some(json) => RendererOptions::from_json(json)?,
                None => RendererOptions::default(),
            };
            Ok(base.merge(RendererOptions {
                fps: self.fps,
                blur: self.blur,
                opacity: self.opacity,
                band_top_y: self.band_top,
                band_bottom_y: self.band_bottom,
                speckle_count: self.speckles,
            }))
        }
    }

    fn init_logging(verbose: bool) {
        let filter = if verbose {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
        } else {
            EnvFilter::new("info")
        };
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }

    /// Fixed-size viewport with no real clock: frames are pulled explicitly.
    struct Offscreen {
        size: (u32, u32),
    }

    impl Host for Offscreen {
        type Loop = ();
        type Listener = ();

        fn viewport_size(&self) -> (u32, u32) {
            self.size
        }

        fn schedule(
            &mut self,
            cadence: Cadence,
            _tick: vcr_wasm::host::Tick,
        ) -> Result<(), vcr_wasm::OverlayError> {
            log::debug!("offscreen host ignores {cadence:?}; frames are rendered on demand");
            Ok(())
        }

        fn cancel(&mut self, _handle: ()) {}

        fn listen_resize(
            &mut self,
            _on_resize: vcr_wasm::host::ResizeCallback,
        ) -> Result<(), vcr_wasm::OverlayError> {
            Ok(())
        }

        fn unlisten_resize(&mut self, _listener: ()) {}
    }

    pub fn run() -> anyhow::Result<()> {
        let args = Args::parse();
        init_logging(args.verbose);

        let options = args.renderer_options()?;
        let seed = args.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or_default()
        });
        let host = Offscreen { size: (args.width, args.height) };
        let mut overlay = NoiseOverlay::new(
            PixelSurface::new(args.width, args.height),
            SmallRng::seed_from_u64(seed),
            host,
            &options,
        )?;
        log::info!("rendering {} frame(s) at {}x{} (seed {seed})", args.frames, args.width, args.height);
        log::debug!("config: {:?}", overlay.config());

        fs::create_dir_all(&args.out)
            .with_context(|| format!("creating {}", args.out.display()))?;
        for frame in 0..args.frames {
            let stats = overlay.render_frame(SPECKLE_SIZE)?;
            let path = args.out.join(format!("frame_{frame:04}.png"));
            overlay
                .with_surface(|surface| surface.to_image().save(&path))
                .with_context(|| format!("writing {}", path.display()))?;
            log::debug!(
                "{}: {} speckles, {} tail squares",
                path.display(),
                stats.speckles,
                stats.tail_squares
            );
        }
        overlay.destroy();
        log::info!("wrote {} frame(s) to {}", args.frames, args.out.display());
        Ok(())
    }
}
