//! LED Life: Conway's Game of Life on an RGB LED matrix
//!
//! By default runs the simulation on its own thread and serves an HTTP API
//! for watching and steering it. `--headless` skips the server and runs the
//! animation directly on the main thread.
//!
//! ## Architecture
//! - **Simulation thread** (std::thread): owns the display, runs generations
//! - **HTTP server** (tokio/axum): accepts API requests, sends commands via channel
//!
//! ## Rust concepts
//! - `#[tokio::main]` on a function other than `main`
//! - `std::thread::spawn` for the simulation thread
//! - `std::sync::mpsc` channel between async and sync worlds
//! - Graceful shutdown with `tokio::signal`
//!
//! ## Usage
//! ```sh
//! sudo ./target/release/led-life --port 8080 --fade-steps 8
//! sudo ./target/release/led-life --headless --animation crawler
//! ./target/release/led-life --virtual-display
//! ```

use clap::Parser;
use led_life::crawler::Crawler;
use led_life::display::Display;
use led_life::life::{GameOfLife, LifeConfig, Pattern};
use led_life::renderer::Renderer;
use led_life::server::{self, AppState};
use led_life::sim::{SharedState, run_simulation};
use led_life::{LifeError, PanelConfig, is_running, setup_signal_handler};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum Animation {
    /// Game of Life with stagnation detection
    Life,
    /// A single wandering pixel
    Crawler,
}

/// Conway's Game of Life on an RGB LED matrix
#[derive(Parser, Debug)]
#[command(name = "led-life")]
#[command(about = "Game of Life for RGB LED matrices, with an HTTP control API")]
#[command(version)]
struct Args {
    /// Number of rows on the LED panel
    #[arg(long, default_value = "64")]
    rows: u32,

    /// Number of columns on the LED panel
    #[arg(long, default_value = "64")]
    cols: u32,

    /// Port to listen on
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Frames per generation for birth/death fades (0 or 1 disables fading)
    #[arg(long, default_value = "0")]
    fade_steps: u8,

    /// Delay between generations and fade frames, in milliseconds
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u64).range(0..=10_000))]
    delay_ms: u64,

    /// Starting pattern for every reset
    #[arg(long, value_enum, default_value_t = Pattern::Random)]
    pattern: Pattern,

    /// Fixed RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Population samples kept for cycle detection
    #[arg(long, default_value = "48")]
    history_len: usize,

    /// Longest population cycle to look for
    #[arg(long, default_value = "24")]
    max_period: usize,

    /// Percent of cells alive in a random start
    #[arg(long, default_value = "15", value_parser = clap::value_parser!(u8).range(0..=100))]
    density: u8,

    /// What to draw
    #[arg(long, value_enum, default_value_t = Animation::Life)]
    animation: Animation,

    /// Run without the HTTP server
    #[arg(long)]
    headless: bool,

    /// Render to memory instead of the LED panel
    #[arg(long)]
    virtual_display: bool,
}

impl Args {
    fn panel(&self) -> PanelConfig {
        PanelConfig::new(self.rows, self.cols)
    }

    fn life_config(&self) -> LifeConfig {
        LifeConfig {
            fade_steps: self.fade_steps,
            delay_ms: self.delay_ms,
            history_len: self.history_len,
            max_period: self.max_period,
            density_percent: self.density,
            seed: self.pattern.into(),
            rng_seed: self.seed,
            ..LifeConfig::default()
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_ansi(false) // Disable ANSI color codes for systemd/journald
        .compact()
        .init();

    let args = Args::parse();

    tracing::info!("LED Life v{}", env!("CARGO_PKG_VERSION"));
    let panel = args.panel();
    tracing::info!(
        "Panel: {}x{} ({} pixels, thresholds scaled by {})",
        panel.cols,
        panel.rows,
        panel.pixel_count(),
        panel.panel_size()
    );

    let result = if args.headless || args.animation == Animation::Crawler {
        run_headless(&args)
    } else {
        serve(&args)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

// ── Server mode ──────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn serve(args: &Args) -> Result<(), LifeError> {
    let config = args.life_config();
    config.validate()?;

    // Create the channel for sending commands to the simulation thread.
    let (tx, rx) = mpsc::channel();

    // Status and frame: simulation thread writes, HTTP handlers read.
    let shared = SharedState::new(&config);
    let running = Arc::new(AtomicBool::new(true));

    let panel = args.panel();
    let virtual_display = args.virtual_display;
    let sim_shared = shared.clone();
    let sim_running = running.clone();
    let sim_handle = thread::spawn(move || {
        run_simulation(
            move || Display::open(panel, virtual_display),
            config,
            rx,
            sim_shared,
            sim_running,
        );
    });

    let app = server::create_router(AppState {
        command_tx: tx,
        shared,
    });

    let addr = format!("0.0.0.0:{}", args.port);
    tracing::info!("Listening on http://{}", addr);
    tracing::info!("API Documentation: http://localhost:{}/docs", args.port);
    tracing::info!("Try: curl http://localhost:{}/api/v1/status", args.port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router (and with it the command sender) is gone; the flag covers
    // a thread that is mid-fade.
    running.store(false, Ordering::SeqCst);
    if sim_handle.join().is_err() {
        tracing::error!("Simulation thread panicked");
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down...");
}

// ── Headless mode ────────────────────────────────────────────────────

fn run_headless(args: &Args) -> Result<(), LifeError> {
    let running = setup_signal_handler();
    let display = Display::open(args.panel(), args.virtual_display)?;
    let delay = Duration::from_millis(args.delay_ms);

    match args.animation {
        Animation::Life => run_life(display, args.life_config(), delay, &running)?,
        Animation::Crawler => run_crawler(display, args.seed, delay, &running),
    }

    tracing::info!("Shutting down...");
    Ok(())
}

fn run_life<R: Renderer>(
    renderer: R,
    config: LifeConfig,
    delay: Duration,
    running: &AtomicBool,
) -> Result<(), LifeError> {
    let mut life = GameOfLife::new(renderer, config)?;
    tracing::info!(alive = life.alive_count(), "Life started");

    while is_running(running) {
        life.run_cycle();
        thread::sleep(delay);
    }

    tracing::info!(stats = ?life.stats(), "Life stopped");
    Ok(())
}

fn run_crawler<R: Renderer>(renderer: R, seed: Option<u64>, delay: Duration, running: &AtomicBool) {
    let mut crawler = Crawler::new(renderer, seed);
    tracing::info!("Crawler started");

    while is_running(running) {
        crawler.step();
        thread::sleep(delay);
    }

    tracing::info!(steps = crawler.steps(), "Crawler stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use led_life::life::Seed;
    use pretty_assertions::assert_eq;

    #[test]
    fn args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn flags_map_onto_config() {
        let args = Args::parse_from([
            "led-life",
            "--fade-steps",
            "8",
            "--pattern",
            "medium-spaceship",
            "--seed",
            "3",
            "--density",
            "40",
        ]);
        let config = args.life_config();
        assert_eq!(config.fade_steps, 8);
        assert_eq!(config.seed, Seed::Pattern(Pattern::MediumSpaceship));
        assert_eq!(config.rng_seed, Some(3));
        assert_eq!(config.density_percent, 40);
        assert_eq!(config.history_len, 48);
    }

    #[test]
    fn density_over_100_is_rejected() {
        assert!(Args::try_parse_from(["led-life", "--density", "150"]).is_err());
    }

    #[test]
    fn delay_is_bounded() {
        assert!(Args::try_parse_from(["led-life", "--delay-ms", "10000"]).is_ok());
        assert!(Args::try_parse_from(["led-life", "--delay-ms", "18446744073709551615"]).is_err());
    }
}
