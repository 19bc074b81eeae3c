//! Simulation thread: owns the renderer and the Life engine, and processes
//! commands via a channel.
//!
//! The `rpi-led-matrix` C library is not thread-safe, so the renderer is
//! built and used on one dedicated thread. The async HTTP server talks to
//! that thread by sending `SimCommand` values through an `mpsc` channel and
//! reads back a `SimulationStatus` and the latest frame.
//!
//! ## Rust concepts
//! - `std::sync::mpsc` channels for thread communication
//! - `try_recv()` between generations, `recv_timeout()` while paused
//! - `Arc<Mutex<T>>` for shared state
//! - `FnOnce` factories so the renderer is created on the thread that uses it

use crate::LifeError;
use crate::is_running;
use crate::life::{GameOfLife, LifeConfig, LifeStats, Pattern, Seed};
use crate::renderer::{FrameBuffer, Renderer};
use serde::Serialize;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// How often a paused simulation wakes up to check the shutdown flag.
const PAUSE_POLL: Duration = Duration::from_millis(100);

pub const DEFAULT_BRIGHTNESS: u8 = 75;

// ── Commands ─────────────────────────────────────────────────────────

/// Commands sent from the HTTP server to the simulation thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimCommand {
    /// Start over, optionally switching to a new starting pattern
    Reset(Option<Pattern>),
    Pause,
    Resume,
    SetFadeSteps(u8),
    /// Delay between generations (and fade frames), in milliseconds
    SetDelay(u64),
    /// Display brightness (0-100)
    SetBrightness(u8),
}

// ── Status ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SimState {
    Starting,
    Running,
    Paused,
    Stopped,
    /// The renderer or engine could not be created
    Failed,
}

/// Shared status that the HTTP server reads to report current state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct SimulationStatus {
    pub state: SimState,
    /// Starting pattern used on every reset (`null` for explicit cells)
    pub pattern: Option<Pattern>,
    pub fade_steps: u8,
    pub delay_ms: u64,
    /// Current brightness (0-100)
    pub brightness: u8,
    /// Color of live cells in the current simulation, as [r, g, b]
    #[schema(value_type = Vec<u8>, example = "[40, 120, 230]")]
    pub active_color: [u8; 3],
    pub width: usize,
    pub height: usize,
    pub stats: LifeStats,
    /// Server version
    pub version: String,
}

impl SimulationStatus {
    pub fn new(config: &LifeConfig) -> Self {
        Self {
            state: SimState::Starting,
            pattern: seed_pattern(&config.seed),
            fade_steps: config.fade_steps,
            delay_ms: config.delay_ms,
            brightness: DEFAULT_BRIGHTNESS,
            active_color: [0, 0, 0],
            width: 0,
            height: 0,
            stats: LifeStats::default(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    fn update<R: Renderer>(&mut self, life: &GameOfLife<R>, control: &Control) {
        let config = life.config();
        self.state = if control.paused {
            SimState::Paused
        } else {
            SimState::Running
        };
        self.pattern = seed_pattern(&config.seed);
        self.fade_steps = config.fade_steps;
        self.delay_ms = config.delay_ms;
        self.brightness = control.brightness;
        self.active_color = life.active_color().to_array();
        self.width = life.grid().width();
        self.height = life.grid().height();
        self.stats = life.stats();
    }
}

fn seed_pattern(seed: &Seed) -> Option<Pattern> {
    match seed {
        Seed::Pattern(pattern) => Some(*pattern),
        Seed::Cells(_) => None,
    }
}

/// Everything the HTTP side can see, shared with the simulation thread.
#[derive(Clone)]
pub struct SharedState {
    pub status: Arc<Mutex<SimulationStatus>>,
    /// Copy of the most recently presented frame
    pub frame: Arc<Mutex<FrameBuffer>>,
}

impl SharedState {
    pub fn new(config: &LifeConfig) -> Self {
        Self {
            status: Arc::new(Mutex::new(SimulationStatus::new(config))),
            frame: Arc::new(Mutex::new(FrameBuffer::new(0, 0))),
        }
    }
}

// ── Command handling ─────────────────────────────────────────────────

/// Thread-local state that is not part of the engine itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Control {
    pub paused: bool,
    pub brightness: u8,
}

impl Default for Control {
    fn default() -> Self {
        Self {
            paused: false,
            brightness: DEFAULT_BRIGHTNESS,
        }
    }
}

pub fn apply_command<R: Renderer>(life: &mut GameOfLife<R>, control: &mut Control, cmd: SimCommand) {
    match cmd {
        SimCommand::Reset(Some(pattern)) => {
            tracing::info!("Reset with pattern {:?}", pattern);
            life.reseed(pattern.into());
        }
        SimCommand::Reset(None) => {
            tracing::info!("Reset");
            life.reset();
        }
        SimCommand::Pause => {
            control.paused = true;
            tracing::info!("Simulation paused at generation {}", life.generation());
        }
        SimCommand::Resume => {
            control.paused = false;
            tracing::info!("Simulation resumed");
        }
        SimCommand::SetFadeSteps(steps) => {
            life.set_fade_steps(steps);
            tracing::info!("Fade steps set to {}", steps);
        }
        SimCommand::SetDelay(ms) => {
            life.set_delay_ms(ms);
            tracing::info!("Delay set to {}ms", ms);
        }
        SimCommand::SetBrightness(value) => {
            let value = value.min(100);
            control.brightness = value;
            life.renderer_mut().set_brightness(value);
            // Repaint so a paused display picks up the change.
            life.renderer_mut().present();
            tracing::info!("Brightness set to {}", value);
        }
    }
}

// ── Simulation loop ──────────────────────────────────────────────────

/// Main simulation loop. Runs on a dedicated thread and owns the renderer.
///
/// Returns when the command channel is closed (sender dropped) or
/// `running` is cleared. Commands are drained between generations, so a
/// long fade finishes before a command takes effect.
pub fn run_simulation<R, F>(
    make_renderer: F,
    config: LifeConfig,
    rx: Receiver<SimCommand>,
    shared: SharedState,
    running: Arc<AtomicBool>,
) where
    R: Renderer + AsRef<FrameBuffer>,
    F: FnOnce() -> Result<R, LifeError>,
{
    let mut life = match make_renderer().and_then(|r| GameOfLife::new(r, config)) {
        Ok(life) => life,
        Err(e) => {
            tracing::error!("Failed to start simulation: {}", e);
            shared.status.lock().unwrap().state = SimState::Failed;
            return;
        }
    };

    let mut control = Control::default();
    life.renderer_mut().set_brightness(control.brightness);

    tracing::info!(
        width = life.grid().width(),
        height = life.grid().height(),
        alive = life.alive_count(),
        "Simulation thread started"
    );

    'sim: while is_running(&running) {
        loop {
            match rx.try_recv() {
                Ok(cmd) => apply_command(&mut life, &mut control, cmd),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::info!("Simulation thread: channel closed, shutting down.");
                    break 'sim;
                }
            }
        }

        if control.paused {
            publish(&life, &control, &shared);
            match rx.recv_timeout(PAUSE_POLL) {
                Ok(cmd) => apply_command(&mut life, &mut control, cmd),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break 'sim,
            }
            continue;
        }

        life.run_cycle();
        publish(&life, &control, &shared);

        let delay = life.config().delay_ms;
        if delay > 0 {
            thread::sleep(Duration::from_millis(delay));
        }
    }

    publish(&life, &control, &shared);
    shared.status.lock().unwrap().state = SimState::Stopped;
    tracing::info!(stats = ?life.stats(), "Simulation thread stopped");
}

fn publish<R: Renderer + AsRef<FrameBuffer>>(
    life: &GameOfLife<R>,
    control: &Control,
    shared: &SharedState,
) {
    shared.status.lock().unwrap().update(life, control);
    shared.frame.lock().unwrap().clone_from(life.renderer().as_ref());
}
