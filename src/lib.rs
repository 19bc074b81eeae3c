//! Conway's Game of Life for RGB LED matrix panels.
//!
//! This crate provides:
//! - A cellular-automaton engine that detects when a simulation has
//!   stagnated (died out, frozen, or fallen into a cycle) and reseeds it
//! - A `Renderer` trait so the engine can drive any pixel grid
//! - An in-memory frame buffer and, with the `hardware` feature, an
//!   `rpi-led-matrix` renderer
//! - The simulation thread and HTTP control API used by the main binary
//!
//! Shared helpers (panel configuration, colors, signal handling) live here.

pub mod crawler;
pub mod display;
pub mod error;
pub mod life;
#[cfg(feature = "hardware")]
pub mod matrix;
pub mod renderer;
pub mod server;
pub mod sim;

pub use error::LifeError;

#[cfg(feature = "hardware")]
use rpi_led_matrix::{LedMatrix, LedMatrixOptions, LedRuntimeOptions};
use rand::Rng;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// ── Panel configuration ────────────────────────────────────────────

/// Configuration for the LED panel dimensions.
///
/// # Rust concept: derive macros
/// `Clone, Copy` make this cheaply copyable (it's just two u32s).
/// `Debug` gives us `{:?}` formatting. `PartialEq, Eq` let us compare.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelConfig {
    pub rows: u32,
    pub cols: u32,
}

impl PanelConfig {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    /// Total number of pixels on the panel.
    pub fn pixel_count(&self) -> u32 {
        self.rows * self.cols
    }

    /// The smaller of the two panel dimensions.
    ///
    /// Termination thresholds scale with this, so a glider on a big panel
    /// gets proportionally longer to run before the simulation is reset.
    pub fn panel_size(&self) -> u32 {
        self.rows.min(self.cols)
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self { rows: 64, cols: 64 }
    }
}

// ── Color ──────────────────────────────────────────────────────────

/// Channel value below which a channel counts as dim.
const DIM_THRESHOLD: u8 = 150;
/// Value a channel is forced to when a random color comes out too dim.
const BOOST_VALUE: u8 = 200;

/// Our own color type, decoupled from the hardware crate.
///
/// This lets us test color logic without needing `rpi-led-matrix`.
/// At the hardware boundary, we convert via `Into<LedColor>`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pick a random color that stands out against a black background.
    ///
    /// If every channel lands below the dim threshold, one channel
    /// (chosen at random) is boosted so the result is always visible.
    ///
    /// # Rust concept: `?Sized` generics
    /// `R: Rng + ?Sized` accepts both concrete generators (`StdRng`) and
    /// trait objects (`&mut dyn RngCore`).
    pub fn random_vivid<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut c = Self::new(
            rng.random_range(0..255),
            rng.random_range(0..255),
            rng.random_range(0..255),
        );

        if c.r < DIM_THRESHOLD && c.g < DIM_THRESHOLD && c.b < DIM_THRESHOLD {
            match rng.random_range(0..3) {
                0 => c.r = BOOST_VALUE,
                1 => c.g = BOOST_VALUE,
                _ => c.b = BOOST_VALUE,
            }
        }

        c
    }

    /// True if this color would be hard to tell apart from the red and
    /// green used for death and birth fades.
    pub fn is_near_red_or_green(&self) -> bool {
        (self.r > 180 && self.g < 100 && self.b < 100)
            || (self.r < 100 && self.g > 180 && self.b < 100)
    }

    /// Apply brightness scaling (0-100) to this color.
    pub fn apply_brightness(self, brightness: u8) -> Self {
        if brightness >= 100 {
            return self;
        }
        Self {
            r: ((self.r as u16 * brightness as u16) / 100) as u8,
            g: ((self.g as u16 * brightness as u16) / 100) as u8,
            b: ((self.b as u16 * brightness as u16) / 100) as u8,
        }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Linear interpolation between two channel values.
///
/// Returns `from` at step 0 and exactly `to` at `step == total_steps`.
/// Steps past the end are clamped, and `total_steps == 0` jumps straight
/// to `to`.
pub fn blend_channel(from: u8, to: u8, step: u32, total_steps: u32) -> u8 {
    if total_steps == 0 {
        return to;
    }
    let step = step.min(total_steps) as i32;
    let from = from as i32;
    let to = to as i32;
    let value = from + (to - from) * step / total_steps as i32;
    value.clamp(0, u8::MAX as i32) as u8
}

/// Convert our Color to the hardware crate's LedColor at the boundary.
#[cfg(feature = "hardware")]
impl From<Color> for rpi_led_matrix::LedColor {
    fn from(c: Color) -> Self {
        rpi_led_matrix::LedColor {
            red: c.r,
            green: c.g,
            blue: c.b,
        }
    }
}

// ── Matrix initialization ──────────────────────────────────────────

/// Create a matrix configured for our hardware:
/// Pi Zero 2 W + Adafruit Bonnet + configurable panel size.
///
/// # Rust concept: Result and the ? operator
/// This function returns `Result` because matrix initialization can fail
/// (e.g., if not running as root, or if GPIO is unavailable).
/// The caller uses `?` to propagate errors upward.
#[cfg(feature = "hardware")]
pub fn create_matrix(panel: PanelConfig) -> Result<LedMatrix, LifeError> {
    let mut options = LedMatrixOptions::new();
    options.set_rows(panel.rows);
    options.set_cols(panel.cols);
    options.set_hardware_mapping("adafruit-hat");

    options
        .set_pwm_bits(8)
        .map_err(|e| LifeError::Matrix(e.to_string()))?;
    options.set_pwm_lsb_nanoseconds(130);

    let mut rt_options = LedRuntimeOptions::new();
    rt_options.set_gpio_slowdown(2); // Pi Zero 2 W requires slowdown=2

    LedMatrix::new(Some(options), Some(rt_options)).map_err(|e| LifeError::Matrix(e.to_string()))
}

// ── Shutdown handling ──────────────────────────────────────────────

/// Set up a Ctrl+C handler that sets `running` to false.
///
/// # Rust concept: Arc and AtomicBool
/// We need to share the `running` flag between the main loop and the
/// signal handler. `Arc` lets multiple owners share data, and
/// `AtomicBool` is a thread-safe boolean, so no mutex is needed.
pub fn setup_signal_handler() -> Arc<AtomicBool> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    if let Err(e) = ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    }) {
        tracing::warn!("Could not install Ctrl-C handler: {}", e);
    }

    running
}

/// Check if the main loop should keep running.
pub fn is_running(running: &AtomicBool) -> bool {
    running.load(Ordering::SeqCst)
}

// ── Tests ──────────────────────────────────────────────────────────
