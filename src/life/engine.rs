//! The Game of Life engine.
//!
//! `GameOfLife` owns the grid, the stagnation counters, and a renderer.
//! Each call to `run_cycle` is one generation:
//!
//! 1. If the simulation has stagnated, reseed it and redraw (nothing else
//!    happens that cycle)
//! 2. Evaluate the rules, flagging births and deaths
//! 3. Fade the flagged cells in and out over `fade_steps` frames
//! 4. Apply the changes and update the counters
//!
//! There is no end state: a simulation that dies, freezes, or loops is
//! simply replaced by a new one.

use super::detector::{MIN_PERIOD, RepeatDetector, Streaks};
use super::fade::FadePalette;
use super::grid::{ApplySummary, Grid, Transition};
use super::patterns::{Pattern, Seed};
use crate::renderer::Renderer;
use crate::{Color, LifeError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::fmt;
use std::thread;
use std::time::Duration;

// ── Configuration ────────────────────────────────────────────────────

/// When to give up on a simulation and reseed.
///
/// The factors are multiplied by the panel size (the smaller grid
/// dimension), so larger panels let moving patterns run longer. The values
/// are tuned for how things look on a real LED panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Thresholds {
    /// Generations with no change at all.
    pub static_generations: u32,
    /// Generations identical to two generations back.
    pub repeat2: u32,
    /// Generations identical to three generations back.
    pub repeat3: u32,
    /// Unchanged population, times panel size.
    pub population_static_factor: u32,
    /// Unchanged population at exactly `glider_population`, times panel size.
    pub glider_factor: u32,
    pub glider_population: usize,
    /// Population cycling with period 4, times panel size.
    pub period4_factor: u32,
    /// Repeats of any longer population cycle.
    pub long_cycle: u32,
    /// Shortest period counted as a long cycle.
    pub long_cycle_min_period: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            static_generations: 5,
            repeat2: 6,
            repeat3: 35,
            population_static_factor: 10,
            glider_factor: 4,
            glider_population: 5,
            period4_factor: 3,
            long_cycle: 150,
            long_cycle_min_period: 6,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LifeConfig {
    /// Frames per generation for birth/death fades. 0 or 1 disables fading.
    pub fade_steps: u8,
    /// Delay between fade frames, in milliseconds.
    pub delay_ms: u64,
    /// How long to hold the last frame when everything has died.
    pub end_hold_ms: u64,
    /// Population samples kept for cycle detection.
    pub history_len: usize,
    /// Longest population cycle searched for.
    pub max_period: usize,
    /// Chance (percent) of each cell starting alive in a random seed.
    pub density_percent: u8,
    /// How the grid is filled on every reset.
    pub seed: Seed,
    /// Fixed RNG seed for reproducible runs; `None` seeds from the OS.
    pub rng_seed: Option<u64>,
    pub thresholds: Thresholds,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            fade_steps: 0,
            delay_ms: 10,
            end_hold_ms: 4,
            history_len: 48,
            max_period: 24,
            density_percent: 15,
            seed: Seed::default(),
            rng_seed: None,
            thresholds: Thresholds::default(),
        }
    }
}

impl LifeConfig {
    pub fn validate(&self) -> Result<(), LifeError> {
        if self.max_period < MIN_PERIOD {
            return Err(LifeError::InvalidConfig(format!(
                "max_period must be at least {MIN_PERIOD}, got {}",
                self.max_period
            )));
        }
        if self.history_len < self.max_period * 2 {
            return Err(LifeError::InvalidConfig(format!(
                "history_len ({}) must hold two windows of max_period ({})",
                self.history_len, self.max_period
            )));
        }
        if self.density_percent > 100 {
            return Err(LifeError::InvalidConfig(format!(
                "density_percent must be 0-100, got {}",
                self.density_percent
            )));
        }
        Ok(())
    }

    /// Delay per fade frame, capped so a whole fade takes at most a second.
    pub fn fade_delay(&self) -> Duration {
        let steps = self.fade_steps.max(1) as u64;
        let ms = if self.delay_ms.saturating_mul(steps) > 1000 {
            1000 / steps
        } else {
            self.delay_ms
        };
        Duration::from_millis(ms)
    }
}

// ── Outcomes ─────────────────────────────────────────────────────────

/// Why a simulation was reset. Checked in declaration order; the first
/// that applies is reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminationCause {
    AllDied,
    StaticPattern,
    Repeat2,
    Repeat3,
    /// Population unchanged for more than `generations`.
    PopulationStatic { generations: u32 },
    /// Population stuck at the glider size for more than `generations`.
    GliderPopulation { generations: u32 },
    /// Population on a 4-generation cycle for more than `generations`.
    Period4Cycle { generations: u32 },
    LongCycle { period: usize, repeats: u32 },
}

impl fmt::Display for TerminationCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationCause::AllDied => write!(f, "all died"),
            TerminationCause::StaticPattern => write!(f, "static pattern"),
            TerminationCause::Repeat2 => write!(f, "2-cycle repeat"),
            TerminationCause::Repeat3 => write!(f, "3-cycle repeat"),
            TerminationCause::PopulationStatic { generations } => {
                write!(f, "population static over {generations} generations")
            }
            TerminationCause::GliderPopulation { generations } => {
                write!(f, "population static at glider size over {generations} generations")
            }
            TerminationCause::Period4Cycle { generations } => {
                write!(f, "population on 4-step cycle over {generations} generations")
            }
            TerminationCause::LongCycle { period, repeats } => {
                write!(f, "population on {period}-step cycle for {repeats} repeats")
            }
        }
    }
}

/// What a single `run_cycle` call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The simulation had stagnated and was reseeded.
    Reset(TerminationCause),
    /// One generation was simulated.
    Stepped { births: usize, deaths: usize },
}

/// Snapshot of the engine's counters, for status reporting.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct LifeStats {
    /// Generations since the last reset
    pub generation: u64,
    /// Live cells right now
    pub alive: usize,
    /// Resets caused by stagnation
    pub resets: u64,
    /// Why the last reset happened
    pub last_cause: Option<String>,
    /// Shortest run before a reset
    pub min_generations: Option<u64>,
    /// Longest run before a reset
    pub max_generations: Option<u64>,
}

/// Decide whether a simulation has stagnated.
pub fn classify(
    alive: usize,
    panel_size: u32,
    streaks: &Streaks,
    detector: &RepeatDetector,
    t: &Thresholds,
) -> Option<TerminationCause> {
    let unchanged = detector.unchanged_population();
    let population_static = panel_size * t.population_static_factor;
    let glider = panel_size * t.glider_factor;
    let period4 = panel_size * t.period4_factor;

    if alive == 0 {
        Some(TerminationCause::AllDied)
    } else if streaks.static_generations > t.static_generations {
        Some(TerminationCause::StaticPattern)
    } else if streaks.repeat2 > t.repeat2 {
        Some(TerminationCause::Repeat2)
    } else if streaks.repeat3 > t.repeat3 {
        Some(TerminationCause::Repeat3)
    } else if unchanged > population_static {
        Some(TerminationCause::PopulationStatic {
            generations: population_static,
        })
    } else if unchanged > glider && alive == t.glider_population {
        Some(TerminationCause::GliderPopulation { generations: glider })
    } else if detector.cycle_repeats(4) > period4 {
        Some(TerminationCause::Period4Cycle {
            generations: period4,
        })
    } else {
        detector
            .longest_cycle(t.long_cycle_min_period)
            .filter(|&(_, repeats)| repeats > t.long_cycle)
            .map(|(period, repeats)| TerminationCause::LongCycle { period, repeats })
    }
}

// ── Engine ───────────────────────────────────────────────────────────

/// A self-restarting Game of Life driving a `Renderer`.
///
/// # Rust concept: generic ownership
/// The engine owns its renderer outright (`R`, not `&mut R`), so one
/// value carries the whole simulation and can be moved onto a thread.
pub struct GameOfLife<R: Renderer> {
    renderer: R,
    grid: Grid,
    config: LifeConfig,
    rng: StdRng,
    active_color: Color,
    generation: u64,
    alive: usize,
    streaks: Streaks,
    detector: RepeatDetector,
    panel_size: u32,
    resets: u64,
    last_cause: Option<TerminationCause>,
    min_generations: Option<u64>,
    max_generations: Option<u64>,
}

impl<R: Renderer> GameOfLife<R> {
    /// Build an engine sized to the renderer and seed the first simulation.
    pub fn new(renderer: R, config: LifeConfig) -> Result<Self, LifeError> {
        config.validate()?;
        let grid = Grid::new(renderer.width(), renderer.height())?;
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let panel_size = grid.width().min(grid.height()) as u32;
        let detector = RepeatDetector::new(config.history_len, config.max_period);

        let mut life = Self {
            renderer,
            grid,
            config,
            rng,
            active_color: Color::BLACK,
            generation: 0,
            alive: 0,
            streaks: Streaks::default(),
            detector,
            panel_size,
            resets: 0,
            last_cause: None,
            min_generations: None,
            max_generations: None,
        };
        life.reset();
        Ok(life)
    }

    /// Advance one generation, or reseed if the simulation has stagnated.
    pub fn run_cycle(&mut self) -> CycleOutcome {
        if let Some(cause) = self.termination_cause() {
            self.terminate(cause);
            return CycleOutcome::Reset(cause);
        }

        self.grid.evaluate_rules();

        if self.config.fade_steps > 1 {
            self.fade_in_changes();
        }

        let summary = self.apply_changes();

        if self.alive == 0 {
            // Let the empty grid show before the next cycle reseeds.
            pause(Duration::from_millis(self.config.end_hold_ms));
        }

        self.generation += 1;
        CycleOutcome::Stepped {
            births: summary.births,
            deaths: summary.deaths,
        }
    }

    /// The reason the next `run_cycle` would reset, if any.
    pub fn termination_cause(&self) -> Option<TerminationCause> {
        classify(
            self.alive,
            self.panel_size,
            &self.streaks,
            &self.detector,
            &self.config.thresholds,
        )
    }

    /// Start a fresh simulation from the configured seed.
    ///
    /// Clears every counter and all history, picks a new cell color, and
    /// redraws the whole grid. Lifetime stats (resets, min/max) survive.
    pub fn reset(&mut self) {
        self.generation = 0;
        self.streaks = Streaks::default();
        self.detector.reset();
        self.grid.clear();
        self.active_color = self.roll_color();

        match &self.config.seed {
            Seed::Pattern(Pattern::Random) => {
                let density = self.config.density_percent;
                for y in 0..self.grid.height() {
                    for x in 0..self.grid.width() {
                        if self.rng.random_range(0..100) < density {
                            self.grid.set_alive(x, y, true);
                        }
                    }
                }
            }
            Seed::Pattern(pattern) => {
                for (x, y) in pattern.place(self.grid.width(), self.grid.height()) {
                    self.grid.set_alive(x, y, true);
                }
            }
            Seed::Cells(cells) => {
                let (w, h) = (self.grid.width(), self.grid.height());
                for &(x, y) in cells {
                    self.grid.set_alive(x % w, y % h, true);
                }
            }
        }

        self.alive = self.grid.count_alive();
        self.redraw();
    }

    /// Use `seed` for this and every later reset.
    pub fn reseed(&mut self, seed: Seed) {
        self.config.seed = seed;
        self.reset();
    }

    pub fn set_fade_steps(&mut self, fade_steps: u8) {
        self.config.fade_steps = fade_steps;
    }

    pub fn set_delay_ms(&mut self, delay_ms: u64) {
        self.config.delay_ms = delay_ms;
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &LifeConfig {
        &self.config
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn alive_count(&self) -> usize {
        self.alive
    }

    pub fn active_color(&self) -> Color {
        self.active_color
    }

    pub fn streaks(&self) -> &Streaks {
        &self.streaks
    }

    pub fn detector(&self) -> &RepeatDetector {
        &self.detector
    }

    pub fn panel_size(&self) -> u32 {
        self.panel_size
    }

    pub fn stats(&self) -> LifeStats {
        LifeStats {
            generation: self.generation,
            alive: self.alive,
            resets: self.resets,
            last_cause: self.last_cause.map(|c| c.to_string()),
            min_generations: self.min_generations,
            max_generations: self.max_generations,
        }
    }

    // ── Internals ────────────────────────────────────────────────────

    fn terminate(&mut self, cause: TerminationCause) {
        let generations = self.generation;
        if generations > 0 {
            self.min_generations = Some(self.min_generations.map_or(generations, |m| m.min(generations)));
            self.max_generations = Some(self.max_generations.map_or(generations, |m| m.max(generations)));
        }
        self.resets += 1;
        self.last_cause = Some(cause);

        tracing::info!(
            generations,
            min = ?self.min_generations,
            max = ?self.max_generations,
            "Pattern terminated: {}",
            cause
        );

        self.reset();
    }

    /// A fresh cell color. With long fades, colors close to the birth
    /// green or death red are rejected.
    fn roll_color(&mut self) -> Color {
        let mut color = self.renderer.random_vivid_color(&mut self.rng);
        if self.config.fade_steps > 4 {
            while color.is_near_red_or_green() {
                color = self.renderer.random_vivid_color(&mut self.rng);
            }
        }
        tracing::debug!(r = color.r, g = color.g, b = color.b, "New cell color");
        color
    }

    fn redraw(&mut self) {
        let active = self.active_color;
        for (x, y, cell) in self.grid.iter() {
            let color = if cell.alive { active } else { Color::BLACK };
            self.renderer.set_pixel(x, y, color);
        }
        self.renderer.present();
    }

    fn fade_in_changes(&mut self) {
        let palette = FadePalette::new(self.active_color, self.config.fade_steps as u32);
        let delay = self.config.fade_delay();

        for step in 1..=palette.steps() {
            let frame = palette.frame(&self.renderer, step);
            for (x, y, cell) in self.grid.iter() {
                match cell.pending {
                    Transition::Birth => self.renderer.set_pixel(x, y, frame.birth),
                    Transition::Death => self.renderer.set_pixel(x, y, frame.death),
                    Transition::Stable => {}
                }
            }
            self.renderer.present();
            pause(delay);
        }
    }

    fn apply_changes(&mut self) -> ApplySummary {
        let summary = self.grid.apply_pending();

        if self.config.fade_steps < 2 {
            let active = self.active_color;
            for (x, y, cell) in self.grid.iter() {
                match cell.pending {
                    Transition::Birth => self.renderer.set_pixel(x, y, active),
                    Transition::Death => self.renderer.set_pixel(x, y, Color::BLACK),
                    Transition::Stable => {}
                }
            }
            self.renderer.present();
        }

        self.alive = self.alive + summary.births - summary.deaths;
        self.streaks.update(&summary);
        self.detector.record(self.alive);
        summary
    }
}

fn pause(duration: Duration) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::FrameBuffer;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn quiet_config(seed: impl Into<Seed>) -> LifeConfig {
        LifeConfig {
            delay_ms: 0,
            end_hold_ms: 0,
            seed: seed.into(),
            rng_seed: Some(11),
            ..LifeConfig::default()
        }
    }

    fn record_cycle(detector: &mut RepeatDetector, cycle: &[usize], generations: usize) {
        for &p in cycle.iter().cycle().take(generations) {
            detector.record(p);
        }
    }

    // ── Construction ───────────────────────────────────────────────

    #[test]
    fn rejects_tiny_grid() {
        let result = GameOfLife::new(FrameBuffer::new(2, 8), LifeConfig::default());
        assert!(matches!(
            result,
            Err(LifeError::GridTooSmall {
                width: 2,
                height: 8
            })
        ));
    }

    #[rstest]
    #[case(48, 3, 15)]
    #[case(30, 24, 15)]
    #[case(48, 24, 101)]
    fn rejects_bad_config(#[case] history_len: usize, #[case] max_period: usize, #[case] density: u8) {
        let config = LifeConfig {
            history_len,
            max_period,
            density_percent: density,
            ..LifeConfig::default()
        };
        assert!(matches!(
            GameOfLife::new(FrameBuffer::new(8, 8), config),
            Err(LifeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn new_seeds_and_draws() {
        let life = GameOfLife::new(FrameBuffer::new(9, 9), quiet_config(Pattern::Blinker)).unwrap();
        assert_eq!(life.alive_count(), 3);
        assert_eq!(life.generation(), 0);

        let fb = life.renderer();
        assert_eq!(fb.presented(), 1);
        let lit = fb.pixels().iter().filter(|&&c| c == life.active_color()).count();
        assert_eq!(lit, 3);
        assert_eq!(fb.pixel(4, 4), life.active_color());
        assert_eq!(fb.pixel(0, 0), Color::BLACK);
    }

    #[test]
    fn random_seed_is_reproducible() {
        let a = GameOfLife::new(FrameBuffer::new(16, 16), quiet_config(Pattern::Random)).unwrap();
        let b = GameOfLife::new(FrameBuffer::new(16, 16), quiet_config(Pattern::Random)).unwrap();
        assert_eq!(a.grid().alive_cells(), b.grid().alive_cells());
        assert_eq!(a.active_color(), b.active_color());
        assert_eq!(a.alive_count(), a.grid().count_alive());
    }

    #[test]
    fn density_zero_and_hundred() {
        let mut config = quiet_config(Pattern::Random);
        config.density_percent = 0;
        let empty = GameOfLife::new(FrameBuffer::new(8, 8), config.clone()).unwrap();
        assert_eq!(empty.alive_count(), 0);

        config.density_percent = 100;
        let full = GameOfLife::new(FrameBuffer::new(8, 8), config).unwrap();
        assert_eq!(full.alive_count(), 64);
    }

    #[test]
    fn explicit_cells_wrap_onto_grid() {
        let life = GameOfLife::new(
            FrameBuffer::new(5, 5),
            quiet_config(Seed::Cells(vec![(6, 1), (0, 7)])),
        )
        .unwrap();
        assert_eq!(life.grid().alive_cells(), vec![(1, 1), (0, 2)]);
    }

    // ── Rendering ──────────────────────────────────────────────────

    #[test]
    fn without_fade_one_frame_per_generation() {
        let mut life = GameOfLife::new(FrameBuffer::new(9, 9), quiet_config(Pattern::Blinker)).unwrap();
        life.run_cycle();
        assert_eq!(life.renderer().presented(), 2);
        // Vertical blinker now.
        let active = life.active_color();
        assert_eq!(life.renderer().pixel(4, 3), active);
        assert_eq!(life.renderer().pixel(3, 4), Color::BLACK);
    }

    #[test]
    fn fade_renders_each_step_and_lands_on_final_colors() {
        let mut config = quiet_config(Pattern::Blinker);
        config.fade_steps = 4;
        let mut life = GameOfLife::new(FrameBuffer::new(9, 9), config).unwrap();

        let outcome = life.run_cycle();
        assert_eq!(outcome, CycleOutcome::Stepped { births: 2, deaths: 2 });
        assert_eq!(life.renderer().presented(), 1 + 4);

        let active = life.active_color();
        let fb = life.renderer();
        assert_eq!(fb.pixel(4, 3), active);
        assert_eq!(fb.pixel(4, 5), active);
        assert_eq!(fb.pixel(3, 4), Color::BLACK);
        assert_eq!(fb.pixel(5, 4), Color::BLACK);
        assert_eq!(fb.pixel(4, 4), active);
    }

    #[test]
    fn long_fades_avoid_red_and_green() {
        for seed in 0..200 {
            let mut config = quiet_config(Pattern::Block);
            config.fade_steps = 8;
            config.rng_seed = Some(seed);
            let life = GameOfLife::new(FrameBuffer::new(6, 6), config).unwrap();
            assert!(!life.active_color().is_near_red_or_green());
        }
    }

    #[rstest]
    #[case(10, 20, 10)]
    #[case(100, 20, 50)]
    #[case(50, 20, 50)]
    #[case(300, 0, 300)]
    #[case(u64::MAX, 20, 50)]
    #[case(u64::MAX, 0, 1000)]
    fn test_fade_delay(#[case] delay_ms: u64, #[case] fade_steps: u8, #[case] expected_ms: u64) {
        let config = LifeConfig {
            delay_ms,
            fade_steps,
            ..LifeConfig::default()
        };
        assert_eq!(config.fade_delay(), Duration::from_millis(expected_ms));
    }

    // ── Stats ──────────────────────────────────────────────────────

    #[test]
    fn stats_track_resets() {
        let mut life = GameOfLife::new(
            FrameBuffer::new(8, 8),
            quiet_config(Seed::Cells(vec![(3, 3)])),
        )
        .unwrap();
        assert_eq!(life.stats(), LifeStats {
            alive: 1,
            ..LifeStats::default()
        });

        life.run_cycle();
        assert_eq!(life.run_cycle(), CycleOutcome::Reset(TerminationCause::AllDied));

        let stats = life.stats();
        assert_eq!(stats.resets, 1);
        assert_eq!(stats.last_cause.as_deref(), Some("all died"));
        assert_eq!(stats.min_generations, Some(1));
        assert_eq!(stats.max_generations, Some(1));
    }

    #[test]
    fn reseed_switches_pattern() {
        let mut life = GameOfLife::new(FrameBuffer::new(8, 8), quiet_config(Pattern::Block)).unwrap();
        life.run_cycle();
        life.reseed(Pattern::Glider.into());
        assert_eq!(life.alive_count(), 5);
        assert_eq!(life.generation(), 0);
        assert_eq!(life.config().seed, Seed::Pattern(Pattern::Glider));
        assert_eq!(life.stats().resets, 0);
    }

    // ── Classification ─────────────────────────────────────────────

    #[test]
    fn classify_priority_order() {
        let t = Thresholds::default();
        let d = RepeatDetector::new(48, 24);
        let all = Streaks {
            static_generations: 6,
            repeat2: 7,
            repeat3: 36,
        };
        assert_eq!(classify(0, 8, &all, &d, &t), Some(TerminationCause::AllDied));
        assert_eq!(classify(4, 8, &all, &d, &t), Some(TerminationCause::StaticPattern));

        let no_static = Streaks {
            static_generations: 5,
            ..all
        };
        assert_eq!(classify(4, 8, &no_static, &d, &t), Some(TerminationCause::Repeat2));

        let only3 = Streaks {
            static_generations: 0,
            repeat2: 6,
            repeat3: 36,
        };
        assert_eq!(classify(4, 8, &only3, &d, &t), Some(TerminationCause::Repeat3));
        assert_eq!(classify(4, 8, &Streaks::default(), &d, &t), None);
    }

    #[test]
    fn classify_population_static() {
        let mut d = RepeatDetector::new(48, 24);
        record_cycle(&mut d, &[7], 100);
        assert_eq!(
            classify(7, 8, &Streaks::default(), &d, &Thresholds::default()),
            Some(TerminationCause::PopulationStatic { generations: 80 })
        );
    }

    #[test]
    fn classify_glider_only_at_glider_population() {
        let mut d = RepeatDetector::new(48, 24);
        record_cycle(&mut d, &[5], 40);
        let t = Thresholds::default();
        assert_eq!(
            classify(5, 8, &Streaks::default(), &d, &t),
            Some(TerminationCause::GliderPopulation { generations: 32 })
        );
        assert_eq!(classify(6, 8, &Streaks::default(), &d, &t), None);
    }

    #[test]
    fn classify_period4_cycle() {
        let mut d = RepeatDetector::new(48, 24);
        record_cycle(&mut d, &[5, 6, 7, 8], 48 + 25);
        assert_eq!(
            classify(8, 8, &Streaks::default(), &d, &Thresholds::default()),
            Some(TerminationCause::Period4Cycle { generations: 24 })
        );
    }

    #[test]
    fn classify_long_cycle() {
        let mut d = RepeatDetector::new(48, 24);
        record_cycle(&mut d, &[1, 2, 3, 4, 5, 6], 48 + 149);
        let t = Thresholds::default();
        assert_eq!(classify(6, 64, &Streaks::default(), &d, &t), None);

        // Next value in the cycle.
        d.record(6);
        assert_eq!(
            classify(6, 64, &Streaks::default(), &d, &t),
            Some(TerminationCause::LongCycle {
                period: 6,
                repeats: 151
            })
        );
    }

    #[rstest]
    #[case(TerminationCause::AllDied, "all died")]
    #[case(TerminationCause::StaticPattern, "static pattern")]
    #[case(TerminationCause::Repeat2, "2-cycle repeat")]
    #[case(TerminationCause::Repeat3, "3-cycle repeat")]
    #[case(TerminationCause::LongCycle { period: 9, repeats: 151 }, "population on 9-step cycle for 151 repeats")]
    fn test_cause_display(#[case] cause: TerminationCause, #[case] expected: &str) {
        assert_eq!(cause.to_string(), expected);
    }
}
