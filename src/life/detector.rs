//! Stagnation tracking: the counters the engine uses to decide when a
//! simulation has stopped being interesting.
//!
//! Two kinds of evidence are collected:
//! - Whole-grid comparisons (no change at all, or identical to the grid
//!   two or three generations back), kept in `Streaks`
//! - Population-size history, searched for periodic cycles by
//!   `RepeatDetector`. This catches oscillators too large or slow for the
//!   per-cell history to see.

use super::grid::ApplySummary;

/// Smallest cycle length the population search considers.
pub const MIN_PERIOD: usize = 4;

// ── Population history ───────────────────────────────────────────────

/// Fixed-capacity ring buffer of population samples, one per generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PopulationHistory {
    samples: Vec<usize>,
    cursor: usize,
}

impl PopulationHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: vec![0; capacity],
            cursor: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    pub fn push(&mut self, population: usize) {
        self.cursor = (self.cursor + 1) % self.samples.len();
        self.samples[self.cursor] = population;
    }

    /// The most recent sample.
    pub fn latest(&self) -> usize {
        self.samples[self.cursor]
    }

    /// The sample recorded `age` generations ago (0 is the latest).
    /// Unfilled slots read as 0.
    pub fn sample(&self, age: usize) -> usize {
        let cap = self.samples.len();
        self.samples[(self.cursor + cap - age % cap) % cap]
    }

    pub fn is_empty(&self) -> bool {
        self.samples.iter().all(|&s| s == 0)
    }

    pub fn clear(&mut self) {
        self.samples.fill(0);
        self.cursor = 0;
    }
}

// ── Whole-grid streaks ───────────────────────────────────────────────

/// Consecutive-generation counters driven by full-grid comparisons.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Streaks {
    /// Generations in a row with no births or deaths.
    pub static_generations: u32,
    /// Generations in a row identical to the grid two generations back.
    pub repeat2: u32,
    /// Generations in a row identical to the grid three generations back.
    pub repeat3: u32,
}

impl Streaks {
    pub fn update(&mut self, summary: &ApplySummary) {
        self.static_generations = bump_or_reset(self.static_generations, summary.changes() == 0);
        self.repeat2 = bump_or_reset(self.repeat2, summary.matches_two_back);
        self.repeat3 = bump_or_reset(self.repeat3, summary.matches_three_back);
    }
}

fn bump_or_reset(count: u32, hit: bool) -> u32 {
    if hit { count + 1 } else { 0 }
}

// ── Population cycle search ──────────────────────────────────────────

/// Watches the population history for runs of unchanged size and for
/// periodic cycles of length `MIN_PERIOD..=max_period`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepeatDetector {
    history: PopulationHistory,
    max_period: usize,
    unchanged_population: u32,
    /// Streak per period, indexed by the period itself.
    cycle_repeats: Vec<u32>,
}

impl RepeatDetector {
    pub fn new(history_len: usize, max_period: usize) -> Self {
        Self {
            history: PopulationHistory::new(history_len),
            max_period,
            unchanged_population: 0,
            cycle_repeats: vec![0; max_period + 1],
        }
    }

    pub fn history(&self) -> &PopulationHistory {
        &self.history
    }

    /// Generations in a row where the population matched the previous one.
    pub fn unchanged_population(&self) -> u32 {
        self.unchanged_population
    }

    /// Current streak for a cycle of length `period`.
    pub fn cycle_repeats(&self, period: usize) -> u32 {
        self.cycle_repeats.get(period).copied().unwrap_or(0)
    }

    /// Record this generation's population and update every counter.
    pub fn record(&mut self, population: usize) {
        let previous = self.history.latest();
        self.history.push(population);
        self.unchanged_population = bump_or_reset(self.unchanged_population, previous == population);

        match self.find_period() {
            Some(period) => {
                let streak = self.cycle_repeats[period] + 1;
                self.cycle_repeats.fill(0);
                self.cycle_repeats[period] = streak;
            }
            None => self.cycle_repeats.fill(0),
        }
    }

    /// The shortest period the recent population history repeats with.
    ///
    /// Periods are tried in ascending order and the first one confirmed
    /// across the whole history wins, so a constant population reports
    /// `MIN_PERIOD` rather than every multiple of it.
    pub fn find_period(&self) -> Option<usize> {
        (MIN_PERIOD..=self.max_period).find(|&period| self.period_holds(period))
    }

    /// Check every window of `period` samples against the most recent
    /// window, walking backwards through the history.
    ///
    /// A sample only counts if it is nonzero, so an unfilled history or a
    /// dead grid never confirms a cycle. At least two windows must fit.
    fn period_holds(&self, period: usize) -> bool {
        let windows = self.history.capacity() / period;
        if windows < 2 {
            return false;
        }

        for window in 1..windows {
            for offset in 0..period {
                let older = self.history.sample(offset + period * window);
                if older == 0 || older != self.history.sample(offset) {
                    return false;
                }
            }
        }

        true
    }

    /// The longest-running cycle streak among periods `min_period` and up.
    ///
    /// Returns `(period, streak)`; on a tie the shorter period wins.
    pub fn longest_cycle(&self, min_period: usize) -> Option<(usize, u32)> {
        let mut best: Option<(usize, u32)> = None;
        for period in min_period.max(MIN_PERIOD)..=self.max_period {
            let streak = self.cycle_repeats[period];
            if streak > best.map_or(0, |(_, s)| s) {
                best = Some((period, streak));
            }
        }
        best
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.unchanged_population = 0;
        self.cycle_repeats.fill(0);
    }
}
