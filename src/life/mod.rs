//! Conway's Game of Life on a toroidal grid, with automatic reseeding.
//!
//! - `grid`: cell storage, rule evaluation, and per-cell history
//! - `detector`: streak counters and the population-cycle search
//! - `fade`: birth/death color transitions
//! - `patterns`: named starting patterns
//! - `engine`: ties it all together and drives a `Renderer`

pub mod detector;
pub mod engine;
pub mod fade;
pub mod grid;
pub mod patterns;

pub use engine::{
    CycleOutcome, GameOfLife, LifeConfig, LifeStats, TerminationCause, Thresholds, classify,
};
pub use grid::{Cell, Grid, Transition};
pub use patterns::{Pattern, Seed};
