//! # Error Types
//!
//! The simulation itself has no failure modes: stagnation is handled by
//! reseeding, not by returning errors. What can fail is setup (bad grid
//! dimensions or tuning values), the hardware, the HTTP socket, and PNG
//! encoding.

use thiserror::Error;

/// Main error type for led-life operations
#[derive(Debug, Error)]
pub enum LifeError {
    /// The toroidal neighbour math needs at least a 3x3 grid
    #[error("Grid too small: {width}x{height} (minimum is 3x3)")]
    GridTooSmall { width: usize, height: usize },

    /// A configuration value is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// LED matrix initialization failed
    #[error("Matrix error: {0}")]
    Matrix(String),

    /// Binding or serving the HTTP socket failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding a frame snapshot failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
