//! The pixel-grid seam between animations and display hardware.
//!
//! Animations only ever talk to a `Renderer`. The LED matrix, the
//! in-memory `FrameBuffer` used for tests and HTTP snapshots, and any
//! future display all plug in behind the same trait.
//!
//! ## Rust concepts
//! - Traits with provided (default) methods
//! - `rem_euclid` for wrap-around arithmetic on signed values
//! - `AsRef` to expose an inner buffer without committing to a type

use crate::{Color, LifeError, blend_channel};
use image::{ImageBuffer, ImageFormat, Rgb, RgbImage};
use rand::RngCore;
use std::io::Cursor;

/// Add `delta` to `pos`, wrapping into `[0, dimension)`.
pub fn wrap_coordinate(pos: usize, delta: isize, dimension: usize) -> usize {
    (pos as isize + delta).rem_euclid(dimension as isize) as usize
}

/// Add `delta` to `pos`, pinning the result to the nearest edge.
pub fn clamp_coordinate(pos: usize, delta: isize, dimension: usize) -> usize {
    (pos as isize + delta).clamp(0, dimension as isize - 1) as usize
}

/// A rectangular grid of RGB pixels that an animation can draw on.
///
/// Only the dimensions and `set_pixel` are required. Everything else has a
/// default that works for any display.
///
/// # Rust concept: object safety
/// No method is generic, so `dyn Renderer` works when a caller needs to
/// pick the display at runtime.
pub trait Renderer {
    fn width(&self) -> usize;

    fn height(&self) -> usize;

    /// Write a single pixel.
    ///
    /// Coordinates outside the grid are a caller bug; implementations
    /// are free to panic.
    fn set_pixel(&mut self, x: usize, y: usize, color: Color);

    /// Mark the end of a frame. Double-buffered displays swap here.
    fn present(&mut self) {}

    /// Brightest value a channel can take on this display.
    fn max_brightness(&self) -> u8 {
        u8::MAX
    }

    /// Set output brightness (0-100). Displays without dimming ignore it.
    fn set_brightness(&mut self, _percent: u8) {}

    fn wrap_x(&self, x: usize, delta: isize) -> usize {
        wrap_coordinate(x, delta, self.width())
    }

    fn wrap_y(&self, y: usize, delta: isize) -> usize {
        wrap_coordinate(y, delta, self.height())
    }

    fn clamp_x(&self, x: usize, delta: isize) -> usize {
        clamp_coordinate(x, delta, self.width())
    }

    fn clamp_y(&self, y: usize, delta: isize) -> usize {
        clamp_coordinate(y, delta, self.height())
    }

    /// A saturated color that is never lost against the background.
    fn random_vivid_color(&self, rng: &mut dyn RngCore) -> Color {
        Color::random_vivid(rng)
    }

    /// Interpolate one channel for fade frames, capped at this display's
    /// maximum brightness.
    fn blend(&self, from: u8, to: u8, step: u32, total_steps: u32) -> u8 {
        blend_channel(from, to, step, total_steps).min(self.max_brightness())
    }
}

// ── FrameBuffer ──────────────────────────────────────────────────────

/// An in-memory renderer backed by a flat `Vec<Color>`.
///
/// Pixels are stored row-major (`y * width + x`), the same layout as a raw
/// RGB frame on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
    presented: u64,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; width * height],
            presented: 0,
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Color {
        self.pixels[self.index(x, y)]
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Number of frames completed with `present()` so far.
    pub fn presented(&self) -> u64 {
        self.presented
    }

    pub fn clear(&mut self) {
        self.pixels.fill(Color::BLACK);
    }

    /// Raw RGB24 bytes, `width * height * 3` long.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| c.to_array()).collect()
    }

    pub fn to_image(&self) -> RgbImage {
        ImageBuffer::from_fn(self.width as u32, self.height as u32, |x, y| {
            Rgb(self.pixel(x as usize, y as usize).to_array())
        })
    }

    /// Encode the current frame as a PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>, LifeError> {
        let mut out = Cursor::new(Vec::new());
        self.to_image().write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }

    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x},{y}) outside {}x{} frame",
            self.width,
            self.height
        );
        y * self.width + x
    }
}

impl Renderer for FrameBuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    fn present(&mut self) {
        self.presented += 1;
    }
}

impl AsRef<FrameBuffer> for FrameBuffer {
    fn as_ref(&self) -> &FrameBuffer {
        self
    }
}
