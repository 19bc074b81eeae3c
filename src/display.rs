//! The display the binary draws on: the LED panel when available, an
//! in-memory frame buffer otherwise.
//!
//! # Rust concept: enums instead of trait objects
//! `run_simulation` needs one concrete `Renderer + AsRef<FrameBuffer>`
//! type. An enum with a `#[cfg]`-gated variant gives it that without boxing,
//! and builds without the `hardware` feature.

use crate::renderer::{FrameBuffer, Renderer};
use crate::{Color, LifeError, PanelConfig};

#[cfg(feature = "hardware")]
use crate::matrix::MatrixRenderer;

pub enum Display {
    Memory(FrameBuffer),
    #[cfg(feature = "hardware")]
    Matrix(MatrixRenderer),
}

impl Display {
    /// Open the LED panel, or a frame buffer of the same size when
    /// `virtual_display` is set or the crate was built without hardware.
    pub fn open(panel: PanelConfig, virtual_display: bool) -> Result<Self, LifeError> {
        if !virtual_display {
            if let Some(display) = open_matrix(panel)? {
                return Ok(display);
            }
        }
        tracing::info!(rows = panel.rows, cols = panel.cols, "Rendering to memory only");
        Ok(Display::Memory(FrameBuffer::new(panel.cols as usize, panel.rows as usize)))
    }
}

#[cfg(feature = "hardware")]
fn open_matrix(panel: PanelConfig) -> Result<Option<Display>, LifeError> {
    MatrixRenderer::new(panel, crate::sim::DEFAULT_BRIGHTNESS).map(|m| Some(Display::Matrix(m)))
}

#[cfg(not(feature = "hardware"))]
fn open_matrix(_panel: PanelConfig) -> Result<Option<Display>, LifeError> {
    tracing::warn!("Built without the 'hardware' feature, no LED matrix available");
    Ok(None)
}

impl Renderer for Display {
    fn width(&self) -> usize {
        match self {
            Display::Memory(fb) => fb.width(),
            #[cfg(feature = "hardware")]
            Display::Matrix(m) => m.width(),
        }
    }

    fn height(&self) -> usize {
        match self {
            Display::Memory(fb) => fb.height(),
            #[cfg(feature = "hardware")]
            Display::Matrix(m) => m.height(),
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        match self {
            Display::Memory(fb) => fb.set_pixel(x, y, color),
            #[cfg(feature = "hardware")]
            Display::Matrix(m) => m.set_pixel(x, y, color),
        }
    }

    fn present(&mut self) {
        match self {
            Display::Memory(fb) => fb.present(),
            #[cfg(feature = "hardware")]
            Display::Matrix(m) => m.present(),
        }
    }

    fn max_brightness(&self) -> u8 {
        match self {
            Display::Memory(fb) => fb.max_brightness(),
            #[cfg(feature = "hardware")]
            Display::Matrix(m) => m.max_brightness(),
        }
    }

    fn set_brightness(&mut self, percent: u8) {
        match self {
            Display::Memory(fb) => fb.set_brightness(percent),
            #[cfg(feature = "hardware")]
            Display::Matrix(m) => m.set_brightness(percent),
        }
    }
}

impl AsRef<FrameBuffer> for Display {
    fn as_ref(&self) -> &FrameBuffer {
        match self {
            Display::Memory(fb) => fb,
            #[cfg(feature = "hardware")]
            Display::Matrix(m) => m.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn virtual_display_is_a_frame_buffer() {
        let mut display = Display::open(PanelConfig::new(16, 32), true).unwrap();
        assert_eq!((display.width(), display.height()), (32, 16));

        display.set_pixel(31, 15, Color::new(9, 8, 7));
        display.present();

        let fb: &FrameBuffer = display.as_ref();
        assert_eq!(fb.pixel(31, 15), Color::new(9, 8, 7));
        assert_eq!(fb.presented(), 1);
    }
}
