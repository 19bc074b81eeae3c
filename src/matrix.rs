//! `Renderer` for a physical RGB LED panel driven by `rpi-led-matrix`.
//!
//! The engine only redraws pixels that changed, but the hardware is
//! double-buffered: the canvas handed back by `swap` holds a frame from
//! two swaps ago. So pixels are kept in a `FrameBuffer` and the whole
//! buffer is copied to the canvas on every `present`.

use crate::renderer::{FrameBuffer, Renderer};
use crate::{Color, LifeError, PanelConfig, create_matrix};
use rpi_led_matrix::{LedCanvas, LedMatrix};

pub struct MatrixRenderer {
    matrix: LedMatrix,
    /// `None` only for the instant between handing a canvas to `swap`
    /// and getting the other one back.
    canvas: Option<LedCanvas>,
    buffer: FrameBuffer,
    brightness: u8,
}

impl MatrixRenderer {
    pub fn new(panel: PanelConfig, brightness: u8) -> Result<Self, LifeError> {
        let matrix = create_matrix(panel)?;
        let canvas = matrix.offscreen_canvas();
        tracing::info!(rows = panel.rows, cols = panel.cols, "LED matrix initialized");
        Ok(Self {
            matrix,
            canvas: Some(canvas),
            buffer: FrameBuffer::new(panel.cols as usize, panel.rows as usize),
            brightness: brightness.min(100),
        })
    }
}

impl Renderer for MatrixRenderer {
    fn width(&self) -> usize {
        self.buffer.width()
    }

    fn height(&self) -> usize {
        self.buffer.height()
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        self.buffer.set_pixel(x, y, color);
    }

    fn present(&mut self) {
        let Some(mut canvas) = self.canvas.take() else {
            return;
        };
        let width = self.buffer.width();
        for (i, &pixel) in self.buffer.pixels().iter().enumerate() {
            let c = pixel.apply_brightness(self.brightness);
            canvas.set((i % width) as i32, (i / width) as i32, &c.into());
        }
        self.canvas = Some(self.matrix.swap(canvas));
        self.buffer.present();
    }

    fn set_brightness(&mut self, percent: u8) {
        self.brightness = percent.min(100);
    }
}

impl AsRef<FrameBuffer> for MatrixRenderer {
    fn as_ref(&self) -> &FrameBuffer {
        &self.buffer
    }
}
