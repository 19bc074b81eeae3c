//! Birth and death fade colors.
//!
//! A birth fades black → green → the active color. A death fades
//! active color → red → black. Each leg takes half of the fade steps.

use crate::Color;
use crate::renderer::Renderer;

/// Colors to paint pending births and deaths on one fade frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FadeFrame {
    pub birth: Color,
    pub death: Color,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FadePalette {
    active: Color,
    steps: u32,
}

impl FadePalette {
    pub fn new(active: Color, steps: u32) -> Self {
        Self { active, steps }
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Colors for fade `step` in `0..=steps`.
    ///
    /// Step 0 is the frame before any change (births black, deaths still
    /// active). Step `steps` is the final frame (births active, deaths
    /// black).
    pub fn frame<R: Renderer + ?Sized>(&self, renderer: &R, step: u32) -> FadeFrame {
        let max = renderer.max_brightness();
        let a = self.active;
        let half = (self.steps / 2).max(1);
        let step = step.min(self.steps);

        if step <= half {
            FadeFrame {
                birth: Color::new(0, renderer.blend(0, max, step, half), 0),
                death: Color::new(
                    renderer.blend(a.r, max, step, half),
                    renderer.blend(a.g, 0, step, half),
                    renderer.blend(a.b, 0, step, half),
                ),
            }
        } else {
            let step = step - half;
            let span = self.steps - half;
            FadeFrame {
                birth: Color::new(
                    renderer.blend(0, a.r, step, span),
                    renderer.blend(max, a.g, step, span),
                    renderer.blend(0, a.b, step, span),
                ),
                death: Color::new(renderer.blend(max, 0, step, span), 0, 0),
            }
        }
    }
}
