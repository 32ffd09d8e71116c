use chip8::display::FrameBuffer;
use chip8::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

#[derive(Clone, Copy)]
enum PixelState {
    On,
    Decaying { age: f32 },
    Off,
}

impl PixelState {
    fn step(self, on: bool, delta_age: f32) -> PixelState {
        use self::PixelState::*;
        match (on, self) {
            (true, _) => On,
            (false, Off) => Off,
            (false, Decaying { age }) if age >= 1.0 => Off,
            (false, Decaying { age }) => Decaying { age: age + delta_age },
            (false, On) => Decaying { age: 0.0 },
        }
    }
}

/// Screen contents as drawn, with pixels that were switched off fading out
/// over `pixel_decay_time` seconds instead of vanishing at once.
pub struct RenderBuf {
    pixel_decay_time: f32,
    state: [PixelState; DISPLAY_WIDTH * DISPLAY_HEIGHT],
    pixel_intensity: [f32; DISPLAY_WIDTH * DISPLAY_HEIGHT],
}

impl RenderBuf {
    pub fn new(pixel_decay_time: f32) -> RenderBuf {
        RenderBuf {
            pixel_decay_time,
            state: [PixelState::Off; DISPLAY_WIDTH * DISPLAY_HEIGHT],
            pixel_intensity: [0.0; DISPLAY_WIDTH * DISPLAY_HEIGHT],
        }
    }

    /// Advances pixel ages by `dt` seconds towards `frame`.
    pub fn update(&mut self, frame: &FrameBuffer, dt: f32) {
        use self::PixelState::*;

        // delta time represented in pixel age.
        let delta_age = if self.pixel_decay_time > 0.0 {
            dt / self.pixel_decay_time
        } else {
            1.0
        };

        for y in 0..DISPLAY_HEIGHT {
            for x in 0..DISPLAY_WIDTH {
                let index = y * DISPLAY_WIDTH + x;
                let on = frame.get(x, y) != 0;
                let new_state = self.state[index].step(on, delta_age);

                self.state[index] = new_state;
                self.pixel_intensity[index] = match new_state {
                    Off => 0.0,
                    On => 1.0,
                    Decaying { age } => Self::pixel_intensity_for_age(age),
                };
            }
        }
    }

    fn pixel_intensity_for_age(age: f32) -> f32 {
        let c = -2f32.powf((age - 1.0) * 5.0) + 1.0;

        // clamp
        f32::min(f32::max(0.0, c), 1.0)
    }

    pub fn get_intensity(&self, x: usize, y: usize) -> f32 {
        self.pixel_intensity[y * DISPLAY_WIDTH + x]
    }
}
