//! Monochrome 64x32 frame buffer.

use std::fmt;

use crate::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// Row-major 1-bit pixel grid, cell `x + y * 64`.
///
/// Sprites are XOR-composited and wrap around both edges of the screen.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: [u8; DISPLAY_WIDTH * DISPLAY_HEIGHT],
}

impl FrameBuffer {
    pub fn new() -> FrameBuffer {
        FrameBuffer {
            pixels: [0; DISPLAY_WIDTH * DISPLAY_HEIGHT],
        }
    }

    pub fn clear(&mut self) {
        for pixel in self.pixels.iter_mut() {
            *pixel = 0;
        }
    }

    /// XORs the bits of `sprite_row`, most significant first, onto the eight
    /// pixels starting at `(x, y)`. Returns true if any lit pixel was turned
    /// off.
    pub fn draw_sprite(&mut self, x: usize, y: usize, sprite_row: u8) -> bool {
        let mut collision_bit = false;
        let dy = y % DISPLAY_HEIGHT;

        for sx in 0..8 {
            let bit_mask = 0b1000_0000 >> sx;
            if (sprite_row & bit_mask) != 0 {
                let dx = (x + sx) % DISPLAY_WIDTH;
                let index = dy * DISPLAY_WIDTH + dx;

                if self.pixels[index] == 1 {
                    collision_bit = true;
                }
                self.pixels[index] ^= 1;
            }
        }

        collision_bit
    }

    /// Draws a sprite of `sprite.len()` rows, one row per byte, reporting a
    /// collision on any of them.
    pub fn draw(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let mut collision_bit = false;
        for (sy, &row) in sprite.iter().enumerate() {
            collision_bit |= self.draw_sprite(x, y + sy, row);
        }
        collision_bit
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * DISPLAY_WIDTH + x]
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels[..]
    }
}

impl Default for FrameBuffer {
    fn default() -> FrameBuffer {
        FrameBuffer::new()
    }
}

impl fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.pixels.chunks(DISPLAY_WIDTH) {
            for &pixel in row {
                write!(f, "{}", if pixel == 1 { '#' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
