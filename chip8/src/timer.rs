/// 8-bit countdown register, saturating at zero.
pub struct Timer {
    left: u8,
}

impl Timer {
    pub fn new() -> Timer {
        Timer { left: 0 }
    }

    pub fn step(&mut self, ticks: u8) {
        self.left = self.left.saturating_sub(ticks);
    }

    pub fn get(&self) -> u8 {
        self.left
    }

    pub fn set(&mut self, ticks: u8) {
        self.left = ticks
    }
}
