pub const KEY_COUNT: usize = 16;

/// Hexadecimal keypad.
///
/// Keeps the continuous pressed/released latch read by `SKP`/`SKNP`, and
/// separately the next discrete key-down event requested by `LD Vx, K`.
#[derive(Debug)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
    waiting: bool,
    next_press: Option<u8>,
}

impl Keypad {
    pub fn new() -> Keypad {
        Keypad {
            keys: [false; KEY_COUNT],
            waiting: false,
            next_press: None,
        }
    }

    pub fn reset(&mut self) {
        *self = Keypad::new();
    }

    pub fn press(&mut self, key: u8) {
        if !Self::is_valid(key) {
            warn!("ignoring press of unknown key {:#x}", key);
            return;
        }

        self.keys[key as usize] = true;
        if self.waiting && self.next_press.is_none() {
            self.next_press = Some(key);
        }
    }

    pub fn release(&mut self, key: u8) {
        if !Self::is_valid(key) {
            warn!("ignoring release of unknown key {:#x}", key);
            return;
        }

        self.keys[key as usize] = false;
    }

    /// Keys outside the keypad read as released.
    pub fn is_pressed(&self, key: u8) -> bool {
        Self::is_valid(key) && self.keys[key as usize]
    }

    /// Starts listening for the next key-down. Keys already held do not
    /// count.
    pub fn begin_wait(&mut self) {
        self.waiting = true;
        self.next_press = None;
    }

    /// Resolves a pending wait with the key pressed since `begin_wait`, if
    /// any. Each press resolves at most one wait.
    pub fn take_press(&mut self) -> Option<u8> {
        let key = self.next_press.take()?;
        self.waiting = false;
        Some(key)
    }

    pub fn keys(&self) -> [bool; KEY_COUNT] {
        self.keys
    }

    fn is_valid(key: u8) -> bool {
        (key as usize) < KEY_COUNT
    }
}
