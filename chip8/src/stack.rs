use std::fmt;

pub const STACK_DEPTH: usize = 16;

/// Return address stack. `sp` is the number of occupied frames.
pub struct Stack {
    sp: usize,
    frames: [u16; STACK_DEPTH],
}

impl Stack {
    pub fn new() -> Stack {
        Stack {
            sp: 0,
            frames: [0; STACK_DEPTH],
        }
    }

    pub fn reset(&mut self) {
        *self = Stack::new();
    }

    pub fn is_full(&self) -> bool {
        self.sp == STACK_DEPTH
    }

    pub fn pop(&mut self) -> Option<u16> {
        if self.sp == 0 {
            return None;
        }
        self.sp -= 1;
        Some(self.frames[self.sp])
    }

    /// Callers must check `is_full` first.
    pub fn push(&mut self, value: u16) {
        if self.is_full() {
            panic!("stackoverflow! stack: {:?}", self.frames);
        }

        self.frames[self.sp] = value;
        self.sp += 1;
    }

    pub fn sp(&self) -> usize {
        self.sp
    }

    pub fn frames(&self) -> [u16; STACK_DEPTH] {
        self.frames
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let frames: Vec<_> = self.frames[..self.sp]
            .iter()
            .map(|frame| format!("{:03x}", frame))
            .collect();
        f.debug_struct("Stack")
            .field("sp", &self.sp)
            .field("frames", &frames)
            .finish()
    }
}
