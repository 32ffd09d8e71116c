use std::fmt;
use std::ops::{Index, IndexMut};

use crate::instruction::Reg;

/// General purpose registers V0..VF.
pub struct RegFile {
    gpr: [u8; 16],
}

impl RegFile {
    pub fn new() -> RegFile {
        RegFile { gpr: [0; 16] }
    }

    /// Registers V0 through `last`, inclusive.
    pub fn up_to(&self, last: Reg) -> &[u8] {
        &self.gpr[..=last.index() as usize]
    }

    pub fn up_to_mut(&mut self, last: Reg) -> &mut [u8] {
        &mut self.gpr[..=last.index() as usize]
    }

    pub fn values(&self) -> [u8; 16] {
        self.gpr
    }

    /// Sets VF to 1 if `flag` holds, otherwise to 0.
    pub fn set_flag(&mut self, flag: bool) {
        self[Reg::Vf] = flag as u8;
    }
}

impl Index<Reg> for RegFile {
    type Output = u8;

    fn index(&self, index: Reg) -> &u8 {
        &self.gpr[index.index() as usize]
    }
}

impl IndexMut<Reg> for RegFile {
    fn index_mut(&mut self, index: Reg) -> &mut u8 {
        &mut self.gpr[index.index() as usize]
    }
}

impl fmt::Debug for RegFile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, value) in self.gpr.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "V{:X}={:02x}", i, value)?;
        }
        Ok(())
    }
}
