use crate::display::FrameBuffer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Registers {
    pub pc: u16,
    pub i: u16,
    pub v: [u8; 16],
    pub dt: u8,
    pub st: u8,
}

/// Owned copy of the whole machine state after a cycle. Mutating it has no
/// effect on the machine it was taken from.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub registers: Registers,
    pub stack: [u16; 16],
    pub sp: usize,
    pub memory: Vec<u8>,
    pub keys: [bool; 16],
    pub frame: FrameBuffer,
}
