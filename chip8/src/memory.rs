use std::fmt;

use byteorder::{BigEndian, ByteOrder};

use crate::{ErrorKind, Result, MEMORY_SIZE, PROGRAM_START};

/// Address of the first glyph of the built-in font.
pub const FONT_MEMORY_OFFSET: u16 = 0;
/// Size in bytes of a single font glyph.
pub const GLYPH_SIZE: u16 = 5;

pub struct Memory {
    bytes: Box<[u8; MEMORY_SIZE]>,
}

impl Memory {
    pub fn new() -> Memory {
        let mut memory = Memory {
            bytes: Box::new([0; MEMORY_SIZE]),
        };
        memory.load_font();
        memory
    }

    fn load_font(&mut self) {
        let offset = FONT_MEMORY_OFFSET as usize;
        let font_memory = &mut self.bytes[offset..offset + FONT_SPRITES.len()];
        font_memory.copy_from_slice(&FONT_SPRITES);
    }

    /// Places `program` at `PROGRAM_START`, zeroing whatever a previous
    /// program left behind.
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        let program_area = &mut self.bytes[PROGRAM_START as usize..];
        if program.len() > program_area.len() {
            bail!(ErrorKind::RomTooLarge(program.len()));
        }

        for byte in program_area.iter_mut() {
            *byte = 0;
        }
        program_area[..program.len()].copy_from_slice(program);
        Ok(())
    }

    pub fn read(&self, addr: usize) -> Result<u8> {
        match self.bytes.get(addr) {
            Some(&byte) => Ok(byte),
            None => bail!(ErrorKind::AddressOutOfRange(addr)),
        }
    }

    /// Program code may only write the area above the reserved interpreter
    /// region.
    pub fn write(&mut self, addr: usize, value: u8) -> Result<()> {
        if addr < PROGRAM_START as usize {
            bail!(ErrorKind::ProtectedWrite(addr));
        }
        match self.bytes.get_mut(addr) {
            Some(byte) => {
                *byte = value;
                Ok(())
            }
            None => bail!(ErrorKind::AddressOutOfRange(addr)),
        }
    }

    /// Returns `len` consecutive bytes starting at `addr`.
    pub fn slice(&self, addr: usize, len: usize) -> Result<&[u8]> {
        let end = addr + len;
        if end > MEMORY_SIZE {
            bail!(ErrorKind::AddressOutOfRange(end - 1));
        }
        Ok(&self.bytes[addr..end])
    }

    pub fn fetch_opcode(&self, pc: u16) -> Result<u16> {
        let word = self.slice(pc as usize, 2)?;
        Ok(BigEndian::read_u16(word))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..]
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Memory {{ {} bytes }}", self.bytes.len())
    }
}

#[rustfmt::skip]
const FONT_SPRITES: [u8; 80] = [
	0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
	0x20, 0x60, 0x20, 0x20, 0x70, // 1
	0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
	0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
	0x90, 0x90, 0xF0, 0x10, 0x10, // 4
	0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
	0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
	0xF0, 0x10, 0x20, 0x40, 0x40, // 7
	0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
	0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
	0xF0, 0x90, 0xF0, 0x90, 0x90, // A
	0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
	0xF0, 0x80, 0x80, 0x80, 0xF0, // C
	0xE0, 0x90, 0x90, 0x90, 0xE0, // D
	0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
	0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
