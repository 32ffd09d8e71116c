//! Typed view of CHIP-8 instruction words.

use std::fmt;

use enum_primitive::FromPrimitive;

/// Raw 16-bit instruction word as fetched from memory.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct InstructionWord(pub u16);

impl InstructionWord {
    pub fn nnn(self) -> Addr {
        Addr(self.0 & 0x0FFF)
    }

    pub fn kk(self) -> Imm {
        Imm((self.0 & 0xFF) as u8)
    }

    pub fn n(self) -> Imm4 {
        Imm4((self.0 & 0xF) as u8)
    }

    pub fn x(self) -> Reg {
        Reg::from_nibble((self.0 >> 8) as u8)
    }

    pub fn y(self) -> Reg {
        Reg::from_nibble((self.0 >> 4) as u8)
    }

    fn family(self) -> u8 {
        (self.0 >> 12) as u8
    }
}

impl fmt::Debug for InstructionWord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04x}", self.0)
    }
}

enum_from_primitive! {
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Reg {
    V0 = 0,
    V1 = 1,
    V2 = 2,
    V3 = 3,
    V4 = 4,
    V5 = 5,
    V6 = 6,
    V7 = 7,
    V8 = 8,
    V9 = 9,
    Va = 10,
    Vb = 11,
    Vc = 12,
    Vd = 13,
    Ve = 14,
    Vf = 15,
}
}

impl Reg {
    /// Builds a register from the low nibble of `nibble`.
    pub fn from_nibble(nibble: u8) -> Reg {
        // Every 4-bit value names a register.
        Reg::from_u8(nibble & 0x0F).unwrap_or(Reg::V0)
    }

    pub fn index(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "V{:X}", self.index())
    }
}

/// 12-bit memory address.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Addr(pub u16);

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{:03X}", self.0)
    }
}

/// 8-bit immediate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Imm(pub u8);

impl fmt::Display for Imm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

/// 4-bit immediate, the sprite height of `DRW`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Imm4(pub u8);

enum_from_primitive! {
/// Register-register operation selected by the low nibble of `8xy*`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Fun {
    Id = 0x0,
    Or = 0x1,
    And = 0x2,
    Xor = 0x3,
    Add = 0x4,
    Subtract = 0x5,
    ShiftRight = 0x6,
    SubtractInv = 0x7,
    ShiftLeft = 0xE,
}
}

impl Fun {
    fn mnemonic(self) -> &'static str {
        match self {
            Fun::Id => "LD",
            Fun::Or => "OR",
            Fun::And => "AND",
            Fun::Xor => "XOR",
            Fun::Add => "ADD",
            Fun::Subtract => "SUB",
            Fun::ShiftRight => "SHR",
            Fun::SubtractInv => "SUBN",
            Fun::ShiftLeft => "SHL",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    ClearScreen,
    /// 00EE
    Ret,
    /// 0nnn, executed as a plain jump.
    Sys(Addr),
    /// 1nnn
    Jump(Addr),
    /// 2nnn
    Call(Addr),
    /// 3xkk, or 4xkk when `inv`.
    SkipEqImm { vx: Reg, imm: Imm, inv: bool },
    /// 5xy0, or 9xy0 when `inv`.
    SkipEqReg { vx: Reg, vy: Reg, inv: bool },
    /// 6xkk
    PutImm { vx: Reg, imm: Imm },
    /// 7xkk
    AddImm { vx: Reg, imm: Imm },
    /// 8xy*
    Apply { vx: Reg, vy: Reg, f: Fun },
    /// Annn
    SetI(Addr),
    /// Bnnn
    JumpPlusV0(Addr),
    /// Cxkk
    Randomize { vx: Reg, imm: Imm },
    /// Dxyn
    Draw { vx: Reg, vy: Reg, n: Imm4 },
    /// Ex9E, or ExA1 when `inv`.
    SkipPressed { vx: Reg, inv: bool },
    /// Fx07
    GetDT(Reg),
    /// Fx0A
    WaitKey(Reg),
    /// Fx15
    SetDT(Reg),
    /// Fx18
    SetST(Reg),
    /// Fx1E
    AddI(Reg),
    /// Fx29
    LoadGlyph(Reg),
    /// Fx33
    StoreBCD(Reg),
    /// Fx55
    StoreRegs(Reg),
    /// Fx65
    LoadRegs(Reg),
}

impl Instruction {
    /// Decodes `word`, returning `None` if it is not one of the documented
    /// CHIP-8 instructions.
    pub fn decode(word: InstructionWord) -> Option<Instruction> {
        use self::Instruction::*;

        let vx = word.x();
        let vy = word.y();

        let instruction = match word.family() {
            0x0 => match word.0 {
                0x00E0 => ClearScreen,
                0x00EE => Ret,
                _ => Sys(word.nnn()),
            },
            0x1 => Jump(word.nnn()),
            0x2 => Call(word.nnn()),
            0x3 => SkipEqImm { vx, imm: word.kk(), inv: false },
            0x4 => SkipEqImm { vx, imm: word.kk(), inv: true },
            0x5 if word.n().0 == 0 => SkipEqReg { vx, vy, inv: false },
            0x6 => PutImm { vx, imm: word.kk() },
            0x7 => AddImm { vx, imm: word.kk() },
            0x8 => Apply { vx, vy, f: Fun::from_u8(word.n().0)? },
            0x9 if word.n().0 == 0 => SkipEqReg { vx, vy, inv: true },
            0xA => SetI(word.nnn()),
            0xB => JumpPlusV0(word.nnn()),
            0xC => Randomize { vx, imm: word.kk() },
            0xD => Draw { vx, vy, n: word.n() },
            0xE => match word.kk().0 {
                0x9E => SkipPressed { vx, inv: false },
                0xA1 => SkipPressed { vx, inv: true },
                _ => return None,
            },
            0xF => match word.kk().0 {
                0x07 => GetDT(vx),
                0x0A => WaitKey(vx),
                0x15 => SetDT(vx),
                0x18 => SetST(vx),
                0x1E => AddI(vx),
                0x29 => LoadGlyph(vx),
                0x33 => StoreBCD(vx),
                0x55 => StoreRegs(vx),
                0x65 => LoadRegs(vx),
                _ => return None,
            },
            _ => return None,
        };

        Some(instruction)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::Instruction::*;

        match *self {
            ClearScreen => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Sys(addr) => write!(f, "SYS {}", addr),
            Jump(addr) => write!(f, "JP {}", addr),
            Call(addr) => write!(f, "CALL {}", addr),
            SkipEqImm { vx, imm, inv } => {
                write!(f, "{} {}, {}", if inv { "SNE" } else { "SE" }, vx, imm)
            }
            SkipEqReg { vx, vy, inv } => {
                write!(f, "{} {}, {}", if inv { "SNE" } else { "SE" }, vx, vy)
            }
            PutImm { vx, imm } => write!(f, "LD {}, {}", vx, imm),
            AddImm { vx, imm } => write!(f, "ADD {}, {}", vx, imm),
            Apply { vx, vy, f: fun } => write!(f, "{} {}, {}", fun.mnemonic(), vx, vy),
            SetI(addr) => write!(f, "LD I, {}", addr),
            JumpPlusV0(addr) => write!(f, "JP V0, {}", addr),
            Randomize { vx, imm } => write!(f, "RND {}, {}", vx, imm),
            Draw { vx, vy, n } => write!(f, "DRW {}, {}, {}", vx, vy, n.0),
            SkipPressed { vx, inv } => write!(f, "{} {}", if inv { "SKNP" } else { "SKP" }, vx),
            GetDT(vx) => write!(f, "LD {}, DT", vx),
            WaitKey(vx) => write!(f, "LD {}, K", vx),
            SetDT(vx) => write!(f, "LD DT, {}", vx),
            SetST(vx) => write!(f, "LD ST, {}", vx),
            AddI(vx) => write!(f, "ADD I, {}", vx),
            LoadGlyph(vx) => write!(f, "LD F, {}", vx),
            StoreBCD(vx) => write!(f, "LD B, {}", vx),
            StoreRegs(vx) => write!(f, "LD [I], {}", vx),
            LoadRegs(vx) => write!(f, "LD {}, [I]", vx),
        }
    }
}
