use std::fmt;

use rand::Rng;

use crate::config::{Config, ShiftQuirk, TimerMode};
use crate::display::FrameBuffer;
use crate::instruction::*;
use crate::keypad::Keypad;
use crate::memory::{Memory, FONT_MEMORY_OFFSET, GLYPH_SIZE};
use crate::regfile::RegFile;
use crate::snapshot::{Registers, Snapshot};
use crate::stack::Stack;
use crate::timer::Timer;
use crate::{ErrorKind, Result, PROGRAM_START};

/// Outcome of a single call to `Vm::cycle`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cycle {
    /// An instruction completed and the timers were stepped.
    Executed,
    /// `LD Vx, K` is waiting for a key-down. Nothing else changes until one
    /// arrives.
    Suspended,
}

pub struct Vm {
    memory: Memory,
    gpr: RegFile,
    stack: Stack,
    pc: u16,
    i: u16,
    dt: Timer,
    st: Timer,
    frame: FrameBuffer,
    keypad: Keypad,
    awaiting_key: Option<Reg>,
    shift: ShiftQuirk,
    timers: TimerMode,
}

impl Vm {
    pub fn new() -> Vm {
        Vm::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Vm {
        Vm {
            memory: Memory::new(),
            gpr: RegFile::new(),
            stack: Stack::new(),
            pc: PROGRAM_START,
            i: 0,
            dt: Timer::new(),
            st: Timer::new(),
            frame: FrameBuffer::new(),
            keypad: Keypad::new(),
            awaiting_key: None,
            shift: config.shift,
            timers: config.timers,
        }
    }

    pub fn with_rom(rom_data: &[u8]) -> Result<Vm> {
        let mut vm = Vm::new();
        vm.load(rom_data)?;
        Ok(vm)
    }

    /// Resets registers, stack, timers, keypad and screen, then places
    /// `program` at 0x200.
    pub fn load(&mut self, program: &[u8]) -> Result<()> {
        self.memory.load_program(program)?;
        self.gpr = RegFile::new();
        self.stack.reset();
        self.pc = PROGRAM_START;
        self.i = 0;
        self.dt.set(0);
        self.st.set(0);
        self.frame.clear();
        self.keypad.reset();
        self.awaiting_key = None;
        Ok(())
    }

    /// Runs one fetch-decode-execute step, or tries to finish a pending
    /// `LD Vx, K`.
    pub fn cycle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Cycle> {
        if let Some(vx) = self.awaiting_key {
            match self.keypad.take_press() {
                Some(key) => {
                    debug!("key {:x} resolved wait of {}", key, vx);
                    self.gpr[vx] = key;
                    self.awaiting_key = None;
                }
                None => return Ok(Cycle::Suspended),
            }
        } else {
            let pc = self.pc;
            let instruction_word = InstructionWord(self.memory.fetch_opcode(pc)?);
            let instruction = Instruction::decode(instruction_word)
                .ok_or_else(|| ErrorKind::Decode(instruction_word.0, pc))?;
            trace!("{:03x}: {:?} {}", pc, instruction_word, instruction);

            self.pc = pc + 2;
            self.execute_instruction(pc, instruction, rng)?;

            if self.awaiting_key.is_some() {
                debug!("waiting for key at {:03x}", pc);
                return Ok(Cycle::Suspended);
            }
        }

        if self.timers == TimerMode::PerCycle {
            self.update_timers(1);
        }
        Ok(Cycle::Executed)
    }

    pub fn update_timers(&mut self, ticks: u8) {
        self.dt.step(ticks);
        self.st.step(ticks);
    }

    /// `at` is the address `instruction` was fetched from; `self.pc` already
    /// points past it.
    fn execute_instruction<R: Rng + ?Sized>(
        &mut self,
        at: u16,
        instruction: Instruction,
        rng: &mut R,
    ) -> Result<()> {
        use crate::instruction::Instruction::*;

        match instruction {
            ClearScreen => self.frame.clear(),
            Ret => {
                self.pc = self.stack.pop().ok_or(ErrorKind::StackUnderflow(at))?;
            }
            Sys(addr) | Jump(addr) => {
                self.pc = addr.0;
            }
            Call(addr) => {
                self.push_return(at)?;
                self.pc = addr.0;
            }
            SkipEqImm { vx, imm, inv } => {
                if (self.gpr[vx] == imm.0) != inv {
                    self.skip();
                }
            }
            SkipEqReg { vx, vy, inv } => {
                if (self.gpr[vx] == self.gpr[vy]) != inv {
                    self.skip();
                }
            }
            PutImm { vx, imm } => {
                self.gpr[vx] = imm.0;
            }
            AddImm { vx, imm } => {
                let x = self.gpr[vx];
                self.gpr[vx] = x.wrapping_add(imm.0);
            }
            Apply { vx, vy, f } => self.apply(vx, vy, f),
            SetI(addr) => {
                self.i = addr.0;
            }
            JumpPlusV0(addr) => {
                self.push_return(at)?;
                self.pc = (addr.0 + self.gpr[Reg::V0] as u16) & 0x0FFF;
            }
            Randomize { vx, imm } => {
                let random_byte = rng.gen::<u8>();
                self.gpr[vx] = random_byte & imm.0;
            }
            Draw { vx, vy, n } => {
                let x = self.gpr[vx] as usize;
                let y = self.gpr[vy] as usize;

                let i = self.i as usize;

                let mut collision_bit = false;
                for row in 0..n.0 as usize {
                    let sprite_row = self.memory.read(i + row)?;
                    collision_bit |= self.frame.draw_sprite(x, y + row, sprite_row);
                }

                self.gpr.set_flag(collision_bit);
            }
            SkipPressed { vx, inv } => {
                if self.keypad.is_pressed(self.gpr[vx]) != inv {
                    self.skip();
                }
            }
            GetDT(vx) => {
                self.gpr[vx] = self.dt.get();
            }
            WaitKey(vx) => {
                self.keypad.begin_wait();
                self.awaiting_key = Some(vx);
            }
            SetDT(vx) => {
                let x = self.gpr[vx];
                self.dt.set(x);
            }
            SetST(vx) => {
                let x = self.gpr[vx];
                self.st.set(x);
            }
            AddI(vx) => {
                let sum = self.i + self.gpr[vx] as u16;
                self.gpr.set_flag(sum > 0x0FFF);
                self.i = sum & 0x0FFF;
            }
            LoadGlyph(vx) => {
                let digit = (self.gpr[vx] & 0x0F) as u16;
                self.i = FONT_MEMORY_OFFSET + digit * GLYPH_SIZE;
            }
            StoreBCD(vx) => {
                let v = self.gpr[vx];
                let i = self.i as usize;

                self.memory.write(i, v / 100)?;
                self.memory.write(i + 1, (v / 10) % 10)?;
                self.memory.write(i + 2, v % 10)?;
            }
            StoreRegs(vx) => {
                let i = self.i as usize;
                for (offset, &value) in self.gpr.up_to(vx).iter().enumerate() {
                    self.memory.write(i + offset, value)?;
                }
            }
            LoadRegs(vx) => {
                let values = self.memory.slice(self.i as usize, vx.index() as usize + 1)?;
                self.gpr.up_to_mut(vx).copy_from_slice(values);
            }
        }

        Ok(())
    }

    fn apply(&mut self, vx: Reg, vy: Reg, f: Fun) {
        let x = self.gpr[vx];
        let y = self.gpr[vy];
        let shifted = match self.shift {
            ShiftQuirk::InPlace => x,
            ShiftQuirk::Vip => y,
        };

        match f {
            Fun::Id => {
                self.gpr[vx] = y;
            }
            Fun::Or => {
                self.gpr[vx] = x | y;
            }
            Fun::And => {
                self.gpr[vx] = x & y;
            }
            Fun::Xor => {
                self.gpr[vx] = x ^ y;
            }
            Fun::Add => {
                let (v, overflow) = x.overflowing_add(y);
                self.gpr[vx] = v;
                self.gpr.set_flag(overflow);
            }
            Fun::Subtract => {
                self.gpr[vx] = x.wrapping_sub(y);
                self.gpr.set_flag(x >= y);
            }
            Fun::ShiftRight => {
                self.gpr.set_flag(shifted & 0x01 != 0);
                self.gpr[vx] = shifted >> 1;
            }
            Fun::SubtractInv => {
                self.gpr[vx] = y.wrapping_sub(x);
                self.gpr.set_flag(y >= x);
            }
            Fun::ShiftLeft => {
                self.gpr.set_flag(shifted & 0x80 != 0);
                self.gpr[vx] = shifted << 1;
            }
        }
    }

    fn push_return(&mut self, at: u16) -> Result<()> {
        if self.stack.is_full() {
            bail!(ErrorKind::StackOverflow(at));
        }
        self.stack.push(self.pc);
        Ok(())
    }

    fn skip(&mut self) {
        self.pc += 2;
    }

    pub fn press(&mut self, key: u8) {
        self.keypad.press(key);
    }

    pub fn release(&mut self, key: u8) {
        self.keypad.release(key);
    }

    pub fn is_waiting_for_key(&self) -> bool {
        self.awaiting_key.is_some()
    }

    pub fn is_beeping(&self) -> bool {
        self.st.get() != 0
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn registers(&self) -> Registers {
        Registers {
            pc: self.pc,
            i: self.i,
            v: self.gpr.values(),
            dt: self.dt.get(),
            st: self.st.get(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            registers: self.registers(),
            stack: self.stack.frames(),
            sp: self.stack.sp(),
            memory: self.memory.as_bytes().to_vec(),
            keys: self.keypad.keys(),
            frame: self.frame.clone(),
        }
    }
}

impl Default for Vm {
    fn default() -> Vm {
        Vm::new()
    }
}

impl fmt::Debug for Vm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Vm")
            .field("gpr", &self.gpr)
            .field("pc", &format!("{:04x}", self.pc))
            .field("i", &format!("{:04x}", self.i))
            .field("dt", &format!("{:02x}", self.dt.get()))
            .field("st", &format!("{:02x}", self.st.get()))
            .field("stack", &self.stack)
            .field("awaiting_key", &self.awaiting_key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::{Error, ErrorKind};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x2281)
    }

    fn program(words: &[u16]) -> Vec<u8> {
        words.iter().flat_map(|w| vec![(w >> 8) as u8, *w as u8]).collect()
    }

    fn vm_with(words: &[u16]) -> Vm {
        Vm::with_rom(&program(words)).unwrap()
    }

    fn run(vm: &mut Vm, cycles: usize) -> Result<()> {
        let mut rng = rng();
        for _ in 0..cycles {
            vm.cycle(&mut rng)?;
        }
        Ok(())
    }

    fn error_of(result: Result<()>) -> Error {
        match result {
            Err(e) => e,
            Ok(()) => panic!("expected the program to fail"),
        }
    }

    #[test]
    fn put_imm_sets_every_register() {
        for x in 0..16u16 {
            let mut vm = vm_with(&[0x6000 | x << 8 | 0xA5]);
            run(&mut vm, 1).unwrap();
            assert_eq!(vm.gpr.values()[x as usize], 0xA5);
        }
    }

    #[test]
    fn add_imm_wraps_without_flag() {
        let mut vm = vm_with(&[0x60FF, 0x7002]);
        run(&mut vm, 2).unwrap();
        assert_eq!(vm.gpr[Reg::V0], 0x01);
        assert_eq!(vm.gpr[Reg::Vf], 0);
    }

    #[test]
    fn add_sets_carry() {
        for &(a, b) in &[(0x00u8, 0x00u8), (0x80, 0x7F), (0x80, 0x80), (0xFF, 0xFF), (0x01, 0xFF)] {
            let mut vm = vm_with(&[0x6000 | a as u16, 0x6100 | b as u16, 0x8014]);
            run(&mut vm, 3).unwrap();
            let sum = a as u16 + b as u16;
            assert_eq!(vm.gpr[Reg::V0], (sum % 256) as u8);
            assert_eq!(vm.gpr[Reg::Vf], (sum > 255) as u8);
        }
    }

    #[test]
    fn assign_does_not_fall_through_into_or() {
        let mut vm = vm_with(&[0x600C, 0x6103, 0x8010]);
        run(&mut vm, 3).unwrap();
        assert_eq!(vm.gpr[Reg::V0], 0x03);
    }

    #[test]
    fn bitwise_operations() {
        let mut vm = vm_with(&[0x600C, 0x610A, 0x8011, 0x620C, 0x8212, 0x630C, 0x8313]);
        run(&mut vm, 7).unwrap();
        assert_eq!(vm.gpr[Reg::V0], 0x0E);
        assert_eq!(vm.gpr[Reg::V2], 0x08);
        assert_eq!(vm.gpr[Reg::V3], 0x06);
    }

    #[test]
    fn subtract_flags_not_borrow() {
        let mut vm = vm_with(&[0x6005, 0x6103, 0x8015]);
        run(&mut vm, 3).unwrap();
        assert_eq!(vm.gpr[Reg::V0], 2);
        assert_eq!(vm.gpr[Reg::Vf], 1);

        let mut vm = vm_with(&[0x6003, 0x6105, 0x8015]);
        run(&mut vm, 3).unwrap();
        assert_eq!(vm.gpr[Reg::V0], 0xFE);
        assert_eq!(vm.gpr[Reg::Vf], 0);

        let mut vm = vm_with(&[0x6004, 0x6104, 0x8015]);
        run(&mut vm, 3).unwrap();
        assert_eq!(vm.gpr[Reg::V0], 0);
        assert_eq!(vm.gpr[Reg::Vf], 1);
    }

    #[test]
    fn subtract_inverse() {
        let mut vm = vm_with(&[0x6003, 0x6105, 0x8017]);
        run(&mut vm, 3).unwrap();
        assert_eq!(vm.gpr[Reg::V0], 2);
        assert_eq!(vm.gpr[Reg::Vf], 1);

        let mut vm = vm_with(&[0x6005, 0x6103, 0x8017]);
        run(&mut vm, 3).unwrap();
        assert_eq!(vm.gpr[Reg::V0], 0xFE);
        assert_eq!(vm.gpr[Reg::Vf], 0);
    }

    #[test]
    fn shifts_in_place() {
        let mut vm = vm_with(&[0x6005, 0x61F0, 0x8016]);
        run(&mut vm, 3).unwrap();
        assert_eq!(vm.gpr[Reg::V0], 0x02);
        assert_eq!(vm.gpr[Reg::Vf], 1);

        let mut vm = vm_with(&[0x6081, 0x6101, 0x801E]);
        run(&mut vm, 3).unwrap();
        assert_eq!(vm.gpr[Reg::V0], 0x02);
        assert_eq!(vm.gpr[Reg::Vf], 1);

        let mut vm = vm_with(&[0x6040, 0x801E]);
        run(&mut vm, 2).unwrap();
        assert_eq!(vm.gpr[Reg::V0], 0x80);
        assert_eq!(vm.gpr[Reg::Vf], 0);
    }

    #[test]
    fn vip_shifts_read_vy() {
        let config = Config {
            shift: ShiftQuirk::Vip,
            ..Config::default()
        };
        let mut vm = Vm::with_config(&config);
        vm.load(&program(&[0x6005, 0x61F0, 0x8016])).unwrap();
        run(&mut vm, 3).unwrap();
        assert_eq!(vm.gpr[Reg::V0], 0x78);
        assert_eq!(vm.gpr[Reg::Vf], 0);
    }

    #[test]
    fn skips() {
        // SE V0, 0x01 skips over LD V1, 0xFF.
        let mut vm = vm_with(&[0x6001, 0x3001, 0x61FF, 0x4001, 0x62FF]);
        run(&mut vm, 4).unwrap();
        assert_eq!(vm.gpr[Reg::V1], 0);
        assert_eq!(vm.gpr[Reg::V2], 0xFF);
        assert_eq!(vm.pc, 0x20A);

        let mut vm = vm_with(&[0x5010, 0x61FF, 0x9010, 0x62FF]);
        run(&mut vm, 3).unwrap();
        assert_eq!(vm.gpr[Reg::V1], 0);
        assert_eq!(vm.gpr[Reg::V2], 0xFF);
    }

    #[test]
    fn call_and_return() {
        // 0x200: CALL 0x206; 0x202: LD V0, 1; 0x204: JP 0x204; 0x206: RET
        let mut vm = vm_with(&[0x2206, 0x6001, 0x1204, 0x00EE]);
        run(&mut vm, 1).unwrap();
        assert_eq!(vm.pc, 0x206);
        assert_eq!(vm.stack.sp(), 1);

        run(&mut vm, 1).unwrap();
        assert_eq!(vm.pc, 0x202);
        assert_eq!(vm.stack.sp(), 0);

        run(&mut vm, 3).unwrap();
        assert_eq!(vm.gpr[Reg::V0], 1);
        assert_eq!(vm.pc, 0x204);
    }

    #[test]
    fn sixteen_nested_calls_then_overflow() {
        // CALL 0x200 recursively.
        let mut vm = vm_with(&[0x2200]);
        run(&mut vm, 16).unwrap();
        assert!(vm.stack.is_full());

        match *error_of(run(&mut vm, 1)).kind() {
            ErrorKind::StackOverflow(0x200) => {}
            ref other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn return_with_empty_stack() {
        let mut vm = vm_with(&[0x6001, 0x00EE]);
        match *error_of(run(&mut vm, 2)).kind() {
            ErrorKind::StackUnderflow(0x202) => {}
            ref other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(vm.gpr[Reg::V0], 1);
    }

    #[test]
    fn unknown_instruction() {
        let mut vm = vm_with(&[0x6001, 0xFFFF]);
        match *error_of(run(&mut vm, 2)).kind() {
            ErrorKind::Decode(0xFFFF, 0x202) => {}
            ref other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn jumps() {
        let mut vm = vm_with(&[0x1208, 0, 0, 0, 0x0200]);
        run(&mut vm, 1).unwrap();
        assert_eq!(vm.pc, 0x208);
        run(&mut vm, 1).unwrap();
        assert_eq!(vm.pc, 0x200);
    }

    #[test]
    fn jump_plus_v0_pushes_return_address() {
        let mut vm = vm_with(&[0x6004, 0xB300]);
        run(&mut vm, 2).unwrap();
        assert_eq!(vm.pc, 0x304);
        assert_eq!(vm.stack.sp(), 1);
        assert_eq!(vm.stack.pop(), Some(0x204));
    }

    #[test]
    fn jump_plus_v0_masks_to_twelve_bits() {
        let mut vm = vm_with(&[0x60FF, 0xBFFF]);
        run(&mut vm, 2).unwrap();
        assert_eq!(vm.pc, (0xFFF + 0xFF) & 0xFFF);
    }

    #[test]
    fn random_is_masked_and_reproducible() {
        let mut first = vm_with(&[0xC00F, 0xC1FF]);
        let mut second = vm_with(&[0xC00F, 0xC1FF]);
        run(&mut first, 2).unwrap();
        run(&mut second, 2).unwrap();

        assert_eq!(first.gpr[Reg::V0] & 0xF0, 0);
        assert_eq!(first.gpr.values(), second.gpr.values());
    }

    #[test]
    fn draw_reports_collision_on_redraw() {
        // LD F, V0; DRW V1, V2, 5; DRW V1, V2, 5
        let mut vm = vm_with(&[0xF029, 0xD125, 0xD125]);
        run(&mut vm, 2).unwrap();
        assert_eq!(vm.gpr[Reg::Vf], 0);
        assert_eq!(vm.frame.get(0, 0), 1);

        run(&mut vm, 1).unwrap();
        assert_eq!(vm.gpr[Reg::Vf], 1);
        assert_eq!(vm.frame, FrameBuffer::new());
    }

    #[test]
    fn draw_collision_from_any_row() {
        // Glyph 1 drawn four rows below glyph 0 overlaps it on its first
        // row only.
        let mut vm = vm_with(&[0xD015, 0x6001, 0xF029, 0x6104, 0x6000, 0xD015]);
        run(&mut vm, 6).unwrap();
        assert_eq!(vm.gpr[Reg::Vf], 1);
    }

    #[test]
    fn draw_past_end_of_memory() {
        let mut vm = vm_with(&[0xAFFE, 0xD005]);
        match *error_of(run(&mut vm, 2)).kind() {
            ErrorKind::AddressOutOfRange(_) => {}
            ref other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn skip_on_key_latch() {
        let mut vm = vm_with(&[0x6005, 0xE09E, 0x61FF, 0xE0A1, 0x62FF]);
        vm.press(5);
        run(&mut vm, 4).unwrap();
        assert_eq!(vm.gpr[Reg::V1], 0);
        assert_eq!(vm.gpr[Reg::V2], 0xFF);

        let mut vm = vm_with(&[0x6005, 0xE09E, 0x61FF, 0xE0A1, 0x62FF]);
        run(&mut vm, 4).unwrap();
        assert_eq!(vm.gpr[Reg::V1], 0xFF);
        assert_eq!(vm.gpr[Reg::V2], 0);
    }

    #[test]
    fn wait_key_suspends_until_press() {
        let mut vm = vm_with(&[0x6305, 0xF315, 0xF40A, 0x6501]);
        run(&mut vm, 2).unwrap();
        assert_eq!(vm.dt.get(), 4);

        let mut rng = rng();
        assert_eq!(vm.cycle(&mut rng).unwrap(), Cycle::Suspended);
        assert_eq!(vm.pc, 0x206);
        let before = vm.registers();

        for _ in 0..10 {
            assert_eq!(vm.cycle(&mut rng).unwrap(), Cycle::Suspended);
        }
        assert_eq!(vm.registers(), before);

        vm.press(0xB);
        assert_eq!(vm.cycle(&mut rng).unwrap(), Cycle::Executed);
        assert_eq!(vm.gpr[Reg::V4], 0xB);
        assert_eq!(vm.pc, 0x206);
        assert_eq!(vm.dt.get(), 3);

        assert_eq!(vm.cycle(&mut rng).unwrap(), Cycle::Executed);
        assert_eq!(vm.gpr[Reg::V5], 1);
    }

    #[test]
    fn timers() {
        let mut vm = vm_with(&[0x6005, 0xF015, 0xF018, 0xF107, 0x1208]);
        run(&mut vm, 3).unwrap();
        assert_eq!(vm.dt.get(), 3);
        assert_eq!(vm.st.get(), 4);
        assert!(vm.is_beeping());

        run(&mut vm, 1).unwrap();
        assert_eq!(vm.gpr[Reg::V1], 3);

        run(&mut vm, 10).unwrap();
        assert_eq!(vm.dt.get(), 0);
        assert_eq!(vm.st.get(), 0);
    }

    #[test]
    fn realtime_timers_only_move_on_update() {
        let config = Config {
            timers: TimerMode::Realtime,
            ..Config::default()
        };
        let mut vm = Vm::with_config(&config);
        vm.load(&program(&[0x6005, 0xF015, 0x1204])).unwrap();
        run(&mut vm, 10).unwrap();
        assert_eq!(vm.dt.get(), 5);

        vm.update_timers(2);
        assert_eq!(vm.dt.get(), 3);
    }

    #[test]
    fn add_i_flags_overflow() {
        let mut vm = vm_with(&[0xAFFE, 0x6001, 0xF01E]);
        run(&mut vm, 3).unwrap();
        assert_eq!(vm.i, 0xFFF);
        assert_eq!(vm.gpr[Reg::Vf], 0);

        let mut vm = vm_with(&[0xAFFE, 0x6003, 0xF01E]);
        run(&mut vm, 3).unwrap();
        assert_eq!(vm.i, 0x001);
        assert_eq!(vm.gpr[Reg::Vf], 1);
    }

    #[test]
    fn glyph_addresses() {
        let mut vm = vm_with(&[0x600A, 0xF029, 0x611F, 0xF129]);
        run(&mut vm, 2).unwrap();
        assert_eq!(vm.i, 50);
        run(&mut vm, 2).unwrap();
        assert_eq!(vm.i, 75);
    }

    #[test]
    fn store_bcd() {
        let mut vm = vm_with(&[0x60FE, 0xA300, 0xF033]);
        run(&mut vm, 3).unwrap();
        assert_eq!(vm.memory.slice(0x300, 3).unwrap(), &[2, 5, 4]);
        assert_eq!(vm.i, 0x300);
    }

    #[test]
    fn store_and_load_registers() {
        let mut vm = vm_with(&[
            0x6011, 0x6122, 0x6233, 0xA300, 0xF155, // store V0..V1
            0x6000, 0x6100, 0x6200, 0xF265, // load V0..V2
        ]);
        run(&mut vm, 9).unwrap();
        assert_eq!(vm.memory.slice(0x300, 3).unwrap(), &[0x11, 0x22, 0]);
        assert_eq!(vm.gpr.up_to(Reg::V2), &[0x11, 0x22, 0]);
        assert_eq!(vm.i, 0x300);
    }

    #[test]
    fn store_into_font_area_is_fatal() {
        let mut vm = vm_with(&[0xA000, 0xF055]);
        match *error_of(run(&mut vm, 2)).kind() {
            ErrorKind::ProtectedWrite(0) => {}
            ref other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn load_resets_state() {
        let mut vm = vm_with(&[0x6007, 0xA123, 0x2200]);
        run(&mut vm, 3).unwrap();
        vm.load(&program(&[0x00E0])).unwrap();

        assert_eq!(vm.registers(), Registers { pc: 0x200, i: 0, v: [0; 16], dt: 0, st: 0 });
        assert_eq!(vm.stack.sp(), 0);
    }

    #[test]
    fn snapshot_is_a_copy() {
        let mut vm = vm_with(&[0x6001, 0xF029, 0xD005]);
        run(&mut vm, 3).unwrap();

        let mut snapshot = vm.snapshot();
        assert_eq!(snapshot.registers.v[0], 1);
        assert_eq!(snapshot.memory.len(), 4096);
        assert_eq!(&snapshot.memory[0x200..0x202], &[0x60, 0x01]);
        assert_eq!(snapshot.frame, *vm.frame());

        snapshot.registers.v[0] = 0x42;
        snapshot.memory[0x200] = 0;
        snapshot.frame.clear();
        assert_eq!(vm.gpr[Reg::V0], 1);
        assert_eq!(vm.memory.read(0x200).unwrap(), 0x60);
        assert_eq!(vm.frame().get(3, 1), 1);
    }
}
