use std::fmt;
use std::io::Read;

use byteorder::{BigEndian, ByteOrder};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::display::Display;
use crate::instruction::*;
use crate::keypad::Keypad;
use crate::regfile::RegFile;
use crate::stack::Stack;
use crate::timer::Timer;
use crate::{ErrorKind, Result};

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START: usize = 0x200;
pub const PROGRAM_SPACE: usize = MEMORY_SIZE - PROGRAM_START;
pub const FONT_BASE: u16 = 0x50;

const ADDR_MASK: u16 = 0x0FFF;
const GLYPH_SIZE: u16 = 5;
const MAX_SPRITE_HEIGHT: usize = 15;

/// Whether `step` fetches instructions or sits on an `LD Vx, K`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Mode {
    Running,
    /// PC holds the address of the waiting instruction; the pressed key
    /// goes into the register.
    WaitingForKey(Reg),
}

pub struct Chip8<R = StdRng> {
    memory: [u8; MEMORY_SIZE],
    gpr: RegFile,
    stack: Stack,
    pc: u16,
    i: u16,
    dt: Timer,
    st: Timer,
    mode: Mode,
    rng: R,
    display: Display,
    keypad: Keypad,
}

impl Chip8<StdRng> {
    pub fn new() -> Chip8<StdRng> {
        Chip8::with_rng(StdRng::from_entropy())
    }

    pub fn with_rom(rom_data: &[u8]) -> Result<Chip8<StdRng>> {
        let mut chip8 = Chip8::new();
        chip8.load_rom(rom_data)?;
        Ok(chip8)
    }
}

impl Default for Chip8<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> Chip8<R> {
    /// Creates a machine drawing `RND` values from `rng`.
    pub fn with_rng(rng: R) -> Chip8<R> {
        let mut chip8 = Chip8 {
            memory: [0; MEMORY_SIZE],
            gpr: RegFile::new(),
            stack: Stack::new(),
            pc: PROGRAM_START as u16,
            i: 0,
            dt: Timer::new(),
            st: Timer::new(),
            mode: Mode::Running,
            rng,
            display: Display::new(),
            keypad: Keypad::new(),
        };

        {
            let font_start = FONT_BASE as usize;
            let font_memory = &mut chip8.memory[font_start..font_start + FONT_SPRITES.len()];
            font_memory.copy_from_slice(&FONT_SPRITES);
        }

        chip8
    }

    /// Copies `rom_data` into program memory at 0x200 and returns the number
    /// of bytes copied.
    pub fn load_rom(&mut self, rom_data: &[u8]) -> Result<usize> {
        if rom_data.len() > PROGRAM_SPACE {
            bail!(ErrorKind::RomTooLarge(rom_data.len()));
        }

        self.memory[PROGRAM_START..PROGRAM_START + rom_data.len()].copy_from_slice(rom_data);
        debug!(
            "read {} bytes into memory starting from {:#x}",
            rom_data.len(),
            PROGRAM_START
        );

        Ok(rom_data.len())
    }

    pub fn load_rom_from<T: Read>(&mut self, reader: &mut T) -> Result<usize> {
        let mut rom_data = Vec::new();
        reader.read_to_end(&mut rom_data)?;
        self.load_rom(&rom_data)
    }

    /// Runs one fetch-decode-execute cycle, then ticks both timers once.
    ///
    /// A failing cycle leaves the machine untouched.
    pub fn step(&mut self) -> Result<()> {
        match self.mode {
            Mode::WaitingForKey(vx) => self.resume_on_key(vx),
            Mode::Running => {
                let instruction_word = self.fetch();
                let instruction = Instruction::decode(instruction_word)?;
                trace!(
                    "{:03x}: {:04x} {}",
                    self.pc,
                    instruction_word.0,
                    instruction
                );
                let next_pc = self.execute_instruction(instruction)?;
                self.pc = next_pc;
            }
        }

        self.update_timers(1);

        Ok(())
    }

    pub fn set_keys(&mut self, keys: [bool; 16]) {
        self.keypad.set(keys);
    }

    pub fn press(&mut self, key: u8) {
        self.keypad.press(key);
    }

    pub fn release(&mut self, key: u8) {
        self.keypad.release(key);
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn i(&self) -> u16 {
        self.i
    }

    pub fn register(&self, reg: Reg) -> u8 {
        self.gpr[reg]
    }

    pub fn delay_timer(&self) -> u8 {
        self.dt.get()
    }

    pub fn sound_timer(&self) -> u8 {
        self.st.get()
    }

    pub fn is_beeping(&self) -> bool {
        self.st.get() != 0
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_waiting_for_key(&self) -> bool {
        self.mode != Mode::Running
    }

    fn fetch(&self) -> InstructionWord {
        let bytes = [self.read_memory(self.pc), self.read_memory(self.pc + 1)];
        InstructionWord(BigEndian::read_u16(&bytes))
    }

    fn read_memory(&self, addr: u16) -> u8 {
        self.memory[(addr & ADDR_MASK) as usize]
    }

    fn write_memory(&mut self, addr: u16, value: u8) {
        self.memory[(addr & ADDR_MASK) as usize] = value;
    }

    fn update_timers(&mut self, dt: u8) {
        self.dt.step(dt);
        self.st.step(dt);
    }

    fn resume_on_key(&mut self, vx: Reg) {
        if let Some(key) = self.keypad.first_pressed() {
            self.gpr[vx] = key;
            self.pc = (self.pc + 2) & ADDR_MASK;
            self.mode = Mode::Running;
            debug!("key {:X} pressed, stored in {}", key, vx);
        }
    }

    /// Executes `instruction` and returns the address of the next one.
    fn execute_instruction(&mut self, instruction: Instruction) -> Result<u16> {
        use crate::instruction::Instruction::*;

        let mut next_pc = (self.pc + 2) & ADDR_MASK;

        match instruction {
            ClearScreen => self.display.clear(),
            Ret => {
                next_pc = self.stack.pop()?;
            }
            Sys(_addr) => {}
            Jump(addr) => {
                next_pc = addr.0;
            }
            Call(addr) => {
                self.stack.push(next_pc)?;
                next_pc = addr.0;
            }
            SkipEqImm { vx, imm, inv } => {
                if (self.gpr[vx] == imm.0) != inv {
                    next_pc = (next_pc + 2) & ADDR_MASK;
                }
            }
            SkipEqReg { vx, vy, inv } => {
                if (self.gpr[vx] == self.gpr[vy]) != inv {
                    next_pc = (next_pc + 2) & ADDR_MASK;
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
                next_pc = (addr.0 + self.gpr[Reg::V0] as u16) & ADDR_MASK;
            }
            Randomize { vx, imm } => {
                let random_byte = self.rng.gen::<u8>();
                self.gpr[vx] = random_byte & imm.0;
            }
            Draw { vx, vy, n } => {
                let x = self.gpr[vx] as usize;
                let y = self.gpr[vy] as usize;
                let height = (n.0 as usize).min(MAX_SPRITE_HEIGHT);

                let mut sprite = [0u8; MAX_SPRITE_HEIGHT];
                for (row, byte) in sprite[..height].iter_mut().enumerate() {
                    *byte = self.read_memory(self.i + row as u16);
                }

                let collision_bit = self.display.draw(x, y, &sprite[..height]);
                self.gpr.set_flag(collision_bit);
            }
            SkipPressed { vx, inv } => {
                let key = self.gpr[vx] & 0xF;
                if self.keypad.is_pressed(key) != inv {
                    next_pc = (next_pc + 2) & ADDR_MASK;
                }
            }
            GetDT(vx) => {
                self.gpr[vx] = self.dt.get();
            }
            WaitKey(vx) => match self.keypad.first_pressed() {
                Some(key) => {
                    self.gpr[vx] = key;
                }
                None => {
                    debug!("waiting for a key press into {}", vx);
                    self.mode = Mode::WaitingForKey(vx);
                    next_pc = self.pc;
                }
            },
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
                self.i = sum & ADDR_MASK;
                self.gpr.set_flag(sum > ADDR_MASK);
            }
            LoadGlyph(vx) => {
                let digit = (self.gpr[vx] & 0xF) as u16;
                self.i = FONT_BASE + digit * GLYPH_SIZE;
            }
            StoreBCD(vx) => {
                let v = self.gpr[vx];
                let i = self.i;

                self.write_memory(i, v / 100);
                self.write_memory(i + 1, (v / 10) % 10);
                self.write_memory(i + 2, v % 10);
            }
            StoreRegs(vx) => {
                let i = self.i;
                for offset in 0..=vx.index() {
                    let value = self.gpr.read_at_index(offset as usize);
                    self.write_memory(i + offset as u16, value);
                }
                self.i = (i + vx.index() as u16 + 1) & ADDR_MASK;
            }
            LoadRegs(vx) => {
                let i = self.i;
                for offset in 0..=vx.index() {
                    let value = self.read_memory(i + offset as u16);
                    self.gpr.write_at_index(offset as usize, value);
                }
                self.i = (i + vx.index() as u16 + 1) & ADDR_MASK;
            }
        }

        Ok(next_pc)
    }

    /// `8xyN`. Vx is written before VF, so VF as destination keeps the flag.
    fn apply(&mut self, vx: Reg, vy: Reg, f: Fun) {
        let x = self.gpr[vx];
        let y = self.gpr[vy];

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
                let (v, borrow) = x.overflowing_sub(y);
                self.gpr[vx] = v;
                self.gpr.set_flag(!borrow);
            }
            Fun::ShiftRight => {
                self.gpr[vx] = x >> 1;
                self.gpr.set_flag(x & 0x01 != 0);
            }
            Fun::SubtractInv => {
                let (v, borrow) = y.overflowing_sub(x);
                self.gpr[vx] = v;
                self.gpr.set_flag(!borrow);
            }
            Fun::ShiftLeft => {
                self.gpr[vx] = x << 1;
                self.gpr.set_flag(x & 0x80 != 0);
            }
        }
    }
}

impl<R> fmt::Debug for Chip8<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Chip8")
            .field("gpr", &self.gpr)
            .field("pc", &format!("{:03x}", self.pc))
            .field("i", &format!("{:03x}", self.i))
            .field("dt", &format!("{:02x}", self.dt.get()))
            .field("st", &format!("{:02x}", self.st.get()))
            .field("stack", &self.stack)
            .field("mode", &self.mode)
            .finish()
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
