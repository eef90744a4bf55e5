use std::fmt;

use enum_primitive::FromPrimitive;

error_chain! {
    errors {
        UnknownOpcode(word: u16) {
            description("unknown opcode")
            display("unknown opcode: {:#06x}", word)
        }
    }
}

/// Raw 16-bit instruction word, as fetched big-endian from memory.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InstructionWord(pub u16);

impl InstructionWord {
    /// Primary opcode family, bits 15-12.
    pub fn family(self) -> u8 {
        (self.0 >> 12) as u8
    }

    pub fn nnn(self) -> u16 {
        self.0 & 0x0FFF
    }

    pub fn kk(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    pub fn n(self) -> u8 {
        (self.0 & 0xF) as u8
    }

    pub fn x(self) -> u8 {
        ((self.0 & 0x0F00) >> 8) as u8
    }

    pub fn y(self) -> u8 {
        ((self.0 & 0x00F0) >> 4) as u8
    }

    fn x_reg(self) -> Reg {
        Reg::from_nibble(self.x())
    }

    fn y_reg(self) -> Reg {
        Reg::from_nibble(self.y())
    }
}

enum_from_primitive! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub enum Reg {
        V0, V1, V2, V3, V4, V5, V6, V7, V8, V9, Va, Vb, Vc, Vd, Ve, Vf
    }
}

impl Reg {
    /// Maps the low four bits of `nibble` onto a register.
    pub fn from_nibble(nibble: u8) -> Reg {
        // All 16 values of a masked nibble have a variant.
        Reg::from_u8(nibble & 0xF).unwrap_or(Reg::Vf)
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

/// 12-bit address operand.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Addr(pub u16);

/// 8-bit immediate operand.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Imm(pub u8);

/// 4-bit immediate operand (sprite height).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Nibble(pub u8);

enum_from_primitive! {
    /// Register-to-register ALU operation, selected by the low nibble of `8xyN`.
    #[derive(Copy, Clone, Debug, PartialEq)]
    pub enum Fun {
        Id = 0x0,
        Or = 0x1,
        And = 0x2,
        Xor = 0x3,
        Add = 0x4,
        Subtract = 0x5,
        ShiftRight = 0x6,
        SubtractInv = 0x7,
        ShiftLeft = 0xE
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Instruction {
    ClearScreen,
    Ret,
    Sys(Addr),
    Jump(Addr),
    Call(Addr),
    SkipEqImm { vx: Reg, imm: Imm, inv: bool },
    SkipEqReg { vx: Reg, vy: Reg, inv: bool },
    PutImm { vx: Reg, imm: Imm },
    AddImm { vx: Reg, imm: Imm },
    Apply { vx: Reg, vy: Reg, f: Fun },
    SetI(Addr),
    JumpPlusV0(Addr),
    Randomize { vx: Reg, imm: Imm },
    Draw { vx: Reg, vy: Reg, n: Nibble },
    SkipPressed { vx: Reg, inv: bool },
    GetDT(Reg),
    WaitKey(Reg),
    SetDT(Reg),
    SetST(Reg),
    AddI(Reg),
    LoadGlyph(Reg),
    StoreBCD(Reg),
    StoreRegs(Reg),
    LoadRegs(Reg),
}

impl Instruction {
    /// Decodes a word into exactly one instruction.
    ///
    /// Fully specified words (`00E0`, `00EE`) are matched ahead of the
    /// `0nnn` family they belong to. Words that fit no form are rejected
    /// with `UnknownOpcode`.
    pub fn decode(word: InstructionWord) -> Result<Instruction> {
        use self::Instruction::*;

        let vx = word.x_reg();
        let vy = word.y_reg();
        let imm = Imm(word.kk());
        let addr = Addr(word.nnn());

        let instruction = match (word.family(), word.kk(), word.n()) {
            (0x0, _, _) if word.0 == 0x00E0 => ClearScreen,
            (0x0, _, _) if word.0 == 0x00EE => Ret,
            (0x0, _, _) => Sys(addr),
            (0x1, _, _) => Jump(addr),
            (0x2, _, _) => Call(addr),
            (0x3, _, _) => SkipEqImm { vx, imm, inv: false },
            (0x4, _, _) => SkipEqImm { vx, imm, inv: true },
            (0x5, _, 0x0) => SkipEqReg { vx, vy, inv: false },
            (0x6, _, _) => PutImm { vx, imm },
            (0x7, _, _) => AddImm { vx, imm },
            (0x8, _, n) => {
                let f = Fun::from_u8(n).ok_or(ErrorKind::UnknownOpcode(word.0))?;
                Apply { vx, vy, f }
            }
            (0x9, _, 0x0) => SkipEqReg { vx, vy, inv: true },
            (0xA, _, _) => SetI(addr),
            (0xB, _, _) => JumpPlusV0(addr),
            (0xC, _, _) => Randomize { vx, imm },
            (0xD, _, n) => Draw { vx, vy, n: Nibble(n) },
            (0xE, 0x9E, _) => SkipPressed { vx, inv: false },
            (0xE, 0xA1, _) => SkipPressed { vx, inv: true },
            (0xF, 0x07, _) => GetDT(vx),
            (0xF, 0x0A, _) => WaitKey(vx),
            (0xF, 0x15, _) => SetDT(vx),
            (0xF, 0x18, _) => SetST(vx),
            (0xF, 0x1E, _) => AddI(vx),
            (0xF, 0x29, _) => LoadGlyph(vx),
            (0xF, 0x33, _) => StoreBCD(vx),
            (0xF, 0x55, _) => StoreRegs(vx),
            (0xF, 0x65, _) => LoadRegs(vx),
            _ => return Err(ErrorKind::UnknownOpcode(word.0).into()),
        };

        Ok(instruction)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::Instruction::*;

        match *self {
            ClearScreen => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Sys(addr) => write!(f, "SYS {:#05x}", addr.0),
            Jump(addr) => write!(f, "JP {:#05x}", addr.0),
            Call(addr) => write!(f, "CALL {:#05x}", addr.0),
            SkipEqImm { vx, imm, inv } => {
                let mnemonic = if inv { "SNE" } else { "SE" };
                write!(f, "{} {}, {:#04x}", mnemonic, vx, imm.0)
            }
            SkipEqReg { vx, vy, inv } => {
                let mnemonic = if inv { "SNE" } else { "SE" };
                write!(f, "{} {}, {}", mnemonic, vx, vy)
            }
            PutImm { vx, imm } => write!(f, "LD {}, {:#04x}", vx, imm.0),
            AddImm { vx, imm } => write!(f, "ADD {}, {:#04x}", vx, imm.0),
            Apply { vx, vy, f: fun } => {
                let mnemonic = match fun {
                    Fun::Id => "LD",
                    Fun::Or => "OR",
                    Fun::And => "AND",
                    Fun::Xor => "XOR",
                    Fun::Add => "ADD",
                    Fun::Subtract => "SUB",
                    Fun::ShiftRight => "SHR",
                    Fun::SubtractInv => "SUBN",
                    Fun::ShiftLeft => "SHL",
                };
                write!(f, "{} {}, {}", mnemonic, vx, vy)
            }
            SetI(addr) => write!(f, "LD I, {:#05x}", addr.0),
            JumpPlusV0(addr) => write!(f, "JP V0, {:#05x}", addr.0),
            Randomize { vx, imm } => write!(f, "RND {}, {:#04x}", vx, imm.0),
            Draw { vx, vy, n } => write!(f, "DRW {}, {}, {}", vx, vy, n.0),
            SkipPressed { vx, inv } => {
                let mnemonic = if inv { "SKNP" } else { "SKP" };
                write!(f, "{} {}", mnemonic, vx)
            }
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
