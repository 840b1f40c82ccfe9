use core::fmt;

/// 16-bit general-purpose registers in encoding order.
///
/// The discriminants are the 3-bit register numbers used by the instruction
/// encodings, so a decoded register field converts directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg16 {
    Ax = 0, // accumulator; implicit operand of DIV and the immediate ALU forms
    Cx = 1, // count register; implicit operand of LOOP
    Dx = 2, // data register; high half of the DIV dividend
    Bx = 3, // base register
    Sp = 4, // stack pointer
    Bp = 5, // base pointer
    Si = 6, // source index; implicit operand of LODSB
    Di = 7, // destination index
}

impl Reg16 {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0 => Reg16::Ax,
            1 => Reg16::Cx,
            2 => Reg16::Dx,
            3 => Reg16::Bx,
            4 => Reg16::Sp,
            5 => Reg16::Bp,
            6 => Reg16::Si,
            _ => Reg16::Di,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Reg16::Ax => "ax",
            Reg16::Cx => "cx",
            Reg16::Dx => "dx",
            Reg16::Bx => "bx",
            Reg16::Sp => "sp",
            Reg16::Bp => "bp",
            Reg16::Si => "si",
            Reg16::Di => "di",
        }
    }
}

/// 8-bit registers in encoding order.
///
/// Numbers 0-3 are the low bytes of AX/CX/DX/BX, numbers 4-7 the high bytes
/// of the same registers; there are no byte views of SP/BP/SI/DI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg8 {
    Al = 0,
    Cl = 1,
    Dl = 2,
    Bl = 3,
    Ah = 4,
    Ch = 5,
    Dh = 6,
    Bh = 7,
}

impl Reg8 {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0 => Reg8::Al,
            1 => Reg8::Cl,
            2 => Reg8::Dl,
            3 => Reg8::Bl,
            4 => Reg8::Ah,
            5 => Reg8::Ch,
            6 => Reg8::Dh,
            _ => Reg8::Bh,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Reg8::Al => "al",
            Reg8::Cl => "cl",
            Reg8::Dl => "dl",
            Reg8::Bl => "bl",
            Reg8::Ah => "ah",
            Reg8::Ch => "ch",
            Reg8::Dh => "dh",
            Reg8::Bh => "bh",
        }
    }
}

/// Segment registers in encoding order (the reg field of MOV Sreg forms).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegReg {
    Es = 0,
    Cs = 1,
    Ss = 2,
    Ds = 3,
}

impl SegReg {
    /// Converts a decoded reg field; CS is not a valid MOV destination and
    /// fields above 3 are reserved, so both yield `None`.
    pub fn writable_from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(SegReg::Es),
            2 => Some(SegReg::Ss),
            3 => Some(SegReg::Ds),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SegReg::Es => "es",
            SegReg::Cs => "cs",
            SegReg::Ss => "ss",
            SegReg::Ds => "ds",
        }
    }
}

impl fmt::Display for Reg16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Reg8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for SegReg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
