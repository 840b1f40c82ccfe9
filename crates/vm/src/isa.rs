/// Primary one-byte opcodes recognized by this core.
///
/// This is the real-mode subset a printing boot sector uses, not the full
/// 8086 map. x86 opcodes come in two shapes: fixed bytes (listed here) and
/// families that embed a register number in the low three bits (listed below
/// as `*_BASE` constants). Opcodes 0x80-0xC1 style groups reuse the ModR/M
/// reg field as an extension; the decoder narrows those to the group members
/// the sector family emits.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq)]
pub enum Opcode {
    /// ADD AL, imm8: 8-bit immediate add into the accumulator low byte.
    AddAlImm8 = 0x04,
    /// AND AX, imm16: immediate mask on the accumulator.
    AndAxImm16 = 0x25,
    /// XOR r/m16, r16 (register form only).
    XorRm16R16 = 0x31,
    /// CMP AL, imm8: compare, setting carry/zero for Jcc.
    CmpAlImm8 = 0x3C,
    /// PUSHA: push all eight 16-bit registers.
    Pusha = 0x60,
    /// POPA: pop them back, discarding the stored SP.
    Popa = 0x61,
    /// JB rel8: jump if carry (below, unsigned).
    Jb = 0x72,
    /// JZ rel8: jump if zero.
    Jz = 0x74,
    /// JNZ rel8: jump if not zero.
    Jnz = 0x75,
    /// TEST r/m8, r8 (register form only).
    TestRm8R8 = 0x84,
    /// TEST r/m16, r16 (register form only).
    TestRm16R16 = 0x85,
    /// MOV r/m16, r16 (register form only).
    MovRm16R16 = 0x89,
    /// MOV Sreg, r/m16: segment register load.
    MovSregRm16 = 0x8E,
    /// NOP (canonically XCHG AX, AX); also how padding executes.
    Nop = 0x90,
    /// LODSB: AL = [DS:SI], then SI steps by the direction flag.
    Lodsb = 0xAC,
    /// Shift/rotate group with an immediate count; reg field 0 is ROL.
    ShiftRm16Imm8 = 0xC1,
    /// RET near: pop the return offset into IP.
    RetNear = 0xC3,
    /// INT imm8: software interrupt.
    Int = 0xCD,
    /// LOOP rel8: decrement CX, jump while nonzero.
    LoopCx = 0xE2,
    /// CALL rel16: push the return offset, jump relative.
    CallRel16 = 0xE8,
    /// JMP rel8: unconditional short jump.
    JmpShort = 0xEB,
    /// HLT: stop until an interrupt arrives.
    Hlt = 0xF4,
    /// Unary ALU group on r/m16; reg field 6 is DIV.
    GroupF7 = 0xF7,
    /// CLI: clear the interrupt flag.
    Cli = 0xFA,
    /// STI: set the interrupt flag.
    Sti = 0xFB,
    /// CLD: clear the direction flag.
    Cld = 0xFC,
}

impl Opcode {
    pub fn from_u8(value: u8) -> Option<Self> {
        use Opcode::*;
        Some(match value {
            0x04 => AddAlImm8,
            0x25 => AndAxImm16,
            0x31 => XorRm16R16,
            0x3C => CmpAlImm8,
            0x60 => Pusha,
            0x61 => Popa,
            0x72 => Jb,
            0x74 => Jz,
            0x75 => Jnz,
            0x84 => TestRm8R8,
            0x85 => TestRm16R16,
            0x89 => MovRm16R16,
            0x8E => MovSregRm16,
            0x90 => Nop,
            0xAC => Lodsb,
            0xC1 => ShiftRm16Imm8,
            0xC3 => RetNear,
            0xCD => Int,
            0xE2 => LoopCx,
            0xE8 => CallRel16,
            0xEB => JmpShort,
            0xF4 => Hlt,
            0xF7 => GroupF7,
            0xFA => Cli,
            0xFB => Sti,
            0xFC => Cld,
            _ => return None, // unknown opcode
        })
    }
}

// Opcode families that carry the register number in their low three bits.

/// INC r16: 0x40 + reg.
pub const INC_R16_BASE: u8 = 0x40;
/// PUSH r16: 0x50 + reg.
pub const PUSH_R16_BASE: u8 = 0x50;
/// POP r16: 0x58 + reg.
pub const POP_R16_BASE: u8 = 0x58;
/// MOV r8, imm8: 0xB0 + reg.
pub const MOV_R8_IMM_BASE: u8 = 0xB0;
/// MOV r16, imm16: 0xB8 + reg.
pub const MOV_R16_IMM_BASE: u8 = 0xB8;
