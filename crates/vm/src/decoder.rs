use crate::instruction::Instruction;
use crate::isa::{
    Opcode, INC_R16_BASE, MOV_R16_IMM_BASE, MOV_R8_IMM_BASE, POP_R16_BASE, PUSH_R16_BASE,
};
use crate::registers::{Reg16, Reg8, SegReg};

/// Decodes one instruction from raw bytes.
///
/// Real-mode x86 is a variable-length encoding: the first byte selects
/// either a fixed opcode or a register family (low three bits = register
/// number), and may be followed by a ModR/M byte and an immediate. This
/// decoder recognizes the subset a printing boot sector uses, always in
/// the register form (ModR/M mod bits = 11) since the sector never takes
/// a memory operand outside the string ops.
///
/// Returns `Some((instruction, size))` with the number of bytes consumed,
/// or `None` for anything outside the subset so the CPU can report it with
/// a hex dump instead of guessing.
pub fn decode(bytes: &[u8]) -> Option<(Instruction, u8)> {
    let op = *bytes.first()?;
    match op {
        // Families with the register number folded into the opcode byte.
        _ if op & 0xF8 == INC_R16_BASE => {
            Some((Instruction::IncR16 { reg: Reg16::from_bits(op) }, 1))
        }
        _ if op & 0xF8 == PUSH_R16_BASE => {
            Some((Instruction::PushR16 { reg: Reg16::from_bits(op) }, 1))
        }
        _ if op & 0xF8 == POP_R16_BASE => {
            Some((Instruction::PopR16 { reg: Reg16::from_bits(op) }, 1))
        }
        _ if op & 0xF8 == MOV_R8_IMM_BASE => {
            let imm = *bytes.get(1)?;
            Some((Instruction::MovR8Imm { reg: Reg8::from_bits(op), imm }, 2))
        }
        _ if op & 0xF8 == MOV_R16_IMM_BASE => {
            let imm = imm16(bytes, 1)?;
            Some((Instruction::MovR16Imm { reg: Reg16::from_bits(op), imm }, 3))
        }
        _ => decode_fixed(op, bytes),
    }
}

/// Decodes the fixed-byte opcodes.
fn decode_fixed(op: u8, bytes: &[u8]) -> Option<(Instruction, u8)> {
    use Instruction::*;
    Some(match Opcode::from_u8(op)? {
        Opcode::AddAlImm8 => (AddAlImm { imm: *bytes.get(1)? }, 2),
        Opcode::AndAxImm16 => (AndAxImm { imm: imm16(bytes, 1)? }, 3),
        Opcode::CmpAlImm8 => (CmpAlImm { imm: *bytes.get(1)? }, 2),
        Opcode::XorRm16R16 => {
            let (reg, rm) = reg_form(*bytes.get(1)?)?;
            (XorR16 { dst: Reg16::from_bits(rm), src: Reg16::from_bits(reg) }, 2)
        }
        Opcode::TestRm8R8 => {
            let (reg, rm) = reg_form(*bytes.get(1)?)?;
            (TestR8 { a: Reg8::from_bits(rm), b: Reg8::from_bits(reg) }, 2)
        }
        Opcode::TestRm16R16 => {
            let (reg, rm) = reg_form(*bytes.get(1)?)?;
            (TestR16 { a: Reg16::from_bits(rm), b: Reg16::from_bits(reg) }, 2)
        }
        Opcode::MovRm16R16 => {
            let (reg, rm) = reg_form(*bytes.get(1)?)?;
            (MovR16R16 { dst: Reg16::from_bits(rm), src: Reg16::from_bits(reg) }, 2)
        }
        Opcode::MovSregRm16 => {
            let (reg, rm) = reg_form(*bytes.get(1)?)?;
            let sreg = SegReg::writable_from_bits(reg)?;
            (MovSregR16 { sreg, src: Reg16::from_bits(rm) }, 2)
        }
        Opcode::GroupF7 => {
            // Unary ALU group; the reg field selects the member. Only DIV
            // (/6) appears in this sector family.
            let (reg, rm) = reg_form(*bytes.get(1)?)?;
            if reg != 6 {
                return None;
            }
            (DivR16 { src: Reg16::from_bits(rm) }, 2)
        }
        Opcode::ShiftRm16Imm8 => {
            // Shift/rotate group with an immediate count; /0 is ROL.
            let (reg, rm) = reg_form(*bytes.get(1)?)?;
            if reg != 0 {
                return None;
            }
            (RolR16Imm { reg: Reg16::from_bits(rm), count: *bytes.get(2)? }, 3)
        }
        Opcode::Pusha => (Pusha, 1),
        Opcode::Popa => (Popa, 1),
        Opcode::Lodsb => (Lodsb, 1),
        Opcode::CallRel16 => (CallNear { rel: imm16(bytes, 1)? as i16 }, 3),
        Opcode::RetNear => (Ret, 1),
        Opcode::JmpShort => (JmpShort { rel: *bytes.get(1)? as i8 }, 2),
        Opcode::Jz => (Jz { rel: *bytes.get(1)? as i8 }, 2),
        Opcode::Jnz => (Jnz { rel: *bytes.get(1)? as i8 }, 2),
        Opcode::Jb => (Jb { rel: *bytes.get(1)? as i8 }, 2),
        Opcode::LoopCx => (Loop { rel: *bytes.get(1)? as i8 }, 2),
        Opcode::Int => (Int { vector: *bytes.get(1)? }, 2),
        Opcode::Cli => (Cli, 1),
        Opcode::Sti => (Sti, 1),
        Opcode::Cld => (Cld, 1),
        Opcode::Hlt => (Hlt, 1),
        Opcode::Nop => (Nop, 1),
    })
}

/// Splits a ModR/M byte, accepting only the register-direct form (mod = 11).
fn reg_form(modrm: u8) -> Option<(u8, u8)> {
    if modrm >> 6 != 0b11 {
        return None;
    }
    Some(((modrm >> 3) & 0b111, modrm & 0b111))
}

fn imm16(bytes: &[u8], at: usize) -> Option<u16> {
    Some(u16::from_le_bytes([*bytes.get(at)?, *bytes.get(at + 1)?]))
}
