use vm::decoder::decode;
use vm::instruction::Instruction;
use vm::registers::{Reg16, Reg8, SegReg};

#[test]
fn decodes_register_families() {
    assert_eq!(
        decode(&[0xB8, 0x34, 0x12]),
        Some((Instruction::MovR16Imm { reg: Reg16::Ax, imm: 0x1234 }, 3))
    );
    assert_eq!(
        decode(&[0xBE, 0x00, 0x7C]),
        Some((Instruction::MovR16Imm { reg: Reg16::Si, imm: 0x7C00 }, 3))
    );
    assert_eq!(
        decode(&[0xB4, 0x0E]),
        Some((Instruction::MovR8Imm { reg: Reg8::Ah, imm: 0x0E }, 2))
    );
    assert_eq!(decode(&[0x41]), Some((Instruction::IncR16 { reg: Reg16::Cx }, 1)));
    assert_eq!(decode(&[0x52]), Some((Instruction::PushR16 { reg: Reg16::Dx }, 1)));
    assert_eq!(decode(&[0x58]), Some((Instruction::PopR16 { reg: Reg16::Ax }, 1)));
}

#[test]
fn decodes_modrm_register_forms() {
    assert_eq!(
        decode(&[0x31, 0xC0]),
        Some((Instruction::XorR16 { dst: Reg16::Ax, src: Reg16::Ax }, 2))
    );
    assert_eq!(
        decode(&[0x89, 0xC3]),
        Some((Instruction::MovR16R16 { dst: Reg16::Bx, src: Reg16::Ax }, 2))
    );
    assert_eq!(
        decode(&[0x8E, 0xD8]),
        Some((Instruction::MovSregR16 { sreg: SegReg::Ds, src: Reg16::Ax }, 2))
    );
    assert_eq!(
        decode(&[0x84, 0xC0]),
        Some((Instruction::TestR8 { a: Reg8::Al, b: Reg8::Al }, 2))
    );
    assert_eq!(decode(&[0xF7, 0xF3]), Some((Instruction::DivR16 { src: Reg16::Bx }, 2)));
    assert_eq!(
        decode(&[0xC1, 0xC3, 0x04]),
        Some((Instruction::RolR16Imm { reg: Reg16::Bx, count: 4 }, 3))
    );
}

#[test]
fn decodes_control_flow() {
    assert_eq!(decode(&[0xE8, 0x2A, 0x00]), Some((Instruction::CallNear { rel: 42 }, 3)));
    assert_eq!(decode(&[0xC3]), Some((Instruction::Ret, 1)));
    assert_eq!(decode(&[0xEB, 0xFD]), Some((Instruction::JmpShort { rel: -3 }, 2)));
    assert_eq!(decode(&[0x74, 0x04]), Some((Instruction::Jz { rel: 4 }, 2)));
    assert_eq!(decode(&[0x75, 0xF6]), Some((Instruction::Jnz { rel: -10 }, 2)));
    assert_eq!(decode(&[0x72, 0x02]), Some((Instruction::Jb { rel: 2 }, 2)));
    assert_eq!(decode(&[0xE2, 0xF7]), Some((Instruction::Loop { rel: -9 }, 2)));
    assert_eq!(decode(&[0xCD, 0x10]), Some((Instruction::Int { vector: 0x10 }, 2)));
}

#[test]
fn rejects_encodings_outside_the_subset() {
    // Opcodes the sector family never uses.
    assert_eq!(decode(&[0x0F, 0x05]), None);
    assert_eq!(decode(&[0x48]), None); // dec ax

    // Memory-operand ModR/M forms (mod != 11).
    assert_eq!(decode(&[0x31, 0x06, 0x00, 0x7C]), None);

    // Group members other than the ones emitted: F7 /3 is NEG, C1 /4 SHL.
    assert_eq!(decode(&[0xF7, 0xDB]), None);
    assert_eq!(decode(&[0xC1, 0xE3, 0x04]), None);

    // MOV to CS is not a thing.
    assert_eq!(decode(&[0x8E, 0xC8]), None);
}

#[test]
fn truncated_instructions_do_not_decode() {
    assert_eq!(decode(&[]), None);
    assert_eq!(decode(&[0xB8]), None);
    assert_eq!(decode(&[0xB8, 0x34]), None);
    assert_eq!(decode(&[0xE8, 0x01]), None);
    assert_eq!(decode(&[0xC1, 0xC3]), None);
}
