use crate::decoder::decode;
use crate::firmware::Firmware;
use crate::flags::Flags;
use crate::instruction::Instruction;
use crate::memory::{phys, Memory};
use crate::registers::{Reg16, Reg8, SegReg};

/// The 16-bit real-mode CPU of the virtual machine.
///
/// This models the execution state a boot sector sees the moment firmware
/// jumps to it: eight general-purpose registers, four segment registers, an
/// instruction pointer, and a handful of FLAGS bits. Real mode has no
/// protection and no paging; every address is segment * 16 + offset onto a
/// 20-bit bus.
///
/// The core is interpretive: each step fetches bytes at CS:IP, decodes one
/// instruction, and executes it. Software interrupts are not vectored
/// through a guest interrupt table; they are handed to the pluggable
/// [`Firmware`] handler, which plays the role the BIOS plays for the real
/// artifact.
///
/// A CPU that executes HLT while the interrupt flag is clear can never be
/// woken, so the core latches `halted` and refuses further steps. This is
/// how the sector's terminal `cli; hlt` idle loop ends a run cleanly.
#[derive(Debug)]
pub struct Cpu {
    /// Instruction pointer, relative to CS.
    pub ip: u16,

    /// General-purpose registers AX..DI, indexed by their encoding number.
    /// The 8-bit registers are views into the low/high bytes of the first
    /// four.
    pub regs: [u16; 8],

    /// Segment registers ES/CS/SS/DS, indexed by their encoding number.
    pub segs: [u16; 4],

    /// The FLAGS bits the sector's control flow depends on.
    pub flags: Flags,

    /// Latched once HLT executes with interrupts disabled.
    pub halted: bool,

    /// Enable the per-instruction trace (CS:IP, raw bytes, mnemonic).
    pub verbose: bool,

    /// Host-side interrupt services.
    pub firmware: Box<dyn Firmware>,
}

impl Cpu {
    /// Creates a CPU in the power-on state: everything zero, flags clear.
    pub fn new(firmware: Box<dyn Firmware>) -> Self {
        Self {
            ip: 0,
            regs: [0; 8],
            segs: [0; 4],
            flags: Flags::default(),
            halted: false,
            verbose: false,
            firmware,
        }
    }

    /// Executes a single instruction cycle (fetch, decode, execute).
    ///
    /// Returns true if execution should continue, false once the CPU has
    /// halted. Bytes that do not decode are a fatal condition: the guest
    /// image is broken and there is nothing sensible to resume into, so the
    /// core reports them with a hex dump rather than skipping ahead.
    pub fn step(&mut self, memory: &mut Memory) -> bool {
        if self.halted {
            return false;
        }

        match self.next_instruction(memory) {
            Some((instr, size)) => self.run_instruction(instr, size, memory),
            None => self.unknown_instruction(memory),
        }
    }

    /// Executes one decoded instruction and settles the instruction pointer.
    ///
    /// IP only advances by the instruction size if the instruction did not
    /// redirect control itself; calls, returns, and taken jumps set IP to
    /// their target directly.
    fn run_instruction(&mut self, instr: Instruction, size: u8, memory: &mut Memory) -> bool {
        if self.verbose {
            let pc = phys(self.segs[SegReg::Cs as usize], self.ip);
            if let Some(bytes) = memory.mem_slice(pc, pc + size as usize) {
                let hex_bytes = bytes
                    .iter()
                    .map(|b| format!("{:02x}", b))
                    .collect::<Vec<_>>()
                    .join(" ");
                println!(
                    "CS:IP = {:04x}:{:04x}, Bytes = [{}], Instr = {}",
                    self.segs[SegReg::Cs as usize],
                    self.ip,
                    hex_bytes,
                    instr.pretty_print()
                );
            }
        }

        let old_ip = self.ip;
        let result = self.execute(instr, size, memory);

        if self.ip == old_ip {
            self.ip = self.ip.wrapping_add(size as u16);
        }
        result
    }

    /// Fetches and decodes the instruction at CS:IP.
    fn next_instruction(&self, memory: &Memory) -> Option<(Instruction, u8)> {
        let pc = phys(self.segs[SegReg::Cs as usize], self.ip);
        // Longest encoding in the subset is 3 bytes; fetch a 4-byte window.
        let end = (pc + 4).min(memory.size());
        let bytes = memory.mem_slice(pc, end)?;
        decode(bytes)
    }

    /// Reports bytes that do not decode, with a hex dump for debugging.
    fn unknown_instruction(&mut self, memory: &Memory) -> bool {
        let pc = phys(self.segs[SegReg::Cs as usize], self.ip);
        if let Some(bytes) = memory.mem_slice(pc, (pc + 4).min(memory.size())) {
            let hex_dump = bytes
                .iter()
                .map(|b| format!("{:02x}", b))
                .collect::<Vec<_>>()
                .join(" ");
            panic!(
                "🚨 Unknown or invalid instruction at CS:IP = {:04x}:{:04x} (bytes: [{}])",
                self.segs[SegReg::Cs as usize],
                self.ip,
                hex_dump
            );
        } else {
            panic!(
                "🚨 Unknown or invalid instruction at CS:IP = {:04x}:{:04x} (could not read memory)",
                self.segs[SegReg::Cs as usize],
                self.ip
            );
        }
    }

    /// Reads an 8-bit register: 0-3 are low bytes, 4-7 high bytes of AX..BX.
    pub fn read_r8(&self, reg: Reg8) -> u8 {
        let idx = reg as usize;
        if idx < 4 {
            self.regs[idx] as u8
        } else {
            (self.regs[idx - 4] >> 8) as u8
        }
    }

    /// Writes an 8-bit register, leaving the other half of the word intact.
    pub fn write_r8(&mut self, reg: Reg8, val: u8) {
        let idx = reg as usize;
        if idx < 4 {
            self.regs[idx] = (self.regs[idx] & 0xFF00) | val as u16;
        } else {
            self.regs[idx - 4] = (self.regs[idx - 4] & 0x00FF) | ((val as u16) << 8);
        }
    }

    fn push16(&mut self, memory: &mut Memory, val: u16) {
        let sp = self.regs[Reg16::Sp as usize].wrapping_sub(2);
        self.regs[Reg16::Sp as usize] = sp;
        memory.store_u16(phys(self.segs[SegReg::Ss as usize], sp), val);
    }

    fn pop16(&mut self, memory: &Memory) -> u16 {
        let sp = self.regs[Reg16::Sp as usize];
        let val = memory.load_u16(phys(self.segs[SegReg::Ss as usize], sp));
        self.regs[Reg16::Sp as usize] = sp.wrapping_add(2);
        val
    }

    /// Resolves a relative branch: target = IP after this instruction + rel.
    fn jump_rel(&mut self, size: u8, rel: i16) {
        self.ip = self.ip.wrapping_add(size as u16).wrapping_add(rel as u16);
    }

    /// Executes a decoded instruction.
    ///
    /// Flags are computed only where the sector's control flow consumes
    /// them: the zero flag for TEST/JZ loops, the carry flag for the
    /// digit-or-letter compare in the hex printer, CX for LOOP. DIV faults
    /// (zero divisor, quotient overflow) are fatal, mirroring the unguarded
    /// arithmetic of the artifact itself.
    ///
    /// Returns true to continue execution, false to halt.
    pub fn execute(&mut self, instr: Instruction, size: u8, memory: &mut Memory) -> bool {
        match instr {
            // Data movement
            Instruction::MovR16Imm { reg, imm } => self.regs[reg as usize] = imm,
            Instruction::MovR8Imm { reg, imm } => self.write_r8(reg, imm),
            Instruction::MovR16R16 { dst, src } => self.regs[dst as usize] = self.regs[src as usize],
            Instruction::MovSregR16 { sreg, src } => {
                self.segs[sreg as usize] = self.regs[src as usize]
            }

            // ALU
            Instruction::XorR16 { dst, src } => {
                let v = self.regs[dst as usize] ^ self.regs[src as usize];
                self.regs[dst as usize] = v;
                self.flags.set_logic16(v);
            }
            Instruction::AndAxImm { imm } => {
                let v = self.regs[Reg16::Ax as usize] & imm;
                self.regs[Reg16::Ax as usize] = v;
                self.flags.set_logic16(v);
            }
            Instruction::AddAlImm { imm } => {
                let (sum, carry) = self.read_r8(Reg8::Al).overflowing_add(imm);
                self.write_r8(Reg8::Al, sum);
                self.flags.carry = carry;
                self.flags.zero = sum == 0;
                self.flags.sign = sum & 0x80 != 0;
            }
            Instruction::CmpAlImm { imm } => {
                // Compare is a subtract that only keeps the flags.
                let al = self.read_r8(Reg8::Al);
                self.flags.carry = al < imm;
                self.flags.zero = al == imm;
                self.flags.sign = al.wrapping_sub(imm) & 0x80 != 0;
            }
            Instruction::TestR8 { a, b } => {
                let v = self.read_r8(a) & self.read_r8(b);
                self.flags.set_logic8(v);
            }
            Instruction::TestR16 { a, b } => {
                let v = self.regs[a as usize] & self.regs[b as usize];
                self.flags.set_logic16(v);
            }
            Instruction::DivR16 { src } => {
                // Unsigned divide of the 32-bit pair DX:AX. The artifact
                // always clears DX and divides by a constant, but a fault
                // here is still a fault.
                let divisor = self.regs[src as usize] as u32;
                let dividend = ((self.regs[Reg16::Dx as usize] as u32) << 16)
                    | self.regs[Reg16::Ax as usize] as u32;
                if divisor == 0 {
                    panic!("🚨 divide error (divisor is zero) at IP = 0x{:04x}", self.ip);
                }
                let quotient = dividend / divisor;
                if quotient > 0xFFFF {
                    panic!("🚨 divide error (quotient overflow) at IP = 0x{:04x}", self.ip);
                }
                self.regs[Reg16::Ax as usize] = quotient as u16;
                self.regs[Reg16::Dx as usize] = (dividend % divisor) as u16;
            }
            Instruction::IncR16 { reg } => {
                // INC leaves the carry flag alone.
                let v = self.regs[reg as usize].wrapping_add(1);
                self.regs[reg as usize] = v;
                self.flags.zero = v == 0;
                self.flags.sign = v & 0x8000 != 0;
            }
            Instruction::RolR16Imm { reg, count } => {
                let c = (count & 0x1F) as u32;
                let v = self.regs[reg as usize].rotate_left(c);
                self.regs[reg as usize] = v;
                if c != 0 {
                    self.flags.carry = v & 1 != 0;
                }
            }

            // Stack
            Instruction::PushR16 { reg } => {
                let val = self.regs[reg as usize];
                self.push16(memory, val);
            }
            Instruction::PopR16 { reg } => {
                let val = self.pop16(memory);
                self.regs[reg as usize] = val;
            }
            Instruction::Pusha => {
                // Push order: AX, CX, DX, BX, original SP, BP, SI, DI.
                let sp_before = self.regs[Reg16::Sp as usize];
                for reg in [Reg16::Ax, Reg16::Cx, Reg16::Dx, Reg16::Bx] {
                    let val = self.regs[reg as usize];
                    self.push16(memory, val);
                }
                self.push16(memory, sp_before);
                for reg in [Reg16::Bp, Reg16::Si, Reg16::Di] {
                    let val = self.regs[reg as usize];
                    self.push16(memory, val);
                }
            }
            Instruction::Popa => {
                // Reverse of PUSHA; the stored SP is popped and discarded.
                for reg in [Reg16::Di, Reg16::Si, Reg16::Bp] {
                    let val = self.pop16(memory);
                    self.regs[reg as usize] = val;
                }
                let _discarded_sp = self.pop16(memory);
                for reg in [Reg16::Bx, Reg16::Dx, Reg16::Cx, Reg16::Ax] {
                    let val = self.pop16(memory);
                    self.regs[reg as usize] = val;
                }
            }

            // String ops
            Instruction::Lodsb => {
                let si = self.regs[Reg16::Si as usize];
                let byte = memory.load_byte(phys(self.segs[SegReg::Ds as usize], si));
                self.write_r8(Reg8::Al, byte);
                self.regs[Reg16::Si as usize] = if self.flags.direction {
                    si.wrapping_sub(1)
                } else {
                    si.wrapping_add(1)
                };
            }

            // Control flow
            Instruction::CallNear { rel } => {
                let ret = self.ip.wrapping_add(size as u16);
                self.push16(memory, ret);
                self.ip = ret.wrapping_add(rel as u16);
                return true;
            }
            Instruction::Ret => {
                self.ip = self.pop16(memory);
                return true;
            }
            Instruction::JmpShort { rel } => {
                self.jump_rel(size, rel as i16);
                return true;
            }
            Instruction::Jz { rel } => {
                if self.flags.zero {
                    self.jump_rel(size, rel as i16);
                    return true;
                }
            }
            Instruction::Jnz { rel } => {
                if !self.flags.zero {
                    self.jump_rel(size, rel as i16);
                    return true;
                }
            }
            Instruction::Jb { rel } => {
                if self.flags.carry {
                    self.jump_rel(size, rel as i16);
                    return true;
                }
            }
            Instruction::Loop { rel } => {
                let cx = self.regs[Reg16::Cx as usize].wrapping_sub(1);
                self.regs[Reg16::Cx as usize] = cx;
                if cx != 0 {
                    self.jump_rel(size, rel as i16);
                    return true;
                }
            }

            // System
            Instruction::Int { vector } => {
                self.firmware.interrupt(vector, &mut self.regs, &mut self.flags);
            }
            Instruction::Cli => self.flags.interrupt = false,
            Instruction::Sti => self.flags.interrupt = true,
            Instruction::Cld => self.flags.direction = false,
            Instruction::Hlt => {
                // With no interrupt sources modeled there is nothing to wake
                // a halted CPU, IF set or not; the run is over either way.
                self.halted = true;
                return false;
            }
            Instruction::Nop => {}
        }
        true
    }
}
