use crate::cpu::Cpu;
use crate::firmware::Firmware;
use crate::memory::{Memory, MEMORY_SIZE};
use crate::registers::Reg16;
use types::firmware::BOOT_DRIVE;
use types::sector::{BootSector, LOAD_ADDR};

/// Upper bound on instructions per run; generous for a sector that prints a
/// few dozen characters, small enough to stop a wedged image quickly.
pub const DEFAULT_STEP_BUDGET: usize = 1_000_000;

/// A complete guest machine: one CPU and its megabyte of memory.
pub struct Machine {
    pub cpu: Cpu,
    pub memory: Memory,
}

impl Machine {
    pub fn new(firmware: Box<dyn Firmware>) -> Self {
        Self {
            cpu: Cpu::new(firmware),
            memory: Memory::new(MEMORY_SIZE),
        }
    }

    /// Loads a boot sector and puts the CPU in the firmware handoff state:
    /// CS:IP = 0000:7C00, segments zeroed, DL holding the boot drive.
    ///
    /// Everything else is whatever firmware left behind; the sector's entry
    /// code is responsible for its own segment and stack setup, and the
    /// machine deliberately does not do it for them.
    pub fn boot(&mut self, sector: &BootSector) -> Result<(), String> {
        self.memory.load_sector(sector)?;

        self.cpu.segs = [0; 4];
        self.cpu.regs = [0; 8];
        self.cpu.regs[Reg16::Dx as usize] = BOOT_DRIVE as u16;
        self.cpu.ip = LOAD_ADDR;
        self.cpu.halted = false;
        Ok(())
    }

    /// Runs until the CPU halts or the step budget is spent.
    /// Returns the number of instructions executed.
    pub fn run(&mut self, max_steps: usize) -> usize {
        let mut steps = 0;
        while steps < max_steps {
            steps += 1;
            if !self.cpu.step(&mut self.memory) {
                break;
            }
        }
        steps
    }

    pub fn dump_registers(&self) {
        println!("--- Register Dump ---");
        const NAMES: [&str; 8] = ["ax", "cx", "dx", "bx", "sp", "bp", "si", "di"];
        for i in 0..8 {
            println!("{:<2} = 0x{:04x} ({})", NAMES[i], self.cpu.regs[i], self.cpu.regs[i]);
        }
        const SEG_NAMES: [&str; 4] = ["es", "cs", "ss", "ds"];
        for i in 0..4 {
            println!("{:<2} = 0x{:04x}", SEG_NAMES[i], self.cpu.segs[i]);
        }
        println!("ip = 0x{:04x}", self.cpu.ip);
        println!("flags = {:?}", self.cpu.flags);
        println!("---------------------");
    }

    pub fn dump_memory(&self, start: usize, end: usize) {
        assert!(start < end, "invalid memory range");
        assert!(end <= self.memory.size(), "range out of bounds");

        println!("--- Memory Dump ---");
        for addr in (start..end).step_by(16) {
            let line = self.memory.mem_slice(addr, end.min(addr + 16)).unwrap_or(&[]);

            let hex: Vec<String> = line.iter().map(|b| format!("{:02x}", b)).collect();
            let hex_str = hex.join(" ");

            let ascii: String = line
                .iter()
                .map(|&b| if b.is_ascii_graphic() { b as char } else { '.' })
                .collect();

            println!("{:05x}  {:<47}  |{}|", addr, hex_str, ascii);
        }
        println!("-------------------");
    }
}
