use crate::display::Display;
use crate::report::BootReport;
use types::sector::BootSector;
use vm::machine::Machine;

pub use vm::machine::DEFAULT_STEP_BUDGET;

/// Boots sector images on a fresh machine and reports what they printed.
pub struct BootRunner {
    pub machine: Machine,
}

impl BootRunner {
    pub fn new() -> Self {
        Self {
            machine: Machine::new(Box::new(Display::default())),
        }
    }

    /// Enables the per-instruction execution trace.
    pub fn with_trace(mut self, verbose: bool) -> Self {
        self.machine.cpu.verbose = verbose;
        self
    }

    /// Boots the sector and runs it to halt or step exhaustion.
    pub fn run(&mut self, sector: &BootSector, max_steps: usize) -> Result<BootReport, String> {
        self.machine.boot(sector)?;
        let steps = self.machine.run(max_steps);

        let display = self
            .display()
            .ok_or("machine firmware is not a Display")?;

        Ok(BootReport {
            transcript: display.transcript.clone(),
            steps,
            halted: self.machine.cpu.halted,
            video_mode: display.video_mode,
        })
    }

    /// The captured display behind the machine's firmware handler.
    pub fn display(&self) -> Option<&Display> {
        self.machine.cpu.firmware.as_any().downcast_ref::<Display>()
    }
}

impl Default for BootRunner {
    fn default() -> Self {
        Self::new()
    }
}
