use core::any::Any;
use types::firmware::{INT_VIDEO, VIDEO_SET_MODE, VIDEO_TELETYPE};
use vm::firmware::Firmware;
use vm::flags::Flags;
use vm::registers::Reg16;

/// Test firmware that records teletype writes and mode changes.
#[derive(Debug, Default)]
pub struct CaptureFirmware {
    pub written: Vec<u8>,
    pub modes: Vec<u8>,
}

impl Firmware for CaptureFirmware {
    fn interrupt(&mut self, vector: u8, regs: &mut [u16; 8], _flags: &mut Flags) {
        if vector != INT_VIDEO {
            return;
        }
        let ax = regs[Reg16::Ax as usize];
        match (ax >> 8) as u8 {
            VIDEO_TELETYPE => self.written.push(ax as u8),
            VIDEO_SET_MODE => self.modes.push(ax as u8),
            _ => {}
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn capture(machine: &vm::Machine) -> &CaptureFirmware {
    machine
        .cpu
        .firmware
        .as_any()
        .downcast_ref::<CaptureFirmware>()
        .expect("test machine uses CaptureFirmware")
}

/// Teletype bytes the capture firmware saw.
pub fn written(machine: &vm::Machine) -> Vec<u8> {
    capture(machine).written.clone()
}

/// Video modes the capture firmware saw.
#[allow(dead_code)]
pub fn modes(machine: &vm::Machine) -> Vec<u8> {
    capture(machine).modes.clone()
}
