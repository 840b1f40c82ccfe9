use crate::flags::Flags;
use core::any::Any;
use std::fmt::Debug;

/// Trait implemented by firmware interrupt handlers consumed by the CPU.
///
/// INT is serviced at the host level: instead of vectoring through a guest
/// interrupt table, the CPU hands the vector number and its live register
/// file to this handler, the way a syscall layer backs an interpretive VM.
/// The boot sector only ever raises the video interrupt, but the handler
/// sees every vector and decides what, if anything, happens.
///
/// Handlers stay silent on vectors and functions they do not implement;
/// the sector's code never checks for firmware errors, so there are none
/// to signal.
pub trait Firmware: Debug {
    fn interrupt(&mut self, vector: u8, regs: &mut [u16; 8], flags: &mut Flags);
    fn as_any(&self) -> &dyn Any;
}

/// Firmware that absorbs every interrupt without effect.
#[derive(Debug, Default)]
pub struct NullFirmware;

impl Firmware for NullFirmware {
    fn interrupt(&mut self, _vector: u8, _regs: &mut [u16; 8], _flags: &mut Flags) {}

    fn as_any(&self) -> &dyn Any {
        self
    }
}
