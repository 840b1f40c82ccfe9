use core::any::Any;
use types::firmware::{INT_VIDEO, VIDEO_SET_MODE, VIDEO_TELETYPE};
use vm::firmware::Firmware;
use vm::flags::Flags;
use vm::registers::Reg16;

/// The captured display: firmware video services backed by a byte log.
///
/// Teletype output (AH=0x0E) appends the character in AL to the transcript;
/// set-mode (AH=0x00) records the requested mode. Every other vector and
/// function is absorbed silently, the way firmware absorbs calls the sector
/// never checks the results of.
#[derive(Debug, Default)]
pub struct Display {
    /// Every byte written through the teletype service, in order.
    pub transcript: Vec<u8>,
    /// The most recently selected video mode, if any.
    pub video_mode: Option<u8>,
}

impl Display {
    /// The transcript as text (lossy; the guest writes raw bytes).
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.transcript).into_owned()
    }
}

impl Firmware for Display {
    fn interrupt(&mut self, vector: u8, regs: &mut [u16; 8], _flags: &mut Flags) {
        if vector != INT_VIDEO {
            return;
        }
        let ax = regs[Reg16::Ax as usize];
        match (ax >> 8) as u8 {
            VIDEO_TELETYPE => self.transcript.push(ax as u8),
            VIDEO_SET_MODE => self.video_mode = Some(ax as u8),
            _ => {}
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
