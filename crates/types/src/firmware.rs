//! Firmware interrupt numbers used by the boot sector.

/// Video services interrupt.
pub const INT_VIDEO: u8 = 0x10;

/// INT 0x10 / AH=0x0E: teletype output. Writes the character in AL to the
/// active display page and advances the cursor.
pub const VIDEO_TELETYPE: u8 = 0x0E;

/// INT 0x10 / AH=0x00: set video mode to the mode number in AL.
pub const VIDEO_SET_MODE: u8 = 0x00;

/// 80x25 16-color text mode, selected by the entry code before printing.
pub const TEXT_MODE_80X25: u8 = 0x03;

/// Drive number firmware leaves in DL when handing off to the sector.
pub const BOOT_DRIVE: u8 = 0x80;
