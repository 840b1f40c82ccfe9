//! Boot-sector geometry shared between the builder and the machine.
//!
//! These constants live in `types` so both sides agree on the artifact
//! format without depending on each other.

use alloc::format;
use alloc::string::String;
use core::fmt;

/// Total size of a boot sector in bytes.
pub const SECTOR_SIZE: usize = 512;

/// Bytes available for code and data; the last two hold the signature.
pub const PAYLOAD_SIZE: usize = 510;

/// Signature word stored little-endian in the final two bytes
/// (byte 510 = 0x55, byte 511 = 0xAA).
pub const BOOT_SIGNATURE: u16 = 0xAA55;

/// Physical address where firmware loads the sector and jumps to it.
pub const LOAD_ADDR: u16 = 0x7C00;

/// A complete 512-byte boot sector, immutable once assembled.
#[derive(Clone)]
pub struct BootSector(pub [u8; SECTOR_SIZE]);

impl BootSector {
    pub fn new(bytes: [u8; SECTOR_SIZE]) -> Self {
        Self(bytes)
    }

    /// Wraps a byte slice, requiring the exact sector length.
    pub fn from_bytes(slice: &[u8]) -> Result<Self, String> {
        if slice.len() != SECTOR_SIZE {
            return Err(format!(
                "boot sector must be exactly {} bytes, got {}",
                SECTOR_SIZE,
                slice.len()
            ));
        }
        let mut bytes = [0u8; SECTOR_SIZE];
        bytes.copy_from_slice(slice);
        Ok(Self(bytes))
    }

    /// The signature word read from the final two bytes.
    pub fn signature(&self) -> u16 {
        u16::from_le_bytes([self.0[SECTOR_SIZE - 2], self.0[SECTOR_SIZE - 1]])
    }

    /// Whether firmware would accept this sector as bootable.
    pub fn is_signed(&self) -> bool {
        self.signature() == BOOT_SIGNATURE
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for BootSector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BootSector {{ signature: 0x{:04X}, signed: {} }}",
            self.signature(),
            self.is_signed()
        )
    }
}
