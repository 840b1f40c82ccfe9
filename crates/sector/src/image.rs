use types::sector::{BootSector, LOAD_ADDR};

/// Where a message landed in the image.
#[derive(Debug, Clone)]
pub struct MessageEntry {
    /// Image offset of the first byte of the message.
    pub offset: u16,
    /// The message body, without the terminating NUL.
    pub text: Vec<u8>,
}

/// Offsets of everything the builder placed, relative to the image start.
///
/// The map is informational: it never leaves the host, and the artifact on
/// disk carries no trace of it. It exists so tests and tooling can find the
/// subroutines and messages without disassembling the image.
#[derive(Debug, Clone)]
pub struct SectorMap {
    /// Entry point (always 0; firmware jumps to the first byte).
    pub entry: u16,
    /// First lowered print statement.
    pub body: u16,
    /// The terminal HLT of the idle loop.
    pub halt: u16,
    /// The string printer subroutine.
    pub print_string: u16,
    /// The unsigned decimal printer subroutine.
    pub print_decimal: u16,
    /// The hex-word printer subroutine.
    pub print_hex: u16,
    /// Every interned message, in table order.
    pub messages: Vec<MessageEntry>,
    /// First padding byte after code and data.
    pub code_end: u16,
}

impl SectorMap {
    /// Real-mode address of a mapped message (the value the lowered
    /// `mov si` carries).
    pub fn message_addr(&self, index: usize) -> u16 {
        LOAD_ADDR + self.messages[index].offset
    }
}

/// A built image together with its map.
#[derive(Debug, Clone)]
pub struct SectorImage {
    pub sector: BootSector,
    pub map: SectorMap,
}

/// Renders bytes as a 16-per-row hex dump with an ASCII gutter.
pub fn hexdump(bytes: &[u8]) -> String {
    let mut out = String::new();
    for (row, chunk) in bytes.chunks(16).enumerate() {
        let hex: Vec<String> = chunk.iter().map(|b| hex::encode([*b])).collect();

        let ascii: String = chunk
            .iter()
            .map(|&b| if b.is_ascii_graphic() { b as char } else { '.' })
            .collect();

        out.push_str(&format!("{:05x}  {:<47}  |{}|\n", row * 16, hex.join(" "), ascii));
    }
    out
}
