//! Lowers a print script into the 512-byte boot-sector image.
//!
//! The layout is fixed: entry code, one load/call pair per print statement,
//! the halt tail, the three subroutines, the message table, zero padding,
//! and the signature word. Calls and message loads are emitted with
//! placeholder immediates and patched once every offset is known.

use crate::image::{MessageEntry, SectorImage, SectorMap};
use crate::script::{PrintOp, Script};
use types::firmware::TEXT_MODE_80X25;
use types::sector::{BootSector, LOAD_ADDR, PAYLOAD_SIZE, SECTOR_SIZE};

/// The three leaf subroutines every image carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Routine {
    PrintString = 0,
    PrintDecimal = 1,
    PrintHex = 2,
}

#[derive(Debug, Clone, Copy)]
enum FixupTarget {
    /// Patch a CALL displacement to reach the routine.
    Call(Routine),
    /// Patch a MOV SI immediate with the real-mode address of a message.
    MessageAddr(usize),
}

/// A 16-bit immediate field to patch once layout is final.
#[derive(Debug, Clone, Copy)]
struct Fixup {
    at: usize,
    target: FixupTarget,
}

pub struct SectorBuilder {
    image: [u8; SECTOR_SIZE],
    position: usize,
    fixups: Vec<Fixup>,
    messages: Vec<Vec<u8>>,
    message_offsets: Vec<u16>,
    routine_offsets: [u16; 3],
    body: u16,
    halt: u16,
}

impl SectorBuilder {
    fn new() -> Self {
        Self {
            image: [0u8; SECTOR_SIZE],
            position: 0,
            fixups: Vec::new(),
            messages: Vec::new(),
            message_offsets: Vec::new(),
            routine_offsets: [0; 3],
            body: 0,
            halt: 0,
        }
    }

    /// Builds the complete image for a script.
    pub fn build(script: &Script) -> Result<SectorImage, String> {
        let mut b = SectorBuilder::new();

        b.emit_entry()?;
        b.body = b.position as u16;
        for op in &script.ops {
            b.emit_op(op)?;
        }
        b.emit_halt_tail()?;

        b.emit_print_string()?;
        b.emit_print_decimal()?;
        b.emit_print_hex()?;
        b.emit_messages()?;
        let code_end = b.position as u16;

        b.apply_fixups();

        // Padding is already zero; the signature closes the sector.
        b.image[SECTOR_SIZE - 2] = 0x55;
        b.image[SECTOR_SIZE - 1] = 0xAA;

        let map = SectorMap {
            entry: 0,
            body: b.body,
            halt: b.halt,
            print_string: b.routine_offsets[Routine::PrintString as usize],
            print_decimal: b.routine_offsets[Routine::PrintDecimal as usize],
            print_hex: b.routine_offsets[Routine::PrintHex as usize],
            messages: b
                .message_offsets
                .iter()
                .zip(b.messages.iter())
                .map(|(&offset, text)| MessageEntry { offset, text: text.clone() })
                .collect(),
            code_end,
        };

        Ok(SectorImage { sector: BootSector::new(b.image), map })
    }

    /// Appends raw bytes, refusing to spill into the signature.
    fn emit(&mut self, bytes: &[u8]) -> Result<(), String> {
        if self.position + bytes.len() > PAYLOAD_SIZE {
            return Err(format!(
                "sector overflow: {} code/data bytes exceed the {} available",
                self.position + bytes.len(),
                PAYLOAD_SIZE
            ));
        }
        self.image[self.position..self.position + bytes.len()].copy_from_slice(bytes);
        self.position += bytes.len();
        Ok(())
    }

    // ========== ENTRY ==========

    /// Firmware guarantees nothing about segments, so the entry builds a
    /// flat 0000 base with the stack growing down from the load address,
    /// then selects text mode. Interrupts stay off for the handful of
    /// instructions where SS:SP is torn.
    fn emit_entry(&mut self) -> Result<(), String> {
        self.emit(&[0xFA])?; // CLI
        self.emit(&[0x31, 0xC0])?; // XOR AX, AX
        self.emit(&[0x8E, 0xD8])?; // MOV DS, AX
        self.emit(&[0x8E, 0xC0])?; // MOV ES, AX
        self.emit(&[0x8E, 0xD0])?; // MOV SS, AX
        self.emit(&[0xBC, 0x00, 0x7C])?; // MOV SP, 0x7C00
        self.emit(&[0xFB])?; // STI
        self.emit(&[0xFC])?; // CLD
        self.emit(&[0xB8, TEXT_MODE_80X25, 0x00])?; // MOV AX, 0x0003
        self.emit(&[0xCD, 0x10])?; // INT 0x10 (set 80x25 text mode)
        Ok(())
    }

    // ========== BODY ==========

    fn emit_op(&mut self, op: &PrintOp) -> Result<(), String> {
        match op {
            PrintOp::Text(s) => {
                if s.as_bytes().contains(&0) {
                    return Err("text op contains a NUL byte".to_string());
                }
                let index = self.intern_message(s.as_bytes());
                self.emit_load_message(index)?;
                self.emit_call(Routine::PrintString)
            }
            PrintOp::Decimal(value) => {
                self.emit_load_ax(*value)?;
                self.emit_call(Routine::PrintDecimal)
            }
            PrintOp::Hex(value) => {
                self.emit_load_ax(*value)?;
                self.emit_call(Routine::PrintHex)
            }
            PrintOp::Newline => {
                let index = self.intern_message(b"\r\n");
                self.emit_load_message(index)?;
                self.emit_call(Routine::PrintString)
            }
        }
    }

    fn emit_load_ax(&mut self, value: u16) -> Result<(), String> {
        let [lo, hi] = value.to_le_bytes();
        self.emit(&[0xB8, lo, hi]) // MOV AX, imm16
    }

    fn emit_load_message(&mut self, index: usize) -> Result<(), String> {
        let at = self.position + 1;
        self.emit(&[0xBE, 0x00, 0x00])?; // MOV SI, msg (patched)
        self.fixups.push(Fixup { at, target: FixupTarget::MessageAddr(index) });
        Ok(())
    }

    fn emit_call(&mut self, routine: Routine) -> Result<(), String> {
        let at = self.position + 1;
        self.emit(&[0xE8, 0x00, 0x00])?; // CALL routine (patched)
        self.fixups.push(Fixup { at, target: FixupTarget::Call(routine) });
        Ok(())
    }

    /// Announce the halt, then park the CPU: interrupts off, HLT, and a
    /// jump back onto the HLT should anything ever resume it. The idle
    /// loop is the program's intended end, not an error path.
    fn emit_halt_tail(&mut self) -> Result<(), String> {
        let index = self.intern_message(b"\r\nSystem halted.");
        self.emit_load_message(index)?;
        self.emit_call(Routine::PrintString)?;
        self.emit(&[0xFA])?; // CLI
        self.halt = self.position as u16;
        self.emit(&[0xF4])?; // HLT
        self.emit(&[0xEB, 0xFD])?; // JMP back to the HLT
        Ok(())
    }

    // ========== SUBROUTINES ==========

    /// Walks the NUL-terminated string at DS:SI, one teletype call per
    /// byte. AH is loaded once up front; the video interrupt preserves it.
    fn emit_print_string(&mut self) -> Result<(), String> {
        self.routine_offsets[Routine::PrintString as usize] = self.position as u16;
        self.emit(&[0x60])?; // PUSHA
        self.emit(&[0xB4, 0x0E])?; // MOV AH, 0x0E
        self.emit(&[0xAC])?; // .loop: LODSB
        self.emit(&[0x84, 0xC0])?; // TEST AL, AL
        self.emit(&[0x74, 0x04])?; // JZ .done
        self.emit(&[0xCD, 0x10])?; // INT 0x10 (teletype)
        self.emit(&[0xEB, 0xF7])?; // JMP .loop
        self.emit(&[0x61])?; // .done: POPA
        self.emit(&[0xC3])?; // RET
        Ok(())
    }

    /// Prints AX in decimal by repeated division by ten. Remainders are
    /// pushed least-significant first and popped back out most-significant
    /// first. The zero test sits after the divide, so the loop body runs at
    /// least once and an input of zero still prints one '0'.
    fn emit_print_decimal(&mut self) -> Result<(), String> {
        self.routine_offsets[Routine::PrintDecimal as usize] = self.position as u16;
        self.emit(&[0x60])?; // PUSHA
        self.emit(&[0xB9, 0x00, 0x00])?; // MOV CX, 0
        self.emit(&[0xBB, 0x0A, 0x00])?; // MOV BX, 10
        self.emit(&[0x31, 0xD2])?; // .div_loop: XOR DX, DX
        self.emit(&[0xF7, 0xF3])?; // DIV BX
        self.emit(&[0x52])?; // PUSH DX
        self.emit(&[0x41])?; // INC CX
        self.emit(&[0x85, 0xC0])?; // TEST AX, AX
        self.emit(&[0x75, 0xF6])?; // JNZ .div_loop
        self.emit(&[0x58])?; // .print_loop: POP AX
        self.emit(&[0x04, 0x30])?; // ADD AL, '0'
        self.emit(&[0xB4, 0x0E])?; // MOV AH, 0x0E
        self.emit(&[0xCD, 0x10])?; // INT 0x10 (teletype)
        self.emit(&[0xE2, 0xF7])?; // LOOP .print_loop
        self.emit(&[0x61])?; // POPA
        self.emit(&[0xC3])?; // RET
        Ok(())
    }

    /// Prints AX as four uppercase hex digits, most significant first:
    /// rotate left by a nibble, mask, then branch on digit-versus-letter
    /// before adding the ASCII base.
    fn emit_print_hex(&mut self) -> Result<(), String> {
        self.routine_offsets[Routine::PrintHex as usize] = self.position as u16;
        self.emit(&[0x60])?; // PUSHA
        self.emit(&[0x89, 0xC3])?; // MOV BX, AX
        self.emit(&[0xB9, 0x04, 0x00])?; // MOV CX, 4
        self.emit(&[0xC1, 0xC3, 0x04])?; // .digit_loop: ROL BX, 4
        self.emit(&[0x89, 0xD8])?; // MOV AX, BX
        self.emit(&[0x25, 0x0F, 0x00])?; // AND AX, 0x000F
        self.emit(&[0x3C, 0x0A])?; // CMP AL, 10
        self.emit(&[0x72, 0x02])?; // JB .emit
        self.emit(&[0x04, 0x07])?; // ADD AL, 'A' - '9' - 1
        self.emit(&[0x04, 0x30])?; // .emit: ADD AL, '0'
        self.emit(&[0xB4, 0x0E])?; // MOV AH, 0x0E
        self.emit(&[0xCD, 0x10])?; // INT 0x10 (teletype)
        self.emit(&[0xE2, 0xEA])?; // LOOP .digit_loop
        self.emit(&[0x61])?; // POPA
        self.emit(&[0xC3])?; // RET
        Ok(())
    }

    // ========== MESSAGE TABLE ==========

    fn intern_message(&mut self, body: &[u8]) -> usize {
        if let Some(index) = self.messages.iter().position(|m| m == body) {
            return index;
        }
        self.messages.push(body.to_vec());
        self.messages.len() - 1
    }

    fn emit_messages(&mut self) -> Result<(), String> {
        for index in 0..self.messages.len() {
            self.message_offsets.push(self.position as u16);
            let body = self.messages[index].clone();
            self.emit(&body)?;
            self.emit(&[0x00])?; // NUL terminator
        }
        Ok(())
    }

    // ========== FIXUPS ==========

    fn apply_fixups(&mut self) {
        for fixup in &self.fixups {
            let value: u16 = match fixup.target {
                FixupTarget::Call(routine) => {
                    // CALL rel16 is relative to the next instruction, which
                    // starts two bytes past the displacement field.
                    let target = self.routine_offsets[routine as usize] as i32;
                    let next = fixup.at as i32 + 2;
                    (target - next) as u16
                }
                FixupTarget::MessageAddr(index) => LOAD_ADDR + self.message_offsets[index],
            };
            self.image[fixup.at..fixup.at + 2].copy_from_slice(&value.to_le_bytes());
        }
    }
}

// ========== TESTS ==========

#[cfg(test)]
mod tests {
    use super::*;
    use types::sector::BOOT_SIGNATURE;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn demo_image_is_a_signed_sector() {
        let image = SectorBuilder::build(&Script::demo()).unwrap();

        assert_eq!(image.sector.as_bytes().len(), 512);
        assert_eq!(image.sector.as_bytes()[510], 0x55);
        assert_eq!(image.sector.as_bytes()[511], 0xAA);
        assert_eq!(image.sector.signature(), BOOT_SIGNATURE);
    }

    #[test]
    fn layout_is_ordered_inside_the_payload() {
        let image = SectorBuilder::build(&Script::demo()).unwrap();
        let map = &image.map;

        assert_eq!(map.entry, 0);
        assert!(map.body > 0);
        assert!(map.halt > map.body);
        assert!(map.print_string > map.halt);
        assert!(map.print_decimal > map.print_string);
        assert!(map.print_hex > map.print_decimal);
        assert!(map.code_end as usize <= PAYLOAD_SIZE);
    }

    #[test]
    fn entry_starts_with_segment_setup() {
        let image = SectorBuilder::build(&Script::demo()).unwrap();
        let bytes = image.sector.as_bytes();

        // cli; xor ax, ax; mov ds, ax
        assert_eq!(&bytes[0..5], &[0xFA, 0x31, 0xC0, 0x8E, 0xD8]);
    }

    #[test]
    fn message_references_point_at_the_table() {
        let image = SectorBuilder::build(&Script::demo()).unwrap();
        let bytes = image.sector.as_bytes();

        assert!(!image.map.messages.is_empty());
        for (index, entry) in image.map.messages.iter().enumerate() {
            // Every message is loaded somewhere via mov si, addr.
            let addr = image.map.message_addr(index);
            let needle = [0xBE, addr as u8, (addr >> 8) as u8];
            assert!(
                contains(bytes, &needle),
                "no mov si, 0x{:04X} found for message {}",
                addr,
                index
            );

            // And the table holds the NUL-terminated body at that offset.
            let offset = entry.offset as usize;
            assert_eq!(&bytes[offset..offset + entry.text.len()], &entry.text[..]);
            assert_eq!(bytes[offset + entry.text.len()], 0);
        }
    }

    #[test]
    fn repeated_messages_are_interned_once() {
        let image = SectorBuilder::build(&Script::demo()).unwrap();

        let newlines = image
            .map
            .messages
            .iter()
            .filter(|entry| entry.text == b"\r\n")
            .count();
        assert_eq!(newlines, 1);
    }

    #[test]
    fn oversized_script_is_rejected() {
        // Interning collapses identical strings, so vary the text to force
        // the table past the payload limit.
        let mut script = Script::new();
        for i in 0..64 {
            script = script.text(&format!("line {:02} with some filler text", i));
        }

        let err = SectorBuilder::build(&script).unwrap_err();
        assert!(err.contains("sector overflow"), "unexpected error: {}", err);
    }

    #[test]
    fn text_with_nul_is_rejected() {
        let script = Script::new().text("bad\0string");
        let err = SectorBuilder::build(&script).unwrap_err();
        assert!(err.contains("NUL"), "unexpected error: {}", err);
    }
}
