use core::fmt;

/// Represents the outcome of booting one image.
#[derive(Debug, Clone)]
pub struct BootReport {
    /// Bytes the guest wrote through the teletype service, in order.
    pub transcript: Vec<u8>,

    /// Instructions executed, including the halting one.
    pub steps: usize,

    /// Whether the guest reached its halt, as opposed to running out of
    /// the step budget.
    pub halted: bool,

    /// Video mode the guest selected, if it did.
    pub video_mode: Option<u8>,
}

impl BootReport {
    /// The transcript as text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.transcript).into_owned()
    }
}

impl fmt::Display for BootReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Boot Report ===")?;
        writeln!(f, "Halted: {}", self.halted)?;
        writeln!(f, "Steps: {}", self.steps)?;
        match self.video_mode {
            Some(mode) => writeln!(f, "Video mode: 0x{:02X}", mode)?,
            None => writeln!(f, "Video mode: unchanged")?,
        }
        writeln!(f, "Output ({} bytes):", self.transcript.len())?;
        writeln!(f, "{}", self.text())?;
        writeln!(f, "Raw: {}", hex::encode(&self.transcript))?;
        Ok(())
    }
}
