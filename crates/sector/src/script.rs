/// One print statement of the boot-sector program.
///
/// This is the whole "language": a script is a fixed sequence of these,
/// lowered by the builder into calls to the three printing subroutines.
/// There is nothing to parse and no control flow to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintOp {
    /// Print a literal string via the string printer.
    Text(String),
    /// Print an unsigned 16-bit value in decimal.
    Decimal(u16),
    /// Print a 16-bit value as four uppercase hex digits.
    Hex(u16),
    /// Print a carriage-return/line-feed pair.
    Newline,
}

/// An ordered print program for the sector builder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    pub ops: Vec<PrintOp>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, s: &str) -> Self {
        self.ops.push(PrintOp::Text(s.to_string()));
        self
    }

    pub fn decimal(mut self, value: u16) -> Self {
        self.ops.push(PrintOp::Decimal(value));
        self
    }

    pub fn hex(mut self, value: u16) -> Self {
        self.ops.push(PrintOp::Hex(value));
        self
    }

    pub fn newline(mut self) -> Self {
        self.ops.push(PrintOp::Newline);
        self
    }

    /// The reference program: a welcome banner, one value through each
    /// printer, and labels naming what each call produced.
    pub fn demo() -> Self {
        Script::new()
            .text("Welcome to the demo boot sector!")
            .newline()
            .text("decimal: ")
            .decimal(42)
            .newline()
            .text("hex: ")
            .hex(0x00FF)
            .newline()
    }
}
