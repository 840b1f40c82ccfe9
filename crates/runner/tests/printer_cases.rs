use once_cell::sync::Lazy;
use runner::BootRunner;
use sector::{Script, SectorBuilder};
use vm::machine::DEFAULT_STEP_BUDGET;

/// Every image ends by announcing the halt; expected transcripts below are
/// what the script itself printed before that.
const HALT_NOTICE: &str = "\r\nSystem halted.";

#[derive(Debug)]
pub struct TestCase<'a> {
    pub name: &'a str,
    pub script: Script,
    pub expected: &'a str,
}

pub static TEST_CASES: Lazy<Vec<TestCase<'static>>> = Lazy::new(|| {
    vec![
        TestCase {
            name: "decimal mid-range",
            script: Script::new().decimal(42),
            expected: "42",
        },
        TestCase {
            name: "decimal zero still prints one digit",
            script: Script::new().decimal(0),
            expected: "0",
        },
        TestCase {
            name: "decimal full width",
            script: Script::new().decimal(65535),
            expected: "65535",
        },
        TestCase {
            name: "decimal single digit",
            script: Script::new().decimal(7),
            expected: "7",
        },
        TestCase {
            name: "hex low byte",
            script: Script::new().hex(0x00FF),
            expected: "00FF",
        },
        TestCase {
            name: "hex letters in every position",
            script: Script::new().hex(0xABCD),
            expected: "ABCD",
        },
        TestCase {
            name: "hex zero pads to four digits",
            script: Script::new().hex(0x0000),
            expected: "0000",
        },
        TestCase {
            name: "empty text prints nothing",
            script: Script::new().text(""),
            expected: "",
        },
        TestCase {
            name: "text then value",
            script: Script::new().text("n=").decimal(7),
            expected: "n=7",
        },
        TestCase {
            name: "newline between values",
            script: Script::new().decimal(1).newline().decimal(2),
            expected: "1\r\n2",
        },
        TestCase {
            name: "mixed printers back to back",
            script: Script::new().decimal(256).text(" = 0x").hex(0x0100),
            expected: "256 = 0x0100",
        },
    ]
});

#[test]
fn printer_cases() {
    for case in TEST_CASES.iter() {
        let image = SectorBuilder::build(&case.script)
            .unwrap_or_else(|e| panic!("{}: build failed: {}", case.name, e));

        let mut boot_runner = BootRunner::new();
        let report = boot_runner
            .run(&image.sector, DEFAULT_STEP_BUDGET)
            .unwrap_or_else(|e| panic!("{}: boot failed: {}", case.name, e));

        assert!(report.halted, "{}: did not halt", case.name);
        assert_eq!(
            report.text(),
            format!("{}{}", case.expected, HALT_NOTICE),
            "{}",
            case.name
        );
    }
}
