use runner::BootRunner;
use sector::{Script, SectorBuilder};
use types::sector::{BootSector, SECTOR_SIZE};
use vm::machine::DEFAULT_STEP_BUDGET;

#[test]
fn demo_boot_prints_everything_in_order_and_halts() {
    let image = SectorBuilder::build(&Script::demo()).unwrap();

    let mut boot_runner = BootRunner::new();
    let report = boot_runner.run(&image.sector, DEFAULT_STEP_BUDGET).unwrap();

    assert!(report.halted, "demo image should reach its halt");
    assert_eq!(report.video_mode, Some(0x03));

    let text = report.text();
    let banner = text.find("Welcome to the demo boot sector!").expect("banner missing");
    let decimal = text.find("decimal: 42").expect("decimal line missing");
    let hex = text.find("hex: 00FF").expect("hex line missing");
    assert!(banner < decimal && decimal < hex, "output out of script order: {:?}", text);

    assert!(text.ends_with("System halted."), "missing halt notice: {:?}", text);
}

#[test]
fn unsigned_image_is_refused_at_boot() {
    let blank = BootSector::new([0u8; SECTOR_SIZE]);

    let mut boot_runner = BootRunner::new();
    let err = boot_runner.run(&blank, DEFAULT_STEP_BUDGET).unwrap_err();
    assert!(err.contains("not bootable"), "unexpected error: {}", err);
}

#[test]
fn exhausted_step_budget_reports_not_halted() {
    let image = SectorBuilder::build(&Script::demo()).unwrap();

    let mut boot_runner = BootRunner::new();
    let report = boot_runner.run(&image.sector, 5).unwrap();
    assert!(!report.halted);
    assert_eq!(report.steps, 5);
}

#[test]
fn empty_script_still_boots_and_announces_the_halt() {
    let image = SectorBuilder::build(&Script::new()).unwrap();

    let mut boot_runner = BootRunner::new();
    let report = boot_runner.run(&image.sector, DEFAULT_STEP_BUDGET).unwrap();

    assert!(report.halted);
    assert_eq!(report.text(), "\r\nSystem halted.");
}
