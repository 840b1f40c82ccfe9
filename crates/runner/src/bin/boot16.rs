use std::env;
use std::fs;
use std::path::PathBuf;

use runner::{BootRunner, DEFAULT_STEP_BUDGET};
use sector::{hexdump, Script, SectorBuilder};
use types::sector::{BootSector, SECTOR_SIZE};

fn main() {
    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        print_usage();
        std::process::exit(1);
    }

    let cmd = args.remove(0);
    let result = match cmd.as_str() {
        "build" => cmd_build(args),
        "run" => cmd_run(args),
        "dump" => cmd_dump(args),
        "info" => cmd_info(args),
        _ => {
            print_usage();
            Err("unknown command".to_string())
        }
    };

    if let Err(e) = result {
        eprintln!("✗ {}", e);
        std::process::exit(1);
    }
}

fn cmd_build(args: Vec<String>) -> Result<(), String> {
    let mut out: Option<PathBuf> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--out" => {
                i += 1;
                let val = args.get(i).cloned().ok_or("missing value for --out")?;
                out = Some(PathBuf::from(val));
            }
            other => return Err(format!("unknown flag {}", other)),
        }
        i += 1;
    }
    let out = out.unwrap_or_else(|| PathBuf::from("boot.img"));

    let image = SectorBuilder::build(&Script::demo())?;
    fs::write(&out, image.sector.as_bytes())
        .map_err(|e| format!("failed to write {}: {}", out.display(), e))?;

    println!("✓ Wrote {} ({} bytes)", out.display(), image.sector.as_bytes().len());
    println!(
        "  entry 0x{:04X}, print_string 0x{:04X}, print_decimal 0x{:04X}, print_hex 0x{:04X}",
        image.map.entry, image.map.print_string, image.map.print_decimal, image.map.print_hex
    );
    Ok(())
}

fn cmd_run(args: Vec<String>) -> Result<(), String> {
    let mut image_path: Option<PathBuf> = None;
    let mut trace = false;
    let mut max_steps = DEFAULT_STEP_BUDGET;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--image" => {
                i += 1;
                let val = args.get(i).cloned().ok_or("missing value for --image")?;
                image_path = Some(PathBuf::from(val));
            }
            "--trace" => trace = true,
            "--max-steps" => {
                i += 1;
                let val = args.get(i).cloned().ok_or("missing value for --max-steps")?;
                max_steps = val
                    .parse()
                    .map_err(|e| format!("invalid --max-steps {}: {}", val, e))?;
            }
            other => return Err(format!("unknown flag {}", other)),
        }
        i += 1;
    }
    let sector = load_sector(image_path)?;

    let mut boot_runner = BootRunner::new().with_trace(trace);
    let report = boot_runner.run(&sector, max_steps)?;

    println!("{}", report);
    if !report.halted {
        return Err(format!("guest did not halt within {} steps", max_steps));
    }
    Ok(())
}

fn cmd_dump(args: Vec<String>) -> Result<(), String> {
    let sector = load_sector(single_image_flag(args)?)?;
    print!("{}", hexdump(sector.as_bytes()));
    Ok(())
}

fn cmd_info(args: Vec<String>) -> Result<(), String> {
    let sector = load_sector(single_image_flag(args)?)?;

    println!("Size: {} bytes", sector.as_bytes().len());
    println!("Signature: 0x{:04X}", sector.signature());
    if sector.is_signed() {
        println!("✓ Bootable (signature present)");
    } else {
        println!("✗ Not bootable (signature missing)");
    }
    Ok(())
}

fn single_image_flag(args: Vec<String>) -> Result<Option<PathBuf>, String> {
    let mut image_path: Option<PathBuf> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--image" => {
                i += 1;
                let val = args.get(i).cloned().ok_or("missing value for --image")?;
                image_path = Some(PathBuf::from(val));
            }
            other => return Err(format!("unknown flag {}", other)),
        }
        i += 1;
    }
    Ok(image_path)
}

/// Reads a sector from disk, or builds the demo image when no path is given.
fn load_sector(path: Option<PathBuf>) -> Result<BootSector, String> {
    match path {
        Some(path) => {
            let bytes =
                fs::read(&path).map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
            if bytes.len() != SECTOR_SIZE {
                return Err(format!(
                    "{} is {} bytes, expected a {}-byte sector image",
                    path.display(),
                    bytes.len(),
                    SECTOR_SIZE
                ));
            }
            BootSector::from_bytes(&bytes)
        }
        None => Ok(SectorBuilder::build(&Script::demo())?.sector),
    }
}

fn print_usage() {
    eprintln!(
        "Usage:
  boot16 build [--out <file>]
  boot16 run [--image <file>] [--trace] [--max-steps <n>]
  boot16 dump [--image <file>]
  boot16 info [--image <file>]

Without --image, run/dump/info operate on the built-in demo image."
    );
}
