#![no_std]

extern crate alloc;

pub mod sector;
pub use sector::{BootSector, BOOT_SIGNATURE, LOAD_ADDR, PAYLOAD_SIZE, SECTOR_SIZE};

pub mod firmware;
pub use firmware::*;
