pub mod script;
pub use script::{PrintOp, Script};

pub mod image;
pub use image::{hexdump, MessageEntry, SectorImage, SectorMap};

pub mod builder;
pub use builder::SectorBuilder;
