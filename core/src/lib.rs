#![no_std]

pub mod bench;
pub mod display;
pub mod error;
pub mod format;
pub mod framebuffer;
pub mod fs;
pub mod palette;
pub mod panel;
pub mod raw;


extern crate alloc;

pub use error::{Error, Result};
pub use format::PixelFormat;
pub use framebuffer::FrameBuffer;
pub use palette::Palette;
