//! Headerless raw frame dumps: `.r565`, `.p16` and `.p4`.
//!
//! A dump is the frame's byte region as is. There is no magic and no length
//! prefix, so the file length has to match the region exactly.

use log::info;

use crate::{
    error::{Error, Result},
    format::PixelFormat,
    framebuffer::FrameBuffer,
    fs::{File, Filesystem, Mode, read_full},
    palette::{self, Palette},
};

pub const WIDTH: u16 = 160;
pub const HEIGHT: u16 = 128;
pub const IMAGE_DIR: &str = "images";

pub type Path = heapless::String<256>;

/// Geometry of a raw dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawImage {
    pub format: PixelFormat,
    pub width: u16,
    pub height: u16,
    pub stride: u16,
}

impl RawImage {
    /// A full-screen dump.
    pub const fn new(format: PixelFormat) -> Self {
        RawImage {
            format,
            width: WIDTH,
            height: HEIGHT,
            stride: WIDTH,
        }
    }

    /// Picks the format from the file extension.
    pub fn from_path(path: &str) -> Option<Self> {
        let (_, extension) = path.rsplit_once('.')?;
        PixelFormat::from_extension(extension).map(RawImage::new)
    }

    pub fn file_size(&self) -> usize {
        self.format.required_bytes(self.stride, self.height)
    }

    /// Where the diagnostics keep the dump called `stem`, e.g. `images/test.r565`.
    pub fn path(&self, stem: &str) -> Result<Path> {
        heapless::format!("{}/{}.{}", IMAGE_DIR, stem, self.format.extension())
            .map_err(|_| Error::Io(embedded_io::ErrorKind::OutOfMemory))
    }
}

/// Reads the dump at `path` into `frame`'s region.
pub fn load<FS: Filesystem>(fs: &FS, path: &str, frame: &mut FrameBuffer<'_>) -> Result<()> {
    let file = fs.open_file(path, Mode::Read)?;
    let expected = frame.as_bytes().len();
    let actual = file.size();
    if actual < expected {
        return Err(Error::ShortRead { expected, actual });
    }
    if actual > expected {
        return Err(Error::FileSizeMismatch { expected, actual });
    }
    frame.fill_from_source(file)?;
    info!("Loaded {} ({} bytes, {})", path, actual, frame.format().name());
    Ok(())
}

/// Reads a raw palette table of `count` entries.
pub fn load_palette<FS: Filesystem>(fs: &FS, path: &str, count: usize) -> Result<Palette> {
    let file = fs.open_file(path, Mode::Read)?;
    let len = file.size();
    if count > palette::MAX_ENTRIES || len != count * palette::ENTRY_SIZE {
        return Err(Error::InvalidPaletteSize { len, count });
    }
    let mut raw = [0u8; palette::MAX_ENTRIES * palette::ENTRY_SIZE];
    read_full(file, &mut raw[..len])?;
    Palette::new(&raw[..len], count)
}

/// Writes `frame`'s whole region as a dump, so [`load`] accepts it back.
pub fn store<W: embedded_io::Write>(out: &mut W, frame: &FrameBuffer<'_>) -> Result<()> {
    out.write_all(frame.as_bytes())
        .map_err(Error::from_io_error)?;
    out.flush().map_err(Error::from_io_error)
}
