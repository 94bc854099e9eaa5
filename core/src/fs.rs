use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Read,
    Write,
}

pub trait File: embedded_io::Read + embedded_io::Write {
    fn size(&self) -> usize;
}

/// Storage the raw dumps live on (SD card, host directory).
pub trait Filesystem {
    type File: File;

    fn open_file(&self, path: &str, mode: Mode) -> Result<Self::File>;
    fn exists(&self, path: &str) -> Result<bool>;
}

/// Reads until `buf` is full.
///
/// Unlike `read_exact` this reports how far it got when the source runs dry.
pub fn read_full<R: embedded_io::Read>(mut reader: R, buf: &mut [u8]) -> Result<()> {
    let expected = buf.len();
    let mut filled = 0;
    while filled < expected {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(Error::ShortRead {
                    expected,
                    actual: filled,
                });
            }
            Ok(read) => filled += read,
            Err(e) => return Err(Error::from_io_error(e)),
        }
    }
    Ok(())
}
