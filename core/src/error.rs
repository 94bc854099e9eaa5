use crate::format::PixelFormat;

/// Every way loading, binding or pushing a frame can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Raw palette bytes don't describe `count` two-byte entries, or `count` is not 4 or 16.
    InvalidPaletteSize { len: usize, count: usize },
    PaletteRequired,
    PaletteSizeMismatch { expected: usize, actual: usize },
    InsufficientBufferSize { required: usize, actual: usize },
    StrideTooNarrow { width: u16, stride: u16 },
    ShortRead { expected: usize, actual: usize },
    InvalidTrialCount,
    UnsupportedFormat(PixelFormat),
    /// Raw dumps carry no header, so their length has to match exactly.
    FileSizeMismatch { expected: usize, actual: usize },
    NotFound,
    Io(embedded_io::ErrorKind),
}

pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    pub fn from_io_error(error: impl embedded_io::Error) -> Self {
        Error::Io(error.kind())
    }
}

impl embedded_io::Error for Error {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            Error::Io(kind) => *kind,
            Error::NotFound => embedded_io::ErrorKind::NotFound,
            Error::UnsupportedFormat(_) => embedded_io::ErrorKind::Unsupported,
            Error::ShortRead { .. } | Error::FileSizeMismatch { .. } => {
                embedded_io::ErrorKind::InvalidData
            }
            _ => embedded_io::ErrorKind::InvalidInput,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidPaletteSize { len, count } => {
                write!(f, "{len} palette bytes can't hold {count} RGB565 entries")
            }
            Error::PaletteRequired => write!(f, "indexed format without a palette"),
            Error::PaletteSizeMismatch { expected, actual } => {
                write!(f, "palette has {actual} entries, format needs {expected}")
            }
            Error::InsufficientBufferSize { required, actual } => {
                write!(f, "buffer holds {actual} bytes, frame needs {required}")
            }
            Error::StrideTooNarrow { width, stride } => {
                write!(f, "stride {stride} is narrower than width {width}")
            }
            Error::ShortRead { expected, actual } => {
                write!(f, "short read: got {actual} of {expected} bytes")
            }
            Error::InvalidTrialCount => write!(f, "at least one trial is required"),
            Error::UnsupportedFormat(format) => {
                write!(f, "sink can't render {}", format.name())
            }
            Error::FileSizeMismatch { expected, actual } => {
                write!(f, "raw file is {actual} bytes, expected exactly {expected}")
            }
            Error::NotFound => write!(f, "file not found"),
            Error::Io(kind) => write!(f, "i/o error: {kind:?}"),
        }
    }
}

impl core::error::Error for Error {}
