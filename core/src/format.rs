//! Byte layout rules for the raw encodings the panel diagnostics use.
//!
//! Every consumer (framebuffer validation, decoders, sinks) goes through the
//! same table, so direct and indexed formats share one decode contract.

/// How bytes in a frame map to pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::EnumIter)]
pub enum PixelFormat {
    /// 16 bit direct color, high byte first.
    Rgb565,
    /// 4 bit indices into a 4 entry palette, two pixels per byte.
    Indexed4,
    /// 8 bit indices into a 16 entry palette, one pixel per byte.
    Indexed16,
}

/// Per-format layout rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub bits_per_pixel: u8,
    /// Only meaningful for sub-byte pixels, 0 otherwise.
    pub pixels_per_byte: u8,
    /// Entry count of the palette an indexed format requires.
    pub palette_len: Option<u8>,
    pub extension: &'static str,
    pub name: &'static str,
}

const RGB565: Layout = Layout {
    bits_per_pixel: 16,
    pixels_per_byte: 0,
    palette_len: None,
    extension: "r565",
    name: "rgb565",
};

const INDEXED4: Layout = Layout {
    bits_per_pixel: 4,
    pixels_per_byte: 2,
    palette_len: Some(4),
    extension: "p4",
    name: "pal4",
};

const INDEXED16: Layout = Layout {
    bits_per_pixel: 8,
    pixels_per_byte: 1,
    palette_len: Some(16),
    extension: "p16",
    name: "pal16",
};

impl PixelFormat {
    pub const fn layout(self) -> &'static Layout {
        match self {
            PixelFormat::Rgb565 => &RGB565,
            PixelFormat::Indexed4 => &INDEXED4,
            PixelFormat::Indexed16 => &INDEXED16,
        }
    }

    pub const fn bits_per_pixel(self) -> usize {
        self.layout().bits_per_pixel as usize
    }

    pub const fn is_indexed(self) -> bool {
        self.layout().palette_len.is_some()
    }

    pub fn palette_len(self) -> Option<usize> {
        self.layout().palette_len.map(usize::from)
    }

    /// Mask that keeps a stored index inside the palette.
    pub fn index_mask(self) -> u8 {
        match self.layout().palette_len {
            Some(len) => len - 1,
            None => 0,
        }
    }

    pub fn name(self) -> &'static str {
        self.layout().name
    }

    pub fn extension(self) -> &'static str {
        self.layout().extension
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        use strum::IntoEnumIterator;
        let extension = extension.trim_start_matches('.');
        PixelFormat::iter().find(|format| format.extension().eq_ignore_ascii_case(extension))
    }

    /// Bytes needed to hold `height` rows of `stride` pixels, rounded up to whole bytes.
    ///
    /// Saturates at `usize::MAX` when the size isn't addressable, so no
    /// buffer can satisfy it.
    pub fn required_bytes(self, stride: u16, height: u16) -> usize {
        self.checked_required_bytes(stride, height)
            .unwrap_or(usize::MAX)
    }

    /// [`required_bytes`](Self::required_bytes), or `None` on overflow.
    pub fn checked_required_bytes(self, stride: u16, height: u16) -> Option<usize> {
        let pixels = (stride as usize).checked_mul(height as usize)?;
        packed_len(pixels, self.bits_per_pixel())
    }

    /// Reads the palette index of the pixel at linear position `pixel`.
    ///
    /// Sub-byte pixels are packed high nibble first. The result is already
    /// masked to the palette range. Direct formats return 0.
    #[inline]
    pub(crate) fn index_in(self, bytes: &[u8], pixel: usize) -> u8 {
        match self {
            PixelFormat::Rgb565 => 0,
            PixelFormat::Indexed4 => {
                let byte = bytes[pixel / 2];
                let nibble = if pixel % 2 == 0 { byte >> 4 } else { byte & 0x0f };
                nibble & self.index_mask()
            }
            PixelFormat::Indexed16 => bytes[pixel] & self.index_mask(),
        }
    }

    /// Reads the raw RGB565 value of the pixel at linear position `pixel`.
    #[inline]
    pub(crate) fn direct_in(bytes: &[u8], pixel: usize) -> u16 {
        let offset = pixel * 2;
        u16::from_be_bytes([bytes[offset], bytes[offset + 1]])
    }
}

fn packed_len(pixels: usize, bits_per_pixel: usize) -> Option<usize> {
    Some(pixels.checked_mul(bits_per_pixel)?.div_ceil(8))
}
