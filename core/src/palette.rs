use embedded_graphics::pixelcolor::{IntoStorage, Rgb565, Rgb888, RgbColor, raw::RawU16};
use zerocopy::{FromBytes, IntoBytes, little_endian::U16};

use crate::error::{Error, Result};

pub const MAX_ENTRIES: usize = 16;
/// Raw bytes per palette entry.
pub const ENTRY_SIZE: usize = 2;

/// Fixed lookup table for indexed formats.
///
/// Raw palette bytes are little-endian RGB565 values, the layout the
/// device-side palette tables are stored in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: [U16; MAX_ENTRIES],
    len: u8,
}

impl Palette {
    /// Copies `count` entries out of `raw`. `count` has to be 4 or 16 and
    /// `raw` exactly `count * 2` bytes long.
    pub fn new(raw: &[u8], count: usize) -> Result<Self> {
        if !matches!(count, 4 | 16) || raw.len() != count * ENTRY_SIZE {
            return Err(Error::InvalidPaletteSize {
                len: raw.len(),
                count,
            });
        }
        let colors = <[U16]>::ref_from_bytes(raw).map_err(|_| Error::InvalidPaletteSize {
            len: raw.len(),
            count,
        })?;
        let mut entries = [U16::ZERO; MAX_ENTRIES];
        entries[..count].copy_from_slice(colors);
        Ok(Palette {
            entries,
            len: count as u8,
        })
    }

    pub fn from_colors(colors: &[Rgb565]) -> Result<Self> {
        let count = colors.len();
        if !matches!(count, 4 | 16) {
            return Err(Error::InvalidPaletteSize {
                len: count * ENTRY_SIZE,
                count,
            });
        }
        let mut entries = [U16::ZERO; MAX_ENTRIES];
        for (entry, color) in entries.iter_mut().zip(colors) {
            *entry = U16::new(color.into_storage());
        }
        Ok(Palette {
            entries,
            len: count as u8,
        })
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Raw 16 bit value of entry `index`.
    ///
    /// Panics if `index` is out of range; framebuffers mask their indices
    /// to the palette size so lookups from there never do.
    #[inline]
    pub fn raw(&self, index: usize) -> u16 {
        self.entries[..self.len()][index].get()
    }

    #[inline]
    pub fn color(&self, index: usize) -> Rgb565 {
        Rgb565::from(RawU16::new(self.raw(index)))
    }

    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.entries[..self.len()].iter().map(|entry| entry.get())
    }

    pub fn colors(&self) -> impl Iterator<Item = Rgb565> + '_ {
        self.iter().map(|raw| Rgb565::from(RawU16::new(raw)))
    }

    /// The palette in its raw on-disk form.
    pub fn as_bytes(&self) -> &[u8] {
        self.entries[..self.len()].as_bytes()
    }

    /// Index of the entry closest to `color`.
    pub fn nearest(&self, color: Rgb888) -> u8 {
        let distance = |entry: Rgb565| {
            let entry = Rgb888::from(entry);
            let dr = entry.r() as i32 - color.r() as i32;
            let dg = entry.g() as i32 - color.g() as i32;
            let db = entry.b() as i32 - color.b() as i32;
            dr * dr + dg * dg + db * db
        };
        self.colors()
            .enumerate()
            .min_by_key(|(_, entry)| distance(*entry))
            .map(|(index, _)| index as u8)
            .unwrap_or(0)
    }
}

/// Palettes the panel diagnostics ship with.
pub mod presets {
    use super::Palette;

    /// The C64 colors, 16 little-endian RGB565 entries.
    pub const C64: [u8; 32] = [
        0x00, 0x00, 0xFF, 0xFF, 0xC6, 0x89, 0xB7, 0x65, 0xF2, 0x89, 0x09, 0x55, 0x91, 0x41, 0x6E,
        0xBE, 0xA5, 0x8A, 0x00, 0x52, 0x4C, 0xBB, 0x8A, 0x52, 0xCF, 0x7B, 0x11, 0x97, 0x58, 0x7B,
        0xF3, 0x9C,
    ];

    pub const FOUR_TONE: [u8; 8] = [0x7F, 0xEF, 0xF4, 0x2A, 0x69, 0x11, 0xFA, 0x74];

    pub fn c64() -> Palette {
        Palette {
            entries: expand(&C64),
            len: 16,
        }
    }

    pub fn four_tone() -> Palette {
        Palette {
            entries: expand(&FOUR_TONE),
            len: 4,
        }
    }

    fn expand(raw: &[u8]) -> [zerocopy::little_endian::U16; super::MAX_ENTRIES] {
        let mut entries = [zerocopy::little_endian::U16::ZERO; super::MAX_ENTRIES];
        for (entry, bytes) in entries.iter_mut().zip(raw.chunks_exact(2)) {
            *entry = zerocopy::little_endian::U16::new(u16::from_le_bytes([bytes[0], bytes[1]]));
        }
        entries
    }
}
