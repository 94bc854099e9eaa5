use embedded_graphics::{
    Pixel,
    draw_target::{DrawTarget, DrawTargetExt},
    image::ImageDrawable,
    pixelcolor::{Rgb565, raw::RawU16},
    prelude::{OriginDimensions, Point, Size},
    primitives::Rectangle,
};
use log::debug;

use crate::{
    error::{Error, Result},
    format::PixelFormat,
    fs,
    palette::Palette,
};

/// A frame laid over a caller-owned byte region.
///
/// Nothing is copied or decoded on construction; the bytes are interpreted
/// only when a sink walks the frame.
pub struct FrameBuffer<'a> {
    buffer: &'a mut [u8],
    width: u16,
    height: u16,
    stride: u16,
    format: PixelFormat,
    palette: Option<&'a Palette>,
}

impl<'a> FrameBuffer<'a> {
    pub fn new(
        buffer: &'a mut [u8],
        width: u16,
        height: u16,
        stride: u16,
        format: PixelFormat,
        palette: Option<&'a Palette>,
    ) -> Result<Self> {
        if stride < width {
            return Err(Error::StrideTooNarrow { width, stride });
        }
        if let Some(expected) = format.palette_len() {
            let Some(palette) = palette else {
                return Err(Error::PaletteRequired);
            };
            if palette.len() != expected {
                return Err(Error::PaletteSizeMismatch {
                    expected,
                    actual: palette.len(),
                });
            }
        }
        let required = format.required_bytes(stride, height);
        if buffer.len() < required {
            return Err(Error::InsufficientBufferSize {
                required,
                actual: buffer.len(),
            });
        }
        Ok(FrameBuffer {
            buffer,
            width,
            height,
            stride,
            format,
            // direct formats never look at a palette
            palette: palette.filter(|_| format.is_indexed()),
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn stride(&self) -> u16 {
        self.stride
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn palette(&self) -> Option<&Palette> {
        self.palette
    }

    pub fn required_bytes(&self) -> usize {
        self.format.required_bytes(self.stride, self.height)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[..]
    }

    /// Overwrites the whole region from `reader`.
    ///
    /// Fails with [`Error::ShortRead`] if the source ends before the region
    /// is full; the frame contents are undefined afterwards.
    pub fn fill_from_source<R: embedded_io::Read>(&mut self, reader: R) -> Result<()> {
        fs::read_full(reader, &mut self.buffer[..])?;
        debug!("Filled {} byte {} frame", self.buffer.len(), self.format.name());
        Ok(())
    }

    #[inline]
    fn linear(&self, x: u16, y: u16) -> usize {
        y as usize * self.stride as usize + x as usize
    }

    /// Palette index of the pixel at (`x`, `y`), 0 for direct formats.
    pub fn index_at(&self, x: u16, y: u16) -> u8 {
        self.format.index_in(&self.buffer[..], self.linear(x, y))
    }

    /// Raw RGB565 value of the pixel at (`x`, `y`) after palette lookup.
    #[inline]
    pub fn raw_at(&self, x: u16, y: u16) -> u16 {
        let pixel = self.linear(x, y);
        match self.palette {
            Some(palette) => palette.raw(self.format.index_in(&self.buffer[..], pixel) as usize),
            None => PixelFormat::direct_in(&self.buffer[..], pixel),
        }
    }

    pub fn color_at(&self, x: u16, y: u16) -> Rgb565 {
        Rgb565::from(RawU16::new(self.raw_at(x, y)))
    }

    /// Visible pixels of row `y`, stride padding skipped.
    pub fn row(&self, y: u16) -> impl Iterator<Item = Rgb565> + '_ {
        (0..self.width).map(move |x| self.color_at(x, y))
    }

    /// Visible pixels in row-major order.
    pub fn colors(&self) -> impl Iterator<Item = Rgb565> + '_ {
        (0..self.height).flat_map(move |y| self.row(y))
    }

    pub fn pixels(&self) -> impl Iterator<Item = Pixel<Rgb565>> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).map(move |x| {
                Pixel(Point::new(x as i32, y as i32), self.color_at(x, y))
            })
        })
    }
}

impl core::fmt::Debug for FrameBuffer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("format", &self.format)
            .field("len", &self.buffer.len())
            .field("palette", &self.palette.map(Palette::len))
            .finish()
    }
}

impl OriginDimensions for FrameBuffer<'_> {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl ImageDrawable for FrameBuffer<'_> {
    type Color = Rgb565;

    fn draw<D>(&self, target: &mut D) -> core::result::Result<(), D::Error>
    where
        D: DrawTarget<Color = Self::Color>,
    {
        target.fill_contiguous(&Rectangle::new(Point::zero(), self.size()), self.colors())
    }

    fn draw_sub_image<D>(
        &self,
        target: &mut D,
        area: &Rectangle,
    ) -> core::result::Result<(), D::Error>
    where
        D: DrawTarget<Color = Self::Color>,
    {
        self.draw(&mut target.translated(-area.top_left).clipped(area))
    }
}
