use embedded_graphics::pixelcolor::{IntoStorage, Rgb565, Rgb888};
use image::RgbImage;
use pixelpush_core::{Palette, PixelFormat, raw::RawImage};

#[derive(Debug)]
pub enum ConvertError {
    WrongSize { width: u32, height: u32 },
    PaletteRequired,
}

/// Encodes `image` as a raw dump of `target`'s geometry.
///
/// Indexed targets pick the nearest palette entry per pixel, no dithering.
pub fn encode(
    image: &RgbImage,
    target: &RawImage,
    palette: Option<&Palette>,
) -> Result<Vec<u8>, ConvertError> {
    let (width, height) = image.dimensions();
    if width != target.width as u32 || height != target.height as u32 {
        return Err(ConvertError::WrongSize { width, height });
    }
    let stride = target.stride as usize;
    let mut out = vec![0u8; target.file_size()];

    for (x, y, pixel) in image.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let color = Rgb888::new(r, g, b);
        let linear = y as usize * stride + x as usize;
        match target.format {
            PixelFormat::Rgb565 => {
                let raw = Rgb565::from(color).into_storage();
                out[linear * 2..linear * 2 + 2].copy_from_slice(&raw.to_be_bytes());
            }
            PixelFormat::Indexed16 => {
                let palette = palette.ok_or(ConvertError::PaletteRequired)?;
                out[linear] = palette.nearest(color);
            }
            PixelFormat::Indexed4 => {
                let palette = palette.ok_or(ConvertError::PaletteRequired)?;
                let index = palette.nearest(color);
                let byte = &mut out[linear / 2];
                if linear % 2 == 0 {
                    *byte = (*byte & 0x0f) | index << 4;
                } else {
                    *byte = (*byte & 0xf0) | index;
                }
            }
        }
    }
    Ok(out)
}
