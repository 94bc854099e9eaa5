use std::time::Duration;

use embedded_graphics::pixelcolor::{Rgb565, Rgb888, RgbColor};
use log::{error, info};
use pixelpush_core::{
    Error, FrameBuffer, PixelFormat, Result,
    display::{Clock, DisplaySink},
};

use crate::StdClock;

/// Window standing in for the panel.
///
/// The timed part of `show` is the palette resolve plus the window update,
/// the closest host equivalent of the SPI transfer.
pub struct MinifbDisplay {
    window: minifb::Window,
    display_buffer: Vec<u32>,
    width: usize,
    height: usize,
    clock: StdClock,
}

impl MinifbDisplay {
    pub fn new(width: usize, height: usize, scale: minifb::Scale) -> Result<Self> {
        let options = minifb::WindowOptions {
            borderless: false,
            title: true,
            resize: false,
            scale,
            ..minifb::WindowOptions::default()
        };
        let mut window = minifb::Window::new("pixelpush", width, height, options).map_err(|e| {
            error!("Unable to open window: {}", e);
            Error::Io(embedded_io::ErrorKind::Other)
        })?;
        // Don't let frame pacing leak into the timings
        window.set_target_fps(0);
        info!("Opened {}x{} window", width, height);

        Ok(MinifbDisplay {
            window,
            display_buffer: vec![0xFFFFFFFF; width * height],
            width,
            height,
            clock: StdClock::default(),
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(minifb::Key::Escape)
    }

    /// Keeps the window responsive until it is closed.
    pub fn wait_for_close(&mut self) {
        self.window.set_target_fps(30);
        while self.is_open() {
            self.window.update();
        }
    }

    fn argb(color: Rgb565) -> u32 {
        let color = Rgb888::from(color);
        0xFF000000 | (color.r() as u32) << 16 | (color.g() as u32) << 8 | color.b() as u32
    }
}

impl DisplaySink for MinifbDisplay {
    fn supports(&self, _format: PixelFormat) -> bool {
        true
    }

    fn show(&mut self, frame: &FrameBuffer<'_>) -> Result<Duration> {
        self.ensure_supported(frame)?;
        let start = self.clock.now();

        self.display_buffer.fill(0xFF000000);
        let width = self.width;
        for (y, row_pixels) in self
            .display_buffer
            .chunks_mut(width)
            .take(frame.height() as usize)
            .enumerate()
        {
            for (pixel, color) in row_pixels.iter_mut().zip(frame.row(y as u16)) {
                *pixel = Self::argb(color);
            }
        }
        self.window
            .update_with_buffer(&self.display_buffer, self.width, self.height)
            .map_err(|e| {
                error!("Window update failed: {}", e);
                Error::Io(embedded_io::ErrorKind::Other)
            })?;

        Ok(self.clock.now().saturating_sub(start))
    }
}
