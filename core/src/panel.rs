//! MIPI-DCS pixel stream for 4-wire SPI panels (ST7735 and friends).

use core::time::Duration;

use log::{debug, trace};

use crate::{
    display::{Clock, DisplaySink, Formats},
    error::{Error, Result},
    format::PixelFormat,
    framebuffer::FrameBuffer,
};

pub const SET_COLUMN_ADDRESS: u8 = 0x2a;
pub const SET_PAGE_ADDRESS: u8 = 0x2b;
pub const WRITE_MEMORY_START: u8 = 0x2c;

/// Indexed frames are expanded this many pixels at a time.
pub const CHUNK_PIXELS: usize = 16;
const CHUNK_BYTES: usize = CHUNK_PIXELS * 2;

/// A panel bus with a data/command line.
pub trait PanelBus {
    type Error: embedded_io::Error;

    fn command(&mut self, command: u8, params: &[u8]) -> core::result::Result<(), Self::Error>;
    fn data(&mut self, bytes: &[u8]) -> core::result::Result<(), Self::Error>;
}

impl<B: PanelBus + ?Sized> PanelBus for &mut B {
    type Error = B::Error;

    fn command(&mut self, command: u8, params: &[u8]) -> core::result::Result<(), Self::Error> {
        (**self).command(command, params)
    }

    fn data(&mut self, bytes: &[u8]) -> core::result::Result<(), Self::Error> {
        (**self).data(bytes)
    }
}

/// Streams frames to a panel as big-endian RGB565.
///
/// RGB565 rows go out as stored, indexed rows are resolved through the
/// frame's palette first. Stride padding never reaches the bus.
pub struct PanelSink<B, C> {
    bus: B,
    clock: C,
    formats: Formats,
    origin: (u16, u16),
}

impl<B: PanelBus, C: Clock> PanelSink<B, C> {
    pub fn new(bus: B, clock: C) -> Self {
        Self {
            bus,
            clock,
            formats: Formats::all(),
            origin: (0, 0),
        }
    }

    pub fn with_formats(mut self, formats: &[PixelFormat]) -> Self {
        self.formats = Formats::from_slice(formats);
        self
    }

    /// Panel RAM offset of the frame's top left corner.
    pub fn with_origin(mut self, column: u16, row: u16) -> Self {
        self.origin = (column, row);
        self
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn into_inner(self) -> B {
        self.bus
    }

    fn command(&mut self, command: u8, params: &[u8]) -> Result<()> {
        trace!("Panel command {:#04x} {:02x?}", command, params);
        self.bus
            .command(command, params)
            .map_err(Error::from_io_error)
    }

    fn data(&mut self, bytes: &[u8]) -> Result<()> {
        self.bus.data(bytes).map_err(Error::from_io_error)
    }

    fn set_window(&mut self, width: u16, height: u16) -> Result<()> {
        let (column, row) = self.origin;
        let window = |start: u16, len: u16| {
            let [s0, s1] = start.to_be_bytes();
            let [e0, e1] = start.saturating_add(len - 1).to_be_bytes();
            [s0, s1, e0, e1]
        };
        self.command(SET_COLUMN_ADDRESS, &window(column, width))?;
        self.command(SET_PAGE_ADDRESS, &window(row, height))
    }

    fn stream(&mut self, frame: &FrameBuffer<'_>) -> Result<()> {
        let (width, height) = (frame.width(), frame.height());
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.set_window(width, height)?;
        self.command(WRITE_MEMORY_START, &[])?;

        match frame.format() {
            PixelFormat::Rgb565 => {
                let bytes = frame.as_bytes();
                let row_bytes = width as usize * 2;
                let stride_bytes = frame.stride() as usize * 2;
                if row_bytes == stride_bytes {
                    self.data(&bytes[..row_bytes * height as usize])
                } else {
                    for row in bytes.chunks(stride_bytes).take(height as usize) {
                        self.data(&row[..row_bytes])?;
                    }
                    Ok(())
                }
            }
            PixelFormat::Indexed4 | PixelFormat::Indexed16 => {
                let mut chunk = [0u8; CHUNK_BYTES];
                let mut used = 0;
                for y in 0..height {
                    for x in 0..width {
                        chunk[used..used + 2].copy_from_slice(&frame.raw_at(x, y).to_be_bytes());
                        used += 2;
                        if used == CHUNK_BYTES {
                            self.data(&chunk)?;
                            used = 0;
                        }
                    }
                }
                if used > 0 {
                    self.data(&chunk[..used])?;
                }
                Ok(())
            }
        }
    }
}

impl<B: PanelBus, C: Clock> DisplaySink for PanelSink<B, C> {
    fn supports(&self, format: PixelFormat) -> bool {
        self.formats.accepts(format)
    }

    fn show(&mut self, frame: &FrameBuffer<'_>) -> Result<Duration> {
        self.ensure_supported(frame)?;
        let start = self.clock.now();
        self.stream(frame)?;
        let elapsed = self.clock.now().saturating_sub(start);
        debug!(
            "Pushed {}x{} {} frame in {:?}",
            frame.width(),
            frame.height(),
            frame.format().name(),
            elapsed
        );
        Ok(elapsed)
    }
}
