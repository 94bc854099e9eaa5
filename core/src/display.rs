use core::time::Duration;

use embedded_graphics::{
    Drawable,
    image::Image,
    pixelcolor::Rgb565,
    prelude::{DrawTarget, Point},
};
use log::{debug, warn};

use crate::{
    error::{Error, Result},
    format::PixelFormat,
    framebuffer::FrameBuffer,
};

/// Monotonic time source used by sinks to time a transfer.
pub trait Clock {
    /// Time since an arbitrary, fixed origin.
    fn now(&self) -> Duration;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// Anything that can put a [`FrameBuffer`] on a panel.
///
/// `show` blocks until the whole frame is transferred and returns how long
/// that took.
pub trait DisplaySink {
    fn supports(&self, format: PixelFormat) -> bool;
    fn show(&mut self, frame: &FrameBuffer<'_>) -> Result<Duration>;

    /// Rejects frames whose format this sink can't render.
    fn ensure_supported(&self, frame: &FrameBuffer<'_>) -> Result<()> {
        if self.supports(frame.format()) {
            Ok(())
        } else {
            Err(Error::UnsupportedFormat(frame.format()))
        }
    }
}

impl<S: DisplaySink + ?Sized> DisplaySink for &mut S {
    fn supports(&self, format: PixelFormat) -> bool {
        (**self).supports(format)
    }

    fn show(&mut self, frame: &FrameBuffer<'_>) -> Result<Duration> {
        (**self).show(frame)
    }
}

bitflags::bitflags! {
    /// Set of formats a sink accepts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Formats: u8 {
        const RGB565 = 0b0000_0001;
        const INDEXED4 = 0b0000_0010;
        const INDEXED16 = 0b0000_0100;
    }
}

impl Formats {
    pub fn from_slice(formats: &[PixelFormat]) -> Self {
        formats.iter().copied().map(Formats::from).collect()
    }

    pub fn accepts(self, format: PixelFormat) -> bool {
        self.contains(Formats::from(format))
    }
}

impl From<PixelFormat> for Formats {
    fn from(format: PixelFormat) -> Self {
        match format {
            PixelFormat::Rgb565 => Formats::RGB565,
            PixelFormat::Indexed4 => Formats::INDEXED4,
            PixelFormat::Indexed16 => Formats::INDEXED16,
        }
    }
}

impl Default for Formats {
    fn default() -> Self {
        Formats::all()
    }
}

/// Renders frames into any embedded-graphics target.
pub struct DrawTargetSink<D, C> {
    target: D,
    clock: C,
    formats: Formats,
}

impl<D, C> DrawTargetSink<D, C>
where
    D: DrawTarget<Color = Rgb565>,
    D::Error: core::fmt::Debug,
    C: Clock,
{
    pub fn new(target: D, clock: C) -> Self {
        Self {
            target,
            clock,
            formats: Formats::all(),
        }
    }

    pub fn with_formats(mut self, formats: &[PixelFormat]) -> Self {
        self.formats = Formats::from_slice(formats);
        self
    }

    pub fn into_inner(self) -> D {
        self.target
    }
}

impl<D, C> DisplaySink for DrawTargetSink<D, C>
where
    D: DrawTarget<Color = Rgb565>,
    D::Error: core::fmt::Debug,
    C: Clock,
{
    fn supports(&self, format: PixelFormat) -> bool {
        self.formats.accepts(format)
    }

    fn show(&mut self, frame: &FrameBuffer<'_>) -> Result<Duration> {
        self.ensure_supported(frame)?;
        let start = self.clock.now();
        Image::new(frame, Point::zero())
            .draw(&mut self.target)
            .map_err(|err| {
                warn!("Draw target failed: {:?}", err);
                Error::Io(embedded_io::ErrorKind::Other)
            })?;
        let elapsed = self.clock.now().saturating_sub(start);
        debug!("Drew {} frame in {:?}", frame.format().name(), elapsed);
        Ok(elapsed)
    }
}
