use std::process::ExitCode;

use argh::FromArgs;
use log::{error, info};
use pixelpush_core::{
    Error, FrameBuffer, Palette, PixelFormat, Result,
    bench::{BenchReport, BlitBenchmark},
    display::DisplaySink,
    palette::presets,
    panel::PanelSink,
    raw::{self, RawImage},
};
use pixelpush_desktop::{
    StdClock, minifb_display::MinifbDisplay, std_fs::StdFilesystem, writer_bus::WriterBus,
};

#[derive(FromArgs)]
/// Blit timing for raw panel dumps
struct Args {
    /// directory the dumps are read from
    #[argh(option, default = "String::from(\"sd\")")]
    base_dir: String,

    /// transfers per image
    #[argh(option, short = 'n', default = "10")]
    trials: usize,

    /// show frames in a window instead of streaming them to a bus
    #[argh(switch, short = 'w')]
    window: bool,

    /// write the panel pixel stream of every trial to this file
    #[argh(option)]
    dump: Option<String>,

    /// raw little-endian RGB565 palette in the base dir, overrides the built-in ones
    #[argh(option, short = 'p')]
    palette: Option<String>,

    /// dumps to time, relative to the base dir (default: images/test.{r565,p16,p4})
    #[argh(positional)]
    images: Vec<String>,
}

impl Args {
    fn check(&self) -> std::result::Result<(), &'static str> {
        if self.window && self.dump.is_some() {
            return Err("--dump records the panel stream and can't be combined with --window");
        }
        if self.trials == 0 {
            return Err("--trials must be at least 1");
        }
        Ok(())
    }
}

enum Sink {
    Window(MinifbDisplay),
    Panel(PanelSink<WriterBus<Box<dyn std::io::Write>>, StdClock>),
}

impl Sink {
    fn open(args: &Args) -> Result<Self> {
        if args.window {
            let display = MinifbDisplay::new(
                raw::WIDTH as usize,
                raw::HEIGHT as usize,
                minifb::Scale::X4,
            )?;
            return Ok(Sink::Window(display));
        }
        let writer: Box<dyn std::io::Write> = match &args.dump {
            Some(path) => {
                let file = std::fs::File::create(path).map_err(Error::from_io_error)?;
                info!("Dumping panel stream to {}", path);
                Box::new(std::io::BufWriter::new(file))
            }
            None => Box::new(std::io::sink()),
        };
        Ok(Sink::Panel(PanelSink::new(
            WriterBus::new(writer),
            StdClock::default(),
        )))
    }

    fn as_dyn(&mut self) -> &mut dyn DisplaySink {
        match self {
            Sink::Window(display) => display,
            Sink::Panel(panel) => panel,
        }
    }
}

fn default_suite() -> Result<Vec<String>> {
    [PixelFormat::Rgb565, PixelFormat::Indexed16, PixelFormat::Indexed4]
        .into_iter()
        .map(|format| RawImage::new(format).path("test").map(|path| path.as_str().into()))
        .collect()
}

fn palette_for(fs: &StdFilesystem, args: &Args, format: PixelFormat) -> Result<Option<Palette>> {
    let Some(count) = format.palette_len() else {
        return Ok(None);
    };
    match &args.palette {
        Some(path) => raw::load_palette(fs, path, count).map(Some),
        None if format == PixelFormat::Indexed4 => Ok(Some(presets::four_tone())),
        None => Ok(Some(presets::c64())),
    }
}

fn run_image(
    fs: &StdFilesystem,
    args: &Args,
    sink: &mut dyn DisplaySink,
    storage: &mut [u8],
    path: &str,
    image: &RawImage,
) -> Result<BenchReport> {
    let palette = palette_for(fs, args, image.format)?;
    let mut frame = FrameBuffer::new(
        &mut storage[..image.file_size()],
        image.width,
        image.height,
        image.stride,
        image.format,
        palette.as_ref(),
    )?;
    raw::load(fs, path, &mut frame)?;

    BlitBenchmark::new().run(sink, &frame, args.trials)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();
    if let Err(e) = args.check() {
        error!("{}", e);
        return ExitCode::FAILURE;
    }
    let fs = StdFilesystem::new_with_base_path(args.base_dir.clone().into());

    let images = if args.images.is_empty() {
        match default_suite() {
            Ok(images) => images,
            Err(e) => {
                error!("Failed to build image list: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        args.images.clone()
    };

    let mut sink = match Sink::open(&args) {
        Ok(sink) => sink,
        Err(e) => {
            error!("Failed to open display: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // One buffer big enough for the largest format, reused for every image
    let mut storage = vec![0u8; RawImage::new(PixelFormat::Rgb565).file_size()];
    let mut results = String::from("type;trials;average_ms\n");
    let mut failed = false;

    for path in &images {
        let Some(image) = RawImage::from_path(path) else {
            error!("{}: not a .r565, .p16 or .p4 dump", path);
            failed = true;
            continue;
        };
        info!("Timing {}", path);
        match run_image(&fs, &args, sink.as_dyn(), &mut storage, path, &image) {
            Ok(report) => {
                results += &format!(
                    "{};{};{:.3}\n",
                    image.format.name(),
                    report.trials,
                    report.mean.as_secs_f64() * 1000.0
                );
            }
            Err(e) => {
                error!("{}: {}", path, e);
                failed = true;
            }
        }
    }

    print!("{results}");

    match sink {
        Sink::Window(mut display) => {
            info!("Close the window or press Escape to exit");
            display.wait_for_close();
        }
        Sink::Panel(panel) => {
            let mut bus = panel.into_inner();
            if let Err(e) = bus.flush() {
                error!("Failed to flush panel stream: {}", e);
                failed = true;
            } else {
                info!("Streamed {} bytes in {} commands", bus.bytes(), bus.commands());
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(window: bool, dump: Option<&str>, trials: usize) -> Args {
        Args {
            base_dir: "sd".into(),
            trials,
            window,
            dump: dump.map(String::from),
            palette: None,
            images: Vec::new(),
        }
    }

    #[test]
    fn dump_needs_the_panel_stream() {
        assert!(args(false, Some("out.r565"), 10).check().is_ok());
        assert!(args(true, None, 10).check().is_ok());
        assert!(args(true, Some("out.r565"), 10).check().is_err());
        assert!(args(false, None, 0).check().is_err());
    }
}
