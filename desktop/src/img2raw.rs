use std::process::ExitCode;

use argh::FromArgs;
use log::{error, info};
use pixelpush_core::{
    FrameBuffer, Palette, PixelFormat,
    fs::{Filesystem, Mode},
    palette::presets,
    raw::{self, RawImage},
};
use pixelpush_desktop::{convert, std_fs::StdFilesystem};

#[derive(FromArgs)]
/// Conversion options
struct Args {
    /// input image path
    #[argh(option, short = 'i')]
    input_path: String,

    /// output dump path, the extension (.r565, .p16, .p4) picks the format
    #[argh(option, short = 'o')]
    output_path: String,

    /// raw little-endian RGB565 palette to match against instead of the built-in one
    #[argh(option, short = 'p')]
    palette: Option<String>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();
    let fs = StdFilesystem::new_with_base_path(".".into());

    let Some(target) = RawImage::from_path(&args.output_path) else {
        error!("{}: output must end in .r565, .p16 or .p4", args.output_path);
        return ExitCode::FAILURE;
    };

    let palette: Option<Palette> = match (target.format.palette_len(), &args.palette) {
        (None, _) => None,
        (Some(count), Some(path)) => match raw::load_palette(&fs, path, count) {
            Ok(palette) => Some(palette),
            Err(e) => {
                error!("{}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        (Some(_), None) if target.format == PixelFormat::Indexed4 => Some(presets::four_tone()),
        (Some(_), None) => Some(presets::c64()),
    };

    let image = match image::open(&args.input_path) {
        Ok(image) => image.into_rgb8(),
        Err(e) => {
            error!("Failed to open {}: {}", args.input_path, e);
            return ExitCode::FAILURE;
        }
    };

    let mut bytes = match convert::encode(&image, &target, palette.as_ref()) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Failed to convert {}: {:?}", args.input_path, e);
            return ExitCode::FAILURE;
        }
    };

    let written = FrameBuffer::new(
        &mut bytes,
        target.width,
        target.height,
        target.stride,
        target.format,
        palette.as_ref(),
    )
    .and_then(|frame| {
        let mut out = fs.open_file(&args.output_path, Mode::Write)?;
        raw::store(&mut out, &frame)
    });

    match written {
        Ok(()) => {
            info!(
                "Wrote {} ({} bytes, {})",
                args.output_path,
                target.file_size(),
                target.format.name()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to write {}: {}", args.output_path, e);
            ExitCode::FAILURE
        }
    }
}
