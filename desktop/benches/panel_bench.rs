//! Host-side cost of streaming a full frame through `PanelSink`.
//!
//! Run with: `cargo bench -p pixelpush-desktop --bench panel_bench`

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use pixelpush_core::{
    FrameBuffer, PixelFormat, display::DisplaySink, palette::presets, panel::PanelSink,
    raw::RawImage,
};
use pixelpush_desktop::{StdClock, writer_bus::WriterBus};

fn bench_panel_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("panel_stream");
    let c64 = presets::c64();
    let four_tone = presets::four_tone();

    for format in [PixelFormat::Rgb565, PixelFormat::Indexed16, PixelFormat::Indexed4] {
        let image = RawImage::new(format);
        let palette = match format {
            PixelFormat::Rgb565 => None,
            PixelFormat::Indexed16 => Some(&c64),
            PixelFormat::Indexed4 => Some(&four_tone),
        };
        let mut storage: Vec<u8> = (0..image.file_size()).map(|i| i as u8).collect();
        let frame = FrameBuffer::new(
            &mut storage,
            image.width,
            image.height,
            image.stride,
            format,
            palette,
        )
        .unwrap();
        let mut sink = PanelSink::new(WriterBus::new(std::io::sink()), StdClock::default());

        group.throughput(Throughput::Elements(image.width as u64 * image.height as u64));
        group.bench_function(format.name(), |b| {
            b.iter(|| sink.show(black_box(&frame)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_panel_stream);
criterion_main!(benches);
