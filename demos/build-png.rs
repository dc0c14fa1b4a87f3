use std::{fs::File, path::PathBuf};

use sdf_atlas::{latin1, ttf_parser::Face, AtlasBuilder, MetricsRecord, OutlineRasterizer};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let Some(font_path) = args.next() else {
        eprintln!("usage: build-png <font.ttf> [characters]");
        std::process::exit(2);
    };
    let chars: Vec<char> = match args.next() {
        Some(text) => text.chars().collect(),
        None => latin1().chain(['中', '文']).collect(),
    };

    let font_data = std::fs::read(&font_path).unwrap();
    let face = Face::parse(&font_data, 0).unwrap();
    let font_size = 32;
    let atlas = AtlasBuilder::with_font_size(font_size)
        .with_buffer(font_size / 8)
        .with_radius(f64::from(font_size) / 3.0)
        .build(&mut OutlineRasterizer::new(&face), chars)
        .unwrap();

    let mut output_path = PathBuf::from(file!()).parent().unwrap().to_path_buf();
    output_path.push("demo-sdf.png");
    let file = File::create(&output_path).unwrap();
    let mut encoder = png::Encoder::new(file, atlas.width(), atlas.height());
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);
    encoder
        .write_header()
        .unwrap()
        .write_image_data(atlas.buffer.data())
        .unwrap();
    for MetricsRecord {
        codepoint,
        x,
        y,
        advance,
        ..
    } in atlas.metrics.iter()
    {
        let ch = char::from_u32(*codepoint).unwrap_or('?');
        println!("glyph '{ch}' @ {x} , {y} advance {advance}");
    }
    println!(
        "{}x{} atlas, {:.1}% filled",
        atlas.width(),
        atlas.height(),
        atlas.fill_ratio * 100.0
    );
    println!("checkout the image at '{}'", output_path.to_string_lossy());
}
