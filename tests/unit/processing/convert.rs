use std::io::{Cursor, Read};

use super::*;
use crate::processing::processor::stream_from_bytes;

fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([90, 90, 90]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
        .unwrap();
    buf
}

#[test]
fn jpeg_to_png_keeps_geometry() {
    let mut out = Convert::new(OutputFormat::Png)
        .apply(stream_from_bytes(jpeg_bytes(7, 3)))
        .unwrap();
    let mut bytes = Vec::new();
    out.read_to_end(&mut bytes).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Png);
    let img = image::load_from_memory(&bytes).unwrap();
    assert_eq!((img.width(), img.height()), (7, 3));
}

#[test]
fn extension_follows_format() {
    assert_eq!(Convert::new(OutputFormat::Png).extension(), Some("png"));
    assert_eq!(Convert::new(OutputFormat::Jpeg).extension(), Some("jpg"));
}

#[test]
fn quality_is_validated() {
    assert!(Convert::new(OutputFormat::Jpeg).quality(100).validate().is_ok());
    assert!(Convert::new(OutputFormat::Jpeg).quality(150).validate().is_err());
}
