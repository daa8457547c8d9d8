use std::io::{BufReader, Seek, Write};

use anyhow::Context;

use crate::{
    foundation::error::{FilekitError, FilekitResult},
    processing::processor::Stream,
};

/// Encoded output held in memory up to this size before spilling to a temp file.
pub const SPOOL_LIMIT_BYTES: usize = 4 * 1024 * 1024;

/// Target encoding for image processors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Baseline JPEG. Alpha is dropped.
    Jpeg,
    /// Lossless PNG.
    Png,
}

impl OutputFormat {
    /// Canonical file extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

/// Decode an image from a stream, sniffing the format from its leading bytes.
pub(crate) fn decode_image(input: Stream, who: &str) -> FilekitResult<image::DynamicImage> {
    let reader = image::ImageReader::new(BufReader::new(input))
        .with_guessed_format()
        .map_err(|e| FilekitError::processor(format!("{who}: read image header: {e}")))?;
    reader
        .decode()
        .map_err(|e| FilekitError::processor(format!("{who}: decode image: {e}")))
}

/// Encode `img` into a fresh spooled temp file.
pub(crate) fn encode_image(
    img: &image::DynamicImage,
    format: OutputFormat,
    quality: u8,
    who: &str,
) -> FilekitResult<Stream> {
    let mut out = tempfile::spooled_tempfile(SPOOL_LIMIT_BYTES);
    match format {
        OutputFormat::Jpeg => {
            let rgb = image::DynamicImage::ImageRgb8(img.to_rgb8());
            let encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100));
            rgb.write_with_encoder(encoder)
                .map_err(|e| FilekitError::processor(format!("{who}: encode jpeg: {e}")))?;
        }
        OutputFormat::Png => {
            img.write_to(&mut out, image::ImageFormat::Png)
                .map_err(|e| FilekitError::processor(format!("{who}: encode png: {e}")))?;
        }
    }
    out.flush().context("flush encoded image")?;
    out.rewind().context("rewind encoded image")?;
    Ok(Box::new(out))
}

#[cfg(test)]
#[path = "../../tests/unit/processing/encode.rs"]
mod tests;
