use crate::{
    foundation::error::{FilekitError, FilekitResult},
    processing::{
        encode::{self, OutputFormat},
        processor::{Processor, Stream},
        resize::DEFAULT_QUALITY,
    },
};

/// Re-encode an image into another format without changing its geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct Convert {
    format: OutputFormat,
    quality: u8,
}

impl Convert {
    /// Convert into `format`.
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            quality: DEFAULT_QUALITY,
        }
    }

    /// JPEG quality, 0..=100. Ignored for lossless formats.
    pub fn quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }
}

impl Processor for Convert {
    fn name(&self) -> &str {
        "convert"
    }

    fn extension(&self) -> Option<&str> {
        Some(self.format.extension())
    }

    fn validate(&self) -> FilekitResult<()> {
        if self.quality > 100 {
            return Err(FilekitError::config("convert quality must be in 0..=100"));
        }
        Ok(())
    }

    fn process(&self, input: Stream) -> FilekitResult<Stream> {
        let img = encode::decode_image(input, self.name())?;
        encode::encode_image(&img, self.format, self.quality, self.name())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/processing/convert.rs"]
mod tests;
