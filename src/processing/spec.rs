use std::sync::Arc;

use crate::{
    foundation::error::FilekitResult,
    processing::{
        convert::Convert,
        encode::OutputFormat,
        processor::Processor,
        resize::{DEFAULT_QUALITY, Resize},
    },
};

/// Serializable description of a built-in processor, as written in a kit manifest.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum ProcessorSpec {
    /// See [`Resize`].
    Resize {
        /// Target width.
        #[serde(default)]
        width: Option<u32>,
        /// Target height.
        #[serde(default)]
        height: Option<u32>,
        /// Center-crop to the exact target.
        #[serde(default)]
        crop: bool,
        /// Allow enlarging.
        #[serde(default)]
        upscale: bool,
        /// JPEG quality.
        #[serde(default = "default_quality")]
        quality: u8,
    },
    /// See [`Convert`].
    Convert {
        /// Output encoding.
        format: OutputFormat,
        /// JPEG quality.
        #[serde(default = "default_quality")]
        quality: u8,
    },
}

fn default_quality() -> u8 {
    DEFAULT_QUALITY
}

impl ProcessorSpec {
    /// Instantiate and validate the described processor.
    pub fn build(&self) -> FilekitResult<Arc<dyn Processor>> {
        let processor: Arc<dyn Processor> = match *self {
            ProcessorSpec::Resize {
                width,
                height,
                crop,
                upscale,
                quality,
            } => Arc::new(
                Resize::with_axes(width, height)
                    .crop(crop)
                    .upscale(upscale)
                    .quality(quality),
            ),
            ProcessorSpec::Convert { format, quality } => {
                Arc::new(Convert::new(format).quality(quality))
            }
        };
        processor.validate()?;
        Ok(processor)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/processing/spec.rs"]
mod tests;
