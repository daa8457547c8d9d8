use image::{DynamicImage, RgbImage, imageops};

use crate::{
    foundation::error::{FilekitError, FilekitResult},
    processing::{
        encode::{self, OutputFormat},
        processor::{Processor, Stream},
    },
};

/// Default JPEG quality for [`Resize`].
pub const DEFAULT_QUALITY: u8 = 80;

/// Geometry decided for one source image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizePlan {
    /// Re-encode the source unchanged.
    Keep,
    /// Scale to exactly `width` x `height`.
    Scale {
        /// Output width in pixels.
        width: u32,
        /// Output height in pixels.
        height: u32,
    },
    /// Scale to cover the target, then cut a `width` x `height` box at (`left`, `top`).
    ScaleCrop {
        /// Width after scaling, before the crop.
        scaled_width: u32,
        /// Height after scaling, before the crop.
        scaled_height: u32,
        /// Left edge of the crop box in the scaled image.
        left: u32,
        /// Top edge of the crop box in the scaled image.
        top: u32,
        /// Output width in pixels.
        width: u32,
        /// Output height in pixels.
        height: u32,
    },
}

/// Resize (and optionally center-crop) an image, re-encoding it as JPEG.
///
/// - `crop = true`: scale by `max(width/cur_width, height/cur_height)` so the target is fully
///   covered, then cut the target box centered on the overflow. Both axes are required.
/// - `crop = false`: scale by the smaller axis ratio (or the only given axis), rounding to the
///   nearest pixel. If that would enlarge the image and `upscale` is off, the image is
///   re-encoded at its original size.
#[derive(Clone, Debug, PartialEq)]
pub struct Resize {
    width: Option<u32>,
    height: Option<u32>,
    crop: bool,
    upscale: bool,
    quality: u8,
}

impl Resize {
    /// Fit into `width` x `height` preserving aspect ratio.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_axes(Some(width), Some(height))
    }

    /// Scale so the output has the given width.
    pub fn fit_width(width: u32) -> Self {
        Self::with_axes(Some(width), None)
    }

    /// Scale so the output has the given height.
    pub fn fit_height(height: u32) -> Self {
        Self::with_axes(None, Some(height))
    }

    /// Build from optional axes; at least one must be set (checked by [`Processor::validate`]).
    pub fn with_axes(width: Option<u32>, height: Option<u32>) -> Self {
        Self {
            width,
            height,
            crop: false,
            upscale: false,
            quality: DEFAULT_QUALITY,
        }
    }

    /// Center-crop to the exact target size.
    pub fn crop(mut self, crop: bool) -> Self {
        self.crop = crop;
        self
    }

    /// Allow enlarging images smaller than the target.
    pub fn upscale(mut self, upscale: bool) -> Self {
        self.upscale = upscale;
        self
    }

    /// JPEG quality, 0..=100.
    pub fn quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    /// Decide output geometry for a `cur_width` x `cur_height` source.
    pub fn plan(&self, cur_width: u32, cur_height: u32) -> ResizePlan {
        if cur_width == 0 || cur_height == 0 {
            return ResizePlan::Keep;
        }
        let (cw, ch) = (f64::from(cur_width), f64::from(cur_height));

        if self.crop {
            let (Some(width), Some(height)) = (self.width, self.height) else {
                return ResizePlan::Keep;
            };
            let (tw, th) = (f64::from(width), f64::from(height));
            let ratio = (tw / cw).max(th / ch);
            let (resize_x, resize_y) = (cw * ratio, ch * ratio);
            let left = ((tw - resize_x).abs() / 2.0) as u32;
            let top = ((th - resize_y).abs() / 2.0) as u32;
            return ResizePlan::ScaleCrop {
                scaled_width: (resize_x as u32).max(1),
                scaled_height: (resize_y as u32).max(1),
                left,
                top,
                width,
                height,
            };
        }

        let ratio = match (self.width, self.height) {
            (Some(w), Some(h)) => (f64::from(w) / cw).min(f64::from(h) / ch),
            (Some(w), None) => f64::from(w) / cw,
            (None, Some(h)) => f64::from(h) / ch,
            (None, None) => return ResizePlan::Keep,
        };
        let width = ((cw * ratio).round() as u32).max(1);
        let height = ((ch * ratio).round() as u32).max(1);
        if (width > cur_width || height > cur_height) && !self.upscale {
            return ResizePlan::Keep;
        }
        ResizePlan::Scale { width, height }
    }
}

impl Processor for Resize {
    fn name(&self) -> &str {
        "resize"
    }

    fn extension(&self) -> Option<&str> {
        Some(OutputFormat::Jpeg.extension())
    }

    fn validate(&self) -> FilekitResult<()> {
        if self.width.is_none() && self.height.is_none() {
            return Err(FilekitError::config(
                "resize needs at least one of width/height",
            ));
        }
        if self.width == Some(0) || self.height == Some(0) {
            return Err(FilekitError::config("resize width/height must be > 0"));
        }
        if self.crop && (self.width.is_none() || self.height.is_none()) {
            return Err(FilekitError::config(
                "resize with crop needs both width and height",
            ));
        }
        if self.quality > 100 {
            return Err(FilekitError::config("resize quality must be in 0..=100"));
        }
        Ok(())
    }

    fn process(&self, input: Stream) -> FilekitResult<Stream> {
        let img = encode::decode_image(input, self.name())?;
        let rgb = img.to_rgb8();
        let out = match self.plan(rgb.width(), rgb.height()) {
            ResizePlan::Keep => rgb,
            ResizePlan::Scale { width, height } => {
                imageops::resize(&rgb, width, height, imageops::FilterType::Lanczos3)
            }
            ResizePlan::ScaleCrop {
                scaled_width,
                scaled_height,
                left,
                top,
                width,
                height,
            } => {
                let scaled = if (scaled_width, scaled_height) == rgb.dimensions() {
                    rgb
                } else {
                    imageops::resize(
                        &rgb,
                        scaled_width,
                        scaled_height,
                        imageops::FilterType::Lanczos3,
                    )
                };
                crop_exact(&scaled, left, top, width, height)
            }
        };
        tracing::debug!(
            width = out.width(),
            height = out.height(),
            "resize produced image"
        );
        encode::encode_image(
            &DynamicImage::ImageRgb8(out),
            OutputFormat::Jpeg,
            self.quality,
            self.name(),
        )
    }
}

/// Cut a box of exactly `width` x `height`; parts outside `img` stay black.
fn crop_exact(img: &RgbImage, left: u32, top: u32, width: u32, height: u32) -> RgbImage {
    let view = imageops::crop_imm(img, left, top, width, height).to_image();
    if view.dimensions() == (width, height) {
        return view;
    }
    let mut canvas = RgbImage::new(width, height);
    imageops::replace(&mut canvas, &view, 0, 0);
    canvas
}

#[cfg(test)]
#[path = "../../tests/unit/processing/resize.rs"]
mod tests;
