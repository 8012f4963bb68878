//! Conversions between [`Frame`] buffers and `image` crate buffers.

use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use pipeline_core::{Frame, PipelineError, PixelFormat};

/// Reject empty or zero-area frames before any pixel work.
pub(crate) fn require_pixels(frame: &Frame, stage: &str) -> Result<(), PipelineError> {
    if frame.is_empty() || frame.width() == 0 || frame.height() == 0 {
        return Err(PipelineError::InvalidFrame(format!(
            "{stage} received an empty {}x{} frame",
            frame.width(),
            frame.height()
        )));
    }
    Ok(())
}

/// Copy an 8-bit frame into an image buffer. Channel order is preserved as
/// is, so BGR data lands in an `Rgb` buffer unchanged.
pub(crate) fn frame_to_image(frame: &Frame) -> Result<DynamicImage, PipelineError> {
    let (width, height) = (frame.width(), frame.height());
    let pixels = frame.pixels().to_vec();
    let image = match frame.format() {
        PixelFormat::Grayscale8 => {
            GrayImage::from_raw(width, height, pixels).map(DynamicImage::ImageLuma8)
        }
        PixelFormat::Rgb8 | PixelFormat::Bgr8 => {
            RgbImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgb8)
        }
        PixelFormat::Rgba8 | PixelFormat::Bgra8 => {
            RgbaImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgba8)
        }
        PixelFormat::Float32Planar | PixelFormat::Unknown => None,
    };
    image.ok_or_else(|| {
        PipelineError::InvalidFrame(format!(
            "cannot view {}x{} {} frame as an 8-bit image",
            width,
            height,
            frame.format().label()
        ))
    })
}

/// Wrap an image buffer back into a frame tagged with `format`.
pub(crate) fn image_to_frame(
    image: DynamicImage,
    format: PixelFormat,
) -> Result<Frame, PipelineError> {
    let (width, height) = (image.width(), image.height());
    Frame::new(width, height, format, image.into_bytes())
}

/// Same pixels in a freshly allocated frame.
pub(crate) fn copy_frame(frame: &Frame, format: PixelFormat) -> Result<Frame, PipelineError> {
    Frame::new(frame.width(), frame.height(), format, frame.pixels().to_vec())
}
