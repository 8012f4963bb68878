use std::path::Path;

use image::{ColorType, DynamicImage};
use pipeline_core::{Frame, PipelineError, PixelFormat};
use tracing::debug;

/// Decode an image file into a frame.
///
/// Luma sources (with or without alpha) become [`PixelFormat::Grayscale8`];
/// everything else is flattened to [`PixelFormat::Rgb8`]. Higher bit depths
/// are reduced to 8 bits per channel.
pub fn load_frame(path: impl AsRef<Path>) -> Result<Frame, PipelineError> {
    let path = path.as_ref();
    let load_failed = |reason: String| PipelineError::LoadFailed {
        path: path.display().to_string(),
        reason,
    };

    let image = image::open(path).map_err(|err| load_failed(err.to_string()))?;
    if image.width() == 0 || image.height() == 0 {
        return Err(load_failed("image has no pixels".into()));
    }

    let source = image.color();
    let frame = match source {
        ColorType::L8 | ColorType::L16 | ColorType::La8 | ColorType::La16 => {
            into_frame(DynamicImage::ImageLuma8(image.to_luma8()), PixelFormat::Grayscale8)
        }
        _ => into_frame(DynamicImage::ImageRgb8(image.to_rgb8()), PixelFormat::Rgb8),
    }
    .map_err(|err| load_failed(err.to_string()))?;

    debug!(
        path = %path.display(),
        width = frame.width(),
        height = frame.height(),
        source = ?source,
        format = frame.format().label(),
        "loaded frame"
    );
    Ok(frame)
}

fn into_frame(image: DynamicImage, format: PixelFormat) -> Result<Frame, PipelineError> {
    let (width, height) = (image.width(), image.height());
    Frame::new(width, height, format, image.into_bytes())
}

#[cfg(test)]
mod tests {
    use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
    use pipeline_core::ErrorKind;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn color_png_loads_as_rgb() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shelf.png");
        RgbImage::from_pixel(6, 4, Rgb([10, 20, 30])).save(&path).unwrap();

        let frame = load_frame(&path).unwrap();
        assert_eq!((frame.width(), frame.height()), (6, 4));
        assert_eq!(frame.format(), PixelFormat::Rgb8);
        assert_eq!(&frame.data()[..3], &[10, 20, 30]);
        assert_eq!(frame.size_bytes(), 6 * 4 * 3);
    }

    #[test]
    fn alpha_is_flattened() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("overlay.png");
        RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 128])).save(&path).unwrap();

        let frame = load_frame(&path).unwrap();
        assert_eq!(frame.format(), PixelFormat::Rgb8);
        assert_eq!(frame.size_bytes(), 2 * 2 * 3);
    }

    #[test]
    fn grayscale_png_stays_single_channel() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mono.png");
        GrayImage::from_pixel(3, 3, Luma([77])).save(&path).unwrap();

        let frame = load_frame(&path).unwrap();
        assert_eq!(frame.format(), PixelFormat::Grayscale8);
        assert!(frame.data().iter().all(|&b| b == 77));
    }

    #[test]
    fn missing_file_is_a_load_failure() {
        let dir = tempdir().unwrap();
        let err = load_frame(dir.path().join("absent.png")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LoadFailed);
        assert!(err.to_string().contains("absent.png"));
    }

    #[test]
    fn garbage_bytes_are_a_load_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        assert_eq!(load_frame(&path).unwrap_err().kind(), ErrorKind::LoadFailed);
    }
}
