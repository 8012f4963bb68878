use pipeline_core::{Frame, PipelineError, PixelFormat};

/// All-zero frame of the given size and format.
pub fn synthetic_frame(
    width: u32,
    height: u32,
    format: PixelFormat,
) -> Result<Frame, PipelineError> {
    Frame::zeroed(width, height, format)
}

/// Diagonal ramp from dark (top left) to bright (bottom right), identical on
/// every channel. Float frames get the ramp scaled to `0.0..=1.0` on three
/// channels.
pub fn gradient_frame(
    width: u32,
    height: u32,
    format: PixelFormat,
) -> Result<Frame, PipelineError> {
    let span = (width as usize + height as usize).saturating_sub(2).max(1);
    let zeroed = Frame::zeroed(width, height, format)?;
    if zeroed.is_empty() {
        return Ok(zeroed);
    }

    let channels = format.channels();
    let float = format == PixelFormat::Float32Planar;
    let mut data = Vec::with_capacity(zeroed.size_bytes());
    for y in 0..height as usize {
        for x in 0..width as usize {
            let level = ((x + y) * 255 / span) as u8;
            for _ in 0..channels {
                if float {
                    data.extend_from_slice(&(f32::from(level) / 255.0).to_ne_bytes());
                } else {
                    data.push(level);
                }
            }
        }
    }

    Frame::new(width, height, format, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_is_zeroed() {
        let frame = synthetic_frame(320, 240, PixelFormat::Rgb8).unwrap();
        assert_eq!(frame.size_bytes(), 320 * 240 * 3);
        assert!(frame.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn gradient_spans_full_range() {
        let frame = gradient_frame(4, 4, PixelFormat::Grayscale8).unwrap();
        assert_eq!(frame.data()[0], 0);
        assert_eq!(frame.data()[15], 255);
        assert!(frame.data().windows(2).take(3).all(|w| w[0] < w[1]));
    }

    #[test]
    fn gradient_repeats_level_per_channel() {
        let frame = gradient_frame(3, 1, PixelFormat::Bgra8).unwrap();
        assert_eq!(frame.size_bytes(), 12);
        assert_eq!(&frame.data()[4..8], &[127; 4]);
    }

    #[test]
    fn float_gradient_is_unit_range() {
        let frame = gradient_frame(2, 2, PixelFormat::Float32Planar).unwrap();
        let samples = frame.to_f32_samples().unwrap();
        assert_eq!(samples.len(), 12);
        assert_eq!(samples[0], 0.0);
        assert_eq!(samples[11], 1.0);
    }

    #[test]
    fn unknown_format_yields_empty_frame() {
        assert!(gradient_frame(4, 4, PixelFormat::Unknown).unwrap().is_empty());
    }

    #[test]
    fn oversized_requests_fail() {
        assert!(synthetic_frame(u32::MAX, u32::MAX, PixelFormat::Rgba8).is_err());
        assert!(gradient_frame(u32::MAX, u32::MAX, PixelFormat::Float32Planar).is_err());
    }
}
