use pipeline_core::{Frame, PipelineError, PixelFormat, Stage, StageOutput};

use crate::convert::require_pixels;

/// Converts an 8-bit frame to interleaved `f32` samples computed as
/// `(value - mean) * scale`.
///
/// Output is always three channels: alpha is dropped and grayscale is
/// replicated, matching what detection models expect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalizeStage {
    mean: f32,
    scale: f32,
}

impl NormalizeStage {
    pub fn new(mean: f32, scale: f32) -> Self {
        Self { mean, scale }
    }

    pub fn mean(&self) -> f32 {
        self.mean
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[inline]
    fn apply(&self, value: u8) -> f32 {
        (f32::from(value) - self.mean) * self.scale
    }
}

impl Default for NormalizeStage {
    fn default() -> Self {
        Self::new(0.0, 1.0 / 255.0)
    }
}

impl Stage for NormalizeStage {
    fn process(&self, input: &Frame) -> Result<StageOutput, PipelineError> {
        require_pixels(input, self.name())?;
        let channels = match input.format() {
            PixelFormat::Grayscale8 => 1,
            PixelFormat::Rgb8 | PixelFormat::Bgr8 => 3,
            PixelFormat::Rgba8 | PixelFormat::Bgra8 => 4,
            other => {
                return Err(PipelineError::InvalidFrame(format!(
                    "normalize expects 8-bit input, got {}",
                    other.label()
                )));
            }
        };

        let capacity = Frame::min_bytes(input.width(), input.height(), PixelFormat::Float32Planar)
            .ok_or_else(|| {
                PipelineError::InvalidFrame(format!(
                    "{}x{} frame is too large to normalize",
                    input.width(),
                    input.height()
                ))
            })?;
        let mut out = Vec::with_capacity(capacity);
        for pixel in input.pixels().chunks_exact(channels) {
            let rgb = match *pixel {
                [v] => [v, v, v],
                _ => [pixel[0], pixel[1], pixel[2]],
            };
            for value in rgb {
                out.extend_from_slice(&self.apply(value).to_ne_bytes());
            }
        }

        Frame::new(input.width(), input.height(), PixelFormat::Float32Planar, out)
            .map(StageOutput::Continue)
    }

    fn name(&self) -> &str {
        "normalize"
    }
}
