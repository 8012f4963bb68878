use pipeline_core::{Frame, PipelineError, PixelFormat, Stage, StageOutput};

use crate::convert::{copy_frame, require_pixels};

/// Converts between 8-bit pixel layouts.
///
/// Supported: swapping red and blue (`Bgr8`/`Rgb8`, `Bgra8`/`Rgba8`), gray to
/// three-channel color, and three-channel color to gray using BT.601 luma
/// weights. Converting to the input's own format copies the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorConvertStage {
    output_format: PixelFormat,
}

impl ColorConvertStage {
    pub fn new(output_format: PixelFormat) -> Self {
        Self { output_format }
    }

    pub fn output_format(&self) -> PixelFormat {
        self.output_format
    }
}

fn luma(r: u8, g: u8, b: u8) -> u8 {
    let y = 0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b);
    y.round().clamp(0.0, 255.0) as u8
}

fn map_pixels<const N: usize>(
    pixels: &[u8],
    stride: usize,
    f: impl Fn(&[u8]) -> [u8; N],
) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixels.len() / stride * N);
    for pixel in pixels.chunks_exact(stride) {
        out.extend_from_slice(&f(pixel));
    }
    out
}

impl Stage for ColorConvertStage {
    fn process(&self, input: &Frame) -> Result<StageOutput, PipelineError> {
        use PixelFormat::*;

        require_pixels(input, self.name())?;
        let from = input.format();
        let to = self.output_format;
        if from == to && !matches!(from, Float32Planar | Unknown) {
            return copy_frame(input, to).map(StageOutput::Continue);
        }

        let pixels = input.pixels();
        let data = match (from, to) {
            (Bgr8, Rgb8) | (Rgb8, Bgr8) => map_pixels(pixels, 3, |p| [p[2], p[1], p[0]]),
            (Bgra8, Rgba8) | (Rgba8, Bgra8) => {
                map_pixels(pixels, 4, |p| [p[2], p[1], p[0], p[3]])
            }
            (Grayscale8, Rgb8 | Bgr8) => map_pixels(pixels, 1, |p| [p[0]; 3]),
            (Rgb8, Grayscale8) => map_pixels(pixels, 3, |p| [luma(p[0], p[1], p[2])]),
            (Bgr8, Grayscale8) => map_pixels(pixels, 3, |p| [luma(p[2], p[1], p[0])]),
            _ => {
                return Err(PipelineError::InvalidFrame(format!(
                    "unsupported color conversion {} -> {}",
                    from.label(),
                    to.label()
                )));
            }
        };

        Frame::new(input.width(), input.height(), to, data).map(StageOutput::Continue)
    }

    fn name(&self) -> &str {
        "color_convert"
    }
}

#[cfg(test)]
mod tests {
    use pipeline_core::ErrorKind;

    use super::*;

    fn convert(input: &Frame, to: PixelFormat) -> Frame {
        match ColorConvertStage::new(to).process(input).unwrap() {
            StageOutput::Continue(frame) => frame,
            StageOutput::Done(_) => panic!("color conversion never finishes a run"),
        }
    }

    #[test]
    fn swaps_red_and_blue() {
        let bgr = Frame::new(2, 1, PixelFormat::Bgr8, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let rgb = convert(&bgr, PixelFormat::Rgb8);
        assert_eq!(rgb.format(), PixelFormat::Rgb8);
        assert_eq!(rgb.data(), &[3, 2, 1, 6, 5, 4]);

        let rgba = Frame::new(1, 1, PixelFormat::Rgba8, vec![10, 20, 30, 40]).unwrap();
        assert_eq!(convert(&rgba, PixelFormat::Bgra8).data(), &[30, 20, 10, 40]);
    }

    #[test]
    fn gray_round_trip() {
        let gray = Frame::new(2, 1, PixelFormat::Grayscale8, vec![7, 200]).unwrap();
        let rgb = convert(&gray, PixelFormat::Rgb8);
        assert_eq!(rgb.data(), &[7, 7, 7, 200, 200, 200]);
        assert_eq!(convert(&rgb, PixelFormat::Grayscale8).data(), &[7, 200]);
    }

    #[test]
    fn luma_weights_depend_on_channel_order() {
        let red_rgb = Frame::new(1, 1, PixelFormat::Rgb8, vec![255, 0, 0]).unwrap();
        assert_eq!(convert(&red_rgb, PixelFormat::Grayscale8).data(), &[76]);

        let red_bgr = Frame::new(1, 1, PixelFormat::Bgr8, vec![0, 0, 255]).unwrap();
        assert_eq!(convert(&red_bgr, PixelFormat::Grayscale8).data(), &[76]);
    }

    #[test]
    fn same_format_copies() {
        let frame = Frame::new(1, 1, PixelFormat::Rgb8, vec![9, 8, 7]).unwrap();
        assert_eq!(convert(&frame, PixelFormat::Rgb8), frame);
    }

    #[test]
    fn unsupported_pairs_are_rejected() {
        let stage = ColorConvertStage::new(PixelFormat::Rgba8);
        let err = stage
            .process(&Frame::zeroed(2, 2, PixelFormat::Rgb8).unwrap())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFrame);

        let float = ColorConvertStage::new(PixelFormat::Float32Planar);
        let err = float
            .process(&Frame::zeroed(2, 2, PixelFormat::Float32Planar).unwrap())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFrame);

        let err = stage.process(&Frame::empty()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFrame);
    }
}
