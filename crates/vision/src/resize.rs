use image::imageops::FilterType;
use pipeline_core::{Frame, PipelineError, Stage, StageOutput};
use tracing::trace;

use crate::convert::{copy_frame, frame_to_image, image_to_frame, require_pixels};

/// Resamples 8-bit frames to a fixed size with bilinear filtering.
///
/// The pixel format passes through untouched. Float frames are rejected; put
/// this stage ahead of [`crate::NormalizeStage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResizeStage {
    width: u32,
    height: u32,
}

impl ResizeStage {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn target(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Stage for ResizeStage {
    fn process(&self, input: &Frame) -> Result<StageOutput, PipelineError> {
        if self.width == 0 || self.height == 0 {
            return Err(PipelineError::InvalidConfig(format!(
                "resize target {}x{} has a zero dimension",
                self.width, self.height
            )));
        }
        require_pixels(input, self.name())?;
        let format = input.format();
        let image = frame_to_image(input)?;

        if input.width() == self.width && input.height() == self.height {
            return copy_frame(input, format).map(StageOutput::Continue);
        }

        trace!(
            from_w = input.width(),
            from_h = input.height(),
            to_w = self.width,
            to_h = self.height,
            "resizing frame"
        );
        let resized = image.resize_exact(self.width, self.height, FilterType::Triangle);
        image_to_frame(resized, format).map(StageOutput::Continue)
    }

    fn name(&self) -> &str {
        "resize"
    }
}
