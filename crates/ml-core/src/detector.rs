use pipeline_core::{DefectResult, Frame, PipelineError, Stage, StageOutput};
use tracing::trace;

use crate::{backend::InferenceBackend, decoder::DefectDecoder};

/// Terminal stage: validates the frame, runs the backend, and decodes the
/// raw detections into a [`DefectResult`].
pub struct DefectDetectionStage {
    backend: Box<dyn InferenceBackend>,
    decoder: DefectDecoder,
    frame_id: u64,
}

impl DefectDetectionStage {
    pub fn new<B: InferenceBackend + 'static>(backend: B, decoder: DefectDecoder) -> Self {
        Self {
            backend: Box::new(backend),
            decoder,
            frame_id: 0,
        }
    }

    /// Frame id stamped on every result produced by this stage.
    pub fn with_frame_id(mut self, frame_id: u64) -> Self {
        self.frame_id = frame_id;
        self
    }

    pub fn backend(&self) -> &dyn InferenceBackend {
        self.backend.as_ref()
    }

    pub fn decoder(&self) -> &DefectDecoder {
        &self.decoder
    }
}

impl Stage for DefectDetectionStage {
    fn process(&self, input: &Frame) -> Result<StageOutput, PipelineError> {
        self.backend.validate_input(input)?;
        let raw = self.backend.infer(input)?;
        let defects = self.decoder.decode(&raw);
        trace!(
            backend = self.backend.name(),
            raw = raw.num_detections,
            kept = defects.len(),
            "decoded detections"
        );
        Ok(StageOutput::Done(DefectResult::new(self.frame_id, defects)))
    }

    fn name(&self) -> &str {
        "defect_detection"
    }
}
