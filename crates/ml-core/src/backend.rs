//! Contract between the detection stage and an inference runtime.

use pipeline_core::{Frame, PipelineError};

/// Raw model output for one frame, before decoding into defects.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InferenceResult {
    /// Corner coordinates `[x1, y1, x2, y2]` per detection, flattened.
    pub boxes: Vec<f32>,
    pub scores: Vec<f32>,
    pub class_ids: Vec<i64>,
    pub num_detections: u32,
}

impl InferenceResult {
    pub fn is_empty(&self) -> bool {
        self.num_detections == 0
    }
}

/// Inference runtime turning a preprocessed frame into raw detections.
///
/// Only [`InferenceBackend::infer`] is required. Every method takes `&self`:
/// a backend shared by a pipeline can be called from several worker threads
/// at once, so implementations guard any mutable session state themselves.
pub trait InferenceBackend: Send + Sync {
    fn infer(&self, input: &Frame) -> Result<InferenceResult, PipelineError>;

    /// Check format and dimensions before [`InferenceBackend::infer`]. Accepts
    /// everything by default.
    fn validate_input(&self, _input: &Frame) -> Result<(), PipelineError> {
        Ok(())
    }

    /// Run several frames; the first failure aborts the batch.
    fn infer_batch(&self, inputs: &[Frame]) -> Result<Vec<InferenceResult>, PipelineError> {
        inputs.iter().map(|frame| self.infer(frame)).collect()
    }

    /// One-off dummy run after construction. No-op by default.
    fn warmup(&self) -> Result<(), PipelineError> {
        Ok(())
    }

    fn name(&self) -> &'static str;
}

impl<B: InferenceBackend + ?Sized> InferenceBackend for Box<B> {
    fn infer(&self, input: &Frame) -> Result<InferenceResult, PipelineError> {
        (**self).infer(input)
    }

    fn validate_input(&self, input: &Frame) -> Result<(), PipelineError> {
        (**self).validate_input(input)
    }

    fn infer_batch(&self, inputs: &[Frame]) -> Result<Vec<InferenceResult>, PipelineError> {
        (**self).infer_batch(inputs)
    }

    fn warmup(&self) -> Result<(), PipelineError> {
        (**self).warmup()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
