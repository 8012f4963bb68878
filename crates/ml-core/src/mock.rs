use pipeline_core::{Defect, Frame, PipelineError};

use crate::backend::{InferenceBackend, InferenceResult};

/// Backend returning a fixed list of synthetic defects, for tests and demos.
///
/// Each defect is encoded the way a detection model would report it: corner
/// box coordinates, a score, and the defect kind's class id.
#[derive(Clone, Debug, Default)]
pub struct MockBackend {
    defects: Vec<Defect>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defects(defects: Vec<Defect>) -> Self {
        Self { defects }
    }

    /// Replace the defects returned by subsequent inference calls.
    pub fn set_defects(&mut self, defects: Vec<Defect>) {
        self.defects = defects;
    }

    fn encode(&self) -> InferenceResult {
        let mut result = InferenceResult {
            num_detections: self.defects.len() as u32,
            ..InferenceResult::default()
        };
        for defect in &self.defects {
            let bbox = defect.bbox;
            result
                .boxes
                .extend_from_slice(&[bbox.x, bbox.y, bbox.x + bbox.w, bbox.y + bbox.h]);
            result.scores.push(defect.confidence);
            result.class_ids.push(defect.kind.class_id());
        }
        result
    }
}

impl InferenceBackend for MockBackend {
    fn infer(&self, _input: &Frame) -> Result<InferenceResult, PipelineError> {
        Ok(self.encode())
    }

    fn validate_input(&self, input: &Frame) -> Result<(), PipelineError> {
        if input.is_empty() {
            return Err(PipelineError::InvalidFrame(
                "mock backend received an empty frame".into(),
            ));
        }
        Ok(())
    }

    fn infer_batch(&self, inputs: &[Frame]) -> Result<Vec<InferenceResult>, PipelineError> {
        let encoded = self.encode();
        inputs
            .iter()
            .enumerate()
            .map(|(index, frame)| {
                if frame.is_empty() {
                    return Err(PipelineError::InvalidFrame(format!(
                        "mock backend received an empty frame at batch index {index}"
                    )));
                }
                Ok(encoded.clone())
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
