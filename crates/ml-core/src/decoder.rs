use pipeline_core::{BBox, Defect, DefectKind};

use crate::backend::InferenceResult;

/// Class-id → defect-kind mapping used when the model does not say otherwise.
pub const DEFAULT_CLASS_MAP: [DefectKind; 4] = [
    DefectKind::WrongItem,
    DefectKind::WrongQuantity,
    DefectKind::ExpiredOrQuality,
    DefectKind::ProcessError,
];

/// Turns raw model output into typed defects.
///
/// Detections scoring below the confidence threshold are dropped. Class ids
/// outside the map (or missing) fall back to [`DefectKind::ProcessError`].
/// Corner boxes are converted to `x/y/w/h` when all four coordinates exist.
#[derive(Clone, Debug)]
pub struct DefectDecoder {
    confidence_threshold: f32,
    class_map: Vec<DefectKind>,
    max_detections: Option<usize>,
}

impl DefectDecoder {
    pub fn new(confidence_threshold: f32, class_map: Vec<DefectKind>) -> Self {
        Self {
            confidence_threshold,
            class_map,
            max_detections: None,
        }
    }

    /// Decoder using [`DEFAULT_CLASS_MAP`].
    pub fn with_default_classes(confidence_threshold: f32) -> Self {
        Self::new(confidence_threshold, DEFAULT_CLASS_MAP.to_vec())
    }

    /// Stop after this many accepted detections.
    pub fn with_max_detections(mut self, max_detections: usize) -> Self {
        self.max_detections = Some(max_detections);
        self
    }

    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }

    pub fn set_confidence_threshold(&mut self, confidence_threshold: f32) {
        self.confidence_threshold = confidence_threshold;
    }

    pub fn decode(&self, result: &InferenceResult) -> Vec<Defect> {
        let mut defects = Vec::new();
        for i in 0..result.num_detections as usize {
            if self
                .max_detections
                .is_some_and(|limit| defects.len() >= limit)
            {
                break;
            }

            let score = result.scores.get(i).copied().unwrap_or(0.0);
            if score < self.confidence_threshold {
                continue;
            }

            let kind = result
                .class_ids
                .get(i)
                .and_then(|&class_id| usize::try_from(class_id).ok())
                .and_then(|class_id| self.class_map.get(class_id).copied())
                .unwrap_or(DefectKind::ProcessError);

            let bbox = match result.boxes.get(i * 4..i * 4 + 4) {
                Some(&[x1, y1, x2, y2]) => BBox::new(x1, y1, x2 - x1, y2 - y1),
                _ => BBox::default(),
            };

            defects.push(Defect::new(kind, bbox, score));
        }
        defects
    }
}
