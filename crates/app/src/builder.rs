use ml_core::{DefectDecoder, DefectDetectionStage, InferenceBackend, MockBackend};
use pipeline_core::{BBox, Defect, DefectKind, Pipeline, PipelineError};
use tracing::info;
use vision::{NormalizeStage, ResizeStage};

use crate::config::{BackendKind, PipelineConfig};

/// Defect reported by the mock backend on every frame.
pub fn demo_defect() -> Defect {
    Defect::new(DefectKind::WrongItem, BBox::new(0.1, 0.2, 0.3, 0.4), 0.95)
}

/// Resize → normalize → detect, wired from `config`.
pub fn build_pipeline(config: &PipelineConfig) -> Result<Pipeline, PipelineError> {
    let backend = make_backend(config)?;
    backend.warmup()?;
    info!(
        backend = backend.name(),
        width = config.resize_width,
        height = config.resize_height,
        threshold = config.confidence_threshold,
        "building pipeline"
    );

    let decoder = DefectDecoder::with_default_classes(config.confidence_threshold);
    Ok(Pipeline::new()
        .with_stage(ResizeStage::new(config.resize_width, config.resize_height))
        .with_stage(NormalizeStage::new(
            config.normalize_mean,
            config.normalize_scale,
        ))
        .with_stage(DefectDetectionStage::new(backend, decoder)))
}

fn make_backend(config: &PipelineConfig) -> Result<Box<dyn InferenceBackend>, PipelineError> {
    match config.backend {
        BackendKind::Mock => Ok(Box::new(MockBackend::with_defects(vec![demo_defect()]))),
        kind @ (BackendKind::Onnx | BackendKind::TensorRt) => {
            let Some(model_path) = config.model_path.as_ref() else {
                return Err(PipelineError::InvalidConfig(format!(
                    "backend {} requires model_path",
                    kind.label()
                )));
            };
            Err(PipelineError::InvalidConfig(format!(
                "backend {} is not available in this build (model {})",
                kind.label(),
                model_path.display()
            )))
        }
    }
}
