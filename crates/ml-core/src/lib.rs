//! Inference side of the pipeline: the backend contract, a mock backend,
//! decoding of raw detections into defects, and the detection stage that
//! ties them together.

pub mod backend;
pub mod decoder;
pub mod detector;
pub mod mock;

pub use backend::{InferenceBackend, InferenceResult};
pub use decoder::{DEFAULT_CLASS_MAP, DefectDecoder};
pub use detector::DefectDetectionStage;
pub use mock::MockBackend;
