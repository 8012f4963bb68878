use thiserror::Error;

/// Coarse failure categories shared by stages, backends, and loaders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidFrame,
    LoadFailed,
    InferenceFailed,
    InvalidConfig,
    DecoderError,
}

impl ErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::InvalidFrame => "invalid_frame",
            ErrorKind::LoadFailed => "load_failed",
            ErrorKind::InferenceFailed => "inference_failed",
            ErrorKind::InvalidConfig => "invalid_config",
            ErrorKind::DecoderError => "decoder_error",
        }
    }
}

/// Error returned by a stage, a backend, or a pipeline run.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PipelineError {
    #[error("invalid frame: {0}")]
    InvalidFrame(String),
    #[error("failed to load {path:?}: {reason}")]
    LoadFailed { path: String, reason: String },
    #[error("inference failed: {0}")]
    InferenceFailed(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Every stage returned a frame (or there were no stages) and no result was produced.
    #[error("incomplete pipeline: no stage produced a result")]
    IncompletePipeline,
    #[error("decoder error: {0}")]
    Decoder(String),
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::InvalidFrame(_) => ErrorKind::InvalidFrame,
            PipelineError::LoadFailed { .. } => ErrorKind::LoadFailed,
            PipelineError::InferenceFailed(_) => ErrorKind::InferenceFailed,
            PipelineError::InvalidConfig(_) | PipelineError::IncompletePipeline => {
                ErrorKind::InvalidConfig
            }
            PipelineError::Decoder(_) => ErrorKind::DecoderError,
        }
    }
}
