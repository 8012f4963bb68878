use std::path::PathBuf;

use clap::Parser;

use crate::{
    config::{BackendKind, ConfigOverrides},
    telemetry::TelemetryOptions,
};

/// Run the shelf defect-detection pipeline over still images.
#[derive(Debug, Parser)]
#[command(name = "shelfwatch", version, about)]
pub struct Args {
    /// Pipeline config (TOML); built-in mock defaults when omitted.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the configured inference backend.
    #[arg(long, value_enum)]
    pub backend: Option<BackendKind>,

    /// Override the model path (required for onnx and tensorrt).
    #[arg(long, value_name = "PATH")]
    pub model: Option<PathBuf>,

    /// Override the detection confidence threshold.
    #[arg(long, value_name = "0..1")]
    pub confidence: Option<f32>,

    /// Worker threads for multi-input runs (0 = all cores).
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Image files to inspect. Without any, a synthetic 320x240 frame is used.
    #[arg(long = "input", value_name = "PATH", num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    #[arg(long, value_name = "ID")]
    pub camera_id: Option<String>,

    #[arg(long, value_name = "ID")]
    pub customer_id: Option<String>,

    /// Print per-stage timings (single-frame runs only).
    #[arg(long)]
    pub timings: bool,

    /// Print results as JSON lines instead of text.
    #[arg(long)]
    pub json: bool,

    /// Directory receiving one `<input-stem>.txt` report per input image.
    #[arg(long, value_name = "DIR", default_value = "output")]
    pub output_dir: PathBuf,

    #[arg(short, long)]
    pub verbose: bool,

    /// Write a Chrome trace of pipeline spans to this file.
    #[arg(long, value_name = "PATH")]
    pub chrome_trace: Option<PathBuf>,
}

impl Args {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            backend: self.backend,
            model_path: self.model.clone(),
            confidence_threshold: self.confidence,
            workers: self.workers,
        }
    }

    pub fn telemetry(&self) -> TelemetryOptions {
        TelemetryOptions {
            verbose: self.verbose,
            chrome_trace_path: self.chrome_trace.clone(),
        }
    }
}
