//! Pipeline configuration: TOML file, CLI overrides, validation.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use serde::Deserialize;

/// Inference backend named in the config file or on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Mock,
    Onnx,
    #[value(name = "tensorrt")]
    TensorRt,
}

impl BackendKind {
    pub fn label(self) -> &'static str {
        match self {
            BackendKind::Mock => "mock",
            BackendKind::Onnx => "onnx",
            BackendKind::TensorRt => "tensorrt",
        }
    }

    pub fn needs_model(self) -> bool {
        !matches!(self, BackendKind::Mock)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub model_path: Option<PathBuf>,
    pub backend: BackendKind,
    pub resize_width: u32,
    pub resize_height: u32,
    pub normalize_mean: f32,
    pub normalize_scale: f32,
    pub confidence_threshold: f32,
    /// Product categories whose defects are flagged in reports.
    pub high_value_categories: Vec<String>,
    /// Worker threads for multi-input runs; `0` uses every available core.
    pub workers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            backend: BackendKind::Mock,
            resize_width: 640,
            resize_height: 640,
            normalize_mean: 0.0,
            normalize_scale: 1.0 / 255.0,
            confidence_threshold: 0.5,
            high_value_categories: Vec::new(),
            workers: 0,
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub backend: Option<BackendKind>,
    pub model_path: Option<PathBuf>,
    pub confidence_threshold: Option<f32>,
    pub workers: Option<usize>,
}

impl PipelineConfig {
    /// Load `path` (defaults when `None`), apply `overrides`, and validate.
    pub fn resolve(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(backend) = overrides.backend {
            self.backend = backend;
        }
        if let Some(model_path) = &overrides.model_path {
            self.model_path = Some(model_path.clone());
        }
        if let Some(threshold) = overrides.confidence_threshold {
            self.confidence_threshold = threshold;
        }
        if let Some(workers) = overrides.workers {
            self.workers = workers;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.resize_width == 0 || self.resize_height == 0 {
            bail!(
                "resize dimensions must be positive, got {}x{}",
                self.resize_width,
                self.resize_height
            );
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            bail!(
                "confidence_threshold must be between 0 and 1, got {}",
                self.confidence_threshold
            );
        }
        if !self.normalize_scale.is_finite() || !self.normalize_mean.is_finite() {
            bail!("normalize_mean and normalize_scale must be finite");
        }
        if self.backend.needs_model() && self.model_path.is_none() {
            bail!(
                "backend {} requires model_path (set it in the config or pass --model)",
                self.backend.label()
            );
        }
        Ok(())
    }
}
