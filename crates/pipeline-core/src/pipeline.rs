//! Ordered chain of stages driven one frame at a time.
//!
//! A run walks the stages in append order. Each stage either hands a new
//! frame to the next one or finishes the run with a [`DefectResult`]; the
//! first error aborts the run and is returned untouched.

use std::{fmt, time::Instant};

use tracing::debug;

use crate::{
    defect::DefectResult,
    error::PipelineError,
    frame::Frame,
    stage::{Stage, StageOutput},
};

/// Per-stage timing sink: `(stage_index, elapsed_ms)`.
pub type StageTimingSink<'a> = &'a mut dyn FnMut(usize, f64);

/// Append-only list of stages.
///
/// `run` takes `&self` and keeps no per-call state, so one pipeline can be
/// shared across threads once it has been built.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage at the end of the chain.
    pub fn add_stage<S: Stage + 'static>(&mut self, stage: S) {
        self.stages.push(Box::new(stage));
    }

    /// Builder-style variant of [`Pipeline::add_stage`].
    pub fn with_stage<S: Stage + 'static>(mut self, stage: S) -> Self {
        self.add_stage(stage);
        self
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stage_names(&self) -> impl Iterator<Item = &str> {
        self.stages.iter().map(|stage| stage.name())
    }

    /// Drive `input` through the stages until one of them returns
    /// [`StageOutput::Done`].
    ///
    /// When `timing` is supplied it receives one call per executed stage,
    /// including a stage that fails. Running out of stages without a result
    /// yields [`PipelineError::IncompletePipeline`].
    pub fn run(
        &self,
        input: &Frame,
        mut timing: Option<StageTimingSink<'_>>,
    ) -> Result<DefectResult, PipelineError> {
        let mut current: Option<Frame> = None;

        for (index, stage) in self.stages.iter().enumerate() {
            let frame = current.as_ref().unwrap_or(input);

            let started = Instant::now();
            let outcome = stage.process(frame);
            let elapsed = started.elapsed();

            let elapsed_ms = elapsed.as_secs_f64() * 1_000.0;
            if let Some(sink) = timing.as_deref_mut() {
                sink(index, elapsed_ms);
            }
            metrics::histogram!(
                "pipeline_stage_latency_seconds",
                "stage" => stage.name().to_owned()
            )
            .record(elapsed.as_secs_f64());
            debug!(
                stage = index,
                name = stage.name(),
                elapsed_ms,
                ok = outcome.is_ok(),
                "stage finished"
            );

            match outcome? {
                StageOutput::Continue(next) => current = Some(next),
                StageOutput::Done(result) => return Ok(result),
            }
        }

        Err(PipelineError::IncompletePipeline)
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names().collect::<Vec<_>>())
            .finish()
    }
}
