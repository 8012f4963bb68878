//! Core data model and execution engine for frame-to-defect pipelines.
//!
//! - `frame`: owned image buffers and pixel formats.
//! - `defect`: defect records and the per-run `DefectResult`.
//! - `stage`: the `Stage` trait and the `StageOutput` hand-off value.
//! - `pipeline`: ordered stage chains and the single-frame run loop.
//! - `runner`: sequential, worker-pool, and multi-unit batch execution.

pub mod defect;
pub mod error;
pub mod frame;
pub mod pipeline;
pub mod runner;
pub mod stage;

#[cfg(test)]
pub(crate) mod test_stages;

pub use defect::{BBox, Defect, DefectKind, DefectResult};
pub use error::{ErrorKind, PipelineError};
pub use frame::{Frame, PixelFormat};
pub use pipeline::{Pipeline, StageTimingSink};
pub use runner::{
    BatchTags, effective_workers, run_batch, run_batch_parallel, run_batch_parallel_indexed,
    run_multi_unit, run_single,
};
pub use stage::{Stage, StageOutput};
