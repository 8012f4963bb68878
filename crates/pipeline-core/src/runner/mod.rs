//! Batch execution strategies over a built [`Pipeline`].
//!
//! - [`run_batch`]: frames in submission order on the calling thread.
//! - [`run_batch_parallel`]: bounded worker pool pulling frame indices from a
//!   shared queue; sink calls arrive in any order from worker threads.
//!   [`run_batch_parallel_indexed`] also hands the sink each frame's index.
//! - [`run_multi_unit`]: data-parallel fan-out where every work item is routed
//!   to the pipeline registered for its unit.
//!
//! The batch helpers only report successes. A frame whose run fails is logged
//! at debug level, counted in `pipeline_batch_frames_failed_total`, and
//! otherwise dropped; callers needing the error call [`run_single`] per frame.

mod fan_out;
mod worker_pool;

pub use fan_out::run_multi_unit;
pub use worker_pool::{effective_workers, run_batch_parallel, run_batch_parallel_indexed};

use tracing::debug;

use crate::{
    defect::DefectResult,
    error::PipelineError,
    frame::Frame,
    pipeline::{Pipeline, StageTimingSink},
};

/// Optional per-frame unit tags, parallel to the frame slice of a batch call.
///
/// A tag list only takes effect when its length equals the number of frames.
/// An empty string in a slot leaves that tag unset for the frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct BatchTags<'a> {
    pub camera_ids: Option<&'a [String]>,
    pub customer_ids: Option<&'a [String]>,
}

impl<'a> BatchTags<'a> {
    pub fn new(camera_ids: Option<&'a [String]>, customer_ids: Option<&'a [String]>) -> Self {
        Self {
            camera_ids,
            customer_ids,
        }
    }

    pub fn cameras(camera_ids: &'a [String]) -> Self {
        Self {
            camera_ids: Some(camera_ids),
            customer_ids: None,
        }
    }

    /// Stamp the tags for frame `index` of a batch of `frame_count` frames.
    pub(crate) fn apply(&self, index: usize, frame_count: usize, result: &mut DefectResult) {
        if let Some(tag) = slot(self.camera_ids, index, frame_count) {
            result.camera_id = Some(tag.to_owned());
        }
        if let Some(tag) = slot(self.customer_ids, index, frame_count) {
            result.customer_id = Some(tag.to_owned());
        }
    }
}

fn slot(tags: Option<&[String]>, index: usize, frame_count: usize) -> Option<&str> {
    let tags = tags.filter(|tags| tags.len() == frame_count)?;
    tags.get(index)
        .map(String::as_str)
        .filter(|tag| !tag.is_empty())
}

/// Run one frame and attach the given tags to the result.
pub fn run_single(
    pipeline: &Pipeline,
    frame: &Frame,
    timing: Option<StageTimingSink<'_>>,
    camera_id: Option<&str>,
    customer_id: Option<&str>,
) -> Result<DefectResult, PipelineError> {
    let mut result = pipeline.run(frame, timing)?;
    if let Some(camera_id) = camera_id {
        result.camera_id = Some(camera_id.to_owned());
    }
    if let Some(customer_id) = customer_id {
        result.customer_id = Some(customer_id.to_owned());
    }
    Ok(result)
}

/// Run every frame in order on the calling thread.
///
/// `sink` sees successful results in submission order.
pub fn run_batch<F>(pipeline: &Pipeline, frames: &[Frame], mut sink: F, tags: BatchTags<'_>)
where
    F: FnMut(DefectResult),
{
    run_batch_indexed(pipeline, frames, |_, result| sink(result), tags);
}

pub(crate) fn run_batch_indexed<F>(
    pipeline: &Pipeline,
    frames: &[Frame],
    mut sink: F,
    tags: BatchTags<'_>,
) where
    F: FnMut(usize, DefectResult),
{
    let _span = tracing::info_span!("batch.sequential", frames = frames.len()).entered();
    for index in 0..frames.len() {
        if let Some(result) = run_indexed(pipeline, frames, index, tags, "sequential") {
            sink(index, result);
        }
    }
}

/// Run frame `index` and tag the result, swallowing failures.
pub(crate) fn run_indexed(
    pipeline: &Pipeline,
    frames: &[Frame],
    index: usize,
    tags: BatchTags<'_>,
    runner: &'static str,
) -> Option<DefectResult> {
    match pipeline.run(&frames[index], None) {
        Ok(mut result) => {
            tags.apply(index, frames.len(), &mut result);
            Some(result)
        }
        Err(err) => {
            record_failure(runner, index, &err);
            None
        }
    }
}

pub(crate) fn record_failure(runner: &'static str, index: usize, err: &PipelineError) {
    metrics::counter!("pipeline_batch_frames_failed_total", "runner" => runner).increment(1);
    debug!(runner, frame = index, kind = err.kind().label(), "dropping failed frame: {err}");
}
