//! Multi-unit fan-out: each work item runs on the pipeline owned by its unit
//! (camera, checkout lane, customer).
//!
//! Work items are split into index ranges and processed on the rayon pool.
//! There is no per-unit serialization: if a unit id appears in several work
//! items its pipeline may be driven from several threads at once, which is
//! only sound when every stage of that pipeline (the inference backend in
//! particular) tolerates concurrent calls. With a backend that does not,
//! submit at most one work item per unit per call.

use std::{borrow::Borrow, collections::HashMap};

use rayon::prelude::*;
use tracing::debug;

use super::record_failure;
use crate::{defect::DefectResult, frame::Frame, pipeline::Pipeline};

/// Run every `(unit_id, frame)` item on the pipeline registered for its unit.
///
/// Items whose unit has no pipeline are skipped. On success the result's
/// `camera_id` is set to the unit id before `sink(result, unit_id)` is called.
/// `sink` is invoked concurrently and in no particular order.
pub fn run_multi_unit<P, F>(
    pipelines: &HashMap<String, P>,
    work_items: &[(String, Frame)],
    sink: F,
) where
    P: Borrow<Pipeline> + Sync,
    F: Fn(DefectResult, &str) + Sync,
{
    if work_items.is_empty() {
        return;
    }

    let _span = tracing::info_span!(
        "batch.fan_out",
        items = work_items.len(),
        units = pipelines.len()
    )
    .entered();

    work_items
        .par_iter()
        .enumerate()
        .for_each(|(index, (unit_id, frame))| {
            let Some(pipeline) = pipelines.get(unit_id.as_str()) else {
                debug!(item = index, unit = %unit_id, "no pipeline registered for unit; skipping");
                return;
            };
            let pipeline: &Pipeline = pipeline.borrow();
            match pipeline.run(frame, None) {
                Ok(mut result) => {
                    result.camera_id = Some(unit_id.clone());
                    sink(result, unit_id.as_str());
                }
                Err(err) => record_failure("fan_out", index, &err),
            }
        });
}
