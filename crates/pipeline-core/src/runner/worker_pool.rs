//! Fixed-size worker pool draining a shared queue of frame indices.

use std::{num::NonZeroUsize, thread};

use crossbeam_channel::Receiver;
use tracing::{debug, warn};

use super::{BatchTags, run_batch_indexed, run_indexed};
use crate::{defect::DefectResult, frame::Frame, pipeline::Pipeline};

/// Resolve a requested worker count; `0` means the host's available
/// parallelism, never less than one.
pub fn effective_workers(requested: usize) -> usize {
    if requested > 0 {
        return requested;
    }
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Run `frames` on up to `workers` threads (`0` = host parallelism).
///
/// The worker count is capped at the number of frames; when it resolves to
/// one the call behaves exactly like [`run_batch`]. Otherwise `sink` is
/// invoked from worker threads in no particular order and must tolerate
/// concurrent calls. Returns once every frame has been processed and every
/// worker has been joined.
///
/// [`run_batch`]: super::run_batch
pub fn run_batch_parallel<F>(
    pipeline: &Pipeline,
    frames: &[Frame],
    sink: F,
    workers: usize,
    tags: BatchTags<'_>,
) where
    F: Fn(DefectResult) + Sync,
{
    run_batch_parallel_indexed(pipeline, frames, |_, result| sink(result), workers, tags);
}

/// Same as [`run_batch_parallel`], but `sink` also receives the index of the
/// frame each result was produced from.
pub fn run_batch_parallel_indexed<F>(
    pipeline: &Pipeline,
    frames: &[Frame],
    sink: F,
    workers: usize,
    tags: BatchTags<'_>,
) where
    F: Fn(usize, DefectResult) + Sync,
{
    if frames.is_empty() {
        return;
    }

    let workers = effective_workers(workers).min(frames.len());
    if workers <= 1 {
        run_batch_indexed(pipeline, frames, &sink, tags);
        return;
    }

    let _span =
        tracing::info_span!("batch.worker_pool", frames = frames.len(), workers).entered();

    let (index_tx, index_rx) = crossbeam_channel::unbounded::<usize>();
    for index in 0..frames.len() {
        if index_tx.send(index).is_err() {
            break;
        }
    }
    // Closing the queue before any worker starts lets each worker exit as soon
    // as it observes an empty queue.
    drop(index_tx);

    let sink = &sink;
    thread::scope(|scope| {
        let mut spawned = 0usize;
        for worker_index in 0..workers {
            let worker_rx = index_rx.clone();
            let dispatch = tracing::dispatcher::get_default(|current| current.clone());
            let spawn = thread::Builder::new()
                .name(format!("pipeline-worker-{worker_index}"))
                .spawn_scoped(scope, move || {
                    tracing::dispatcher::with_default(&dispatch, || {
                        drain_queue(pipeline, frames, &worker_rx, sink, tags, worker_index)
                    })
                });
            match spawn {
                Ok(_) => spawned += 1,
                Err(err) => warn!("Failed to spawn pipeline worker #{worker_index}: {err}"),
            }
        }

        if spawned == 0 {
            warn!("No pipeline workers could be spawned; draining batch on the calling thread");
            drain_queue(pipeline, frames, &index_rx, sink, tags, 0);
        }
    });
}

fn drain_queue<F>(
    pipeline: &Pipeline,
    frames: &[Frame],
    queue: &Receiver<usize>,
    sink: &F,
    tags: BatchTags<'_>,
    worker_index: usize,
) where
    F: Fn(usize, DefectResult) + Sync,
{
    let mut processed = 0usize;
    for index in queue.iter() {
        processed += 1;
        if let Some(result) = run_indexed(pipeline, frames, index, tags, "worker_pool") {
            sink(index, result);
        }
    }
    debug!(worker = worker_index, processed, "pipeline worker finished");
}
