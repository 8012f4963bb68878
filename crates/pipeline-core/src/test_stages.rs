//! Small stages shared by the unit tests of this crate.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
    thread::{self, ThreadId},
};

use crate::{DefectResult, Frame, PipelineError, PixelFormat, Stage, StageOutput};

/// One 1x1 grayscale frame per index, carrying the index as its pixel value.
pub(crate) fn gray_frames(count: usize) -> Vec<Frame> {
    (0..count)
        .map(|i| Frame::new(1, 1, PixelFormat::Grayscale8, vec![i as u8]).unwrap())
        .collect()
}

fn pixel(frame: &Frame) -> u8 {
    frame.data().first().copied().unwrap_or_default()
}

/// Finishes with the frame's pixel value as the frame id.
pub(crate) struct StampPixel;

impl Stage for StampPixel {
    fn process(&self, input: &Frame) -> Result<StageOutput, PipelineError> {
        Ok(StageOutput::Done(DefectResult::new(
            u64::from(pixel(input)),
            Vec::new(),
        )))
    }
}

/// Fails frames whose pixel value is a multiple of the divisor.
pub(crate) struct FailOnMultipleOf(pub u8);

impl Stage for FailOnMultipleOf {
    fn process(&self, input: &Frame) -> Result<StageOutput, PipelineError> {
        if pixel(input) % self.0 == 0 {
            return Err(PipelineError::InvalidFrame("rejected by test stage".into()));
        }
        Ok(StageOutput::Continue(input.clone()))
    }
}

/// Records which thread ran it.
pub(crate) struct RecordThread(pub Arc<Mutex<HashSet<ThreadId>>>);

impl Stage for RecordThread {
    fn process(&self, input: &Frame) -> Result<StageOutput, PipelineError> {
        self.0.lock().unwrap().insert(thread::current().id());
        Ok(StageOutput::Continue(input.clone()))
    }
}

/// Finishes with a fixed metadata label.
pub(crate) struct TagMetadata(pub String);

impl Stage for TagMetadata {
    fn process(&self, _input: &Frame) -> Result<StageOutput, PipelineError> {
        Ok(StageOutput::Done(DefectResult {
            metadata: self.0.clone(),
            ..DefectResult::default()
        }))
    }
}
