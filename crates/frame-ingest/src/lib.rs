//! Frame sources feeding the pipeline.
//!
//! - `file`: decode still images from disk into [`pipeline_core::Frame`]s.
//! - `synthetic`: generated frames for smoke runs and tests.

pub mod file;
pub mod synthetic;

pub use file::load_frame;
pub use synthetic::{gradient_frame, synthetic_frame};
