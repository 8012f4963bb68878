//! Image preprocessing stages that run ahead of inference.
//!
//! - `resize`: bilinear resampling to a fixed input size.
//! - `normalize`: 8-bit to `f32` conversion with mean/scale.
//! - `color`: channel reordering and gray conversion.
//!
//! All stages return [`pipeline_core::StageOutput::Continue`] and never finish
//! a run on their own.

mod convert;

pub mod color;
pub mod normalize;
pub mod resize;

pub use color::ColorConvertStage;
pub use normalize::NormalizeStage;
pub use resize::ResizeStage;
