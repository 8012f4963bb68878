use crate::{defect::DefectResult, error::PipelineError, frame::Frame};

/// Hand-off value produced by a stage.
#[derive(Clone, Debug, PartialEq)]
pub enum StageOutput {
    /// Feed this frame into the next stage.
    Continue(Frame),
    /// The run is finished; remaining stages are skipped.
    Done(DefectResult),
}

/// One unit of work in a [`Pipeline`](crate::Pipeline).
///
/// `process` must not depend on state left behind by earlier calls: a single
/// stage instance may be driven from several worker threads at once, so any
/// internal mutable state needs its own synchronization.
pub trait Stage: Send + Sync {
    /// Consume a frame and either continue with a newly built frame or finish
    /// with a result.
    fn process(&self, input: &Frame) -> Result<StageOutput, PipelineError>;

    /// Short label used in logs and metrics.
    ///
    /// Defaults to the type's name without its module path or generic
    /// arguments.
    fn name(&self) -> &str {
        let full = std::any::type_name::<Self>();
        let base = full.split('<').next().unwrap_or(full);
        base.rsplit("::").next().unwrap_or("stage")
    }
}

impl<S: Stage + ?Sized> Stage for Box<S> {
    fn process(&self, input: &Frame) -> Result<StageOutput, PipelineError> {
        (**self).process(input)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
