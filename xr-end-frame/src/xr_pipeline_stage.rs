/// What the host scheduler should do after a stage's tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageControl {
    Continue,
    // The stage cannot make progress until the host has recreated the
    // resources it depends on.
    Halt,
}

/// A node of the host's data-flow pipeline.
///
/// The host calls `compute` exactly once per scheduling tick with the value
/// produced upstream for that tick, and never concurrently for one stage.
pub trait PipelineStage {
    type Input;

    fn compute(&mut self, input: Self::Input) -> StageControl;
}
