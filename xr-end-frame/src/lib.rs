#[macro_use]
extern crate log;
extern crate xr_end_frame_api;

pub mod api;
mod xr_end_frame_stage;
mod xr_frame_submitter;
mod xr_pipeline_stage;

pub use xr_end_frame_api::*;
pub use xr_end_frame_stage::XrEndFrameStage;
pub use xr_frame_submitter::{FrameSubmitter, SubmitterState, SubmitterStats};
pub use xr_pipeline_stage::{PipelineStage, StageControl};
