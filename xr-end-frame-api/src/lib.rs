#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate log;
#[cfg(feature = "serde-serialization")]
#[macro_use]
extern crate serde_derive;

#[cfg(feature = "utils")]
pub mod utils;

pub mod mock;
pub mod xr_composition_layer;
pub mod xr_config;
pub mod xr_device_result;
pub mod xr_event;
pub mod xr_field_view;
pub mod xr_frame_state;
pub mod xr_layer;
pub mod xr_pose;
pub mod xr_session;
pub mod xr_submission;
pub mod xr_swapchain_image;
pub mod xr_time;

pub use mock::MockXrControlMsg;
pub use xr_composition_layer::{CompositionLayer, XrFrameEndInfo};
pub use xr_config::{EndFrameConfig, XrBlendMode};
pub use xr_device_result::DeviceResult;
pub use xr_event::XrSessionEvent;
pub use xr_field_view::XrFieldOfView;
pub use xr_frame_state::XrFrameState;
pub use xr_layer::{XrLayer, XrLayerFlags, XrLayerKind};
pub use xr_pose::XrPose;
pub use xr_session::XrSession;
pub use xr_submission::{FailureReason, SubmissionResult, ValidationError};
pub use xr_swapchain_image::{XrRect, XrSwapchainImage};
pub use xr_time::XrTime;
