use crate::{DeviceResult, XrTime};
use std::fmt;

/// Why a submission did not present its frame.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub enum FailureReason {
    SessionNotVisible,
    FrameDiscarded,
    Rejected(String),
    SessionLoss,
    InstanceLoss,
    Runtime(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            FailureReason::SessionNotVisible => f.write_str("session not visible"),
            FailureReason::FrameDiscarded => f.write_str("frame discarded by compositor"),
            FailureReason::Rejected(ref msg) => write!(f, "frame rejected: {}", msg),
            FailureReason::SessionLoss => f.write_str("session lost"),
            FailureReason::InstanceLoss => f.write_str("instance lost"),
            FailureReason::Runtime(ref msg) => write!(f, "runtime error: {}", msg),
        }
    }
}

/// Outcome of a frame submission that reached the device.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub enum SubmissionResult {
    Success,

    // The frame was not shown, but the session is intact and the pipeline
    // carries on with the next tick.
    TransientFailure(FailureReason),

    // The session or instance is gone. The host has to recreate it.
    FatalFailure(FailureReason),
}

impl SubmissionResult {
    pub fn is_fatal(&self) -> bool {
        match *self {
            SubmissionResult::FatalFailure(_) => true,
            _ => false,
        }
    }
}

impl From<DeviceResult> for SubmissionResult {
    fn from(result: DeviceResult) -> SubmissionResult {
        match result {
            DeviceResult::Ok => SubmissionResult::Success,
            DeviceResult::SessionNotVisible => {
                SubmissionResult::TransientFailure(FailureReason::SessionNotVisible)
            }
            DeviceResult::FrameDiscarded => SubmissionResult::TransientFailure(FailureReason::FrameDiscarded),
            DeviceResult::FrameRejected(msg) => SubmissionResult::TransientFailure(FailureReason::Rejected(msg)),
            DeviceResult::SessionLoss => SubmissionResult::FatalFailure(FailureReason::SessionLoss),
            DeviceResult::InstanceLoss => SubmissionResult::FatalFailure(FailureReason::InstanceLoss),
            // Unknown runtime errors leave the session in an undefined state.
            DeviceResult::RuntimeFailure(msg) => SubmissionResult::FatalFailure(FailureReason::Runtime(msg)),
        }
    }
}

/// A frame rejected before reaching the device.
///
/// These indicate a bug upstream of the end-frame stage and are never retried.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("session {session_id} has no frame in progress")]
    NoActiveFrame { session_id: u32 },

    #[error("predicted display time {got} is not after the previous frame's {previous}")]
    NonMonotonicDisplayTime { previous: XrTime, got: XrTime },

    #[error("frame index {got} is not after the previous frame's {previous}")]
    FrameIndexRegressed { previous: u64, got: u64 },

    #[error("{count} layers exceed the limit of {max}")]
    TooManyLayers { count: usize, max: usize },

    #[error("layer {index} is invalid: {reason}")]
    InvalidLayer { index: usize, reason: &'static str },

    #[error("session {session_id} was lost; frames cannot be submitted until it is recreated")]
    SessionLost { session_id: u32 },
}
