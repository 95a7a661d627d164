/// Outcome of a session's end-frame call, as reported by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub enum DeviceResult {
    Ok,

    // The session is running but not visible or focused; the frame was
    // accepted and not shown.
    SessionNotVisible,

    // The compositor dropped this single frame.
    FrameDiscarded,

    // The runtime refused this frame's layers or timing; the session is
    // intact and the next frame may succeed.
    FrameRejected(String),

    // The session was lost and must be recreated.
    SessionLoss,

    // The runtime instance was lost and must be recreated.
    InstanceLoss,

    // Any other error code returned by the runtime.
    RuntimeFailure(String),
}

