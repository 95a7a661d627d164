use crate::DeviceResult;

/// Messages that drive a mock session from another thread.
#[derive(Debug, Clone)]
pub enum MockXrControlMsg {
    BeginFrame,
    // Result reported by the next end-frame call.
    QueueResult(DeviceResult),
    SetVisible(bool),
    LoseSession,
    LoseInstance,
}
