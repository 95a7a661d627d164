use crate::{DeviceResult, XrFrameEndInfo};

/// The XrSession trait is the frame-submission side of a running XR session.
///
/// Sessions are created, begun and torn down by their owner; the end-frame
/// stage only borrows one. Implementations serialize access to the runtime
/// handle internally.
pub trait XrSession: Send + Sync {
    /// Returns unique session identifier
    fn id(&self) -> u32;

    /// Whether a frame has been begun and not yet ended.
    fn is_frame_active(&self) -> bool;

    /// Ends the current frame, handing `info.layers` to the compositor in
    /// order. May block on compositor synchronization and cannot be
    /// interrupted.
    fn end_frame(&self, info: &XrFrameEndInfo) -> DeviceResult;
}

