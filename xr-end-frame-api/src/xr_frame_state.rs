use crate::{XrLayer, XrTime};

// Represents the renderable result of a single pipeline tick.
// Created upstream once per tick and consumed by the end-frame stage.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub struct XrFrameState {
    // Monotonically increasing counter, unique per frame.
    pub frame_index: u64,

    // Time at which the runtime expects this frame to be shown.
    pub predicted_display_time: XrTime,

    // Layers in back-to-front compositing order.
    // Empty when the frame is skipped.
    pub layers: Vec<XrLayer>,
}

impl XrFrameState {
    pub fn new(frame_index: u64, predicted_display_time: XrTime, layers: Vec<XrLayer>) -> XrFrameState {
        XrFrameState {
            frame_index: frame_index,
            predicted_display_time: predicted_display_time,
            layers: layers,
        }
    }

    /// A frame with no layers still closes the begin/end bracket with the
    /// session, but presents nothing.
    pub fn skipped(frame_index: u64, predicted_display_time: XrTime) -> XrFrameState {
        XrFrameState::new(frame_index, predicted_display_time, Vec::new())
    }

    pub fn is_skip_frame(&self) -> bool {
        self.layers.is_empty()
    }
}
