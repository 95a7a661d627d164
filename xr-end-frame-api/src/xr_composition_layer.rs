use crate::{XrBlendMode, XrFieldOfView, XrLayer, XrLayerFlags, XrLayerKind, XrPose, XrSwapchainImage, XrTime};

/// A layer in the form handed to a session's end-frame call.
///
/// One `CompositionLayer` is produced for every `XrLayer` of a frame, in the
/// same order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub struct CompositionLayer {
    pub kind: XrLayerKind,
    pub flags: XrLayerFlags,
    pub view_index: u32,
    pub pose: XrPose,
    pub fov: XrFieldOfView,
    pub sub_image: XrSwapchainImage,
    pub depth_sub_image: Option<XrSwapchainImage>,
}

impl<'a> From<&'a XrLayer> for CompositionLayer {
    fn from(layer: &'a XrLayer) -> CompositionLayer {
        CompositionLayer {
            kind: layer.kind,
            flags: layer.flags,
            view_index: layer.view_index,
            pose: layer.pose,
            fov: layer.fov,
            sub_image: layer.color,
            depth_sub_image: layer.depth,
        }
    }
}

/// Everything a session needs to close the current frame.
#[derive(Debug, Clone, PartialEq)]
pub struct XrFrameEndInfo {
    pub display_time: XrTime,
    pub blend_mode: XrBlendMode,
    /// Back-to-front; may be empty for a skipped frame.
    pub layers: Vec<CompositionLayer>,
}

impl XrFrameEndInfo {
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}
