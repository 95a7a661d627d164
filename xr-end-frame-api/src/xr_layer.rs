use crate::{XrFieldOfView, XrPose, XrSwapchainImage};

bitflags! {
    /// Per-layer compositing flags, mirroring `XrCompositionLayerFlags`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
    pub struct XrLayerFlags: u64 {
        const CORRECT_CHROMATIC_ABERRATION = 0x0000_0001;
        const BLEND_TEXTURE_SOURCE_ALPHA = 0x0000_0002;
        const UNPREMULTIPLIED_ALPHA = 0x0000_0004;
    }
}

/// How the compositor should place a layer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub enum XrLayerKind {
    // One view of a projection layer. Consecutive projection views form a
    // single projection, starting again at view index 0.
    Projection,

    // A quad placed in the reference space, with its size in meters.
    Quad { width: f32, height: f32 },
}

impl Default for XrLayerKind {
    fn default() -> XrLayerKind {
        XrLayerKind::Projection
    }
}

// One renderable surface produced upstream and presented by the compositor
// when the frame is submitted.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub struct XrLayer {
    // Index of the view (eye) this layer was rendered for.
    pub view_index: u32,

    pub kind: XrLayerKind,

    // Color buffer whose contents are presented for this view.
    pub color: XrSwapchainImage,

    // Depth buffer matching `color`, used by runtimes for reprojection.
    pub depth: Option<XrSwapchainImage>,

    // Pose the view was rendered from.
    pub pose: XrPose,

    // Field of view the view was rendered with.
    pub fov: XrFieldOfView,

    pub flags: XrLayerFlags,
}

impl XrLayer {
    pub fn projection(view_index: u32, color: XrSwapchainImage, pose: XrPose, fov: XrFieldOfView) -> XrLayer {
        XrLayer {
            view_index: view_index,
            kind: XrLayerKind::Projection,
            color: color,
            depth: None,
            pose: pose,
            fov: fov,
            flags: XrLayerFlags::empty(),
        }
    }

    pub fn quad(color: XrSwapchainImage, pose: XrPose, width: f32, height: f32) -> XrLayer {
        XrLayer {
            view_index: 0,
            kind: XrLayerKind::Quad { width: width, height: height },
            color: color,
            depth: None,
            pose: pose,
            fov: XrFieldOfView::default(),
            flags: XrLayerFlags::empty(),
        }
    }

    pub fn with_depth(mut self, depth: XrSwapchainImage) -> XrLayer {
        self.depth = Some(depth);
        self
    }

    pub fn with_flags(mut self, flags: XrLayerFlags) -> XrLayer {
        self.flags = flags;
        self
    }
}
