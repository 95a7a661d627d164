// The XrPose struct places a layer in the compositor's reference space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub struct XrPose {
    // Position of the layer origin as a 3D vector, in meters.
    pub position: [f32; 3],

    // Orientation of the layer as a quaternion: [x, y, z, w].
    // Runtimes reject orientations that are not unit length.
    pub orientation: [f32; 4],
}

// Runtimes accept quaternions whose norm is within this distance of 1.
const UNIT_QUATERNION_TOLERANCE: f32 = 1e-3;

impl Default for XrPose {
    fn default() -> XrPose {
        XrPose {
            position: [0.0, 0.0, 0.0],
            orientation: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl XrPose {
    pub fn new(position: [f32; 3], orientation: [f32; 4]) -> XrPose {
        XrPose {
            position: position,
            orientation: orientation,
        }
    }

    pub fn has_unit_orientation(&self) -> bool {
        let [x, y, z, w] = self.orientation;
        let norm = (x * x + y * y + z * z + w * w).sqrt();
        norm.is_finite() && (norm - 1.0).abs() <= UNIT_QUATERNION_TOLERANCE
    }

    pub fn is_finite(&self) -> bool {
        self.position.iter().chain(self.orientation.iter()).all(|v| v.is_finite())
    }
}
