// The XrFieldOfView struct represents a field of view,
// as given by 4 angles describing the view from a center point.
// Angles are in radians; left and down are usually negative.

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub struct XrFieldOfView {
    pub angle_left: f32,
    pub angle_right: f32,
    pub angle_up: f32,
    pub angle_down: f32,
}

impl Default for XrFieldOfView {
    fn default() -> XrFieldOfView {
        XrFieldOfView {
            angle_left: 0.0,
            angle_right: 0.0,
            angle_up: 0.0,
            angle_down: 0.0,
        }
    }
}

impl XrFieldOfView {
    /// Builds a field of view from the unsigned half-angles in degrees used by
    /// WebVR style eye parameters.
    pub fn from_degrees(up: f64, right: f64, down: f64, left: f64) -> XrFieldOfView {
        XrFieldOfView {
            angle_left: -(left.to_radians() as f32),
            angle_right: right.to_radians() as f32,
            angle_up: up.to_radians() as f32,
            angle_down: -(down.to_radians() as f32),
        }
    }

    pub fn is_finite(&self) -> bool {
        [self.angle_left, self.angle_right, self.angle_up, self.angle_down]
            .iter()
            .all(|a| a.is_finite())
    }
}
