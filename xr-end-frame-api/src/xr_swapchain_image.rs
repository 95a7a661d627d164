/// Reference to an image of a runtime swapchain that holds rendered content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub struct XrSwapchainImage {
    /// Identifier of the swapchain, as registered with the session
    pub swapchain_id: u32,

    /// Array layer of the swapchain image to sample from
    pub image_array_index: u32,

    /// The 2D rectangle of the image that holds the content of this view.
    /// Measured in image pixels.
    pub image_rect: XrRect,
}

impl XrSwapchainImage {
    pub fn new(swapchain_id: u32, image_rect: XrRect) -> Self {
        Self {
            swapchain_id: swapchain_id,
            image_array_index: 0,
            image_rect: image_rect,
        }
    }

    pub fn with_array_index(mut self, image_array_index: u32) -> Self {
        self.image_array_index = image_array_index;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
pub struct XrRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl XrRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x: x,
            y: y,
            width: width,
            height: height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rect() {
        assert!(XrRect::new(0, 0, 0, 1680).is_empty());
        assert!(XrRect::new(0, 0, 756, -1).is_empty());
        assert!(!XrRect::new(756, 0, 756, 1680).is_empty());
    }
}
