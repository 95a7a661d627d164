/// How the compositor blends submitted layers with the real world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde-serialization", serde(rename_all = "snake_case"))]
pub enum XrBlendMode {
    Opaque,
    Additive,
    AlphaBlend,
}

impl Default for XrBlendMode {
    fn default() -> XrBlendMode {
        XrBlendMode::Opaque
    }
}

// Every conformant runtime supports at least this many layers per frame.
pub const MIN_RUNTIME_MAX_LAYERS: usize = 16;

/// Settings of the end-frame stage, fixed at pipeline construction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-serialization", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde-serialization", serde(default))]
pub struct EndFrameConfig {
    /// Environment blend mode passed with every submitted frame.
    pub blend_mode: XrBlendMode,

    /// Largest number of layers accepted in a single frame.
    pub max_layers: usize,
}

impl Default for EndFrameConfig {
    fn default() -> EndFrameConfig {
        EndFrameConfig {
            blend_mode: XrBlendMode::default(),
            max_layers: MIN_RUNTIME_MAX_LAYERS,
        }
    }
}

impl EndFrameConfig {
    pub fn with_blend_mode(mut self, blend_mode: XrBlendMode) -> Self {
        self.blend_mode = blend_mode;
        self
    }

    pub fn with_max_layers(mut self, max_layers: usize) -> Self {
        self.max_layers = max_layers;
        self
    }
}
