use {
    crate::PoseError,
    base::Vec2,
    serde::{Deserialize, Deserializer, Serialize},
    std::path::Path,
};

/// How an image whose aspect ratio differs from the model input is fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectMode {
    /// Resize each axis independently.
    Stretch,
    /// Letterbox: scale to fit inside, pad the rest with black.
    ScaleToFit,
    /// Scale to cover, crop the overflow around the center.
    AspectFill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TensorLayout {
    Nchw,
    Nhwc,
}

/// Per-channel normalization applied after scaling pixel values to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Normalization {
    pub mean: [f32; 3],
    pub std: [f32; 3],
}

impl Default for Normalization {
    /// Maps [0, 1] to [-1, 1].
    fn default() -> Self {
        Self {
            mean: [0.5; 3],
            std: [0.5; 3],
        }
    }
}

/// Input contract of one model.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    pub input_width: usize,
    pub input_height: usize,
    pub normalization: Normalization,
    pub aspect_mode: AspectMode,
    pub layout: TensorLayout,
}

impl ModelConfig {
    /// BlazePose person detector: 224x224, letterboxed.
    pub fn detector() -> Self {
        Self {
            input_width: 224,
            input_height: 224,
            normalization: Normalization::default(),
            aspect_mode: AspectMode::ScaleToFit,
            layout: TensorLayout::Nhwc,
        }
    }

    /// BlazePose landmark model: 256x256, stretched.
    pub fn landmarks() -> Self {
        Self {
            input_width: 256,
            input_height: 256,
            normalization: Normalization::default(),
            aspect_mode: AspectMode::Stretch,
            layout: TensorLayout::Nhwc,
        }
    }

    pub fn input_size(&self) -> Vec2<usize> {
        Vec2::new(self.input_width, self.input_height)
    }

    pub fn validate(&self) -> Result<(), PoseError> {
        if self.input_width == 0 || self.input_height == 0 {
            return Err(PoseError::Config(format!(
                "model input size must be non-zero, got {}x{}",
                self.input_width, self.input_height
            )));
        }
        if self.normalization.std.iter().any(|s| *s == 0.0 || !s.is_finite()) {
            return Err(PoseError::Config(format!(
                "normalization std must be finite and non-zero, got {:?}",
                self.normalization.std
            )));
        }
        Ok(())
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::landmarks()
    }
}

/// `ModelConfig` as written in JSON, every field optional.
#[derive(Debug, Default, Deserialize)]
struct ModelConfigOverrides {
    input_width: Option<usize>,
    input_height: Option<usize>,
    normalization: Option<Normalization>,
    aspect_mode: Option<AspectMode>,
    layout: Option<TensorLayout>,
}

impl ModelConfigOverrides {
    fn over(self, base: ModelConfig) -> ModelConfig {
        ModelConfig {
            input_width: self.input_width.unwrap_or(base.input_width),
            input_height: self.input_height.unwrap_or(base.input_height),
            normalization: self.normalization.unwrap_or(base.normalization),
            aspect_mode: self.aspect_mode.unwrap_or(base.aspect_mode),
            layout: self.layout.unwrap_or(base.layout),
        }
    }
}

/// Detector model block with the missing fields taken from `ModelConfig::detector`.
fn detector_model<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ModelConfig, D::Error> {
    Ok(ModelConfigOverrides::deserialize(deserializer)?.over(ModelConfig::detector()))
}

/// SSD anchor layout of the detector.
///
/// Consecutive layers with equal strides share one feature map, so the
/// default `[8, 16, 32, 32, 32]` with two anchors per layer yields grids of
/// 28x28x2, 14x14x2 and 7x7x6 for a 224 input: 2254 anchors.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnchorOptions {
    pub strides: Vec<usize>,
    pub anchors_per_layer: usize,
    pub offset: f32,
}

impl Default for AnchorOptions {
    fn default() -> Self {
        Self {
            strides: vec![8, 16, 32, 32, 32],
            anchors_per_layer: 2,
            offset: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DetectorConfig {
    #[serde(deserialize_with = "detector_model")]
    pub model: ModelConfig,
    pub score_threshold: f32,
    pub nms_threshold: f32,
    /// Enlargement of the hip to scale-point circle when forming the ROI.
    pub roi_scale: f32,
    pub anchors: AnchorOptions,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::detector(),
            score_threshold: 0.5,
            nms_threshold: 0.3,
            roi_scale: 1.25,
            anchors: AnchorOptions::default(),
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<(), PoseError> {
        self.model.validate()?;
        if !(self.roi_scale.is_finite() && self.roi_scale > 0.0) {
            return Err(PoseError::Config(format!("roi_scale must be positive, got {}", self.roi_scale)));
        }
        if self.anchors.strides.is_empty() || self.anchors.strides.contains(&0) {
            return Err(PoseError::Config(format!(
                "anchor strides must be non-empty and non-zero, got {:?}",
                self.anchors.strides
            )));
        }
        Ok(())
    }
}

/// Everything needed to assemble a `PosePipeline` apart from the model weights.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub detector: DetectorConfig,
    pub predictor: ModelConfig,
    /// `None` keeps every detection.
    pub max_detections: Option<usize>,
    pub fill_color: [u8; 3],
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            detector: DetectorConfig::default(),
            predictor: ModelConfig::landmarks(),
            max_detections: None,
            fill_color: [0, 0, 0],
        }
    }
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, PoseError> {
        let config: PipelineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PoseError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| PoseError::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), PoseError> {
        self.detector.validate()?;
        self.predictor.validate()
    }
}
