use {
    crate::{Landmarks, ModelConfig, Pose, PoseError, Session, preprocess, session::image_input_name},
    base::{Mat3, Vec2},
    image::Image,
    std::fmt,
};

const KEYPOINTS_OUTPUT: usize = 0;
const SCORE_OUTPUT: usize = 2;
const KEYPOINTS_3D_OUTPUT: usize = 4;

/// BlazePose landmark model, run on one aligned ROI at a time.
pub struct LandmarkPredictor {
    session: Box<dyn Session>,
    config: ModelConfig,
}

impl fmt::Debug for LandmarkPredictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LandmarkPredictor")
            .field("config", &self.config)
            .finish()
    }
}

impl LandmarkPredictor {
    pub fn new(session: Box<dyn Session>, config: ModelConfig) -> Result<Self, PoseError> {
        config.validate()?;
        Ok(Self { session, config })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Model input size, which is also the size ROIs should be extracted at.
    pub fn input_size(&self) -> Vec2<usize> {
        self.config.input_size()
    }

    /// Run the landmark model on an RGB ROI and return its raw outputs.
    pub fn predict(&mut self, roi: &Image) -> Result<Landmarks, PoseError> {
        let (input, _) = preprocess(roi, &self.config)?;
        let input_name = image_input_name(self.session.as_ref())?;
        let mut outputs = self.session.run(&[(input_name.as_str(), input)])?;
        if outputs.len() <= KEYPOINTS_3D_OUTPUT {
            return Err(PoseError::CorruptModelOutput(format!(
                "landmark model produced {} outputs, expected at least {}",
                outputs.len(),
                KEYPOINTS_3D_OUTPUT + 1
            )));
        }
        let score = outputs[SCORE_OUTPUT]
            .data
            .first()
            .copied()
            .ok_or_else(|| PoseError::CorruptModelOutput("empty score output".to_string()))?;
        let keypoints_3d = std::mem::take(&mut outputs[KEYPOINTS_3D_OUTPUT].data);
        let keypoints = std::mem::take(&mut outputs[KEYPOINTS_OUTPUT].data);
        Landmarks::new(score, keypoints, keypoints_3d)
    }

    /// Predict on an ROI and keep the keypoints in ROI UV space.
    pub fn predict_pose(&mut self, roi: &Image) -> Result<Pose, PoseError> {
        let landmarks = self.predict(roi)?;
        Pose::new(landmarks, Mat3::identity(), self.input_size())
    }
}
