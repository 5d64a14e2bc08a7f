use {
    crate::{
        Keypoints, Keypoints3D, PoseError,
        keypoints::{KEYPOINT_3D_STRIDE, KEYPOINT_COUNT, KEYPOINT_STRIDE},
    },
    base::{Mat3, Vec2},
};

/// Raw landmark model output for one ROI.
#[derive(Debug, Clone, PartialEq)]
pub struct Landmarks {
    pub score: f32,
    /// 33 x `(x, y, depth, visibility_logit, presence)` in predictor input pixels.
    pub keypoints: Vec<f32>,
    /// 33 x `(x, y, z)` in the model's hip-centered frame.
    pub keypoints_3d: Vec<f32>,
}

impl Landmarks {
    pub fn new(score: f32, keypoints: Vec<f32>, keypoints_3d: Vec<f32>) -> Result<Self, PoseError> {
        if keypoints.len() != KEYPOINT_COUNT * KEYPOINT_STRIDE {
            return Err(PoseError::CorruptModelOutput(format!(
                "keypoint array has {} values, expected {}",
                keypoints.len(),
                KEYPOINT_COUNT * KEYPOINT_STRIDE
            )));
        }
        if keypoints_3d.len() != KEYPOINT_COUNT * KEYPOINT_3D_STRIDE {
            return Err(PoseError::CorruptModelOutput(format!(
                "3D keypoint array has {} values, expected {}",
                keypoints_3d.len(),
                KEYPOINT_COUNT * KEYPOINT_3D_STRIDE
            )));
        }
        Ok(Self {
            score,
            keypoints,
            keypoints_3d,
        })
    }
}

/// One detected body.
///
/// Owns the raw landmark arrays; `keypoints` and `keypoints_3d` are views
/// that borrow them.
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    landmarks: Landmarks,
    roi_to_image: Mat3<f32>,
    input_size: Vec2<usize>,
}

impl Pose {
    pub fn new(landmarks: Landmarks, roi_to_image: Mat3<f32>, input_size: Vec2<usize>) -> Result<Self, PoseError> {
        // validates lengths and input size once, so the views below cannot fail
        Keypoints::new(&landmarks.keypoints, roi_to_image, input_size)?;
        Keypoints3D::new(&landmarks.keypoints_3d)?;
        Ok(Self {
            landmarks,
            roi_to_image,
            input_size,
        })
    }

    pub fn score(&self) -> f32 {
        self.landmarks.score
    }

    pub fn keypoints(&self) -> Keypoints<'_> {
        Keypoints::new_unchecked(&self.landmarks.keypoints, self.roi_to_image, self.input_size)
    }

    pub fn keypoints_3d(&self) -> Keypoints3D<'_> {
        Keypoints3D::new_unchecked(&self.landmarks.keypoints_3d)
    }

    pub fn landmarks(&self) -> &Landmarks {
        &self.landmarks
    }

    pub fn roi_to_image(&self) -> Mat3<f32> {
        self.roi_to_image
    }
}
