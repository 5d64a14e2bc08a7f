//! Landmark keypoints and the views that map raw model output into image
//! and world space.

use {
    crate::{PoseError, roi::depth_scale},
    base::{Mat3, Vec2, Vec3, Vec4},
    std::fmt,
};

/// Number of body keypoints regressed by the landmark model.
pub const KEYPOINT_COUNT: usize = 33;

/// Values per keypoint in the 2D output: x, y, depth, visibility logit, presence.
pub const KEYPOINT_STRIDE: usize = 5;

/// Values per keypoint in the 3D output: x, y, z.
pub const KEYPOINT_3D_STRIDE: usize = 3;

/// Logistic function.
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

macro_rules! keypoint_indices {
    ($($variant:ident = $index:literal => $accessor:ident,)*) => {
        /// Anatomical keypoint indices of the BlazePose topology.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum KeypointIndex {
            $($variant = $index,)*
        }

        impl KeypointIndex {
            /// Every keypoint, in model order.
            pub const ALL: [KeypointIndex; KEYPOINT_COUNT] = [$(KeypointIndex::$variant,)*];
        }

        impl Keypoints<'_> {
            $(
                pub fn $accessor(&self) -> Vec4<f32> {
                    self.get(KeypointIndex::$variant)
                }
            )*
        }

        impl Keypoints3D<'_> {
            $(
                pub fn $accessor(&self) -> Vec3<f32> {
                    self.get(KeypointIndex::$variant)
                }
            )*
        }
    };
}

keypoint_indices! {
    Nose = 0 => nose,
    LeftEyeInner = 1 => left_eye_inner,
    LeftEye = 2 => left_eye,
    LeftEyeOuter = 3 => left_eye_outer,
    RightEyeInner = 4 => right_eye_inner,
    RightEye = 5 => right_eye,
    RightEyeOuter = 6 => right_eye_outer,
    LeftEar = 7 => left_ear,
    RightEar = 8 => right_ear,
    MouthLeft = 9 => mouth_left,
    MouthRight = 10 => mouth_right,
    LeftShoulder = 11 => left_shoulder,
    RightShoulder = 12 => right_shoulder,
    LeftElbow = 13 => left_elbow,
    RightElbow = 14 => right_elbow,
    LeftWrist = 15 => left_wrist,
    RightWrist = 16 => right_wrist,
    LeftPinky = 17 => left_pinky,
    RightPinky = 18 => right_pinky,
    LeftIndex = 19 => left_index,
    RightIndex = 20 => right_index,
    LeftThumb = 21 => left_thumb,
    RightThumb = 22 => right_thumb,
    LeftHip = 23 => left_hip,
    RightHip = 24 => right_hip,
    LeftKnee = 25 => left_knee,
    RightKnee = 26 => right_knee,
    LeftAnkle = 27 => left_ankle,
    RightAnkle = 28 => right_ankle,
    LeftHeel = 29 => left_heel,
    RightHeel = 30 => right_heel,
    LeftFootIndex = 31 => left_foot_index,
    RightFootIndex = 32 => right_foot_index,
}

impl From<KeypointIndex> for usize {
    fn from(index: KeypointIndex) -> usize {
        index as usize
    }
}

impl TryFrom<usize> for KeypointIndex {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        KeypointIndex::ALL
            .get(value)
            .copied()
            .ok_or_else(|| format!("invalid keypoint index: {value}, must be in range 0-32"))
    }
}

fn check_len(data: &[f32], stride: usize, what: &str) -> Result<(), PoseError> {
    let expected = KEYPOINT_COUNT * stride;
    if data.len() != expected {
        return Err(PoseError::CorruptModelOutput(format!(
            "{what} has {} values, expected {expected}",
            data.len()
        )));
    }
    Ok(())
}

/// Normalized image-space keypoints `(x, y, depth, visibility)`.
///
/// Borrows the raw landmark array; each access reads the raw values at
/// `5 * i`, scales them by the predictor input size, flips y into UV and
/// maps them through the ROI-to-image transform.
#[derive(Clone, Copy)]
pub struct Keypoints<'a> {
    data: &'a [f32],
    transform: Mat3<f32>,
    input_size: Vec2<f32>,
    depth_scale: f32,
}

impl<'a> Keypoints<'a> {
    pub fn new(data: &'a [f32], transform: Mat3<f32>, input_size: Vec2<usize>) -> Result<Self, PoseError> {
        check_len(data, KEYPOINT_STRIDE, "keypoint array")?;
        if input_size.x == 0 || input_size.y == 0 {
            return Err(PoseError::InvalidInput(format!("empty predictor input size {input_size:?}")));
        }
        Ok(Self::new_unchecked(data, transform, input_size))
    }

    pub(crate) fn new_unchecked(data: &'a [f32], transform: Mat3<f32>, input_size: Vec2<usize>) -> Self {
        Self {
            data,
            transform,
            input_size: input_size.as_f32(),
            depth_scale: depth_scale(&transform),
        }
    }

    pub fn get(&self, index: KeypointIndex) -> Vec4<f32> {
        let base = usize::from(index) * KEYPOINT_STRIDE;
        let raw = &self.data[base..base + KEYPOINT_STRIDE];
        let roi = Vec2::new(raw[0] / self.input_size.x, 1.0 - raw[1] / self.input_size.y);
        let image = self.transform.transform_point(roi);
        Vec4::new(image.x, image.y, self.depth_scale * raw[2], sigmoid(raw[3]))
    }

    /// Scale applied to the raw depth values.
    pub fn depth_scale(&self) -> f32 {
        self.depth_scale
    }

    pub fn len(&self) -> usize {
        KEYPOINT_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = Vec4<f32>> + '_ {
        KeypointIndex::ALL.iter().map(|&index| self.get(index))
    }
}

impl fmt::Debug for Keypoints<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Hip-centered world-space keypoints `(x, y, z)` with y pointing up.
#[derive(Clone, Copy)]
pub struct Keypoints3D<'a> {
    data: &'a [f32],
}

impl<'a> Keypoints3D<'a> {
    pub fn new(data: &'a [f32]) -> Result<Self, PoseError> {
        check_len(data, KEYPOINT_3D_STRIDE, "3D keypoint array")?;
        Ok(Self { data })
    }

    pub(crate) fn new_unchecked(data: &'a [f32]) -> Self {
        Self { data }
    }

    pub fn get(&self, index: KeypointIndex) -> Vec3<f32> {
        let base = usize::from(index) * KEYPOINT_3D_STRIDE;
        Vec3::new(self.data[base], -self.data[base + 1], self.data[base + 2])
    }

    pub fn len(&self) -> usize {
        KEYPOINT_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = Vec3<f32>> + '_ {
        KeypointIndex::ALL.iter().map(|&index| self.get(index))
    }
}

impl fmt::Debug for Keypoints3D<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
