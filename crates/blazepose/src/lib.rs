//! BlazePose two-stage human pose estimation.
//!
//! A person detector proposes rotated regions; each region is cropped into
//! an upright ROI and fed to the landmark model, whose 33 keypoints are
//! mapped back into normalized image space (UV, origin bottom-left) and into
//! a hip-centered 3D frame.
//!
//! Inference itself sits behind the `Session` and `Backend` traits; the ONNX
//! Runtime backend is available with the `onnx` feature.

pub mod anchors;
pub mod backends;
pub mod config;
pub mod detector;
pub mod error;
pub mod keypoints;
pub mod pipeline;
pub mod pose;
pub mod predictor;
pub mod preprocess;
pub mod roi;
pub mod session;
pub mod stream;

pub use config::{AnchorOptions, AspectMode, DetectorConfig, ModelConfig, Normalization, PipelineConfig, TensorLayout};
pub use detector::{Detection, DetectionKeypoint, PoseDetector};
pub use error::{InferError, PoseError};
pub use keypoints::{KEYPOINT_COUNT, KeypointIndex, Keypoints, Keypoints3D};
pub use pipeline::{PosePipeline, PosePipelineBuilder};
pub use pose::{Landmarks, Pose};
pub use predictor::LandmarkPredictor;
pub use preprocess::{AspectTransform, preprocess};
pub use roi::extract_roi;
pub use session::{Backend, Device, ModelSource, Session};
pub use stream::PoseStream;

#[cfg(feature = "onnx")]
pub use backends::{OnnxBackend, OnnxSession};
