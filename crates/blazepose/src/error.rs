use std::fmt;

/// Failure reported by an inference session or backend.
#[derive(Debug)]
pub enum InferError {
    Shape(String),
    Io(String),
    ModelLoad(String),
    Backend(String),
    Runtime(String),
}

impl fmt::Display for InferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferError::Shape(msg) => write!(f, "shape error: {msg}"),
            InferError::Io(msg) => write!(f, "io error: {msg}"),
            InferError::ModelLoad(msg) => write!(f, "model load error: {msg}"),
            InferError::Backend(msg) => write!(f, "backend error: {msg}"),
            InferError::Runtime(msg) => write!(f, "runtime error: {msg}"),
        }
    }
}

impl std::error::Error for InferError {}

impl From<std::io::Error> for InferError {
    fn from(err: std::io::Error) -> Self {
        InferError::Io(err.to_string())
    }
}

impl From<base::TensorError> for InferError {
    fn from(err: base::TensorError) -> Self {
        InferError::Shape(err.to_string())
    }
}

/// Errors surfaced by the pose pipeline and its stages.
///
/// Nothing is retried internally. A failing detection aborts the whole
/// `predict` call; there are no partial poses.
#[derive(Debug)]
pub enum PoseError {
    /// The image (or feature) handed to a stage is not something it can consume.
    InvalidInput(String),
    /// Zero-area, non-finite or non-invertible region.
    InvalidRegion(String),
    /// Model output arity or length does not match the expected layout.
    CorruptModelOutput(String),
    /// Passed through unmodified from the inference boundary.
    InferenceFailure(InferError),
    Config(String),
    /// The pipeline's models were already released.
    Disposed,
}

impl fmt::Display for PoseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoseError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            PoseError::InvalidRegion(msg) => write!(f, "invalid region: {msg}"),
            PoseError::CorruptModelOutput(msg) => write!(f, "corrupt model output: {msg}"),
            PoseError::InferenceFailure(err) => write!(f, "inference failed: {err}"),
            PoseError::Config(msg) => write!(f, "configuration error: {msg}"),
            PoseError::Disposed => write!(f, "pipeline has been disposed"),
        }
    }
}

impl std::error::Error for PoseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PoseError::InferenceFailure(err) => Some(err),
            _ => None,
        }
    }
}

impl From<InferError> for PoseError {
    fn from(err: InferError) -> Self {
        PoseError::InferenceFailure(err)
    }
}

impl From<image::ImageError> for PoseError {
    fn from(err: image::ImageError) -> Self {
        PoseError::InvalidInput(err.to_string())
    }
}

impl From<serde_json::Error> for PoseError {
    fn from(err: serde_json::Error) -> Self {
        PoseError::Config(err.to_string())
    }
}
