use {
    crate::InferError,
    base::Tensor,
    std::{fmt, path::PathBuf},
};

/// A loaded model that can be run repeatedly.
///
/// Outputs come back in the model's declared output order; callers index
/// into them positionally.
pub trait Session: Send {
    fn run(&mut self, inputs: &[(&str, Tensor<f32>)]) -> Result<Vec<Tensor<f32>>, InferError>;
    fn input_names(&self) -> &[String];
    fn output_names(&self) -> &[String];
}

/// Loads models into sessions.
pub trait Backend: Send + Sync {
    fn name(&self) -> &str;
    fn load_model(&self, model: ModelSource) -> Result<Box<dyn Session>, InferError>;
}

pub enum ModelSource {
    File(PathBuf),
    Memory(Vec<u8>),
}

impl fmt::Debug for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelSource::File(path) => f.debug_tuple("File").field(path).finish(),
            ModelSource::Memory(bytes) => write!(f, "Memory({} bytes)", bytes.len()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Device {
    #[default]
    Cpu,
    Cuda {
        device_id: i32,
    },
}

/// Name of the first model input, which is the image tensor for both BlazePose models.
pub(crate) fn image_input_name(session: &dyn Session) -> Result<String, InferError> {
    session
        .input_names()
        .first()
        .cloned()
        .ok_or_else(|| InferError::ModelLoad("model has no inputs".to_string()))
}
