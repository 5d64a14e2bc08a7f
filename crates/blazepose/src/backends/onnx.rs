use {
    crate::{Backend, Device, InferError, ModelSource, Session},
    base::Tensor,
    ort::{
        session::{Session as OrtSession, SessionInputValue},
        value::Tensor as OrtTensor,
    },
    std::borrow::Cow,
};

/// ONNX Runtime backend.
pub struct OnnxBackend {
    device: Device,
}

impl OnnxBackend {
    pub fn new(device: Device) -> Self {
        Self { device }
    }
}

impl Default for OnnxBackend {
    fn default() -> Self {
        Self::new(Device::Cpu)
    }
}

impl Backend for OnnxBackend {
    fn name(&self) -> &str {
        "onnx"
    }

    fn load_model(&self, model: ModelSource) -> Result<Box<dyn Session>, InferError> {
        let mut builder = OrtSession::builder()
            .map_err(|e| InferError::Backend(format!("failed to create session builder: {e}")))?;

        builder = match self.device {
            Device::Cpu => {
                log::debug!("onnx: using CPU execution provider");
                builder
            }
            #[cfg(feature = "cuda")]
            Device::Cuda { device_id } => {
                use ort::execution_providers::{CUDAExecutionProvider, ExecutionProvider};
                let ep = CUDAExecutionProvider::default().with_device_id(device_id);
                let available = ep.is_available().unwrap_or(false);
                log::info!("onnx: CUDA requested (device_id={device_id}), available: {available}");
                builder
                    .with_execution_providers([ep.build()])
                    .map_err(|e| InferError::Backend(format!("CUDA unavailable: {e}")))?
            }
            #[cfg(not(feature = "cuda"))]
            Device::Cuda { .. } => {
                return Err(InferError::Backend(
                    "CUDA device requested but the cuda feature is disabled".to_string(),
                ));
            }
        };

        let session = match model {
            ModelSource::File(path) => builder.commit_from_file(&path).map_err(|e| {
                InferError::ModelLoad(format!("failed to load {}: {e}", path.display()))
            })?,
            ModelSource::Memory(bytes) => builder
                .commit_from_memory(&bytes)
                .map_err(|e| InferError::ModelLoad(format!("failed to load model from memory: {e}")))?,
        };

        let input_names: Vec<String> = session
            .inputs()
            .iter()
            .map(|input| input.name().to_string())
            .collect();
        let output_names: Vec<String> = session
            .outputs()
            .iter()
            .map(|output| output.name().to_string())
            .collect();
        log::info!("onnx: loaded model, inputs {input_names:?}, outputs {output_names:?}");

        Ok(Box::new(OnnxSession {
            session,
            input_names,
            output_names,
        }))
    }
}

pub struct OnnxSession {
    session: OrtSession,
    input_names: Vec<String>,
    output_names: Vec<String>,
}

impl Session for OnnxSession {
    fn run(&mut self, inputs: &[(&str, Tensor<f32>)]) -> Result<Vec<Tensor<f32>>, InferError> {
        let mut values: Vec<(Cow<'_, str>, SessionInputValue<'_>)> = Vec::with_capacity(inputs.len());
        for (name, tensor) in inputs {
            if !self.input_names.iter().any(|n| n == name) {
                return Err(InferError::Shape(format!(
                    "unknown input '{name}', model expects {:?}",
                    self.input_names
                )));
            }
            let shape: Vec<i64> = tensor.shape.iter().map(|&d| d as i64).collect();
            let value = OrtTensor::from_array((shape, tensor.data.clone()))
                .map_err(|e| InferError::Backend(format!("failed to create input tensor: {e}")))?;
            values.push((Cow::Borrowed(*name), value.into()));
        }

        let outputs = self
            .session
            .run(values)
            .map_err(|e| InferError::Runtime(format!("inference failed: {e}")))?;

        let mut result = Vec::with_capacity(self.output_names.len());
        for name in &self.output_names {
            let value = outputs
                .get(name.as_str())
                .ok_or_else(|| InferError::Runtime(format!("missing output '{name}'")))?;
            let (shape, data) = value
                .try_extract_tensor::<f32>()
                .map_err(|e| InferError::Shape(format!("output '{name}' is not f32: {e}")))?;
            let shape: Vec<usize> = shape.iter().map(|&d| d as usize).collect();
            result.push(Tensor::new(shape, data.to_vec())?);
        }
        Ok(result)
    }

    fn input_names(&self) -> &[String] {
        &self.input_names
    }

    fn output_names(&self) -> &[String] {
        &self.output_names
    }
}
