use {
    crate::{
        Backend, DetectorConfig, InferError, LandmarkPredictor, ModelConfig, ModelSource, PipelineConfig, Pose,
        PoseDetector, PoseError, Session, roi::extract_roi,
    },
    image::Image,
    std::{fmt, sync::Arc},
};

/// Two-stage pose estimation: detect people, then regress landmarks inside
/// each detection's aligned ROI.
///
/// Owns both models. `dispose` releases them early; dropping the pipeline
/// does the same.
pub struct PosePipeline {
    detector: Option<PoseDetector>,
    predictor: Option<LandmarkPredictor>,
    max_detections: usize,
    fill_color: [u8; 3],
}

impl fmt::Debug for PosePipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PosePipeline")
            .field("detector", &self.detector)
            .field("predictor", &self.predictor)
            .field("max_detections", &self.max_detections)
            .field("fill_color", &self.fill_color)
            .finish()
    }
}

impl PosePipeline {
    pub fn new(detector: PoseDetector, predictor: LandmarkPredictor) -> Self {
        log::info!(
            "pose pipeline ready: detector {}x{}, predictor {}x{}",
            detector.config().model.input_width,
            detector.config().model.input_height,
            predictor.input_size().x,
            predictor.input_size().y
        );
        Self {
            detector: Some(detector),
            predictor: Some(predictor),
            max_detections: usize::MAX,
            fill_color: [0, 0, 0],
        }
    }

    pub fn builder() -> PosePipelineBuilder {
        PosePipelineBuilder::new()
    }

    /// Cap the number of poses returned per image (default: no cap).
    pub fn with_max_detections(mut self, max_detections: usize) -> Self {
        self.max_detections = max_detections;
        self
    }

    /// Color of ROI pixels that fall outside the image (default: black).
    pub fn with_fill_color(mut self, fill_color: [u8; 3]) -> Self {
        self.fill_color = fill_color;
        self
    }

    pub fn max_detections(&self) -> usize {
        self.max_detections
    }

    pub fn is_disposed(&self) -> bool {
        self.detector.is_none() && self.predictor.is_none()
    }

    /// Estimate the poses in `image`, in detector order.
    ///
    /// An image without detections yields an empty vector.
    pub fn predict(&mut self, image: &Image) -> Result<Vec<Pose>, PoseError> {
        let (Some(detector), Some(predictor)) = (self.detector.as_mut(), self.predictor.as_mut()) else {
            return Err(PoseError::Disposed);
        };

        let rgb = image.as_rgb8()?;
        if !rgb.is_well_formed_rgb() {
            return Err(PoseError::InvalidInput(format!(
                "cannot run on a {}x{} image",
                rgb.width(),
                rgb.height()
            )));
        }

        let detections = detector.detect(&rgb)?;
        let roi_size = predictor.input_size();
        let mut poses = Vec::new();
        for detection in detections.iter().take(self.max_detections) {
            log::debug!(
                "detection score {:.3}, rotation {:.3}, region {:?}",
                detection.score,
                detection.rotation,
                detection.region
            );
            let (roi, _) = extract_roi(&rgb, detection.region, detection.rotation, self.fill_color, roi_size)?;
            let landmarks = predictor.predict(&roi)?;
            drop(roi);
            poses.push(Pose::new(landmarks, detection.roi_to_image, roi_size)?);
        }
        log::debug!("pipeline: {} detections, {} poses", detections.len(), poses.len());
        Ok(poses)
    }

    /// Release both models. Safe to call more than once.
    pub fn dispose(&mut self) {
        let detector = self.detector.take();
        let predictor = self.predictor.take();
        if detector.is_some() || predictor.is_some() {
            log::debug!("pose pipeline disposed");
        }
    }
}

impl Drop for PosePipeline {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Assembles a `PosePipeline` from pre-built stages or model sources.
///
/// Stages that are not supplied are loaded through a `Backend` on tokio's
/// blocking pool.
pub struct PosePipelineBuilder {
    detector: Option<PoseDetector>,
    predictor: Option<LandmarkPredictor>,
    detector_source: Option<ModelSource>,
    predictor_source: Option<ModelSource>,
    config: PipelineConfig,
}

impl Default for PosePipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PosePipelineBuilder {
    pub fn new() -> Self {
        Self {
            detector: None,
            predictor: None,
            detector_source: None,
            predictor_source: None,
            config: PipelineConfig::default(),
        }
    }

    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn detector(mut self, detector: PoseDetector) -> Self {
        self.detector = Some(detector);
        self
    }

    pub fn predictor(mut self, predictor: LandmarkPredictor) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn detector_model(mut self, source: ModelSource) -> Self {
        self.detector_source = Some(source);
        self
    }

    pub fn predictor_model(mut self, source: ModelSource) -> Self {
        self.predictor_source = Some(source);
        self
    }

    pub fn max_detections(mut self, max_detections: usize) -> Self {
        self.config.max_detections = Some(max_detections);
        self
    }

    pub fn fill_color(mut self, fill_color: [u8; 3]) -> Self {
        self.config.fill_color = fill_color;
        self
    }

    /// Load whatever is missing and build the pipeline.
    ///
    /// On failure everything already constructed is dropped.
    pub async fn build(self, backend: Arc<dyn Backend>) -> Result<PosePipeline, PoseError> {
        let PosePipelineBuilder {
            detector,
            predictor,
            detector_source,
            predictor_source,
            config,
        } = self;
        config.validate()?;

        let detector = match detector {
            Some(detector) => detector,
            None => load_detector(&backend, detector_source, config.detector.clone()).await?,
        };
        let predictor = match predictor {
            Some(predictor) => predictor,
            None => load_predictor(&backend, predictor_source, config.predictor.clone()).await?,
        };

        let pipeline = PosePipeline::new(detector, predictor).with_fill_color(config.fill_color);
        Ok(match config.max_detections {
            Some(max) => pipeline.with_max_detections(max),
            None => pipeline,
        })
    }
}

async fn load_session(backend: &Arc<dyn Backend>, source: ModelSource) -> Result<Box<dyn Session>, PoseError> {
    let backend = Arc::clone(backend);
    log::info!("loading {source:?} with the {} backend", backend.name());
    let session = tokio::task::spawn_blocking(move || backend.load_model(source))
        .await
        .map_err(|e| InferError::Runtime(format!("model loading task failed: {e}")))??;
    Ok(session)
}

async fn load_detector(
    backend: &Arc<dyn Backend>,
    source: Option<ModelSource>,
    config: DetectorConfig,
) -> Result<PoseDetector, PoseError> {
    let source = source.ok_or_else(|| PoseError::Config("no detector or detector model given".to_string()))?;
    PoseDetector::new(load_session(backend, source).await?, config)
}

async fn load_predictor(
    backend: &Arc<dyn Backend>,
    source: Option<ModelSource>,
    config: ModelConfig,
) -> Result<LandmarkPredictor, PoseError> {
    let source = source.ok_or_else(|| PoseError::Config("no predictor or predictor model given".to_string()))?;
    LandmarkPredictor::new(load_session(backend, source).await?, config)
}
