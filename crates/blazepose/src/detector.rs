use {
    crate::{
        AspectTransform, DetectorConfig, PoseError, Session, anchors::generate_anchors, preprocess, roi,
        session::image_input_name,
    },
    base::{Mat3, Rect, Tensor, Vec2},
    image::Image,
    std::{collections::VecDeque, fmt},
};

/// Keypoint slots decoded by the detector, in model order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionKeypoint {
    /// Mid-hip center.
    Hips = 0,
    /// Point whose distance from the hips sets the full-body ROI size.
    BodyScale = 1,
}

/// A person proposal from the detector.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// ROI in normalized image UV (origin bottom-left, y up).
    pub region: Rect<f32>,
    /// Clockwise tilt of the body from image-up, radians in (-pi, pi].
    pub rotation: f32,
    pub score: f32,
    /// Decoded detector keypoints in image UV.
    pub keypoints: Vec<Vec2<f32>>,
    /// Maps ROI UV to image UV, as returned by `roi::region_to_image`.
    pub roi_to_image: Mat3<f32>,
}

impl Detection {
    pub fn new(region: Rect<f32>, rotation: f32, score: f32, image_size: Vec2<usize>) -> Result<Self, PoseError> {
        let roi_to_image = roi::region_to_image(region, rotation, image_size)?;
        Ok(Self {
            region,
            rotation,
            score,
            keypoints: Vec::new(),
            roi_to_image,
        })
    }

    pub fn keypoint(&self, index: DetectionKeypoint) -> Option<Vec2<f32>> {
        self.keypoints.get(index as usize).copied()
    }
}

/// Detector output decoded against the anchors, still in model input pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetection {
    pub score: f32,
    pub bbox: Rect<f32>,
    pub keypoints: Vec<Vec2<f32>>,
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x.clamp(-100.0, 100.0)).exp())
}

/// Intersection over union of two boxes.
pub fn iou(a: &Rect<f32>, b: &Rect<f32>) -> f32 {
    match a.intersection(*b) {
        None => 0.0,
        Some(inter) => {
            let inter_area = inter.area();
            let union_area = a.area() + b.area() - inter_area;
            if union_area > 0.0 { inter_area / union_area } else { 0.0 }
        }
    }
}

/// Greedy non-maximum suppression. Returns kept indices, highest score
/// first; equal scores keep their input order.
pub fn nms(boxes: &[(Rect<f32>, f32)], iou_threshold: f32) -> Vec<usize> {
    let mut indices: VecDeque<usize> = {
        let mut v: Vec<usize> = (0..boxes.len()).collect();
        v.sort_by(|&a, &b| boxes[b].1.partial_cmp(&boxes[a].1).unwrap_or(std::cmp::Ordering::Equal));
        v.into()
    };

    let mut keep = Vec::new();
    while let Some(current) = indices.pop_front() {
        keep.push(current);
        indices.retain(|&idx| iou(&boxes[current].0, &boxes[idx].0) < iou_threshold);
    }
    keep
}

/// Decode SSD outputs: `regressors [1, N, 4 + 2K]` and `scores [1, N, 1]`.
///
/// Box centers and keypoints are offsets from their anchor center, in input
/// pixels. Returns surviving detections in descending score order.
pub fn postprocess(
    regressors: &Tensor<f32>,
    scores: &Tensor<f32>,
    anchors: &[Vec2<f32>],
    input_size: Vec2<usize>,
    score_threshold: f32,
    nms_threshold: f32,
) -> Result<Vec<RawDetection>, PoseError> {
    let count = anchors.len();
    if count == 0 || scores.len() != count {
        return Err(PoseError::CorruptModelOutput(format!(
            "expected {count} detector scores, got {}",
            scores.len()
        )));
    }
    if regressors.len() % count != 0 || regressors.len() / count < 8 {
        return Err(PoseError::CorruptModelOutput(format!(
            "detector regressors of length {} do not fit {count} anchors with at least two keypoints",
            regressors.len()
        )));
    }
    let stride = regressors.len() / count;
    let keypoint_count = (stride - 4) / 2;
    let input = input_size.as_f32();

    let mut candidates = Vec::new();
    for (index, anchor) in anchors.iter().enumerate() {
        let score = sigmoid(scores.data[index]);
        if score.is_nan() || score < score_threshold {
            continue;
        }
        let raw = &regressors.data[index * stride..(index + 1) * stride];
        let origin = Vec2::new(anchor.x * input.x, anchor.y * input.y);
        let center = origin + Vec2::new(raw[0], raw[1]);
        let bbox = Rect::from_center(center, Vec2::new(raw[2], raw[3]));
        let keypoints = (0..keypoint_count)
            .map(|k| origin + Vec2::new(raw[4 + 2 * k], raw[5 + 2 * k]))
            .collect();
        candidates.push(RawDetection { score, bbox, keypoints });
    }

    let boxes: Vec<(Rect<f32>, f32)> = candidates.iter().map(|c| (c.bbox, c.score)).collect();
    let keep = nms(&boxes, nms_threshold);
    Ok(keep.into_iter().map(|i| candidates[i].clone()).collect())
}

/// Turn a raw detection into a rotated, square ROI around the body.
///
/// Returns `None` when the hip and scale keypoints coincide.
pub fn detection_to_roi(
    raw: &RawDetection,
    aspect: &AspectTransform,
    input_size: Vec2<usize>,
    image_size: Vec2<usize>,
    roi_scale: f32,
) -> Result<Option<Detection>, PoseError> {
    let input = input_size.as_f32();
    let pixels = image_size.as_f32();
    // model input pixels -> image pixels (y down)
    let to_image_px = |p: Vec2<f32>| {
        let uv = aspect.to_image(Vec2::new(p.x / input.x, p.y / input.y));
        Vec2::new(uv.x * pixels.x, uv.y * pixels.y)
    };
    let keypoints_px: Vec<Vec2<f32>> = raw.keypoints.iter().map(|&p| to_image_px(p)).collect();
    let (Some(&hips), Some(&scale_point)) = (
        keypoints_px.get(DetectionKeypoint::Hips as usize),
        keypoints_px.get(DetectionKeypoint::BodyScale as usize),
    ) else {
        return Err(PoseError::CorruptModelOutput("detection has fewer than two keypoints".to_string()));
    };

    let delta = scale_point - hips;
    let radius = delta.length();
    if !(radius.is_finite() && radius > 0.0) {
        return Ok(None);
    }
    let rotation = delta.x.atan2(-delta.y);
    let side = 2.0 * radius * roi_scale;

    let center = Vec2::new(hips.x / pixels.x, 1.0 - hips.y / pixels.y);
    let region = Rect::from_center(center, Vec2::new(side / pixels.x, side / pixels.y));
    let mut detection = Detection::new(region, rotation, raw.score, image_size)?;
    detection.keypoints = keypoints_px
        .iter()
        .map(|p| Vec2::new(p.x / pixels.x, 1.0 - p.y / pixels.y))
        .collect();
    Ok(Some(detection))
}

/// BlazePose person detector.
pub struct PoseDetector {
    session: Box<dyn Session>,
    config: DetectorConfig,
    anchors: Vec<Vec2<f32>>,
}

impl fmt::Debug for PoseDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoseDetector")
            .field("config", &self.config)
            .field("anchors", &self.anchors.len())
            .finish()
    }
}

impl PoseDetector {
    pub fn new(session: Box<dyn Session>, config: DetectorConfig) -> Result<Self, PoseError> {
        config.validate()?;
        let anchors = generate_anchors(&config.anchors, config.model.input_size());
        Ok(Self {
            session,
            config,
            anchors,
        })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    /// Detect people in an RGB image, best score first.
    pub fn detect(&mut self, image: &Image) -> Result<Vec<Detection>, PoseError> {
        let (input, aspect) = preprocess(image, &self.config.model)?;
        let input_name = image_input_name(self.session.as_ref())?;
        let outputs = self.session.run(&[(input_name.as_str(), input)])?;
        if outputs.len() < 2 {
            return Err(PoseError::CorruptModelOutput(format!(
                "detector produced {} outputs, expected regressors and scores",
                outputs.len()
            )));
        }

        let input_size = self.config.model.input_size();
        let raw = postprocess(
            &outputs[0],
            &outputs[1],
            &self.anchors,
            input_size,
            self.config.score_threshold,
            self.config.nms_threshold,
        )?;

        let mut detections = Vec::with_capacity(raw.len());
        for candidate in &raw {
            match detection_to_roi(candidate, &aspect, input_size, image.size, self.config.roi_scale)? {
                Some(detection) => detections.push(detection),
                None => log::warn!("dropping detection with coincident hip and scale keypoints"),
            }
        }
        log::debug!("detector: {} candidates, {} detections", raw.len(), detections.len());
        Ok(detections)
    }
}
