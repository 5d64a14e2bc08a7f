#![allow(dead_code)]

use {
    base::{Tensor, Vec2},
    blazepose::{
        AnchorOptions, Backend, DetectorConfig, InferError, KEYPOINT_COUNT, LandmarkPredictor, ModelConfig,
        ModelSource, PoseDetector, PosePipeline, Session, anchors::generate_anchors,
    },
    image::Image,
    std::{
        collections::VecDeque,
        sync::{
            Arc, Mutex,
            atomic::{AtomicUsize, Ordering},
        },
    },
};

pub const DETECTOR_INPUT: usize = 224;
pub const LANDMARK_INPUT: usize = 256;

/// Counters shared between a test and the fake sessions it hands out.
#[derive(Debug, Default, Clone)]
pub struct Probe {
    pub runs: Arc<AtomicUsize>,
    pub drops: Arc<AtomicUsize>,
    pub last_input: Arc<Mutex<Option<Tensor<f32>>>>,
}

impl Probe {
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    pub fn drops(&self) -> usize {
        self.drops.load(Ordering::SeqCst)
    }

    pub fn last_input(&self) -> Option<Tensor<f32>> {
        self.last_input.lock().unwrap().clone()
    }
}

/// Session replaying canned outputs. The last reply repeats once the queue
/// runs dry.
pub struct FakeSession {
    replies: VecDeque<Result<Vec<Tensor<f32>>, String>>,
    last: Result<Vec<Tensor<f32>>, String>,
    input_names: Vec<String>,
    output_names: Vec<String>,
    probe: Probe,
}

impl FakeSession {
    pub fn new(outputs: Vec<Tensor<f32>>, probe: Probe) -> Self {
        Self::sequence(vec![outputs], probe)
    }

    pub fn sequence(replies: Vec<Vec<Tensor<f32>>>, probe: Probe) -> Self {
        let output_names = (0..replies.first().map_or(0, |r| r.len()))
            .map(|i| format!("output_{i}"))
            .collect();
        let mut replies: VecDeque<_> = replies.into_iter().map(Ok).collect();
        let last = replies.pop_back().unwrap_or(Ok(Vec::new()));
        Self {
            replies,
            last,
            input_names: vec!["input".to_string()],
            output_names,
            probe,
        }
    }

    pub fn failing(message: &str, probe: Probe) -> Self {
        Self {
            replies: VecDeque::new(),
            last: Err(message.to_string()),
            input_names: vec!["input".to_string()],
            output_names: Vec::new(),
            probe,
        }
    }
}

impl Session for FakeSession {
    fn run(&mut self, inputs: &[(&str, Tensor<f32>)]) -> Result<Vec<Tensor<f32>>, InferError> {
        self.probe.runs.fetch_add(1, Ordering::SeqCst);
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].0, "input");
        *self.probe.last_input.lock().unwrap() = Some(inputs[0].1.clone());
        let reply = self.replies.pop_front().unwrap_or_else(|| self.last.clone());
        reply.map_err(InferError::Runtime)
    }

    fn input_names(&self) -> &[String] {
        &self.input_names
    }

    fn output_names(&self) -> &[String] {
        &self.output_names
    }
}

impl Drop for FakeSession {
    fn drop(&mut self) {
        self.probe.drops.fetch_add(1, Ordering::SeqCst);
    }
}

/// Backend serving `Memory(b"detector")` and `Memory(b"landmarks")`.
pub struct FakeBackend {
    pub detector_outputs: Vec<Tensor<f32>>,
    pub landmark_outputs: Vec<Tensor<f32>>,
    pub probe: Probe,
}

impl Backend for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    fn load_model(&self, model: ModelSource) -> Result<Box<dyn Session>, InferError> {
        match model {
            ModelSource::Memory(bytes) if bytes == b"detector" => Ok(Box::new(FakeSession::new(
                self.detector_outputs.clone(),
                self.probe.clone(),
            ))),
            ModelSource::Memory(bytes) if bytes == b"landmarks" => Ok(Box::new(FakeSession::new(
                self.landmark_outputs.clone(),
                self.probe.clone(),
            ))),
            other => Err(InferError::ModelLoad(format!("unknown model {other:?}"))),
        }
    }
}

/// A person as the detector sees it, in detector input pixels.
#[derive(Debug, Clone, Copy)]
pub struct FakePerson {
    pub logit: f32,
    pub anchor: usize,
    pub hips: Vec2<f32>,
    pub scale_point: Vec2<f32>,
}

/// Regressors `[1, N, 12]` and scores `[1, N, 1]` encoding `people`.
pub fn detector_outputs(people: &[FakePerson]) -> Vec<Tensor<f32>> {
    let anchors = generate_anchors(
        &AnchorOptions::default(),
        Vec2::new(DETECTOR_INPUT, DETECTOR_INPUT),
    );
    let count = anchors.len();
    let mut regressors = vec![0.0f32; count * 12];
    let mut scores = vec![-10.0f32; count];
    for person in people {
        let anchor = anchors[person.anchor];
        let origin = Vec2::new(anchor.x * DETECTOR_INPUT as f32, anchor.y * DETECTOR_INPUT as f32);
        let hips = person.hips - origin;
        let scale_point = person.scale_point - origin;
        let raw = &mut regressors[person.anchor * 12..(person.anchor + 1) * 12];
        raw[..6].copy_from_slice(&[hips.x, hips.y, 20.0, 20.0, hips.x, hips.y]);
        raw[6..8].copy_from_slice(&[scale_point.x, scale_point.y]);
        scores[person.anchor] = person.logit;
    }
    vec![
        Tensor::new(vec![1, count, 12], regressors).unwrap(),
        Tensor::new(vec![1, count, 1], scores).unwrap(),
    ]
}

/// Every keypoint at the same ROI pixel with the given depth and visibility logit.
pub fn uniform_keypoints(x: f32, y: f32, depth: f32, logit: f32) -> Vec<f32> {
    (0..KEYPOINT_COUNT)
        .flat_map(|_| [x, y, depth, logit, 1.0])
        .collect()
}

/// The five landmark model outputs, with the pieces the predictor reads at 0, 2 and 4.
pub fn landmark_outputs(score: f32, keypoints: Vec<f32>, keypoints_3d: Vec<f32>) -> Vec<Tensor<f32>> {
    vec![
        Tensor::from_vec(keypoints),
        Tensor::from_vec(vec![0.0]),
        Tensor::from_vec(vec![score]),
        Tensor::from_vec(vec![0.0; 64]),
        Tensor::from_vec(keypoints_3d),
    ]
}

/// Landmarks with every keypoint at the ROI center.
pub fn centered_landmark_outputs(score: f32) -> Vec<Tensor<f32>> {
    let center = LANDMARK_INPUT as f32 / 2.0;
    landmark_outputs(
        score,
        uniform_keypoints(center, center, 0.0, 0.0),
        vec![0.0; KEYPOINT_COUNT * 3],
    )
}

pub fn detector(outputs: Vec<Tensor<f32>>, probe: &Probe) -> PoseDetector {
    PoseDetector::new(
        Box::new(FakeSession::new(outputs, probe.clone())),
        DetectorConfig::default(),
    )
    .unwrap()
}

pub fn predictor(outputs: Vec<Tensor<f32>>, probe: &Probe) -> LandmarkPredictor {
    LandmarkPredictor::new(
        Box::new(FakeSession::new(outputs, probe.clone())),
        ModelConfig::landmarks(),
    )
    .unwrap()
}

pub fn pipeline(people: &[FakePerson], probe: &Probe) -> PosePipeline {
    PosePipeline::new(
        detector(detector_outputs(people), probe),
        predictor(centered_landmark_outputs(0.9), probe),
    )
}

pub fn gray_image(width: usize, height: usize) -> Image {
    Image::filled(Vec2::new(width, height), [128, 128, 128])
}

/// Deterministic pseudo-random floats in [-1, 1).
pub fn lcg_floats(seed: u64, count: usize) -> Vec<f32> {
    let mut state = seed;
    (0..count)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((state >> 40) as f32 / (1u64 << 24) as f32) * 2.0 - 1.0
        })
        .collect()
}

pub fn assert_close(a: f32, b: f32, tolerance: f32) {
    assert!((a - b).abs() <= tolerance, "{a} != {b} (tolerance {tolerance})");
}
