use blazepose::{AspectMode, DetectorConfig, ModelConfig, PipelineConfig, PoseError, TensorLayout};

#[test]
fn defaults_match_the_blazepose_models() {
    let config = PipelineConfig::default();
    assert_eq!(config.detector.model.input_size(), base::Vec2::new(224, 224));
    assert_eq!(config.detector.model.aspect_mode, AspectMode::ScaleToFit);
    assert_eq!(config.detector.score_threshold, 0.5);
    assert_eq!(config.detector.nms_threshold, 0.3);
    assert_eq!(config.detector.roi_scale, 1.25);
    assert_eq!(config.predictor.input_size(), base::Vec2::new(256, 256));
    assert_eq!(config.predictor.aspect_mode, AspectMode::Stretch);
    assert_eq!(config.predictor.layout, TensorLayout::Nhwc);
    assert_eq!(config.predictor.normalization.mean, [0.5; 3]);
    assert_eq!(config.max_detections, None);
    assert_eq!(config.fill_color, [0, 0, 0]);
}

#[test]
fn partial_json_keeps_defaults() {
    let json = r#"{
        "detector": { "score_threshold": 0.7 },
        "predictor": { "aspect_mode": "scale_to_fit", "layout": "nchw" },
        "max_detections": 2
    }"#;
    let config = PipelineConfig::from_json_str(json).unwrap();
    assert_eq!(config.detector.score_threshold, 0.7);
    assert_eq!(config.detector.model, ModelConfig::detector());
    assert_eq!(config.predictor.aspect_mode, AspectMode::ScaleToFit);
    assert_eq!(config.predictor.layout, TensorLayout::Nchw);
    assert_eq!(config.predictor.input_width, 256);
    assert_eq!(config.max_detections, Some(2));
}

#[test]
fn partial_detector_model_keeps_detector_defaults() {
    let json = r#"{ "detector": { "model": { "layout": "nchw" } } }"#;
    let config = PipelineConfig::from_json_str(json).unwrap();
    let model = &config.detector.model;
    assert_eq!(model.layout, TensorLayout::Nchw);
    assert_eq!(model.input_size(), base::Vec2::new(224, 224));
    assert_eq!(model.aspect_mode, AspectMode::ScaleToFit);
    assert_eq!(model.normalization, ModelConfig::detector().normalization);
    // the predictor still falls back to the landmark model
    assert_eq!(config.predictor, ModelConfig::landmarks());
}

#[test]
fn detector_model_fields_override_individually() {
    let json = r#"{ "detector": { "model": { "input_width": 128, "input_height": 128 } } }"#;
    let config = PipelineConfig::from_json_str(json).unwrap();
    assert_eq!(config.detector.model.input_size(), base::Vec2::new(128, 128));
    assert_eq!(config.detector.model.aspect_mode, AspectMode::ScaleToFit);
    assert!(matches!(
        PipelineConfig::from_json_str(r#"{ "detector": { "model": { "aspect_mode": "squash" } } }"#),
        Err(PoseError::Config(_))
    ));
}

#[test]
fn malformed_json_is_a_config_error() {
    assert!(matches!(PipelineConfig::from_json_str("{ nope"), Err(PoseError::Config(_))));
    assert!(matches!(
        PipelineConfig::from_json_str(r#"{ "predictor": { "aspect_mode": "squash" } }"#),
        Err(PoseError::Config(_))
    ));
}

#[test]
fn zero_input_size_is_rejected() {
    let json = r#"{ "predictor": { "input_width": 0 } }"#;
    assert!(matches!(PipelineConfig::from_json_str(json), Err(PoseError::Config(_))));
}

#[test]
fn zero_std_is_rejected() {
    let mut config = DetectorConfig::default();
    config.model.normalization.std = [0.5, 0.0, 0.5];
    assert!(matches!(config.validate(), Err(PoseError::Config(_))));
}

#[test]
fn config_round_trips_through_a_file() {
    let path = std::env::temp_dir().join(format!("blazepose-config-{}.json", std::process::id()));
    let mut config = PipelineConfig::default();
    config.fill_color = [1, 2, 3];
    config.detector.anchors.strides = vec![8, 16, 16, 16];
    std::fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();
    let loaded = PipelineConfig::from_json_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn missing_file_is_a_config_error() {
    assert!(matches!(
        PipelineConfig::from_json_file("/nonexistent/blazepose.json"),
        Err(PoseError::Config(_))
    ));
}
