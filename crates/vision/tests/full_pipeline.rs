use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use frame_ingest::{gradient_frame, synthetic_frame};
use ml_core::{DefectDecoder, DefectDetectionStage, MockBackend};
use pipeline_core::{
    BBox, BatchTags, Defect, DefectKind, DefectResult, ErrorKind, Pipeline, PixelFormat,
    run_batch, run_batch_parallel, run_multi_unit,
};
use vision::{ColorConvertStage, NormalizeStage, ResizeStage};

fn detection_pipeline(frame_id: u64) -> Pipeline {
    let backend = MockBackend::with_defects(vec![Defect::new(
        DefectKind::WrongItem,
        BBox::new(0.1, 0.1, 0.2, 0.2),
        0.99,
    )]);
    Pipeline::new()
        .with_stage(ResizeStage::new(64, 64))
        .with_stage(NormalizeStage::new(0.0, 1.0 / 255.0))
        .with_stage(
            DefectDetectionStage::new(backend, DefectDecoder::with_default_classes(0.5))
                .with_frame_id(frame_id),
        )
}

#[test]
fn camera_frame_yields_wrong_item() {
    let pipeline = detection_pipeline(42);
    let result = pipeline
        .run(&synthetic_frame(320, 240, PixelFormat::Rgb8).unwrap(), None)
        .unwrap();

    assert_eq!(result.frame_id, 42);
    assert_eq!(result.defects.len(), 1);
    assert_eq!(result.defects[0].kind, DefectKind::WrongItem);
    assert!((result.defects[0].confidence - 0.99).abs() < 1e-6);
    assert!((result.defects[0].bbox.w - 0.2).abs() < 1e-6);
}

#[test]
fn every_stage_reports_timing() {
    let pipeline = detection_pipeline(1);
    let mut timings = Vec::new();
    let mut sink = |index: usize, ms: f64| timings.push((index, ms));
    pipeline
        .run(&gradient_frame(128, 96, PixelFormat::Bgr8).unwrap(), Some(&mut sink))
        .unwrap();

    assert_eq!(timings.len(), 3);
    assert_eq!(
        timings.iter().map(|(i, _)| *i).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    assert!(timings.iter().all(|(_, ms)| *ms >= 0.0));
}

#[test]
fn parallel_batch_processes_every_frame() {
    let pipeline = detection_pipeline(7);
    let frames = vec![synthetic_frame(64, 64, PixelFormat::Rgb8).unwrap(); 8];
    let results = Mutex::new(Vec::new());
    run_batch_parallel(
        &pipeline,
        &frames,
        |result| results.lock().unwrap().push(result),
        2,
        BatchTags::default(),
    );

    let results = results.into_inner().unwrap();
    assert_eq!(results.len(), 8);
    assert!(results.iter().all(|r| r.frame_id == 7 && r.defects.len() == 1));
}

#[test]
fn invalid_frames_are_dropped_from_batches() {
    let pipeline = detection_pipeline(0);
    let frames = vec![
        synthetic_frame(32, 32, PixelFormat::Rgb8).unwrap(),
        synthetic_frame(32, 32, PixelFormat::Float32Planar).unwrap(),
        synthetic_frame(32, 32, PixelFormat::Grayscale8).unwrap(),
    ];
    let cameras = vec!["aisle-1".to_string(), "aisle-2".to_string(), "aisle-3".to_string()];

    let mut seen: Vec<DefectResult> = Vec::new();
    run_batch(
        &pipeline,
        &frames,
        |result| seen.push(result),
        BatchTags::new(Some(cameras.as_slice()), None),
    );

    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].camera_id.as_deref(), Some("aisle-1"));
    assert_eq!(seen[1].camera_id.as_deref(), Some("aisle-3"));

    let err = pipeline.run(&frames[1], None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFrame);
}

#[test]
fn units_route_to_their_own_pipelines() {
    let mut pipelines = HashMap::new();
    pipelines.insert("store-a".to_string(), detection_pipeline(1));
    pipelines.insert(
        "store-b".to_string(),
        Pipeline::new()
            .with_stage(ColorConvertStage::new(PixelFormat::Grayscale8))
            .with_stage(ResizeStage::new(16, 16))
            .with_stage(NormalizeStage::default())
            .with_stage(DefectDetectionStage::new(
                MockBackend::new(),
                DefectDecoder::with_default_classes(0.5),
            )),
    );

    let work = vec![
        ("store-a".to_string(), gradient_frame(40, 30, PixelFormat::Rgb8).unwrap()),
        ("store-b".to_string(), gradient_frame(40, 30, PixelFormat::Bgr8).unwrap()),
        ("store-c".to_string(), gradient_frame(40, 30, PixelFormat::Rgb8).unwrap()),
    ];

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink_seen = Arc::clone(&seen);
    run_multi_unit(&pipelines, &work, move |result, unit| {
        sink_seen
            .lock()
            .unwrap()
            .push((unit.to_string(), result.camera_id.clone(), result.defects.len()));
    });

    let mut seen = seen.lock().unwrap().clone();
    seen.sort();
    assert_eq!(
        seen,
        vec![
            ("store-a".to_string(), Some("store-a".to_string()), 1),
            ("store-b".to_string(), Some("store-b".to_string()), 0),
        ]
    );
}
