mod common;

use common::synthetic_image::l_shape_u8;
use ght_detector::{EdgeMap, GhtDetector, GhtParams, RTable};
use std::f32::consts::{FRAC_PI_2, PI};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Edge map of an open "U" with exact outward gradient directions plus a
/// short spur, so no rotation maps it onto itself.
fn open_u_with_spur(w: usize, h: usize) -> EdgeMap {
    EdgeMap::from_fn(w, h, |x, y| match (x, y) {
        (8, 8..=20) => (2.0, PI),
        (20, 8..=20) => (2.0, 0.0),
        (9..=19, 20) => (2.0, FRAC_PI_2),
        (21..=26, 14) => (1.5, FRAC_PI_2),
        _ => (0.0, 0.0),
    })
    .expect("edge map")
}

fn assert_candidates_separated(detection: &ght_detector::Detection, min_separation: usize) {
    let cands = &detection.candidates;
    for pair in cands.windows(2) {
        assert!(
            pair[0].score >= pair[1].score,
            "scores not sorted: {} then {}",
            pair[0].score,
            pair[1].score
        );
    }
    for (i, a) in cands.iter().enumerate() {
        for b in &cands[i + 1..] {
            assert!(
                a.index.chebyshev(&b.index) >= min_separation,
                "candidates {:?} and {:?} are too close",
                a.index,
                b.index
            );
        }
    }
}

#[test]
fn rtable_holds_one_entry_per_edge_pixel() {
    init_logger();
    let shape = open_u_with_spur(32, 32);
    let detector = GhtDetector::default();
    let table = detector.learn(&shape).expect("learn");

    assert_eq!(table.bucket_count(), 64);
    assert_eq!(table.len(), shape.edge_count());
    // axis-aligned directions land in the four cardinal buckets only
    for (b, entries) in table.buckets().iter().enumerate() {
        if ![0, 16, 32, 48].contains(&b) {
            assert!(entries.is_empty(), "bucket {b} unexpectedly filled");
        }
    }
}

#[test]
fn empty_shape_fails_to_learn() {
    let detector = GhtDetector::default();
    let err = detector.learn(&EdgeMap::empty(16, 16)).unwrap_err();
    assert_eq!(err, ght_detector::GhtError::EmptyShape);
}

#[test]
fn self_detection_on_edge_map_finds_identity_pose() {
    init_logger();
    let shape = open_u_with_spur(32, 32);
    let params = GhtParams::default();
    let detector = GhtDetector::new(params.clone()).expect("params");
    let table = detector.learn(&shape).expect("learn");
    let detection = detector.detect(&table, &shape);

    let best = detection.candidates.first().expect("at least one candidate");
    let [cx, cy] = table.centroid();
    assert_eq!(best.scale, 1.0, "best={best:?}");
    assert_eq!(best.index.rotation, 0, "best={best:?}");
    assert!((best.x as f32 - cx).abs() <= 2.0, "x={} cx={cx}", best.x);
    assert!((best.y as f32 - cy).abs() <= 2.0, "y={} cy={cy}", best.y);
    assert!(detection.candidates.len() <= params.max_candidates);
    assert_candidates_separated(&detection, params.min_separation);
}

#[test]
fn self_detection_on_rendered_image() {
    init_logger();
    let img = l_shape_u8(64, 64, 18, 12, 36, 28, 8);
    let detector = GhtDetector::default();
    let table = detector.learn_image(&img.view()).expect("learn");
    assert!(!table.is_empty());

    let detection = detector.detect_image(&table, &img.view());
    let best = detection.candidates.first().expect("at least one candidate");
    let [cx, cy] = table.centroid();
    assert_eq!(best.scale, 1.0, "best={best:?}");
    assert_eq!(best.index.rotation, 0, "best={best:?}");
    assert!((best.x as f32 - cx).abs() <= 2.0, "x={} cx={cx}", best.x);
    assert!((best.y as f32 - cy).abs() <= 2.0, "y={} cy={cy}", best.y);
    assert_candidates_separated(&detection, detector.params().min_separation);

    let projection = detection.accumulator.project_xy();
    assert_eq!((projection.w, projection.h), (64, 64));
    assert!(projection.get(best.x, best.y) > 0.0);
}

#[test]
fn translated_shape_moves_the_peak() {
    init_logger();
    let reference = l_shape_u8(64, 64, 10, 10, 30, 24, 6);
    let query = l_shape_u8(64, 64, 22, 18, 30, 24, 6);
    let detector = GhtDetector::new(GhtParams {
        rotation_steps: 16,
        ..Default::default()
    })
    .expect("params");
    let table = detector.learn_image(&reference.view()).expect("learn");
    let detection = detector.detect_image(&table, &query.view());

    let best = detection.candidates.first().expect("candidate");
    let [cx, cy] = table.centroid();
    assert_eq!(best.scale, 1.0);
    assert_eq!(best.index.rotation, 0);
    assert!((best.x as f32 - (cx + 12.0)).abs() <= 2.0, "x={}", best.x);
    assert!((best.y as f32 - (cy + 8.0)).abs() <= 2.0, "y={}", best.y);
}

#[test]
fn displacements_beyond_the_query_are_discarded() {
    init_logger();
    // two far-apart columns: every displacement is at least 14 px long
    let shape = EdgeMap::from_fn(40, 8, |x, y| match (x, y) {
        (2, 0..=3) => (1.0, PI),
        (30, 0..=3) => (1.0, 0.0),
        _ => (0.0, 0.0),
    })
    .expect("shape");
    let detector = GhtDetector::new(GhtParams {
        scales: vec![1.0, 2.0],
        rotation_steps: 8,
        ..Default::default()
    })
    .expect("params");
    let table: RTable = detector.learn(&shape).expect("learn");

    let query = EdgeMap::from_fn(8, 8, |x, y| {
        if x == 3 && y == 3 {
            (5.0, 0.0)
        } else {
            (0.0, 0.0)
        }
    })
    .expect("query");
    let detection = detector.detect(&table, &query);
    assert_eq!(detection.votes, 0.0);
    assert_eq!(detection.accumulator.total(), 0.0);
    assert!(detection.candidates.is_empty());
}

#[test]
fn progress_reaches_completion() {
    use std::sync::Mutex;

    let shape = open_u_with_spur(32, 32);
    let detector = GhtDetector::new(GhtParams {
        rotation_steps: 8,
        ..Default::default()
    })
    .expect("params");
    let table = detector.learn(&shape).expect("learn");

    let seen = Mutex::new(Vec::new());
    let report = |p: f32| seen.lock().expect("lock").push(p);
    detector.detect_with_progress(&table, &shape, &report);

    let seen = seen.into_inner().expect("lock");
    assert!(!seen.is_empty());
    assert!(seen.iter().all(|p| (0.0..=100.0).contains(p)));
    let max = seen.iter().copied().fold(0.0f32, f32::max);
    assert!((max - 100.0).abs() < 1e-3, "max progress {max}");
}
