use super::*;

fn sample_json() -> &'static str {
    r#"{
        "title": "t",
        "hit_objects": [
            {"index": 0, "start_time": 1000, "kind": "circle", "position": {"x": 10, "y": 20}, "new_combo": true},
            {"index": 1, "start_time": 1500, "end_time": 2000, "kind": "slider", "position": {"x": 0, "y": 0},
             "curve": {"kind": "linear", "control_points": [{"x": 100, "y": 0}]}, "slides": 2, "length": 100}
        ],
        "timing_points": [{"time": 0, "beat_length": 500, "uninherited": true}],
        "approach_rate": 9,
        "circle_size": 4
    }"#
}

#[test]
fn json_defaults_are_applied() {
    let meta = BeatmapMetadata::from_json_str(sample_json()).unwrap();
    assert_eq!(meta.slider_multiplier, 1.4);
    assert_eq!(meta.slider_tick_rate, 1.0);
    assert_eq!(meta.timing_points[0].meter, 4);
    assert_eq!(meta.hit_objects[0].slides, 1);
    assert!(meta.hit_objects[0].new_combo);
    assert_eq!(meta.hit_objects[1].curve.as_ref().unwrap().kind, CurveKind::Linear);
    assert_eq!(meta.hit_objects[1].duration(), 500.0);
}

#[test]
fn unsorted_objects_are_rejected() {
    let mut meta = BeatmapMetadata::from_json_str(sample_json()).unwrap();
    meta.hit_objects.swap(0, 1);
    let err = meta.validate().unwrap_err();
    assert!(err.to_string().contains("ascending"));
}

#[test]
fn non_finite_end_is_rejected() {
    let mut meta = BeatmapMetadata::from_json_str(sample_json()).unwrap();
    meta.hit_objects[1].end_time = Some(f64::NAN);
    let err = meta.validate().unwrap_err();
    assert!(err.to_string().contains("end_time"));
}

#[test]
fn per_object_oddities_pass_map_validation() {
    let mut meta = BeatmapMetadata::from_json_str(sample_json()).unwrap();
    meta.hit_objects[1].end_time = Some(1000.0);
    meta.hit_objects[1].slides = 0;
    meta.hit_objects[1].length = -5.0;
    assert!(meta.validate().is_ok());
}

#[test]
fn approach_rate_range_is_checked() {
    let mut meta = BeatmapMetadata::from_json_str(sample_json()).unwrap();
    meta.approach_rate = 11.0;
    assert!(meta.validate().is_err());
}

#[test]
fn content_end_prefers_longer_of_audio_and_objects() {
    let mut meta = BeatmapMetadata::from_json_str(sample_json()).unwrap();
    assert_eq!(meta.content_end_ms(), 2000.0);
    meta.audio_duration_ms = Some(90_000.0);
    assert_eq!(meta.content_end_ms(), 90_000.0);
}

#[test]
fn spinner_constructor_centres_on_playfield() {
    let s = HitObject::spinner(3, 100.0, 900.0);
    assert!(s.is_spinner());
    assert_eq!(s.position, Point::new(256.0, 192.0));
    assert_eq!(s.duration(), 800.0);
}
