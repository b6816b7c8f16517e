use super::*;
use crate::beatmap::model::{CurveDescriptor, CurveKind, TimingPoint};
use crate::foundation::core::Point;

fn meta(objects: Vec<HitObject>) -> BeatmapMetadata {
    BeatmapMetadata {
        title: "prepared".into(),
        artist: String::new(),
        version: String::new(),
        hit_objects: objects,
        timing_points: vec![TimingPoint::uninherited(0.0, 500.0)],
        difficulty_points: Vec::new(),
        approach_rate: 9.0,
        circle_size: 4.0,
        slider_multiplier: 1.0,
        slider_tick_rate: 1.0,
        combo_colours: Vec::new(),
        audio_duration_ms: None,
    }
}

fn linear_slider(index: usize, time: f64, length: f64) -> HitObject {
    let mut s = HitObject::slider(
        index,
        time,
        time,
        Point::ZERO,
        CurveDescriptor {
            kind: CurveKind::Linear,
            control_points: vec![Point::new(length, 0.0)],
        },
        1,
        length,
    );
    s.end_time = None;
    s
}

#[test]
fn slider_end_and_ticks_are_resolved() {
    let prepared = PreparedBeatmap::prepare(
        meta(vec![linear_slider(0, 1000.0, 200.0)]),
        &PreviewConfig::default(),
    )
    .unwrap();
    let slider = &prepared.objects()[0];
    // 200px at 100px per beat of 500ms.
    assert_eq!(slider.end_time, Some(2000.0));
    assert_eq!(slider.ticks, vec![1500.0]);
    assert_eq!(prepared.diagnostics().ticks, 1);
    assert!(prepared.path(0).is_some());
}

#[test]
fn zero_length_takes_curve_length() {
    let mut s = linear_slider(0, 0.0, 100.0);
    s.length = 0.0;
    let prepared = PreparedBeatmap::prepare(meta(vec![s]), &PreviewConfig::default()).unwrap();
    assert_eq!(prepared.objects()[0].length, 100.0);
    assert_eq!(prepared.objects()[0].end_time, Some(500.0));
}

#[test]
fn broken_curve_keeps_the_object() {
    let mut s = linear_slider(0, 0.0, 100.0);
    s.curve = None;
    let prepared = PreparedBeatmap::prepare(meta(vec![s]), &PreviewConfig::default()).unwrap();
    assert!(prepared.path(0).is_none());
    assert_eq!(prepared.objects().len(), 1);
}

#[test]
fn zero_slides_becomes_a_marker_without_failing_the_map() {
    let mut s = linear_slider(1, 1000.0, 100.0);
    s.slides = 0;
    let objects = vec![HitObject::circle(0, 500.0, Point::ZERO), s];
    let prepared = PreparedBeatmap::prepare(meta(objects), &PreviewConfig::default()).unwrap();
    assert_eq!(prepared.objects().len(), 2);
    assert!(prepared.path(1).is_none());
    assert_eq!(prepared.objects()[1].slides, 1);
    assert_eq!(prepared.markers(), 1);
}

#[test]
fn negative_length_becomes_a_marker() {
    let mut s = linear_slider(0, 0.0, 100.0);
    s.length = -20.0;
    let prepared = PreparedBeatmap::prepare(meta(vec![s]), &PreviewConfig::default()).unwrap();
    assert!(prepared.path(0).is_none());
    assert_eq!(prepared.objects()[0].length, 0.0);
    assert_eq!(prepared.objects()[0].end_time, Some(0.0));
    assert_eq!(prepared.markers(), 1);
}

#[test]
fn end_before_start_is_clamped() {
    let mut s = linear_slider(0, 1000.0, 100.0);
    s.end_time = Some(800.0);
    let objects = vec![s, HitObject::spinner(1, 2000.0, 1500.0)];
    let prepared = PreparedBeatmap::prepare(meta(objects), &PreviewConfig::default()).unwrap();
    assert_eq!(prepared.objects()[0].end_time, Some(1000.0));
    assert_eq!(prepared.objects()[1].end_time, Some(2000.0));
    assert!(prepared.path(0).is_some());
    assert_eq!(prepared.markers(), 0);
}

#[test]
fn duration_prefers_audio_length() {
    let mut m = meta(vec![HitObject::circle(0, 3000.0, Point::ZERO)]);
    let prepared = PreparedBeatmap::prepare(m.clone(), &PreviewConfig::default()).unwrap();
    assert_eq!(prepared.duration_ms(), 3150.0);

    m.audio_duration_ms = Some(60_000.0);
    let prepared = PreparedBeatmap::prepare(m, &PreviewConfig::default()).unwrap();
    assert_eq!(prepared.duration_ms(), 60_000.0);
}

#[test]
fn invalid_input_is_rejected() {
    let mut m = meta(Vec::new());
    m.approach_rate = 11.0;
    assert!(PreparedBeatmap::prepare(m, &PreviewConfig::default()).is_err());
}

#[test]
fn radius_and_window_follow_difficulty() {
    let prepared = PreparedBeatmap::prepare(meta(Vec::new()), &PreviewConfig::default()).unwrap();
    assert!((prepared.circle_radius() - 36.48).abs() < 1e-9);
    assert_eq!(prepared.window().preempt(), 600.0);
    assert_eq!(prepared.combo_colour(0), crate::foundation::core::DEFAULT_COMBO_COLOURS[0]);
}
