use super::*;
use crate::beatmap::model::{BeatmapMetadata, CurveDescriptor, CurveKind, TimingPoint};
use crate::foundation::core::SurfaceSize;

fn beatmap(objects: Vec<HitObject>) -> PreparedBeatmap {
    let meta = BeatmapMetadata {
        title: "playfield".into(),
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
    };
    PreparedBeatmap::prepare(meta, &PreviewConfig::default()).unwrap()
}

fn surface() -> Surface {
    Surface::new(SurfaceSize::new(128, 96).unwrap(), 1.0).unwrap()
}

fn slider(index: usize, time: f64, control: Vec<Point>, slides: u32) -> HitObject {
    HitObject::slider(
        index,
        time,
        time + 1000.0 * f64::from(slides),
        Point::new(100.0, 100.0),
        CurveDescriptor {
            kind: CurveKind::Linear,
            control_points: control,
        },
        slides,
        200.0,
    )
}

#[test]
fn letterbox_keeps_aspect_and_centres() {
    let tr = PlayfieldRenderer::playfield_transform(640.0, 480.0);
    let origin = tr * Point::ZERO;
    let corner = tr * Point::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT);
    assert!(((corner.x - origin.x) / (corner.y - origin.y) - 4.0 / 3.0).abs() < 1e-9);
    assert!(((origin.x + corner.x) / 2.0 - 320.0).abs() < 1e-9);
    assert!(((origin.y + corner.y) / 2.0 - 240.0).abs() < 1e-9);
}

#[test]
fn nothing_is_drawn_before_preempt() {
    let bm = beatmap(vec![HitObject::circle(0, 1000.0, Point::new(256.0, 192.0))]);
    let stats = PlayfieldRenderer::default().render(&mut surface(), &bm, 350.0, &ViewToggles::default());
    assert_eq!(stats.objects_drawn, 0);
}

#[test]
fn circle_is_drawn_while_visible() {
    let bm = beatmap(vec![HitObject::circle(0, 1000.0, Point::new(256.0, 192.0))]);
    let renderer = PlayfieldRenderer::default();
    let mut s = surface();
    let stats = renderer.render(&mut s, &bm, 900.0, &ViewToggles::default());
    assert_eq!(stats.objects_drawn, 1);
    // The centre of the playfield is covered by the circle, not the background.
    let bg = PreviewConfig::default().playfield_background;
    assert_ne!(s.pixel(64, 48), Some([bg.r, bg.g, bg.b, 255]));
}

#[test]
fn follow_points_join_same_combo_objects_only() {
    let objects = vec![
        HitObject::circle(0, 1000.0, Point::new(50.0, 50.0)),
        HitObject::circle(1, 1300.0, Point::new(400.0, 50.0)),
        HitObject::circle(2, 1600.0, Point::new(400.0, 300.0)).with_new_combo(true),
    ];
    let bm = beatmap(objects);
    let stats =
        PlayfieldRenderer::default().render(&mut surface(), &bm, 1100.0, &ViewToggles::default());
    assert_eq!(stats.follow_points, 1);
}

#[test]
fn slider_ticks_disappear_once_passed() {
    let bm = beatmap(vec![slider(0, 1000.0, vec![Point::new(300.0, 100.0)], 1)]);
    let renderer = PlayfieldRenderer::default();
    let before = renderer.render(&mut surface(), &bm, 900.0, &ViewToggles::default());
    assert_eq!(before.ticks, 1);
    let after = renderer.render(&mut surface(), &bm, 1600.0, &ViewToggles::default());
    assert_eq!(after.ticks, 0);
    assert_eq!(after.objects_drawn, 1);
}

#[test]
fn degenerate_slider_renders_marker() {
    let bm = beatmap(vec![slider(0, 1000.0, vec![Point::new(100.0, 100.0)], 1)]);
    let stats =
        PlayfieldRenderer::default().render(&mut surface(), &bm, 900.0, &ViewToggles::default());
    assert_eq!(stats.markers, 1);
}

#[test]
fn slider_without_curve_renders_marker() {
    let mut s = slider(0, 1000.0, vec![Point::new(300.0, 100.0)], 1);
    s.curve = None;
    let bm = beatmap(vec![s]);
    let stats =
        PlayfieldRenderer::default().render(&mut surface(), &bm, 900.0, &ViewToggles::default());
    assert_eq!(stats.markers, 1);
    assert_eq!(stats.objects_drawn, 0);
}

#[test]
fn long_spinner_stays_visible() {
    let bm = beatmap(vec![HitObject::spinner(0, 1000.0, 9000.0)]);
    let stats =
        PlayfieldRenderer::default().render(&mut surface(), &bm, 8000.0, &ViewToggles::default());
    assert_eq!(stats.objects_drawn, 1);
}

#[test]
fn grid_toggle_does_not_affect_objects() {
    let bm = beatmap(vec![HitObject::circle(0, 1000.0, Point::new(256.0, 192.0))]);
    let toggles = ViewToggles {
        show_grid: true,
        ..ViewToggles::default()
    };
    let stats = PlayfieldRenderer::default().render(&mut surface(), &bm, 1000.0, &toggles);
    assert_eq!(stats.objects_drawn, 1);
    assert_eq!(stats.skipped, 0);
}

#[test]
fn long_slider_stays_visible_past_a_later_circle() {
    let objects = vec![
        HitObject::slider(
            0,
            0.0,
            5000.0,
            Point::new(100.0, 100.0),
            CurveDescriptor {
                kind: CurveKind::Linear,
                control_points: vec![Point::new(300.0, 100.0)],
            },
            1,
            200.0,
        ),
        HitObject::circle(1, 1000.0, Point::new(400.0, 300.0)),
    ];
    let bm = beatmap(objects);
    let stats =
        PlayfieldRenderer::default().render(&mut surface(), &bm, 3000.0, &ViewToggles::default());
    assert_eq!(stats.objects_drawn, 1);
    assert_eq!(stats.skipped, 0);
}

#[test]
fn zero_slide_slider_renders_marker() {
    let bm = beatmap(vec![
        HitObject::circle(0, 500.0, Point::new(50.0, 50.0)),
        slider(1, 1000.0, vec![Point::new(300.0, 100.0)], 0),
    ]);
    let stats =
        PlayfieldRenderer::default().render(&mut surface(), &bm, 900.0, &ViewToggles::default());
    assert_eq!(stats.markers, 1);
    assert_eq!(bm.markers(), 1);
}

#[test]
fn spinners_paint_under_sliders_under_circles() {
    let control = vec![Point::new(300.0, 100.0)];
    let bm = beatmap(vec![
        HitObject::spinner(0, 900.0, 2000.0),
        HitObject::circle(1, 1000.0, Point::new(50.0, 50.0)).with_new_combo(true),
        slider(2, 1100.0, control.clone(), 1),
        HitObject::circle(3, 1200.0, Point::new(200.0, 50.0)),
        slider(4, 1300.0, control, 1),
    ]);
    let mut frame = FrameWork::new(&bm, 950.0);
    let order = frame.paint_order(0..5);
    assert_eq!(order.spinners, vec![0]);
    assert_eq!(order.sliders, vec![4, 2]);
    assert_eq!(order.circles, vec![3, 1]);
    assert_eq!(order.sequence().collect::<Vec<_>>(), vec![0, 4, 2, 3, 1]);
}

#[test]
fn spinner_ring_shrinks_with_square_root_of_time_left() {
    assert_eq!(spinner_radius(1.0), SPINNER_MAX_RADIUS);
    assert!((spinner_radius(0.25) - SPINNER_MAX_RADIUS / 2.0).abs() < 1e-9);
    assert_eq!(spinner_radius(0.0), 0.0);
    assert_eq!(spinner_radius(-0.5), 0.0);

    // Same values through the progress of a 1000 ms spinner.
    let remaining = |t: f64| 1.0 - progress(t, 0.0, 1000.0);
    assert_eq!(spinner_radius(remaining(0.0)), 176.0);
    assert!((spinner_radius(remaining(750.0)) - 88.0).abs() < 1e-9);
    assert_eq!(spinner_radius(remaining(1000.0)), 0.0);
}
