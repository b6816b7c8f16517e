use super::*;
use crate::beatmap::model::CurveDescriptor;

fn slider(kind: CurveKind, control: &[Point], slides: u32, length: f64) -> HitObject {
    HitObject::slider(
        0,
        1000.0,
        2000.0,
        Point::ZERO,
        CurveDescriptor {
            kind,
            control_points: control.to_vec(),
        },
        slides,
        length,
    )
}

fn approx(a: Point, b: Point) -> bool {
    (a - b).hypot() < 1e-6
}

#[test]
fn linear_round_trip() {
    let obj = slider(CurveKind::Linear, &[Point::new(100.0, 0.0)], 1, 100.0);
    let path = SliderPath::from_object(&obj, DEFAULT_BEZIER_RESOLUTION).unwrap();
    assert_eq!(path.point_at_distance(0.0), Point::ZERO);
    assert!(approx(path.point_at_distance(100.0), Point::new(100.0, 0.0)));
    assert!(approx(path.point_at_distance(50.0), Point::new(50.0, 0.0)));
}

#[test]
fn linear_ray_is_extended_and_truncated() {
    let obj = slider(CurveKind::Linear, &[Point::new(30.0, 40.0)], 1, 100.0);
    let path = SliderPath::from_object(&obj, DEFAULT_BEZIER_RESOLUTION).unwrap();
    assert!(approx(path.end_point(), Point::new(60.0, 80.0)));
    assert_eq!(path.length(), 100.0);

    let obj = slider(CurveKind::Linear, &[Point::new(300.0, 400.0)], 1, 100.0);
    let path = SliderPath::from_object(&obj, DEFAULT_BEZIER_RESOLUTION).unwrap();
    assert!(approx(path.end_point(), Point::new(60.0, 80.0)));
}

#[test]
fn two_slides_return_to_start() {
    let obj = slider(CurveKind::Linear, &[Point::new(100.0, 0.0)], 2, 100.0);
    let path = SliderPath::from_object(&obj, DEFAULT_BEZIER_RESOLUTION).unwrap();
    let start = path.follow_position(1000.0, 1000.0, 2, 1000.0);
    let end = path.follow_position(1000.0, 1000.0, 2, 2000.0);
    assert!(approx(start, end));
    assert!(approx(
        path.follow_position(1000.0, 1000.0, 2, 1500.0),
        Point::new(100.0, 0.0)
    ));

    let last = path.follow(1000.0, 1000.0, 2, 2000.0);
    assert_eq!(last.span, 1);
    assert_eq!(last.span_progress, 1.0);
    assert!(!last.forward());
}

#[test]
fn single_slide_ends_at_tail() {
    let obj = slider(CurveKind::Linear, &[Point::new(100.0, 0.0)], 1, 100.0);
    let path = SliderPath::from_object(&obj, DEFAULT_BEZIER_RESOLUTION).unwrap();
    assert!(approx(
        path.follow_position(1000.0, 1000.0, 1, 5000.0),
        Point::new(100.0, 0.0)
    ));
    assert_eq!(path.follow_position(1000.0, 1000.0, 1, 0.0), Point::ZERO);
}

#[test]
fn cumulative_is_monotone_and_matches_declared_length() {
    for kind in [
        CurveKind::Linear,
        CurveKind::Bezier,
        CurveKind::Perfect,
        CurveKind::Catmull,
    ] {
        let obj = slider(
            kind,
            &[Point::new(50.0, 50.0), Point::new(100.0, 0.0)],
            1,
            120.0,
        );
        let path = SliderPath::from_object(&obj, DEFAULT_BEZIER_RESOLUTION).unwrap();
        assert!(path.cumulative().windows(2).all(|w| w[0] <= w[1]), "{kind:?}");
        assert!((path.length() - 120.0).abs() < 1e-9, "{kind:?}");
    }
}

#[test]
fn perfect_curve_lies_on_circle() {
    let obj = slider(
        CurveKind::Perfect,
        &[Point::new(50.0, 50.0), Point::new(100.0, 0.0)],
        1,
        100.0,
    );
    let path = SliderPath::from_object(&obj, DEFAULT_BEZIER_RESOLUTION).unwrap();
    // Samples sit on the circle; the truncated tail sits on a chord.
    for &p in path.points() {
        assert!(((p - Point::new(50.0, 0.0)).hypot() - 50.0).abs() < 0.05);
    }
}

#[test]
fn collinear_perfect_falls_back_to_bezier() {
    let obj = slider(
        CurveKind::Perfect,
        &[Point::new(50.0, 0.0), Point::new(100.0, 0.0)],
        1,
        100.0,
    );
    let path = SliderPath::from_object(&obj, DEFAULT_BEZIER_RESOLUTION).unwrap();
    assert!(approx(path.end_point(), Point::new(100.0, 0.0)));
    assert!(approx(path.point_at_distance(25.0), Point::new(25.0, 0.0)));
}

#[test]
fn degenerate_slider_still_has_a_point() {
    let obj = slider(CurveKind::Bezier, &[Point::ZERO], 1, 100.0);
    let path = SliderPath::from_object(&obj, DEFAULT_BEZIER_RESOLUTION).unwrap();
    assert!(path.is_degenerate());
    assert_eq!(path.point_at_distance(50.0), Point::ZERO);
    assert_eq!(path.head_direction(), Vec2::ZERO);
    assert_eq!(path.follow_position(1000.0, 0.0, 1, 1500.0), Point::ZERO);
}

#[test]
fn non_finite_control_points_are_rejected() {
    let obj = slider(CurveKind::Linear, &[Point::new(f64::NAN, 0.0)], 1, 100.0);
    let err = SliderPath::from_object(&obj, DEFAULT_BEZIER_RESOLUTION).unwrap_err();
    assert!(err.to_string().starts_with("curve error:"));
}

#[test]
fn non_sliders_are_rejected() {
    let obj = HitObject::circle(3, 0.0, Point::ZERO);
    assert!(SliderPath::from_object(&obj, DEFAULT_BEZIER_RESOLUTION).is_err());
}

#[test]
fn supplied_samples_take_precedence() {
    let mut obj = slider(CurveKind::Linear, &[Point::new(100.0, 0.0)], 1, 100.0);
    obj.path = Some(PathSamples {
        points: vec![Point::ZERO, Point::new(0.0, 100.0)],
        cumulative: vec![0.0, 100.0],
    });
    let path = SliderPath::from_object(&obj, DEFAULT_BEZIER_RESOLUTION).unwrap();
    assert!(approx(path.point_at_distance(40.0), Point::new(0.0, 40.0)));
}

#[test]
fn malformed_samples_fall_back_to_curve() {
    let mut obj = slider(CurveKind::Linear, &[Point::new(100.0, 0.0)], 1, 100.0);
    obj.path = Some(PathSamples {
        points: vec![Point::ZERO, Point::new(0.0, 100.0)],
        cumulative: vec![0.0],
    });
    let path = SliderPath::from_object(&obj, DEFAULT_BEZIER_RESOLUTION).unwrap();
    assert!(approx(path.end_point(), Point::new(100.0, 0.0)));
}

#[test]
fn directions_point_into_the_body() {
    let obj = slider(CurveKind::Linear, &[Point::new(100.0, 0.0)], 1, 100.0);
    let path = SliderPath::from_object(&obj, DEFAULT_BEZIER_RESOLUTION).unwrap();
    assert_eq!(path.head_direction(), Vec2::new(1.0, 0.0));
    assert_eq!(path.tail_direction(), Vec2::new(-1.0, 0.0));
    assert_eq!(path.bez_path().elements().len(), path.points().len());
}
