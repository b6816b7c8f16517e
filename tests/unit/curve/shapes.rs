use super::*;

fn approx(a: Point, b: Point) -> bool {
    (a - b).hypot() < 1e-6
}

#[test]
fn arc_through_three_points() {
    let arc = CircularArc::through(
        Point::new(0.0, 0.0),
        Point::new(50.0, 50.0),
        Point::new(100.0, 0.0),
    )
    .unwrap();
    assert!(approx(arc.center, Point::new(50.0, 0.0)));
    assert!((arc.radius - 50.0).abs() < 1e-9);
    assert!(approx(arc.point_at(0.0), Point::new(0.0, 0.0)));
    assert!(approx(arc.point_at(0.5), Point::new(50.0, 50.0)));
    assert!(approx(arc.point_at(1.0), Point::new(100.0, 0.0)));
    assert!((arc.length() - 50.0 * std::f64::consts::PI).abs() < 1e-9);
}

#[test]
fn arc_direction_follows_middle_point() {
    let arc = CircularArc::through(
        Point::new(0.0, 0.0),
        Point::new(50.0, -50.0),
        Point::new(100.0, 0.0),
    )
    .unwrap();
    assert!(arc.sweep > 0.0);
    assert!(approx(arc.point_at(0.5), Point::new(50.0, -50.0)));
}

#[test]
fn collinear_points_have_no_arc() {
    assert!(
        CircularArc::through(
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            Point::new(100.0, 0.0)
        )
        .is_none()
    );
    assert!(CircularArc::through(Point::ZERO, Point::ZERO, Point::ZERO).is_none());
}

#[test]
fn bezier_splits_on_repeated_points() {
    let pts = [
        Point::new(0.0, 0.0),
        Point::new(100.0, 0.0),
        Point::new(100.0, 0.0),
        Point::new(100.0, 100.0),
    ];
    let pieces = bezier_pieces(&pts);
    assert_eq!(pieces.len(), 2);
    assert_eq!(pieces[0].len(), 2);
    assert_eq!(pieces[1].len(), 2);

    let samples = bezier(&pts, 10);
    assert_eq!(samples.len(), 21);
    assert!(approx(samples[10], Point::new(100.0, 0.0)));
    assert!(approx(*samples.last().unwrap(), Point::new(100.0, 100.0)));
}

#[test]
fn de_casteljau_quadratic_midpoint() {
    let p = de_casteljau(
        &[
            Point::new(0.0, 0.0),
            Point::new(50.0, 100.0),
            Point::new(100.0, 0.0),
        ],
        0.5,
    );
    assert!(approx(p, Point::new(50.0, 50.0)));
}

#[test]
fn catmull_passes_through_control_points() {
    let pts = [
        Point::new(0.0, 0.0),
        Point::new(50.0, 30.0),
        Point::new(100.0, 0.0),
    ];
    let samples = catmull(&pts, 8);
    assert_eq!(samples.len(), 17);
    assert!(approx(samples[0], pts[0]));
    assert!(approx(samples[8], pts[1]));
    assert!(approx(samples[16], pts[2]));
}

#[test]
fn fit_truncates_and_extends() {
    let pts = vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)];

    let (short, cum) = fit_to_length(pts.clone(), 40.0);
    assert!(approx(*short.last().unwrap(), Point::new(40.0, 0.0)));
    assert_eq!(*cum.last().unwrap(), 40.0);

    let (long, cum) = fit_to_length(pts, 150.0);
    assert!(approx(*long.last().unwrap(), Point::new(150.0, 0.0)));
    assert_eq!(*cum.last().unwrap(), 150.0);
    assert!(cum.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn fit_cannot_extend_a_single_point() {
    let (pts, cum) = fit_to_length(vec![Point::new(5.0, 5.0)], 100.0);
    assert_eq!(pts.len(), 1);
    assert_eq!(cum, vec![0.0]);
}

#[test]
fn linear_drops_consecutive_duplicates() {
    let pts = linear(&[
        Point::new(0.0, 0.0),
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
    ]);
    assert_eq!(pts.len(), 2);
}
