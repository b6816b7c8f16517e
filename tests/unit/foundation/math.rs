use super::*;

#[test]
fn progress_guards_zero_length() {
    assert_eq!(progress(5.0, 5.0, 0.0), 1.0);
    assert_eq!(progress(4.0, 5.0, 0.0), 0.0);
    assert_eq!(progress(7.5, 5.0, 5.0), 0.5);
    assert_eq!(progress(f64::NAN, 0.0, 1.0), 0.0);
}

#[test]
fn gcd_matches_snap_expectations() {
    assert_eq!(gcd(0, 4), 4);
    assert_eq!(gcd(2, 4), 2);
    assert_eq!(gcd(3, 12), 3);
    assert_eq!(gcd(5, 0), 5);
}

#[test]
fn lerp_point_endpoints() {
    let a = Point::new(1.0, 2.0);
    let b = Point::new(3.0, -2.0);
    assert_eq!(lerp_point(a, b, 0.0), a);
    assert_eq!(lerp_point(a, b, 1.0), b);
    assert_eq!(lerp_point(a, b, 0.5), Point::new(2.0, 0.0));
}
