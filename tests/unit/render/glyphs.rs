use super::*;
use kurbo::PathEl;

fn segments(path: &BezPath) -> usize {
    path.elements()
        .iter()
        .filter(|el| matches!(el, PathEl::MoveTo(_)))
        .count()
}

#[test]
fn digit_segment_counts() {
    let expected = [6, 2, 5, 5, 4, 5, 6, 3, 7, 6];
    for (d, want) in expected.into_iter().enumerate() {
        let path = text_path(&d.to_string(), Point::ZERO, 10.0);
        assert_eq!(segments(&path), want, "digit {d}");
    }
}

#[test]
fn width_accounts_for_tracking() {
    assert_eq!(text_width("", 10.0), 0.0);
    assert!((text_width("1", 10.0) - 5.5).abs() < 1e-9);
    assert!((text_width("12", 10.0) - (5.5 + 1.8 + 5.5)).abs() < 1e-9);
    assert!(text_width("1.5x", 10.0) > text_width("15x", 10.0));
}

#[test]
fn centered_text_is_centered() {
    let path = centered_text_path("8", Point::new(100.0, 50.0), 20.0);
    let bbox = kurbo::Shape::bounding_box(&path);
    assert!((bbox.center().x - 100.0).abs() < 1e-9);
    assert!((bbox.center().y - 50.0).abs() < 1e-9);
}

#[test]
fn unknown_characters_draw_nothing() {
    assert_eq!(segments(&text_path("?", Point::ZERO, 10.0)), 0);
    assert_eq!(segments(&text_path("1.00x", Point::ZERO, 10.0)), 2 + 1 + 6 + 6 + 2);
}
