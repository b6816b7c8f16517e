use super::*;
use crate::foundation::core::{Rect, Rgba8};

#[test]
fn clear_fills_every_pixel() {
    let mut s = Surface::new(SurfaceSize::new(8, 4).unwrap(), 1.0).unwrap();
    s.paint(|p| p.clear(Rgba8::rgb(10, 20, 30)));
    let frame = s.frame();
    assert_eq!(frame.data.len(), 8 * 4 * 4);
    assert!(
        frame
            .data
            .chunks_exact(4)
            .all(|px| px == [10, 20, 30, 255])
    );
}

#[test]
fn device_pixel_ratio_scales_drawing() {
    let mut s = Surface::new(SurfaceSize::new(20, 20).unwrap(), 2.0).unwrap();
    assert_eq!(s.css_size(), (10.0, 10.0));
    s.paint(|p| {
        p.clear(Rgba8::rgb(0, 0, 0));
        p.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Rgba8::rgb(255, 255, 255));
    });
    assert_eq!(s.pixel(8, 8), Some([255, 255, 255, 255]));
    assert_eq!(s.pixel(12, 12), Some([0, 0, 0, 255]));
    assert_eq!(s.pixel(20, 0), None);
}

#[test]
fn repaint_replaces_previous_frame() {
    let mut s = Surface::new(SurfaceSize::new(4, 4).unwrap(), 1.0).unwrap();
    s.paint(|p| p.clear(Rgba8::rgb(255, 0, 0)));
    s.paint(|p| p.clear(Rgba8::rgb(0, 0, 255)));
    assert_eq!(s.pixel(0, 0), Some([0, 0, 255, 255]));
}

#[test]
fn invalid_ratio_is_rejected() {
    let size = SurfaceSize::new(4, 4).unwrap();
    let err = Surface::new(size, 0.0).unwrap_err();
    assert!(err.to_string().starts_with("render error:"));
    let mut s = Surface::new(size, 1.0).unwrap();
    assert!(s.resize(size, f64::NAN).is_err());
    s.resize(SurfaceSize::new(6, 2).unwrap(), 1.0).unwrap();
    assert_eq!(s.frame().data.len(), 6 * 2 * 4);
}
