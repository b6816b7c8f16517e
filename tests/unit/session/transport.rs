use super::*;
use crate::clock::source::ManualSource;

#[test]
fn silent_transport_tracks_wall_time() {
    let src = ManualSource::new();
    let mut tr = SilentTransport::new(src.clone(), Some(2000.0));
    assert_eq!(tr.duration_ms(), Some(2000.0));
    tr.play().unwrap();
    src.advance(500.0);
    assert_eq!(tr.position_ms(), 500.0);
    assert!(tr.is_playing());
    tr.pause();
    src.advance(500.0);
    assert_eq!(tr.position_ms(), 500.0);
}

#[test]
fn ended_is_reported_once() {
    let src = ManualSource::new();
    let mut tr = SilentTransport::new(src.clone(), Some(1000.0));
    tr.play().unwrap();
    src.advance(400.0);
    assert!(!tr.take_ended());
    src.advance(700.0);
    assert!(tr.take_ended());
    assert!(!tr.take_ended());
    assert!(!tr.is_playing());
}

#[test]
fn unknown_duration_never_ends() {
    let src = ManualSource::new();
    let mut tr = SilentTransport::new(src.clone(), None);
    assert_eq!(tr.duration_ms(), None);
    tr.play().unwrap();
    src.advance(1e9);
    assert!(!tr.take_ended());
}

#[test]
fn bad_inputs_are_transport_errors() {
    let mut tr = SilentTransport::new(ManualSource::new(), Some(1000.0));
    let err = tr.set_position_ms(f64::NAN).unwrap_err();
    assert!(err.to_string().starts_with("transport error:"));
    let err = tr.set_rate(0.0).unwrap_err();
    assert!(err.to_string().starts_with("transport error:"));
}

#[test]
fn skew_moves_position_only() {
    let src = ManualSource::new();
    let mut tr = SilentTransport::new(src.clone(), Some(10_000.0));
    tr.play().unwrap();
    src.advance(100.0);
    tr.skew(250.0);
    assert_eq!(tr.position_ms(), 350.0);
    assert!(tr.is_playing());
}
