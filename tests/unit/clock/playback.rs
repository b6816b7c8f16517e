use super::*;
use crate::clock::source::ManualSource;

fn manual(duration: f64) -> (ManualSource, Clock<ManualSource>) {
    let source = ManualSource::new();
    let clock = Clock::new(source.clone(), duration);
    (source, clock)
}

#[test]
fn paused_clock_does_not_advance() {
    let (src, clock) = manual(10_000.0);
    src.advance(500.0);
    assert_eq!(clock.current_ms(), 0.0);
}

#[test]
fn playing_clock_advances_at_rate() {
    let (src, mut clock) = manual(10_000.0);
    clock.play();
    src.advance(250.0);
    assert_eq!(clock.current_ms(), 250.0);
    clock.set_rate(2.0).unwrap();
    src.advance(100.0);
    assert_eq!(clock.current_ms(), 450.0);
}

#[test]
fn rate_change_does_not_jump() {
    let (src, mut clock) = manual(100_000.0);
    clock.play();
    src.advance(1234.0);
    clock.set_rate(1.5).unwrap();
    assert_eq!(clock.stored_ms(), 1234.0);
    assert_eq!(clock.current_ms(), 1234.0);

    clock.set_rate(0.75).unwrap();
    assert_eq!(clock.current_ms(), 1234.0);
}

#[test]
fn rate_change_flushes_at_old_rate() {
    let (src, mut clock) = manual(100_000.0);
    clock.set_rate(1.5).unwrap();
    clock.play();
    src.advance(400.0);
    clock.set_rate(0.5).unwrap();
    assert_eq!(clock.stored_ms(), 600.0);
}

#[test]
fn pause_and_resume_keep_elapsed_time() {
    let (src, mut clock) = manual(10_000.0);
    clock.play();
    src.advance(300.0);
    clock.pause();
    src.advance(1000.0);
    assert_eq!(clock.current_ms(), 300.0);
    clock.play();
    src.advance(200.0);
    assert_eq!(clock.current_ms(), 500.0);
}

#[test]
fn seek_is_clamped() {
    let (_src, mut clock) = manual(1000.0);
    clock.seek(5000.0);
    assert_eq!(clock.current_ms(), 1000.0);
    clock.seek(-20.0);
    assert_eq!(clock.current_ms(), 0.0);
    clock.seek(f64::NAN);
    assert_eq!(clock.current_ms(), 0.0);
}

#[test]
fn reaching_end_pauses() {
    let (src, mut clock) = manual(1000.0);
    clock.play();
    src.advance(1500.0);
    assert_eq!(clock.sample(), 1000.0);
    assert!(!clock.is_playing());
    src.advance(100.0);
    assert_eq!(clock.sample(), 1000.0);

    clock.play();
    assert_eq!(clock.current_ms(), 0.0);
}

#[test]
fn invalid_rates_are_rejected() {
    let (_src, mut clock) = manual(1000.0);
    for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let err = clock.set_rate(bad).unwrap_err();
        assert!(err.to_string().starts_with("validation error:"));
    }
    assert_eq!(clock.rate(), 1.0);
}

#[test]
fn shrinking_duration_reclamps() {
    let (_src, mut clock) = manual(5000.0);
    clock.seek(4000.0);
    clock.set_duration(3000.0);
    assert_eq!(clock.current_ms(), 3000.0);
}

#[test]
fn manual_source_never_goes_backwards() {
    let src = ManualSource::new();
    src.set(100.0);
    src.set(50.0);
    src.advance(-10.0);
    assert_eq!(src.now_ms(), 100.0);
}
