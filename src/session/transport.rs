use crate::clock::playback::Clock;
use crate::clock::source::{MonotonicSource, TimeSource};
use crate::foundation::error::{PreviewError, PreviewResult};

/// Audio playback controls the preview reads from and writes to.
///
/// The preview never trusts `position_ms` for drawing; it only compares it against its own
/// clock and writes back on seek or drift.
pub trait AudioTransport {
    fn position_ms(&self) -> f64;
    fn set_position_ms(&mut self, ms: f64) -> PreviewResult<()>;
    /// Track length, if known.
    fn duration_ms(&self) -> Option<f64>;
    fn rate(&self) -> f64;
    fn set_rate(&mut self, rate: f64) -> PreviewResult<()>;
    fn play(&mut self) -> PreviewResult<()>;
    fn pause(&mut self);
    fn is_playing(&self) -> bool;
    /// True once per time playback runs off the end of the track.
    fn take_ended(&mut self) -> bool;
}

/// Transport without audio output: a clock plus an ended flag.
#[derive(Clone, Debug)]
pub struct SilentTransport<S: TimeSource = MonotonicSource> {
    clock: Clock<S>,
    duration_ms: Option<f64>,
}

impl SilentTransport<MonotonicSource> {
    pub fn monotonic(duration_ms: Option<f64>) -> Self {
        Self::new(MonotonicSource::new(), duration_ms)
    }
}

impl<S: TimeSource> SilentTransport<S> {
    pub fn new(source: S, duration_ms: Option<f64>) -> Self {
        let duration_ms = duration_ms.filter(|d| d.is_finite() && *d > 0.0);
        Self {
            clock: Clock::new(source, duration_ms.unwrap_or(f64::MAX)),
            duration_ms,
        }
    }

    /// Shift the reported position by `ms` without touching the play state, as a real
    /// audio device drifting against the wall clock would.
    pub fn skew(&mut self, ms: f64) {
        let now = self.clock.current_ms();
        self.clock.seek(now + ms);
    }
}

impl<S: TimeSource> AudioTransport for SilentTransport<S> {
    fn position_ms(&self) -> f64 {
        self.clock.current_ms()
    }

    fn set_position_ms(&mut self, ms: f64) -> PreviewResult<()> {
        if !ms.is_finite() {
            return Err(PreviewError::transport(format!("cannot seek to {ms}")));
        }
        self.clock.seek(ms);
        Ok(())
    }

    fn duration_ms(&self) -> Option<f64> {
        self.duration_ms
    }

    fn rate(&self) -> f64 {
        self.clock.rate()
    }

    fn set_rate(&mut self, rate: f64) -> PreviewResult<()> {
        self.clock
            .set_rate(rate)
            .map_err(|e| PreviewError::transport(e.to_string()))
    }

    fn play(&mut self) -> PreviewResult<()> {
        self.clock.play();
        Ok(())
    }

    fn pause(&mut self) {
        self.clock.pause();
    }

    fn is_playing(&self) -> bool {
        self.clock.is_playing() && self.clock.current_ms() < self.clock.duration_ms()
    }

    fn take_ended(&mut self) -> bool {
        let was_playing = self.clock.is_playing();
        self.clock.sample();
        was_playing && !self.clock.is_playing()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/transport.rs"]
mod tests;
