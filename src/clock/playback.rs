use crate::clock::source::{MonotonicSource, TimeSource};
use crate::foundation::error::{PreviewError, PreviewResult};

/// Playback position tracker independent of the audio transport.
///
/// While playing, `current = stored + (now - anchor) * rate`. Every state change flushes the
/// elapsed time into `stored` first, so pausing, seeking and rate changes never jump.
#[derive(Clone, Debug)]
pub struct Clock<S: TimeSource = MonotonicSource> {
    source: S,
    stored_ms: f64,
    anchor_wall_ms: f64,
    rate: f64,
    playing: bool,
    duration_ms: f64,
}

impl Clock<MonotonicSource> {
    /// A paused clock at 0 driven by real time.
    pub fn monotonic(duration_ms: f64) -> Self {
        Self::new(MonotonicSource::new(), duration_ms)
    }
}

impl<S: TimeSource> Clock<S> {
    /// A paused clock at 0.
    pub fn new(source: S, duration_ms: f64) -> Self {
        let anchor_wall_ms = source.now_ms();
        Self {
            source,
            stored_ms: 0.0,
            anchor_wall_ms,
            rate: 1.0,
            playing: false,
            duration_ms: sanitize_duration(duration_ms),
        }
    }

    /// The wall time provider.
    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Position flushed at the last state change.
    pub fn stored_ms(&self) -> f64 {
        self.stored_ms
    }

    /// Current wall time of the source.
    pub fn wall_now_ms(&self) -> f64 {
        self.source.now_ms()
    }

    /// Position now, clamped to `[0, duration]`. Does not change state.
    pub fn current_ms(&self) -> f64 {
        let raw = if self.playing {
            self.stored_ms + (self.source.now_ms() - self.anchor_wall_ms) * self.rate
        } else {
            self.stored_ms
        };
        raw.clamp(0.0, self.duration_ms)
    }

    /// Frame snapshot: the current position, pausing the clock once it reaches the end.
    pub fn sample(&mut self) -> f64 {
        let now = self.current_ms();
        if self.playing && now >= self.duration_ms {
            self.stored_ms = self.duration_ms;
            self.anchor_wall_ms = self.source.now_ms();
            self.playing = false;
            tracing::debug!(position_ms = now, "clock reached end");
        }
        now
    }

    /// Start advancing. Playing from the end restarts at 0.
    pub fn play(&mut self) {
        if self.playing {
            return;
        }
        if self.stored_ms >= self.duration_ms {
            self.stored_ms = 0.0;
        }
        self.anchor_wall_ms = self.source.now_ms();
        self.playing = true;
    }

    /// Stop advancing, keeping the elapsed time.
    pub fn pause(&mut self) {
        if !self.playing {
            return;
        }
        self.flush();
        self.playing = false;
    }

    /// Jump to `ms`, clamped to `[0, duration]`.
    pub fn seek(&mut self, ms: f64) {
        let ms = if ms.is_finite() { ms } else { 0.0 };
        self.stored_ms = ms.clamp(0.0, self.duration_ms);
        self.anchor_wall_ms = self.source.now_ms();
    }

    /// Adopt a new playback rate; time elapsed so far is accounted at the old rate.
    pub fn set_rate(&mut self, rate: f64) -> PreviewResult<()> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(PreviewError::validation(format!(
                "playback rate must be finite and > 0, got {rate}"
            )));
        }
        if self.playing {
            self.flush();
        }
        self.rate = rate;
        Ok(())
    }

    /// Replace the duration (e.g. once the transport knows it) and re-clamp.
    pub fn set_duration(&mut self, duration_ms: f64) {
        if self.playing {
            self.flush();
        }
        self.duration_ms = sanitize_duration(duration_ms);
        self.stored_ms = self.stored_ms.clamp(0.0, self.duration_ms);
    }

    fn flush(&mut self) {
        self.stored_ms = self.current_ms();
        self.anchor_wall_ms = self.source.now_ms();
    }
}

fn sanitize_duration(ms: f64) -> f64 {
    if ms.is_finite() { ms.max(0.0) } else { 0.0 }
}

#[cfg(test)]
#[path = "../../tests/unit/clock/playback.rs"]
mod tests;
