/// Weight of the newest sample in the fps average.
const FPS_SMOOTHING: f64 = 0.1;

/// Frame timing exposed to the host for optional display.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct FrameTelemetry {
    /// Wall time the last frame took to paint.
    pub last_frame_ms: f64,
    /// Exponentially smoothed frame rate from frame start intervals.
    pub smoothed_fps: f64,
    pub frames: u64,
    #[serde(skip)]
    last_start_ms: Option<f64>,
}

impl FrameTelemetry {
    /// Record a frame that started and finished at the given wall times.
    pub fn record(&mut self, started_ms: f64, finished_ms: f64) {
        self.frames += 1;
        self.last_frame_ms = (finished_ms - started_ms).max(0.0);
        if let Some(prev) = self.last_start_ms {
            let interval = started_ms - prev;
            if interval > 0.0 {
                let fps = 1000.0 / interval;
                self.smoothed_fps = if self.smoothed_fps > 0.0 {
                    self.smoothed_fps + (fps - self.smoothed_fps) * FPS_SMOOTHING
                } else {
                    fps
                };
            }
        }
        self.last_start_ms = Some(started_ms);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/telemetry.rs"]
mod tests;
