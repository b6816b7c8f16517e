use std::sync::atomic::{AtomicBool, Ordering};

use crate::beatmap::model::{BeatmapMetadata, DifficultyPoint, TimingPoint};

/// Velocity multiplier used when no point applies.
pub const DEFAULT_VELOCITY: f64 = 1.0;

/// BPM and slider-velocity lookup over the beatmap's control points.
///
/// Lookups use binary search over the ascending point lists and return exactly what a
/// linear "keep the last point with `time <= t`" scan would.
#[derive(Debug)]
pub struct TimingModel {
    points: Vec<TimingPoint>,
    uninherited: Vec<TimingPoint>,
    legacy_velocity: Vec<TimingPoint>,
    difficulty: Vec<DifficultyPoint>,
    gap_logged: AtomicBool,
}

impl Clone for TimingModel {
    fn clone(&self) -> Self {
        Self {
            points: self.points.clone(),
            uninherited: self.uninherited.clone(),
            legacy_velocity: self.legacy_velocity.clone(),
            difficulty: self.difficulty.clone(),
            gap_logged: AtomicBool::new(self.gap_logged.load(Ordering::Relaxed)),
        }
    }
}

impl TimingModel {
    /// Build from ascending point lists.
    pub fn new(points: &[TimingPoint], difficulty: &[DifficultyPoint]) -> Self {
        Self {
            points: points.to_vec(),
            uninherited: points.iter().copied().filter(|p| p.uninherited).collect(),
            legacy_velocity: points
                .iter()
                .copied()
                .filter(|p| !p.uninherited && p.beat_length < 0.0)
                .collect(),
            difficulty: difficulty.to_vec(),
            gap_logged: AtomicBool::new(false),
        }
    }

    /// Build from a beatmap's point lists.
    pub fn from_beatmap(meta: &BeatmapMetadata) -> Self {
        Self::new(&meta.timing_points, &meta.difficulty_points)
    }

    /// All timing points, ascending.
    pub fn timing_points(&self) -> &[TimingPoint] {
        &self.points
    }

    /// Uninherited timing points, ascending.
    pub fn uninherited_points(&self) -> &[TimingPoint] {
        &self.uninherited
    }

    /// Difficulty points, ascending.
    pub fn difficulty_points(&self) -> &[DifficultyPoint] {
        &self.difficulty
    }

    /// Legacy inherited points that encode a velocity, ascending.
    pub fn legacy_velocity_points(&self) -> &[TimingPoint] {
        &self.legacy_velocity
    }

    /// Governing uninherited point at `t`.
    pub fn uninherited_at(&self, t: f64) -> Option<&TimingPoint> {
        let idx = self.uninherited.partition_point(|p| p.time <= t);
        idx.checked_sub(1).map(|i| &self.uninherited[i])
    }

    /// BPM at `t`; 0 before the first uninherited point or for a non-positive beat length.
    pub fn bpm_at(&self, t: f64) -> f64 {
        match self.uninherited_at(t) {
            Some(p) if p.beat_length > 0.0 => 60_000.0 / p.beat_length,
            _ => {
                self.note_gap(t);
                0.0
            }
        }
    }

    /// Slider velocity multiplier at `t`.
    ///
    /// Difficulty points win when present; otherwise legacy inherited points map
    /// `beat_length < 0` to `clamp(-100 / beat_length, 0.1, 10)`.
    pub fn velocity_at(&self, t: f64) -> f64 {
        if !self.difficulty.is_empty() {
            let idx = self.difficulty.partition_point(|p| p.time <= t);
            return idx
                .checked_sub(1)
                .map_or(DEFAULT_VELOCITY, |i| self.difficulty[i].velocity);
        }
        let idx = self.legacy_velocity.partition_point(|p| p.time <= t);
        idx.checked_sub(1).map_or(DEFAULT_VELOCITY, |i| {
            legacy_velocity(self.legacy_velocity[i].beat_length)
        })
    }

    /// Beat length used to anchor a grid at `t`.
    ///
    /// Before the first uninherited point the first point's beat length is extended
    /// backwards. `None` when there is no positive beat length to use.
    pub fn beat_length_at(&self, t: f64) -> Option<f64> {
        let p = self.uninherited_at(t).or_else(|| self.uninherited.first())?;
        (p.beat_length > 0.0).then_some(p.beat_length)
    }

    /// Last timing point of any kind at `t`.
    pub fn timing_point_at(&self, t: f64) -> Option<&TimingPoint> {
        let idx = self.points.partition_point(|p| p.time <= t);
        idx.checked_sub(1).map(|i| &self.points[i])
    }

    /// Kiai flag of the governing timing point.
    pub fn kiai_at(&self, t: f64) -> bool {
        self.timing_point_at(t).is_some_and(|p| p.kiai)
    }

    /// Slider duration from its declared length, as the game computes it:
    /// `beat_length * length / (100 * slider_multiplier * velocity) * slides`.
    pub fn slider_duration_ms(
        &self,
        length: f64,
        slides: u32,
        t: f64,
        slider_multiplier: f64,
    ) -> Option<f64> {
        let beat_length = self.beat_length_at(t)?;
        let px_per_beat = 100.0 * slider_multiplier * self.velocity_at(t);
        if px_per_beat.is_nan() || px_per_beat <= 0.0 || !length.is_finite() {
            return None;
        }
        Some(beat_length * length / px_per_beat * f64::from(slides.max(1)))
    }

    fn note_gap(&self, t: f64) {
        if !self.gap_logged.swap(true, Ordering::Relaxed) {
            tracing::warn!(time_ms = t, "no timing point applies; using BPM 0");
        }
    }
}

pub(crate) fn legacy_velocity(beat_length: f64) -> f64 {
    if beat_length < 0.0 {
        (-100.0 / beat_length).clamp(0.1, 10.0)
    } else {
        DEFAULT_VELOCITY
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timing/model.rs"]
mod tests;
