use std::io::Read;

use crate::foundation::core::{Point, Rgba8};
use crate::foundation::error::{PreviewError, PreviewResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Gameplay object kind.
pub enum HitObjectKind {
    /// Single tap target.
    Circle,
    /// Target traced along a curve, optionally back and forth.
    Slider,
    /// Timed object without a path.
    Spinner,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Slider curve family.
pub enum CurveKind {
    /// Polyline through the control points.
    Linear,
    /// Piecewise Bézier; coincident consecutive control points split segments.
    Bezier,
    /// Circular arc through the start point and two control points.
    Perfect,
    /// Legacy uniform Catmull-Rom spline.
    Catmull,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Curve kind plus the control points that follow the object's position.
pub struct CurveDescriptor {
    /// Curve family.
    pub kind: CurveKind,
    /// Control points after the head position, in osu!pixels.
    pub control_points: Vec<Point>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Producer-supplied slider path with its cumulative arc-length table.
pub struct PathSamples {
    /// Path samples in osu!pixels, head first.
    pub points: Vec<Point>,
    /// Cumulative distance at each sample; same length as `points`.
    pub cumulative: Vec<f64>,
}

fn default_slides() -> u32 {
    1
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One gameplay object as produced by the external beatmap parser.
pub struct HitObject {
    /// Position in the beatmap's object list.
    pub index: usize,
    /// Hit time in milliseconds.
    pub start_time: f64,
    /// End time for sliders and spinners.
    #[serde(default)]
    pub end_time: Option<f64>,
    /// Object kind.
    pub kind: HitObjectKind,
    /// Head position in osu!pixels.
    pub position: Point,
    /// Curve data; only meaningful for sliders.
    #[serde(default)]
    pub curve: Option<CurveDescriptor>,
    /// Number of spans ("slides"); 1 means no repeat.
    #[serde(default = "default_slides")]
    pub slides: u32,
    /// Declared slider length in osu!pixels.
    #[serde(default)]
    pub length: f64,
    /// Optional precomputed path.
    #[serde(default)]
    pub path: Option<PathSamples>,
    /// Known slider tick times (absolute milliseconds).
    #[serde(default)]
    pub ticks: Vec<f64>,
    /// Whether this object starts a new combo.
    #[serde(default)]
    pub new_combo: bool,
    /// Extra combo colour increments applied when this object starts a combo.
    #[serde(default)]
    pub combo_skip: u32,
}

impl HitObject {
    /// A circle at `position` hit at `time`.
    pub fn circle(index: usize, time: f64, position: Point) -> Self {
        Self {
            index,
            start_time: time,
            end_time: None,
            kind: HitObjectKind::Circle,
            position,
            curve: None,
            slides: 1,
            length: 0.0,
            path: None,
            ticks: Vec::new(),
            new_combo: false,
            combo_skip: 0,
        }
    }

    /// A slider with explicit timing and curve.
    pub fn slider(
        index: usize,
        time: f64,
        end_time: f64,
        position: Point,
        curve: CurveDescriptor,
        slides: u32,
        length: f64,
    ) -> Self {
        Self {
            end_time: Some(end_time),
            kind: HitObjectKind::Slider,
            curve: Some(curve),
            slides,
            length,
            ..Self::circle(index, time, position)
        }
    }

    /// A spinner spanning `[time, end_time]`.
    pub fn spinner(index: usize, time: f64, end_time: f64) -> Self {
        Self {
            end_time: Some(end_time),
            kind: HitObjectKind::Spinner,
            ..Self::circle(index, time, Point::new(256.0, 192.0))
        }
    }

    /// Builder-style new-combo flag.
    pub fn with_new_combo(mut self, new_combo: bool) -> Self {
        self.new_combo = new_combo;
        self
    }

    /// End time, or start time for objects without duration.
    pub fn end_or_start(&self) -> f64 {
        self.end_time.unwrap_or(self.start_time)
    }

    /// Duration in milliseconds (never negative).
    pub fn duration(&self) -> f64 {
        (self.end_or_start() - self.start_time).max(0.0)
    }

    /// Span count clamped to at least 1.
    pub fn span_count(&self) -> u32 {
        self.slides.max(1)
    }

    /// True for sliders.
    pub fn is_slider(&self) -> bool {
        self.kind == HitObjectKind::Slider
    }

    /// True for spinners.
    pub fn is_spinner(&self) -> bool {
        self.kind == HitObjectKind::Spinner
    }
}

fn default_meter() -> u32 {
    4
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Timing section start. Legacy inherited points encode velocity as a negative beat length.
pub struct TimingPoint {
    /// Section start in milliseconds.
    pub time: f64,
    /// Milliseconds per beat; `<= 0` for legacy inherited points.
    pub beat_length: f64,
    /// Beats per measure.
    #[serde(default = "default_meter")]
    pub meter: u32,
    /// True for BPM-defining points.
    pub uninherited: bool,
    /// Kiai flag, carried as metadata only.
    #[serde(default)]
    pub kiai: bool,
}

impl TimingPoint {
    /// BPM-defining point.
    pub fn uninherited(time: f64, beat_length: f64) -> Self {
        Self {
            time,
            beat_length,
            meter: 4,
            uninherited: true,
            kiai: false,
        }
    }

    /// Legacy velocity point (`beat_length = -100 / velocity`).
    pub fn inherited(time: f64, beat_length: f64) -> Self {
        Self {
            uninherited: false,
            ..Self::uninherited(time, beat_length)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Slider velocity multiplier change.
pub struct DifficultyPoint {
    /// Start time in milliseconds.
    pub time: f64,
    /// Slider velocity multiplier.
    pub velocity: f64,
}

fn default_slider_multiplier() -> f64 {
    1.4
}

fn default_tick_rate() -> f64 {
    1.0
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Parsed beatmap, immutable after load.
pub struct BeatmapMetadata {
    /// Song title.
    #[serde(default)]
    pub title: String,
    /// Song artist.
    #[serde(default)]
    pub artist: String,
    /// Difficulty name.
    #[serde(default)]
    pub version: String,
    /// Objects, ascending by start time.
    pub hit_objects: Vec<HitObject>,
    /// Timing points, ascending by time.
    pub timing_points: Vec<TimingPoint>,
    /// Difficulty points, ascending by time.
    #[serde(default)]
    pub difficulty_points: Vec<DifficultyPoint>,
    /// Approach rate in `[0, 10]`.
    pub approach_rate: f64,
    /// Circle size in `[0, 10]`.
    pub circle_size: f64,
    /// Base slider velocity in hundreds of osu!pixels per beat.
    #[serde(default = "default_slider_multiplier")]
    pub slider_multiplier: f64,
    /// Slider ticks per beat.
    #[serde(default = "default_tick_rate")]
    pub slider_tick_rate: f64,
    /// Combo colour palette; empty means the default palette.
    #[serde(default)]
    pub combo_colours: Vec<Rgba8>,
    /// Audio length hint in milliseconds.
    #[serde(default)]
    pub audio_duration_ms: Option<f64>,
}

impl BeatmapMetadata {
    /// Parse and validate beatmap JSON.
    pub fn from_json_str(s: &str) -> PreviewResult<Self> {
        let meta: Self = serde_json::from_str(s)?;
        meta.validate()?;
        Ok(meta)
    }

    /// Parse and validate beatmap JSON from a reader.
    pub fn from_json_reader(r: impl Read) -> PreviewResult<Self> {
        let meta: Self = serde_json::from_reader(r)?;
        meta.validate()?;
        Ok(meta)
    }

    /// Check map-wide ordering and numeric invariants the renderers rely on.
    ///
    /// Per-object oddities (zero slides, negative lengths, end before start) are not errors
    /// here; preparation repairs them and draws the slider as a marker.
    pub fn validate(&self) -> PreviewResult<()> {
        if !(0.0..=10.0).contains(&self.approach_rate) {
            return Err(PreviewError::validation("approach_rate must be in [0, 10]"));
        }
        if !(0.0..=10.0).contains(&self.circle_size) {
            return Err(PreviewError::validation("circle_size must be in [0, 10]"));
        }
        if !self.slider_multiplier.is_finite() || self.slider_multiplier <= 0.0 {
            return Err(PreviewError::validation(
                "slider_multiplier must be finite and > 0",
            ));
        }
        if !self.slider_tick_rate.is_finite() || self.slider_tick_rate <= 0.0 {
            return Err(PreviewError::validation(
                "slider_tick_rate must be finite and > 0",
            ));
        }

        ensure_ascending(
            self.hit_objects.iter().map(|o| o.start_time),
            "hit_objects",
        )?;
        ensure_ascending(self.timing_points.iter().map(|p| p.time), "timing_points")?;
        ensure_ascending(
            self.difficulty_points.iter().map(|p| p.time),
            "difficulty_points",
        )?;

        for (i, obj) in self.hit_objects.iter().enumerate() {
            if obj.end_time.is_some_and(|end| !end.is_finite()) {
                return Err(PreviewError::validation(format!(
                    "hit_objects[{i}].end_time must be finite"
                )));
            }
        }
        for p in &self.difficulty_points {
            if !p.velocity.is_finite() || p.velocity <= 0.0 {
                return Err(PreviewError::validation(
                    "difficulty point velocity must be finite and > 0",
                ));
            }
        }
        Ok(())
    }

    /// Last moment anything is on screen, used when no audio duration is known.
    pub fn content_end_ms(&self) -> f64 {
        let objects = self
            .hit_objects
            .iter()
            .map(HitObject::end_or_start)
            .fold(0.0, f64::max);
        self.audio_duration_ms.unwrap_or(objects).max(objects)
    }
}

fn ensure_ascending(times: impl Iterator<Item = f64>, what: &str) -> PreviewResult<()> {
    let mut prev = f64::NEG_INFINITY;
    for (i, t) in times.enumerate() {
        if !t.is_finite() {
            return Err(PreviewError::validation(format!(
                "{what}[{i}] time must be finite"
            )));
        }
        if t < prev {
            return Err(PreviewError::validation(format!(
                "{what} must be ascending by time (index {i})"
            )));
        }
        prev = t;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/beatmap/model.rs"]
mod tests;
