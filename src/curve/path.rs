use crate::beatmap::model::{CurveKind, HitObject, PathSamples};
use crate::curve::shapes::{self, CircularArc};
use crate::foundation::core::{BezPath, Point, Vec2};
use crate::foundation::error::{PreviewError, PreviewResult};
use crate::foundation::math::{EPSILON, is_finite_point, lerp_point, progress};

/// Default Bézier samples per piece.
pub const DEFAULT_BEZIER_RESOLUTION: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq)]
/// Where the slider ball is at a given time.
pub struct FollowSample {
    /// Ball position in osu!pixels.
    pub position: Point,
    /// Zero-based span being traversed.
    pub span: u32,
    /// Progress within the span in `[0, 1]`, in travel direction.
    pub span_progress: f64,
}

impl FollowSample {
    /// True while the ball travels head to tail.
    pub fn forward(&self) -> bool {
        self.span % 2 == 0
    }
}

/// Arc-length parameterised slider path in playfield coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct SliderPath {
    points: Vec<Point>,
    cumulative: Vec<f64>,
}

impl SliderPath {
    /// Path for a slider object.
    ///
    /// Producer-supplied samples win when they are well formed; otherwise the path is built
    /// from the curve descriptor and fitted to the declared length.
    pub fn from_object(obj: &HitObject, bezier_resolution: usize) -> PreviewResult<Self> {
        if !obj.is_slider() {
            return Err(PreviewError::curve(format!(
                "object {} is not a slider",
                obj.index
            )));
        }
        if let Some(samples) = &obj.path {
            match Self::from_samples(samples) {
                Ok(path) => return Ok(path),
                Err(e) => tracing::debug!(object = obj.index, error = %e, "ignoring path samples"),
            }
        }

        let curve = obj
            .curve
            .as_ref()
            .ok_or_else(|| PreviewError::curve(format!("slider {} has no curve", obj.index)))?;

        let mut control = Vec::with_capacity(curve.control_points.len() + 1);
        control.push(obj.position);
        control.extend_from_slice(&curve.control_points);
        if !control.iter().all(|&p| is_finite_point(p)) {
            return Err(PreviewError::curve(format!(
                "slider {} has a non-finite control point",
                obj.index
            )));
        }

        let raw = match curve.kind {
            CurveKind::Linear => shapes::linear(&control),
            CurveKind::Bezier => shapes::bezier(&control, bezier_resolution),
            CurveKind::Perfect => match control.as_slice() {
                &[a, b, c] => match CircularArc::through(a, b, c) {
                    Some(arc) => arc.sample(bezier_resolution),
                    None => shapes::bezier(&control, bezier_resolution),
                },
                _ => shapes::bezier(&control, bezier_resolution),
            },
            CurveKind::Catmull => shapes::catmull(&control, bezier_resolution),
        };

        let (points, cumulative) = if obj.length > EPSILON {
            shapes::fit_to_length(raw, obj.length)
        } else {
            let cumulative = shapes::cumulative_lengths(&raw);
            (raw, cumulative)
        };

        Self::from_parts(points, cumulative)
    }

    /// Path from producer-supplied samples.
    pub fn from_samples(samples: &PathSamples) -> PreviewResult<Self> {
        if samples.points.len() != samples.cumulative.len() {
            return Err(PreviewError::curve(format!(
                "path has {} points but {} cumulative lengths",
                samples.points.len(),
                samples.cumulative.len()
            )));
        }
        if samples.cumulative.iter().any(|c| !c.is_finite())
            || samples.cumulative.windows(2).any(|w| w[1] < w[0])
        {
            return Err(PreviewError::curve(
                "cumulative lengths must be finite and non-decreasing",
            ));
        }
        if !samples.points.iter().all(|&p| is_finite_point(p)) {
            return Err(PreviewError::curve("path has a non-finite point"));
        }
        Self::from_parts(samples.points.clone(), samples.cumulative.clone())
    }

    fn from_parts(points: Vec<Point>, cumulative: Vec<f64>) -> PreviewResult<Self> {
        if points.is_empty() {
            return Err(PreviewError::curve("path has no points"));
        }
        Ok(Self { points, cumulative })
    }

    /// Sample points, head first.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Cumulative distance at each sample.
    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Total arc length.
    pub fn length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// True when the path collapsed to (nearly) a single point.
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 2 || self.length() <= EPSILON
    }

    /// Head position.
    pub fn start_point(&self) -> Point {
        self.points[0]
    }

    /// Tail position.
    pub fn end_point(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    /// Point at arc distance `d`, clamped to `[0, length]`.
    pub fn point_at_distance(&self, d: f64) -> Point {
        if self.points.len() < 2 || !d.is_finite() {
            return self.start_point();
        }
        let d = d.clamp(0.0, self.length());
        let last = self.points.len() - 1;
        let i = self.cumulative.partition_point(|&c| c < d).clamp(1, last);
        let seg = self.cumulative[i] - self.cumulative[i - 1];
        if seg <= EPSILON {
            return self.points[i];
        }
        let t = ((d - self.cumulative[i - 1]) / seg).clamp(0.0, 1.0);
        lerp_point(self.points[i - 1], self.points[i], t)
    }

    /// Ball state at time `t` for a slider starting at `start` lasting `duration` over
    /// `slides` spans.
    pub fn follow(&self, start: f64, duration: f64, slides: u32, t: f64) -> FollowSample {
        let slides = slides.max(1);
        let total = f64::from(slides) * progress(t, start, duration);
        let floor = total.floor();
        let (span, span_progress) = if floor >= f64::from(slides) {
            (slides - 1, 1.0)
        } else {
            (floor as u32, total - floor)
        };
        let one_way = if span % 2 == 0 {
            span_progress
        } else {
            1.0 - span_progress
        };
        FollowSample {
            position: self.point_at_distance(one_way * self.length()),
            span,
            span_progress,
        }
    }

    /// Ball position at time `t`; see [`SliderPath::follow`].
    pub fn follow_position(&self, start: f64, duration: f64, slides: u32, t: f64) -> Point {
        self.follow(start, duration, slides, t).position
    }

    /// Unit direction leaving the head into the body.
    pub fn head_direction(&self) -> Vec2 {
        first_direction(self.points.iter().copied())
    }

    /// Unit direction leaving the tail back into the body.
    pub fn tail_direction(&self) -> Vec2 {
        first_direction(self.points.iter().rev().copied())
    }

    /// The sampled path as a polyline.
    pub fn bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut it = self.points.iter();
        if let Some(&first) = it.next() {
            path.move_to(first);
            for &p in it {
                path.line_to(p);
            }
        }
        path
    }
}

fn first_direction(mut points: impl Iterator<Item = Point>) -> Vec2 {
    let Some(origin) = points.next() else {
        return Vec2::ZERO;
    };
    points
        .map(|p| p - origin)
        .find(|d| d.hypot() > EPSILON)
        .map(|d| d / d.hypot())
        .unwrap_or(Vec2::ZERO)
}

#[cfg(test)]
#[path = "../../tests/unit/curve/path.rs"]
mod tests;
