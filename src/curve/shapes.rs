use std::f64::consts::TAU;

use crate::foundation::core::{Point, Vec2};
use crate::foundation::math::{EPSILON, lerp_point};

/// Upper bound on samples produced for a single curve piece.
const MAX_PIECE_SAMPLES: usize = 1024;
/// Target spacing in osu!pixels between arc samples.
const ARC_SAMPLE_SPACING: f64 = 4.0;

/// Polyline through every control point.
pub(crate) fn linear(points: &[Point]) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if out.last().is_none_or(|&last| last != p) {
            out.push(p);
        }
    }
    out
}

/// Piecewise Bézier. A control point repeated back to back closes one piece and opens the
/// next; each piece is sampled `resolution` times with De Casteljau.
pub(crate) fn bezier(points: &[Point], resolution: usize) -> Vec<Point> {
    let resolution = resolution.clamp(1, MAX_PIECE_SAMPLES);
    let mut out = Vec::new();
    for piece in bezier_pieces(points) {
        let start = if out.is_empty() { 0 } else { 1 };
        if piece.len() == 1 {
            if out.is_empty() {
                out.push(piece[0]);
            }
            continue;
        }
        for i in start..=resolution {
            let t = i as f64 / resolution as f64;
            out.push(de_casteljau(piece, t));
        }
    }
    out
}

pub(crate) fn bezier_pieces(points: &[Point]) -> Vec<&[Point]> {
    let mut pieces = Vec::new();
    let mut begin = 0;
    for i in 1..points.len() {
        if points[i] == points[i - 1] {
            if i - begin > 1 {
                pieces.push(&points[begin..i]);
            }
            begin = i;
        }
    }
    if begin < points.len() {
        pieces.push(&points[begin..]);
    }
    pieces
}

pub(crate) fn de_casteljau(points: &[Point], t: f64) -> Point {
    let mut scratch = points.to_vec();
    let mut n = scratch.len();
    while n > 1 {
        for i in 0..n - 1 {
            scratch[i] = lerp_point(scratch[i], scratch[i + 1], t);
        }
        n -= 1;
    }
    scratch.first().copied().unwrap_or(Point::ZERO)
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Circular arc from `a` through `b` to `c`.
pub struct CircularArc {
    /// Circle centre.
    pub center: Point,
    /// Circle radius.
    pub radius: f64,
    /// Angle of the start point.
    pub start_angle: f64,
    /// Signed sweep from start to end angle; positive turns towards +y from +x.
    pub sweep: f64,
}

impl CircularArc {
    /// The arc through three points, or `None` when they are collinear or coincident.
    pub fn through(a: Point, b: Point, c: Point) -> Option<Self> {
        let ab = b - a;
        let bc = c - b;
        let cross = ab.cross(bc);
        if cross.abs() <= EPSILON * (1.0 + ab.hypot2() + bc.hypot2()) {
            return None;
        }

        // Intersect the perpendicular bisectors of ab and bc.
        let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
        if d.abs() <= EPSILON {
            return None;
        }
        let a2 = a.to_vec2().hypot2();
        let b2 = b.to_vec2().hypot2();
        let c2 = c.to_vec2().hypot2();
        let center = Point::new(
            (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d,
            (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d,
        );
        let radius = (a - center).hypot();
        if !radius.is_finite() || radius <= EPSILON {
            return None;
        }

        let start_angle = (a - center).atan2();
        let end_angle = (c - center).atan2();
        let mut sweep = end_angle - start_angle;
        if cross > 0.0 && sweep < 0.0 {
            sweep += TAU;
        } else if cross < 0.0 && sweep > 0.0 {
            sweep -= TAU;
        }

        Some(Self {
            center,
            radius,
            start_angle,
            sweep,
        })
    }

    /// Point at progress `t` in `[0, 1]` along the arc.
    pub fn point_at(&self, t: f64) -> Point {
        let angle = self.start_angle + self.sweep * t;
        self.center + Vec2::from_angle(angle) * self.radius
    }

    /// Arc length.
    pub fn length(&self) -> f64 {
        self.radius * self.sweep.abs()
    }

    pub(crate) fn sample(&self, resolution: usize) -> Vec<Point> {
        let by_length = (self.length() / ARC_SAMPLE_SPACING).ceil() as usize;
        let n = by_length.max(resolution).clamp(1, MAX_PIECE_SAMPLES);
        (0..=n).map(|i| self.point_at(i as f64 / n as f64)).collect()
    }
}

/// Uniform Catmull-Rom through every control point, endpoints duplicated as phantoms.
pub(crate) fn catmull(points: &[Point], resolution: usize) -> Vec<Point> {
    if points.len() < 3 {
        return linear(points);
    }
    let per_segment = resolution.clamp(1, MAX_PIECE_SAMPLES);
    let last = points.len() - 1;
    let mut out = Vec::with_capacity(last * per_segment + 1);
    for i in 0..last {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(last)];
        for j in 0..per_segment {
            let t = j as f64 / per_segment as f64;
            out.push(catmull_point(p0, p1, p2, p3, t));
        }
    }
    out.push(points[last]);
    out
}

fn catmull_point(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let t2 = t * t;
    let t3 = t2 * t;
    let c0 = -0.5 * t3 + t2 - 0.5 * t;
    let c1 = 1.5 * t3 - 2.5 * t2 + 1.0;
    let c2 = -1.5 * t3 + 2.0 * t2 + 0.5 * t;
    let c3 = 0.5 * t3 - 0.5 * t2;
    Point::new(
        c0 * p0.x + c1 * p1.x + c2 * p2.x + c3 * p3.x,
        c0 * p0.y + c1 * p1.y + c2 * p2.y + c3 * p3.y,
    )
}

/// Cumulative distance table for a polyline.
pub(crate) fn cumulative_lengths(points: &[Point]) -> Vec<f64> {
    let mut out = Vec::with_capacity(points.len());
    let mut acc = 0.0;
    for (i, &p) in points.iter().enumerate() {
        if i > 0 {
            acc += (p - points[i - 1]).hypot();
        }
        out.push(acc);
    }
    out
}

/// Truncate or extend a polyline so its length equals `target`.
///
/// Extension continues along the last non-zero segment. A polyline with no non-zero
/// segment cannot be extended and is returned unchanged.
pub(crate) fn fit_to_length(points: Vec<Point>, target: f64) -> (Vec<Point>, Vec<f64>) {
    let mut points = points;
    let mut cumulative = cumulative_lengths(&points);
    let total = cumulative.last().copied().unwrap_or(0.0);

    if total > target {
        let cut = cumulative.partition_point(|&c| c < target).max(1);
        let seg = cumulative[cut] - cumulative[cut - 1];
        let t = if seg > EPSILON {
            (target - cumulative[cut - 1]) / seg
        } else {
            0.0
        };
        let end = lerp_point(points[cut - 1], points[cut], t);
        points.truncate(cut);
        cumulative.truncate(cut);
        points.push(end);
        cumulative.push(target);
    } else if total < target {
        let Some(dir) = last_direction(&points) else {
            return (points, cumulative);
        };
        let Some(&last) = points.last() else {
            return (points, cumulative);
        };
        points.push(last + dir * (target - total));
        cumulative.push(target);
    }

    (points, cumulative)
}

fn last_direction(points: &[Point]) -> Option<Vec2> {
    points.windows(2).rev().find_map(|w| {
        let d = w[1] - w[0];
        let len = d.hypot();
        (len > EPSILON).then(|| d / len)
    })
}

#[cfg(test)]
#[path = "../../tests/unit/curve/shapes.rs"]
mod tests;
