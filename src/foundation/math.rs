use kurbo::Point;

/// Lengths and durations below this are treated as zero.
pub(crate) const EPSILON: f64 = 1e-9;

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

pub(crate) fn lerp_point(a: Point, b: Point, t: f64) -> Point {
    Point::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
}

/// `(x - start) / len` clamped to `[0, 1]`; a zero-length span is a step at `start`.
pub(crate) fn progress(x: f64, start: f64, len: f64) -> f64 {
    if !x.is_finite() {
        return 0.0;
    }
    if len <= EPSILON {
        return if x >= start { 1.0 } else { 0.0 };
    }
    ((x - start) / len).clamp(0.0, 1.0)
}

pub(crate) fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

pub(crate) fn is_finite_point(p: Point) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
