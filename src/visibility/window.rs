use crate::foundation::math::{EPSILON, lerp, progress};

/// Fade-out after an object's end, in milliseconds.
pub const HIT_FADE_MS: f64 = 150.0;
/// Approach ring starts at `1 + APPROACH_SCALE` times the circle size.
pub const APPROACH_SCALE: f64 = 4.0;
/// Duration of the hit burst after an object's start.
pub const HIT_BURST_MS: f64 = 150.0;
/// Scale reached at the end of the hit burst.
pub const HIT_BURST_SCALE: f64 = 1.33;

/// Time before the hit at which an object appears.
pub fn preempt_ms(approach_rate: f64) -> f64 {
    if approach_rate <= 5.0 {
        1200.0 + 600.0 * (5.0 - approach_rate) / 5.0
    } else {
        1200.0 - 750.0 * (approach_rate - 5.0) / 5.0
    }
}

/// Length of the fade-in ramp that ends at the hit time.
pub fn fade_in_ms(approach_rate: f64) -> f64 {
    if approach_rate <= 5.0 {
        800.0 + 400.0 * (5.0 - approach_rate) / 5.0
    } else {
        800.0 - 500.0 * (approach_rate - 5.0) / 5.0
    }
}

/// Hit circle radius in osu!pixels for a circle size.
pub fn circle_radius(circle_size: f64) -> f64 {
    (54.4 - 4.48 * circle_size).max(1.0)
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Approach-rate derived timing of when objects appear, fade and disappear.
pub struct VisibilityWindow {
    preempt: f64,
    fade_in: f64,
    hit_fade: f64,
    approach_scale: f64,
}

impl VisibilityWindow {
    pub fn new(approach_rate: f64) -> Self {
        Self {
            preempt: preempt_ms(approach_rate),
            fade_in: fade_in_ms(approach_rate),
            hit_fade: HIT_FADE_MS,
            approach_scale: APPROACH_SCALE,
        }
    }

    /// Override the post-end fade; non-finite or negative values are ignored.
    pub fn with_hit_fade(mut self, ms: f64) -> Self {
        if ms.is_finite() && ms >= 0.0 {
            self.hit_fade = ms;
        }
        self
    }

    /// Override the approach ring's extra starting scale.
    pub fn with_approach_scale(mut self, k: f64) -> Self {
        if k.is_finite() && k >= 0.0 {
            self.approach_scale = k;
        }
        self
    }

    pub fn preempt(&self) -> f64 {
        self.preempt
    }

    pub fn fade_in(&self) -> f64 {
        self.fade_in
    }

    pub fn hit_fade(&self) -> f64 {
        self.hit_fade
    }

    /// `[start - preempt, end + hit_fade]`.
    pub fn visible_span(&self, start: f64, end: Option<f64>) -> (f64, f64) {
        let end = end.unwrap_or(start).max(start);
        (start - self.preempt, end + self.hit_fade)
    }

    pub fn is_visible(&self, t: f64, start: f64, end: Option<f64>) -> bool {
        let (from, to) = self.visible_span(start, end);
        t >= from && t <= to
    }

    /// Object opacity in `[0, 1]`.
    ///
    /// Zero until `start - fade_in`, ramps to 1 at `start`, holds through `end`, then ramps
    /// back to 0 over the hit fade.
    pub fn opacity(&self, t: f64, start: f64, end: Option<f64>) -> f64 {
        let end = end.unwrap_or(start).max(start);
        if !t.is_finite() || t < start - self.preempt {
            return 0.0;
        }
        if t < start {
            return progress(t, start - self.fade_in, self.fade_in);
        }
        if t <= end {
            return 1.0;
        }
        1.0 - progress(t, end, self.hit_fade)
    }

    /// Approach ring scale relative to the circle; `None` outside `[start - preempt, start)`.
    pub fn approach_scale(&self, t: f64, start: f64) -> Option<f64> {
        if t < start - self.preempt || t >= start {
            return None;
        }
        let p = progress(t, start - self.preempt, self.preempt);
        Some(lerp(1.0 + self.approach_scale, 1.0, p))
    }

    /// Hit burst scale for `t` in `[start, start + 150ms]`.
    pub fn hit_burst_scale(&self, t: f64, start: f64) -> Option<f64> {
        if t < start || t > start + HIT_BURST_MS {
            return None;
        }
        Some(lerp(1.0, HIT_BURST_SCALE, progress(t, start, HIT_BURST_MS)))
    }

    /// Opacity of the follow points from an object ending at `prev_end` to the next one
    /// starting at `next_start`.
    pub fn follow_point_opacity(&self, t: f64, prev_end: f64, next_start: f64) -> f64 {
        let appear = prev_end - self.preempt;
        if t < appear || t > next_start {
            return 0.0;
        }
        if t < prev_end {
            return progress(t, appear, self.fade_in);
        }
        let gap = next_start - prev_end;
        if gap <= EPSILON {
            return 0.0;
        }
        1.0 - progress(t, prev_end, gap)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/visibility/window.rs"]
mod tests;
