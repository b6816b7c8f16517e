use crate::beatmap::model::HitObject;
use crate::foundation::math::EPSILON;
use crate::timing::model::TimingModel;

/// Ticks closer than this to a span boundary are dropped.
const TICK_END_GUARD_MS: f64 = 10.0;
/// Upper bound on generated ticks per slider.
const MAX_TICKS_PER_SLIDER: usize = 4096;

/// Tick times for a slider whose producer did not supply any.
///
/// Ticks are spaced `100 * slider_multiplier * velocity / tick_rate` osu!pixels along the
/// first span and mirrored onto every following span. The result is ascending.
pub fn slider_tick_times(
    obj: &HitObject,
    timing: &TimingModel,
    slider_multiplier: f64,
    tick_rate: f64,
) -> Vec<f64> {
    if !obj.is_slider() || obj.length <= EPSILON || obj.duration() <= EPSILON {
        return Vec::new();
    }
    let slides = obj.span_count();
    let span_ms = obj.duration() / f64::from(slides);
    let px_per_ms = obj.length / span_ms;
    let tick_px = 100.0 * slider_multiplier * timing.velocity_at(obj.start_time) / tick_rate;
    if !tick_px.is_finite() || tick_px <= EPSILON || !px_per_ms.is_finite() {
        return Vec::new();
    }
    let guard_px = TICK_END_GUARD_MS * px_per_ms;

    let mut span_offsets_px = Vec::new();
    let mut d = tick_px;
    while d < obj.length - guard_px && span_offsets_px.len() < MAX_TICKS_PER_SLIDER {
        span_offsets_px.push(d);
        d += tick_px;
    }

    let mut out = Vec::with_capacity(span_offsets_px.len() * slides as usize);
    for span in 0..slides {
        let span_start = obj.start_time + f64::from(span) * span_ms;
        if span % 2 == 0 {
            out.extend(span_offsets_px.iter().map(|&d| span_start + d / px_per_ms));
        } else {
            out.extend(
                span_offsets_px
                    .iter()
                    .rev()
                    .map(|&d| span_start + (obj.length - d) / px_per_ms),
            );
        }
        if out.len() >= MAX_TICKS_PER_SLIDER {
            out.truncate(MAX_TICKS_PER_SLIDER);
            break;
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/timing/ticks.rs"]
mod tests;
