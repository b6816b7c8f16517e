use crate::beatmap::model::HitObject;
use crate::beatmap::prepared::PreparedBeatmap;
use crate::objects::index::EventKind;
use crate::config::PreviewConfig;
use crate::foundation::core::{Point, Rect, Rgba8, Vec2};
use crate::foundation::math::{EPSILON, gcd};
use crate::render::glyphs::{centered_text_path, text_path};
use crate::render::painter::Painter;
use crate::render::surface::Surface;
use crate::render::{FrameStats, ViewToggles};
use crate::timing::model::legacy_velocity;

/// Hard cap on gridlines per frame; extreme zoom-out or tiny beat lengths stop here.
pub const MAX_GRIDLINES: usize = 4096;
const MAX_SNAP_DIVISOR: u32 = 64;
/// Largest gridline index whose time is still exact in an `f64`.
const MAX_EXACT_INDEX: f64 = 9_007_199_254_740_992.0;

const KIAI_TINT: Rgba8 = Rgba8::rgba(255, 160, 60, 36);
const PLAYHEAD: Rgba8 = Rgba8::rgb(255, 220, 80);
const BPM_LABEL: Rgba8 = Rgba8::rgb(255, 96, 96);
const VELOCITY_LABEL: Rgba8 = Rgba8::rgb(96, 220, 120);
const BORDER: Rgba8 = Rgba8::WHITE;

/// Beat-snap denominator of the `sub`-th line within a beat split into `divisor` parts.
pub fn snap_denominator(sub: u32, divisor: u32) -> u32 {
    let divisor = divisor.max(1);
    divisor / gcd(sub % divisor, divisor)
}

fn gridline_colour(denominator: u32) -> Rgba8 {
    match denominator {
        1 => Rgba8::rgb(255, 255, 255),
        2 => Rgba8::rgb(230, 70, 70),
        3 | 6 => Rgba8::rgb(170, 90, 220),
        4 => Rgba8::rgb(80, 130, 255),
        8 => Rgba8::rgb(240, 200, 60),
        _ => Rgba8::rgb(140, 140, 140),
    }
}

/// Fraction of the strip height a gridline covers.
fn gridline_length(denominator: u32, measure: bool) -> f64 {
    match (measure, denominator) {
        (true, _) => 1.0,
        (false, 1) => 0.7,
        (false, 2) => 0.5,
        (false, 3 | 4) => 0.4,
        _ => 0.3,
    }
}

/// Paints the scrolling timeline strip with the playhead fixed at its horizontal centre.
#[derive(Clone, Debug)]
pub struct TimelineRenderer {
    background: Rgba8,
    base_span_ms: f64,
    margin_ms: f64,
}

impl Default for TimelineRenderer {
    fn default() -> Self {
        Self::from_config(&PreviewConfig::default())
    }
}

impl TimelineRenderer {
    pub fn from_config(config: &PreviewConfig) -> Self {
        Self {
            background: config.timeline_background,
            base_span_ms: config.timeline_base_span_ms,
            margin_ms: config.timeline_margin_ms,
        }
    }

    /// Milliseconds shown across the strip at `zoom`; bad zoom values fall back to 1.
    pub fn span_ms(&self, zoom: f64) -> f64 {
        let zoom = if zoom.is_finite() && zoom > 0.0 {
            zoom
        } else {
            1.0
        };
        self.base_span_ms / zoom
    }

    /// Time range `[from, to]` covered by the strip when the playhead sits at `t`.
    pub fn time_range(&self, t: f64, zoom: f64) -> (f64, f64) {
        let half = self.span_ms(zoom) / 2.0;
        (t - half, t + half)
    }

    pub fn render(
        &self,
        surface: &mut Surface,
        beatmap: &PreparedBeatmap,
        t: f64,
        toggles: &ViewToggles,
    ) -> FrameStats {
        let (width, height) = surface.css_size();
        let span = self.span_ms(toggles.zoom);
        let (from, to) = self.time_range(t, toggles.zoom);
        let strip = Strip {
            t,
            from,
            to,
            width,
            height,
            px_per_ms: width / span,
        };

        let stats = surface.paint(|p| {
            let mut stats = FrameStats::default();
            p.clear(self.background);
            paint_kiai(p, &strip, beatmap);
            stats.gridlines = paint_grid(p, &strip, beatmap, toggles.snap_divisor);
            paint_labels(p, &strip, beatmap);

            let range = beatmap
                .index()
                .visible_range(from - self.margin_ms, to + self.margin_ms);
            let objects = beatmap.objects();
            for i in range.rev() {
                // The range may include objects that ended before the margin.
                if !beatmap.index().reaches(i, from - self.margin_ms) {
                    continue;
                }
                if paint_object(p, &strip, beatmap, i, &objects[i], &mut stats) {
                    stats.objects_drawn += 1;
                } else {
                    stats.skipped += 1;
                }
            }

            p.line(
                Point::new(width / 2.0, 0.0),
                Point::new(width / 2.0, height),
                2.0,
                PLAYHEAD,
            );
            stats.skipped += p.dropped();
            stats
        });
        tracing::debug!(
            time_ms = t,
            drawn = stats.objects_drawn,
            gridlines = stats.gridlines,
            repeats = stats.repeats,
            "timeline frame"
        );
        stats
    }
}

/// Geometry of one timeline frame in CSS pixels.
struct Strip {
    t: f64,
    from: f64,
    to: f64,
    width: f64,
    height: f64,
    px_per_ms: f64,
}

impl Strip {
    fn x(&self, time: f64) -> f64 {
        self.width / 2.0 + (time - self.t) * self.px_per_ms
    }

    fn mid(&self) -> f64 {
        self.height / 2.0
    }

    fn object_radius(&self) -> f64 {
        self.height * 0.22
    }
}

fn paint_kiai(p: &mut Painter<'_>, strip: &Strip, beatmap: &PreparedBeatmap) {
    let points = beatmap.timing().timing_points();
    for (i, point) in points.iter().enumerate() {
        if !point.kiai {
            continue;
        }
        let end = points.get(i + 1).map_or(f64::INFINITY, |next| next.time);
        let lo = point.time.max(strip.from);
        let hi = end.min(strip.to);
        if lo >= hi {
            continue;
        }
        p.fill_rect(
            Rect::new(strip.x(lo), 0.0, strip.x(hi), strip.height),
            KIAI_TINT,
        );
    }
}

/// Paint beat and sub-beat lines for every uninherited section overlapping the strip.
fn paint_grid(p: &mut Painter<'_>, strip: &Strip, beatmap: &PreparedBeatmap, divisor: u32) -> usize {
    let divisor = divisor.clamp(1, MAX_SNAP_DIVISOR);
    let sections = beatmap.timing().uninherited_points();
    let mut painted = 0;

    for (j, section) in sections.iter().enumerate() {
        if section.beat_length <= 0.0 || !section.beat_length.is_finite() {
            continue;
        }
        // The first section extends backwards to cover lead-in time.
        let section_start = if j == 0 {
            f64::NEG_INFINITY
        } else {
            section.time
        };
        let section_end = sections.get(j + 1).map_or(f64::INFINITY, |s| s.time);
        let lo = section_start.max(strip.from);
        let hi = section_end.min(strip.to);
        if lo > hi {
            continue;
        }

        let step = section.beat_length / f64::from(divisor);
        if !(step > EPSILON) {
            continue;
        }
        let first = ((lo - section.time) / step).ceil();
        if !first.is_finite() || first.abs() > MAX_EXACT_INDEX {
            tracing::debug!(beat_length = section.beat_length, "gridline index out of range");
            continue;
        }
        let meter = i64::from(section.meter.max(1));
        let mut k = first as i64;
        loop {
            if painted >= MAX_GRIDLINES {
                tracing::debug!(cap = MAX_GRIDLINES, "gridline cap reached");
                return painted;
            }
            let time = section.time + k as f64 * step;
            if time > hi || time >= section_end {
                break;
            }
            let sub = k.rem_euclid(i64::from(divisor)) as u32;
            let beat = k.div_euclid(i64::from(divisor));
            let denominator = snap_denominator(sub, divisor);
            let measure = sub == 0 && beat.rem_euclid(meter) == 0;

            let x = strip.x(time);
            let half = strip.height * gridline_length(denominator, measure) / 2.0;
            let width = if measure { 2.0 } else { 1.0 };
            p.line(
                Point::new(x, strip.mid() - half),
                Point::new(x, strip.mid() + half),
                width,
                gridline_colour(denominator).with_alpha_mul(0.8),
            );
            painted += 1;
            let Some(next) = k.checked_add(1) else {
                break;
            };
            k = next;
        }
    }
    painted
}

fn paint_labels(p: &mut Painter<'_>, strip: &Strip, beatmap: &PreparedBeatmap) {
    let timing = beatmap.timing();
    let size = (strip.height * 0.16).max(4.0);
    let in_range = |time: f64| time >= strip.from && time <= strip.to;

    for point in timing.uninherited_points() {
        if !in_range(point.time) || point.beat_length <= 0.0 {
            continue;
        }
        let label = format!("{:.0}", 60_000.0 / point.beat_length);
        let origin = Point::new(strip.x(point.time) + 3.0, 2.0);
        p.stroke_path(&text_path(&label, origin, size), 1.2, BPM_LABEL);
    }

    let velocities: Vec<(f64, f64)> = if timing.difficulty_points().is_empty() {
        timing
            .legacy_velocity_points()
            .iter()
            .map(|tp| (tp.time, legacy_velocity(tp.beat_length)))
            .collect()
    } else {
        timing
            .difficulty_points()
            .iter()
            .map(|dp| (dp.time, dp.velocity))
            .collect()
    };
    for (time, velocity) in velocities {
        if !in_range(time) {
            continue;
        }
        let label = format!("{velocity:.2}x");
        let origin = Point::new(strip.x(time) + 3.0, strip.height - size - 2.0);
        p.stroke_path(&text_path(&label, origin, size), 1.2, VELOCITY_LABEL);
    }
}

/// Returns false when the object could not be placed on the strip.
fn paint_object(
    p: &mut Painter<'_>,
    strip: &Strip,
    beatmap: &PreparedBeatmap,
    i: usize,
    obj: &HitObject,
    stats: &mut FrameStats,
) -> bool {
    let start_x = strip.x(obj.start_time);
    let end_x = strip.x(obj.end_or_start());
    if !start_x.is_finite() || !end_x.is_finite() {
        return false;
    }
    let y = strip.mid();
    let r = strip.object_radius();
    let colour = beatmap.combo_colour(i);
    let head = Point::new(start_x, y);

    if obj.is_spinner() {
        p.fill_rect(
            Rect::new(start_x, y - r * 0.3, end_x, y + r * 0.3),
            Rgba8::rgba(200, 200, 200, 120),
        );
        paint_events(p, strip, beatmap, i, obj, stats);
        p.fill_circle(head, r, Rgba8::rgb(90, 90, 90));
        p.stroke_circle(head, r, 2.0, BORDER);
        p.stroke_circle(head, r * 0.45, 1.5, BORDER);
        return true;
    }

    if obj.is_slider() {
        p.fill_rect(
            Rect::new(start_x, y - r, end_x, y + r),
            colour.darken(0.5),
        );
        paint_events(p, strip, beatmap, i, obj, stats);
    }

    p.fill_circle(head, r, colour);
    p.stroke_circle(head, r, 2.0, BORDER);
    let number = beatmap
        .combos()
        .get(i)
        .map(|c| c.number)
        .unwrap_or(1)
        .to_string();
    p.stroke_path(&centered_text_path(&number, head, r), 1.5, Rgba8::WHITE);
    true
}

/// Tick dots, repeat marks and the end ring of object `i`, from its indexed events.
fn paint_events(
    p: &mut Painter<'_>,
    strip: &Strip,
    beatmap: &PreparedBeatmap,
    i: usize,
    obj: &HitObject,
    stats: &mut FrameStats,
) {
    let y = strip.mid();
    let r = strip.object_radius();
    let events = beatmap
        .index()
        .events_in_range(obj.start_time, obj.end_or_start());
    for e in events.iter().filter(|e| e.object == i) {
        let at = Point::new(strip.x(e.time), y);
        match e.kind {
            EventKind::Tick => {
                p.fill_circle(at, r * 0.15, Rgba8::WHITE);
                stats.ticks += 1;
            }
            EventKind::Repeat => {
                p.line(
                    at - Vec2::new(0.0, r * 0.8),
                    at + Vec2::new(0.0, r * 0.8),
                    2.0,
                    BORDER,
                );
                // The first repeat carries the reverse arrow, pointing back toward the head.
                if e.span == 0 {
                    let s = r * 0.4;
                    p.line(at + Vec2::new(s, -s), at, 2.0, BORDER);
                    p.line(at + Vec2::new(s, s), at, 2.0, BORDER);
                }
                stats.repeats += 1;
            }
            EventKind::End => {
                let width = if obj.is_spinner() { 1.5 } else { 2.0 };
                p.stroke_circle(at, r * 0.6, width, BORDER);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/timeline.rs"]
mod tests;
