use std::ops::Range;

use crate::beatmap::model::HitObject;
use crate::beatmap::prepared::PreparedBeatmap;
use crate::config::PreviewConfig;
use crate::curve::path::SliderPath;
use crate::foundation::core::{
    Affine, PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH, Point, Rect, Rgba8, Vec2,
};
use crate::foundation::math::{is_finite_point, progress};
use crate::objects::index::EventKind;
use crate::render::glyphs::centered_text_path;
use crate::render::painter::Painter;
use crate::render::surface::Surface;
use crate::render::{FrameStats, ViewToggles};

/// Fraction of the surface the letterboxed playfield may use on each axis.
const PLAYFIELD_FILL: f64 = 0.8;
const GRID_STEP: f64 = 32.0;
const FOLLOW_POINT_SPACING: f64 = 32.0;
const SPINNER_MAX_RADIUS: f64 = 176.0;
const SPINNER_INNER_RADIUS: f64 = 10.0;

const PLAYFIELD_TINT: Rgba8 = Rgba8::rgba(255, 255, 255, 10);
const GRID_COLOUR: Rgba8 = Rgba8::rgba(255, 255, 255, 28);
const BORDER: Rgba8 = Rgba8::WHITE;
const FOLLOW_POINT: Rgba8 = Rgba8::rgba(255, 255, 255, 200);
const MARKER: Rgba8 = Rgba8::rgb(255, 64, 64);

/// Paints the full playfield view.
#[derive(Clone, Debug)]
pub struct PlayfieldRenderer {
    background: Rgba8,
}

impl Default for PlayfieldRenderer {
    fn default() -> Self {
        Self::from_config(&PreviewConfig::default())
    }
}

impl PlayfieldRenderer {
    pub fn from_config(config: &PreviewConfig) -> Self {
        Self {
            background: config.playfield_background,
        }
    }

    /// Map osu!pixels into a centred, aspect-preserving box on a `width x height` CSS area.
    pub fn playfield_transform(width: f64, height: f64) -> Affine {
        let scale = (width * PLAYFIELD_FILL / PLAYFIELD_WIDTH)
            .min(height * PLAYFIELD_FILL / PLAYFIELD_HEIGHT)
            .max(0.0);
        let offset = Vec2::new(
            (width - PLAYFIELD_WIDTH * scale) / 2.0,
            (height - PLAYFIELD_HEIGHT * scale) / 2.0,
        );
        Affine::translate(offset) * Affine::scale(scale)
    }

    /// Paint the state of `beatmap` at time `t` (one clock sample per frame).
    pub fn render(
        &self,
        surface: &mut Surface,
        beatmap: &PreparedBeatmap,
        t: f64,
        toggles: &ViewToggles,
    ) -> FrameStats {
        let (css_w, css_h) = surface.css_size();
        let stats = surface.paint(|p| {
            p.clear(self.background);
            p.set_view(Self::playfield_transform(css_w, css_h));
            p.fill_rect(
                Rect::new(0.0, 0.0, PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT),
                PLAYFIELD_TINT,
            );
            if toggles.show_grid {
                paint_grid(p);
            }
            let mut frame = FrameWork::new(beatmap, t);
            frame.paint(p);
            frame.stats.skipped += p.dropped();
            frame.stats
        });
        tracing::debug!(
            time_ms = t,
            drawn = stats.objects_drawn,
            markers = stats.markers,
            skipped = stats.skipped,
            "playfield frame"
        );
        stats
    }
}

fn paint_grid(p: &mut Painter<'_>) {
    let mut x = 0.0;
    while x <= PLAYFIELD_WIDTH {
        p.line(Point::new(x, 0.0), Point::new(x, PLAYFIELD_HEIGHT), 1.0, GRID_COLOUR);
        x += GRID_STEP;
    }
    let mut y = 0.0;
    while y <= PLAYFIELD_HEIGHT {
        p.line(Point::new(0.0, y), Point::new(PLAYFIELD_WIDTH, y), 1.0, GRID_COLOUR);
        y += GRID_STEP;
    }
}

/// Object indices in the order they are painted: spinners under sliders under circles.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct PaintOrder {
    spinners: Vec<usize>,
    sliders: Vec<usize>,
    circles: Vec<usize>,
}

impl PaintOrder {
    fn sequence(&self) -> impl Iterator<Item = usize> + '_ {
        self.spinners
            .iter()
            .chain(&self.sliders)
            .chain(&self.circles)
            .copied()
    }
}

/// Outer spinner ring radius; shrinks with the square root of the time left.
fn spinner_radius(remaining: f64) -> f64 {
    SPINNER_MAX_RADIUS * remaining.clamp(0.0, 1.0).sqrt()
}

/// Per-frame state: one time sample, one visible range.
struct FrameWork<'b> {
    beatmap: &'b PreparedBeatmap,
    t: f64,
    radius: f64,
    stats: FrameStats,
}

impl<'b> FrameWork<'b> {
    fn new(beatmap: &'b PreparedBeatmap, t: f64) -> Self {
        Self {
            beatmap,
            t,
            radius: beatmap.circle_radius(),
            stats: FrameStats::default(),
        }
    }

    fn paint(&mut self, p: &mut Painter<'_>) {
        let beatmap = self.beatmap;
        let window = beatmap.window();
        let range = beatmap
            .index()
            .visible_range(self.t - window.hit_fade(), self.t + window.preempt());
        if range.is_empty() {
            return;
        }
        let objects = beatmap.objects();

        // Follow points sit under every object, including the pair straddling the range start.
        let first_pair = range.start.saturating_sub(1);
        let last_pair = (range.end + 1).min(objects.len());
        for i in first_pair..last_pair.saturating_sub(1) {
            self.paint_follow_points(p, i);
        }

        let order = self.paint_order(range);
        for i in order.sequence() {
            let obj = &objects[i];
            if obj.is_spinner() {
                self.paint_spinner(p, obj);
            } else if obj.is_slider() {
                self.paint_slider(p, i, obj);
            } else {
                self.paint_circle(p, i, obj.position, obj.start_time);
                self.stats.objects_drawn += 1;
            }
        }
    }

    /// Bucket the visible objects by kind, later objects first within each kind.
    fn paint_order(&mut self, range: Range<usize>) -> PaintOrder {
        let beatmap = self.beatmap;
        let window = beatmap.window();
        let objects = beatmap.objects();
        let mut order = PaintOrder::default();
        for i in range.rev() {
            let obj = &objects[i];
            if !obj.start_time.is_finite() || !is_finite_point(obj.position) {
                tracing::debug!(object = i, "skipping object with non-finite data");
                self.stats.skipped += 1;
                continue;
            }
            if window.opacity(self.t, obj.start_time, obj.end_time) <= 0.0 {
                continue;
            }
            if obj.is_spinner() {
                order.spinners.push(i);
            } else if obj.is_slider() {
                order.sliders.push(i);
            } else {
                order.circles.push(i);
            }
        }
        order
    }

    fn opacity(&self, obj: &HitObject) -> f64 {
        self.beatmap
            .window()
            .opacity(self.t, obj.start_time, obj.end_time)
    }

    fn paint_follow_points(&mut self, p: &mut Painter<'_>, i: usize) {
        let objects = self.beatmap.objects();
        let (Some(prev), Some(next)) = (objects.get(i), objects.get(i + 1)) else {
            return;
        };
        let starts_combo = self
            .beatmap
            .combos()
            .get(i + 1)
            .is_some_and(|c| c.starts_combo());
        if starts_combo || prev.is_spinner() || next.is_spinner() {
            return;
        }
        let prev_end = prev.end_or_start();
        let alpha = self
            .beatmap
            .window()
            .follow_point_opacity(self.t, prev_end, next.start_time);
        if alpha <= 0.0 {
            return;
        }

        let from = self.tail_position(i, prev);
        let to = next.position;
        let delta = to - from;
        let dist = delta.hypot();
        if !dist.is_finite() || dist <= 2.0 * self.radius {
            return;
        }
        let dir = delta / dist;
        let colour = FOLLOW_POINT.with_alpha_mul(alpha);
        let mut d = self.radius + FOLLOW_POINT_SPACING / 2.0;
        while d < dist - self.radius {
            let c = from + dir * d;
            p.line(c - dir * 4.0, c + dir * 4.0, 2.0, colour);
            d += FOLLOW_POINT_SPACING;
        }
        self.stats.follow_points += 1;
    }

    /// Where the object is at its end time.
    fn tail_position(&self, i: usize, obj: &HitObject) -> Point {
        match self.beatmap.path(i) {
            Some(path) if obj.span_count() % 2 == 1 => path.end_point(),
            Some(path) => path.start_point(),
            None => obj.position,
        }
    }

    fn paint_circle(&mut self, p: &mut Painter<'_>, i: usize, at: Point, start: f64) {
        let window = *self.beatmap.window();
        let obj = &self.beatmap.objects()[i];
        let opacity = self.opacity(obj);
        let colour = self.beatmap.combo_colour(i);
        let number = self
            .beatmap
            .combos()
            .get(i)
            .map(|c| c.number)
            .unwrap_or(1);
        let r = self.radius;
        let t = self.t;

        if t >= start {
            // Hit burst: the circle expands while the opacity fades out.
            let scale = window.hit_burst_scale(t, start).unwrap_or(1.0);
            p.with_opacity(opacity, |p| {
                p.stroke_circle(at, r * scale, r * 0.12, colour);
            });
            return;
        }

        p.with_opacity(opacity, |p| {
            p.fill_circle(at, r, colour.darken(0.2));
            p.stroke_circle(at, r * 0.94, r * 0.12, BORDER);
            let digits = number.to_string();
            p.stroke_path(
                &centered_text_path(&digits, at, r * 0.7),
                r * 0.1,
                Rgba8::WHITE,
            );
        });
        if let Some(scale) = window.approach_scale(t, start) {
            p.with_opacity(opacity, |p| {
                p.stroke_circle(at, r * scale, r * 0.08, colour);
            });
        }
    }

    fn paint_slider(&mut self, p: &mut Painter<'_>, i: usize, obj: &HitObject) {
        let Some(path) = self.beatmap.path(i) else {
            self.paint_marker(p, obj.position);
            return;
        };
        if path.is_degenerate() {
            self.paint_marker(p, path.start_point());
            self.paint_circle(p, i, path.start_point(), obj.start_time);
            return;
        }

        let opacity = self.opacity(obj);
        let colour = self.beatmap.combo_colour(i);
        let r = self.radius;
        let body = path.bez_path();
        p.with_opacity(opacity, |p| {
            p.stroke_path(&body, r * 2.0, BORDER);
            p.stroke_path(&body, r * 1.8, colour.darken(0.6));
        });

        self.paint_ticks(p, i, obj, path, opacity);
        self.paint_reverse_arrow(p, obj, path, opacity);

        let end = obj.end_or_start();
        let t = self.t;
        if t < obj.start_time {
            self.paint_circle(p, i, path.start_point(), obj.start_time);
        } else if t <= end {
            let ball = path.follow_position(obj.start_time, obj.duration(), obj.span_count(), t);
            p.with_opacity(opacity, |p| {
                p.fill_circle(ball, r * 0.75, colour);
                p.stroke_circle(ball, r * 1.3, r * 0.08, BORDER);
            });
        } else {
            let tail = self.tail_position(i, obj);
            self.paint_circle(p, i, tail, end);
        }
        self.stats.objects_drawn += 1;
    }

    fn paint_ticks(
        &mut self,
        p: &mut Painter<'_>,
        i: usize,
        obj: &HitObject,
        path: &SliderPath,
        opacity: f64,
    ) {
        let end = obj.end_or_start();
        let events = self
            .beatmap
            .index()
            .events_in_range(self.t.max(obj.start_time), end);
        let r = self.radius;
        let mut painted = 0;
        p.with_opacity(opacity, |p| {
            for e in events {
                if e.object != i || e.kind != EventKind::Tick || e.time <= self.t {
                    continue;
                }
                let at = path.follow_position(obj.start_time, obj.duration(), obj.span_count(), e.time);
                p.fill_circle(at, r * 0.12, Rgba8::WHITE);
                painted += 1;
            }
        });
        self.stats.ticks += painted;
    }

    fn paint_reverse_arrow(
        &mut self,
        p: &mut Painter<'_>,
        obj: &HitObject,
        path: &SliderPath,
        opacity: f64,
    ) {
        let slides = obj.span_count();
        if slides < 2 || self.t > obj.end_or_start() {
            return;
        }
        let state = path.follow(obj.start_time, obj.duration(), slides, self.t);
        if state.span >= slides - 1 {
            return;
        }
        let (at, dir) = if state.forward() {
            (path.end_point(), path.tail_direction())
        } else {
            (path.start_point(), path.head_direction())
        };
        if dir == Vec2::ZERO {
            return;
        }
        let r = self.radius * 0.5;
        let normal = Vec2::new(-dir.y, dir.x);
        let tip = at + dir * r;
        let back = at - dir * (r * 0.4);
        p.with_opacity(opacity, |p| {
            p.line(back + normal * r * 0.7, tip, r * 0.25, Rgba8::WHITE);
            p.line(back - normal * r * 0.7, tip, r * 0.25, Rgba8::WHITE);
        });
        self.stats.repeats += 1;
    }

    fn paint_spinner(&mut self, p: &mut Painter<'_>, obj: &HitObject) {
        let opacity = self.opacity(obj);
        let remaining = 1.0 - progress(self.t, obj.start_time, obj.duration());
        let center = Point::new(PLAYFIELD_WIDTH / 2.0, PLAYFIELD_HEIGHT / 2.0);
        let outer = spinner_radius(remaining);
        p.with_opacity(opacity, |p| {
            if outer > 0.5 {
                p.stroke_circle(center, outer, 4.0, Rgba8::WHITE);
            }
            p.stroke_circle(center, SPINNER_INNER_RADIUS, 3.0, Rgba8::WHITE);
        });
        self.stats.objects_drawn += 1;
    }

    fn paint_marker(&mut self, p: &mut Painter<'_>, at: Point) {
        let s = self.radius * 0.5;
        p.line(at + Vec2::new(-s, -s), at + Vec2::new(s, s), 3.0, MARKER);
        p.line(at + Vec2::new(-s, s), at + Vec2::new(s, -s), 3.0, MARKER);
        self.stats.markers += 1;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/playfield.rs"]
mod tests;
