use std::ops::Range;

use crate::beatmap::model::{HitObject, HitObjectKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
/// Derived sub-event kind.
pub enum EventKind {
    /// Slider tick.
    Tick,
    /// Slider direction change at an internal span boundary.
    Repeat,
    /// Slider or spinner end.
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
/// Sub-event derived from a slider or spinner.
pub struct Event {
    /// Absolute time in milliseconds.
    pub time: f64,
    /// Event kind.
    pub kind: EventKind,
    /// Index of the parent object.
    pub object: usize,
    /// Span the event belongs to (for repeats, the span that just finished).
    pub span: u32,
}

/// Counts exposed for debug overlays and logging.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct IndexDiagnostics {
    /// Number of indexed objects.
    pub objects: usize,
    /// Number of tick events.
    pub ticks: usize,
    /// Number of repeat events.
    pub repeats: usize,
    /// Number of end events.
    pub ends: usize,
    /// First object start time.
    pub first_time: Option<f64>,
    /// Latest end time of any object.
    pub last_time: Option<f64>,
    /// Longest object duration.
    pub longest_duration: f64,
}

/// Number of elements `< x` in an ascending array.
pub fn first_at_least(arr: &[f64], x: f64) -> usize {
    arr.partition_point(|&t| t < x)
}

/// Number of elements `<= x` in an ascending array.
pub fn first_greater(arr: &[f64], x: f64) -> usize {
    arr.partition_point(|&t| t <= x)
}

/// Time-sorted access to objects plus their derived events.
#[derive(Clone, Debug, Default)]
pub struct ObjectIndex {
    times: Vec<f64>,
    end_times: Vec<f64>,
    events: Vec<Event>,
    longest_duration: f64,
}

impl ObjectIndex {
    /// Index `objects`, which must be ascending by start time.
    pub fn build(objects: &[HitObject]) -> Self {
        let mut times = Vec::with_capacity(objects.len());
        let mut end_times = Vec::with_capacity(objects.len());
        let mut events = Vec::new();
        let mut longest_duration = 0.0f64;

        for (i, obj) in objects.iter().enumerate() {
            times.push(obj.start_time);
            end_times.push(obj.end_or_start());
            longest_duration = longest_duration.max(obj.duration());

            match obj.kind {
                HitObjectKind::Slider => push_slider_events(i, obj, &mut events),
                HitObjectKind::Spinner => {
                    if let Some(end) = obj.end_time {
                        events.push(Event {
                            time: end,
                            kind: EventKind::End,
                            object: i,
                            span: 0,
                        });
                    }
                }
                HitObjectKind::Circle => {}
            }
        }

        events.sort_by(|a, b| a.time.total_cmp(&b.time));

        Self {
            times,
            end_times,
            events,
            longest_duration,
        }
    }

    /// Object start times, ascending.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Object end times (start time for objects without duration), in object order.
    pub fn end_times(&self) -> &[f64] {
        &self.end_times
    }

    /// All derived events, ascending by time.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of indexed objects.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// True when no objects are indexed.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Objects starting in `[from, to]`, widened backwards to the earliest object that
    /// started before `from` and still ends at or after it.
    ///
    /// The lookback only reaches `from - longest_duration`. Objects inside the widened part
    /// may already have ended; callers filter those with their own visibility rules.
    pub fn visible_range(&self, from: f64, to: f64) -> Range<usize> {
        let first = first_at_least(&self.times, from);
        let end = first_greater(&self.times, to).max(first);
        let floor = first_at_least(&self.times, from - self.longest_duration).min(first);
        let start = (floor..first)
            .find(|&i| self.end_times[i] >= from)
            .unwrap_or(first);
        start..end
    }

    /// True when object `i` is still on the timeline at `from`.
    pub fn reaches(&self, i: usize, from: f64) -> bool {
        self.end_times.get(i).is_some_and(|&end| end >= from)
    }

    /// Events with time in `[from, to]`.
    pub fn events_in_range(&self, from: f64, to: f64) -> &[Event] {
        let lo = self.events.partition_point(|e| e.time < from);
        let hi = self.events.partition_point(|e| e.time <= to).max(lo);
        &self.events[lo..hi]
    }

    /// Summary counts for diagnostics.
    pub fn diagnostics(&self) -> IndexDiagnostics {
        let mut d = IndexDiagnostics {
            objects: self.times.len(),
            first_time: self.times.first().copied(),
            last_time: self.end_times.iter().copied().reduce(f64::max),
            longest_duration: self.longest_duration,
            ..IndexDiagnostics::default()
        };
        for e in &self.events {
            match e.kind {
                EventKind::Tick => d.ticks += 1,
                EventKind::Repeat => d.repeats += 1,
                EventKind::End => d.ends += 1,
            }
        }
        d
    }
}

fn push_slider_events(i: usize, obj: &HitObject, events: &mut Vec<Event>) {
    let slides = obj.span_count();
    let duration = obj.duration();
    let span_ms = duration / f64::from(slides);

    for &tick in &obj.ticks {
        let span = if span_ms > 0.0 {
            ((tick - obj.start_time) / span_ms).floor()
        } else {
            0.0
        };
        let span = if span.is_finite() {
            span.clamp(0.0, f64::from(slides - 1)) as u32
        } else {
            0
        };
        events.push(Event {
            time: tick,
            kind: EventKind::Tick,
            object: i,
            span,
        });
    }

    for k in 1..slides {
        events.push(Event {
            time: obj.start_time + f64::from(k) * span_ms,
            kind: EventKind::Repeat,
            object: i,
            span: k - 1,
        });
    }

    let end = obj.end_or_start();
    if end > obj.start_time {
        events.push(Event {
            time: end,
            kind: EventKind::End,
            object: i,
            span: slides - 1,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/objects/index.rs"]
mod tests;
