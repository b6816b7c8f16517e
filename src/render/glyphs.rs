//! Stroked seven-segment glyphs for combo numbers and timeline labels.
//!
//! Only digits, `.`, `x` and `-` are needed; anything else advances without ink.

use crate::foundation::core::{BezPath, Point};

/// Glyph width relative to its height.
const ASPECT: f64 = 0.55;
/// Gap between glyphs relative to height.
const TRACKING: f64 = 0.18;

// Segment bits: a=top, b=upper right, c=lower right, d=bottom, e=lower left, f=upper left,
// g=middle.
const A: u8 = 1 << 0;
const B: u8 = 1 << 1;
const C: u8 = 1 << 2;
const D: u8 = 1 << 3;
const E: u8 = 1 << 4;
const F: u8 = 1 << 5;
const G: u8 = 1 << 6;

const DIGITS: [u8; 10] = [
    A | B | C | D | E | F,
    B | C,
    A | B | G | E | D,
    A | B | G | C | D,
    F | G | B | C,
    A | F | G | C | D,
    A | F | G | E | D | C,
    A | B | C,
    A | B | C | D | E | F | G,
    A | B | C | D | F | G,
];

fn advance(c: char, height: f64) -> f64 {
    match c {
        '.' => height * 0.2,
        _ => height * ASPECT,
    }
}

/// Laid-out width of `text` at `height`.
pub(crate) fn text_width(text: &str, height: f64) -> f64 {
    let mut w = 0.0;
    for (i, c) in text.chars().enumerate() {
        if i > 0 {
            w += height * TRACKING;
        }
        w += advance(c, height);
    }
    w
}

/// Centerline strokes for `text` with its top-left corner at `origin`.
pub(crate) fn text_path(text: &str, origin: Point, height: f64) -> BezPath {
    let mut path = BezPath::new();
    let mut x = origin.x;
    for (i, c) in text.chars().enumerate() {
        if i > 0 {
            x += height * TRACKING;
        }
        glyph(&mut path, c, Point::new(x, origin.y), height);
        x += advance(c, height);
    }
    path
}

/// Strokes for `text` centred on `center`.
pub(crate) fn centered_text_path(text: &str, center: Point, height: f64) -> BezPath {
    let w = text_width(text, height);
    text_path(
        text,
        Point::new(center.x - w / 2.0, center.y - height / 2.0),
        height,
    )
}

fn glyph(path: &mut BezPath, c: char, o: Point, h: f64) {
    let w = h * ASPECT;
    let p = |fx: f64, fy: f64| Point::new(o.x + fx * w, o.y + fy * h);
    let mut seg = |a: Point, b: Point| {
        path.move_to(a);
        path.line_to(b);
    };

    if let Some(d) = c.to_digit(10) {
        let bits = DIGITS[d as usize];
        let lines = [
            (A, (0.0, 0.0), (1.0, 0.0)),
            (B, (1.0, 0.0), (1.0, 0.5)),
            (C, (1.0, 0.5), (1.0, 1.0)),
            (D, (0.0, 1.0), (1.0, 1.0)),
            (E, (0.0, 0.5), (0.0, 1.0)),
            (F, (0.0, 0.0), (0.0, 0.5)),
            (G, (0.0, 0.5), (1.0, 0.5)),
        ];
        for (bit, a, b) in lines {
            if bits & bit != 0 {
                seg(p(a.0, a.1), p(b.0, b.1));
            }
        }
        return;
    }

    match c {
        '.' => {
            let x = o.x + h * 0.1;
            seg(Point::new(x, o.y + h * 0.95), Point::new(x, o.y + h));
        }
        'x' => {
            seg(p(0.0, 0.4), p(1.0, 1.0));
            seg(p(1.0, 0.4), p(0.0, 1.0));
        }
        '-' => seg(p(0.1, 0.5), p(0.9, 0.5)),
        _ => {}
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/glyphs.rs"]
mod tests;
