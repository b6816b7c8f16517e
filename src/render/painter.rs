use kurbo::{Circle, PathEl, Shape};

use crate::foundation::core::{Affine, BezPath, Point, Rect, Rgba8};
use crate::foundation::math::is_finite_point;

const CIRCLE_TOLERANCE: f64 = 0.05;

/// Thin drawing façade over a `vello_cpu` render context.
///
/// Geometry is given in view space; the device-pixel-ratio scale is applied underneath.
/// Shapes with non-finite coordinates are dropped and counted instead of reaching the
/// rasterizer.
pub(crate) struct Painter<'a> {
    ctx: &'a mut vello_cpu::RenderContext,
    base: Affine,
    view: Affine,
    dropped: usize,
}

impl<'a> Painter<'a> {
    pub(crate) fn new(ctx: &'a mut vello_cpu::RenderContext, device_pixel_ratio: f64) -> Self {
        let base = Affine::scale(device_pixel_ratio);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(base));
        Self {
            ctx,
            base,
            view: Affine::IDENTITY,
            dropped: 0,
        }
    }

    /// Replace the view transform (CSS pixels from view space).
    pub(crate) fn set_view(&mut self, view: Affine) {
        self.view = view;
        self.ctx.set_transform(affine_to_cpu(self.base * view));
    }

    /// Shapes dropped for non-finite geometry since this painter was created.
    pub(crate) fn dropped(&self) -> usize {
        self.dropped
    }

    /// Fill the whole device surface, ignoring the view transform.
    pub(crate) fn clear(&mut self, colour: Rgba8) {
        let (w, h) = (self.ctx.width(), self.ctx.height());
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.set_colour(colour);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(w),
            f64::from(h),
        ));
        self.ctx.set_transform(affine_to_cpu(self.base * self.view));
    }

    pub(crate) fn fill_rect(&mut self, rect: Rect, colour: Rgba8) {
        if !(rect.x0.is_finite() && rect.y0.is_finite() && rect.x1.is_finite() && rect.y1.is_finite())
        {
            self.dropped += 1;
            return;
        }
        self.set_colour(colour);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            rect.x0, rect.y0, rect.x1, rect.y1,
        ));
    }

    pub(crate) fn fill_path(&mut self, path: &BezPath, colour: Rgba8) {
        if !bezpath_is_finite(path) {
            self.dropped += 1;
            return;
        }
        self.set_colour(colour);
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    /// Stroke with round caps and joins.
    pub(crate) fn stroke_path(&mut self, path: &BezPath, width: f64, colour: Rgba8) {
        if !bezpath_is_finite(path) || !width.is_finite() || width <= 0.0 {
            self.dropped += 1;
            return;
        }
        self.set_colour(colour);
        self.ctx.set_stroke(
            vello_cpu::kurbo::Stroke::new(width)
                .with_caps(vello_cpu::kurbo::Cap::Round)
                .with_join(vello_cpu::kurbo::Join::Round),
        );
        self.ctx.stroke_path(&bezpath_to_cpu(path));
    }

    pub(crate) fn fill_circle(&mut self, center: Point, radius: f64, colour: Rgba8) {
        if !is_finite_point(center) || !radius.is_finite() || radius <= 0.0 {
            self.dropped += 1;
            return;
        }
        self.fill_path(&Circle::new(center, radius).to_path(CIRCLE_TOLERANCE), colour);
    }

    pub(crate) fn stroke_circle(&mut self, center: Point, radius: f64, width: f64, colour: Rgba8) {
        if !is_finite_point(center) || !radius.is_finite() || radius <= 0.0 {
            self.dropped += 1;
            return;
        }
        self.stroke_path(
            &Circle::new(center, radius).to_path(CIRCLE_TOLERANCE),
            width,
            colour,
        );
    }

    pub(crate) fn line(&mut self, a: Point, b: Point, width: f64, colour: Rgba8) {
        let mut path = BezPath::new();
        path.move_to(a);
        path.line_to(b);
        self.stroke_path(&path, width, colour);
    }

    /// Run `f` inside an opacity layer. Fully transparent groups are not painted.
    pub(crate) fn with_opacity(&mut self, opacity: f64, f: impl FnOnce(&mut Self)) {
        if !opacity.is_finite() || opacity <= 0.0 {
            return;
        }
        if opacity >= 1.0 {
            f(self);
            return;
        }
        self.ctx.push_opacity_layer(opacity as f32);
        f(self);
        self.ctx.pop_layer();
    }

    fn set_colour(&mut self, c: Rgba8) {
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

pub(crate) fn bezpath_is_finite(path: &BezPath) -> bool {
    path.elements().iter().all(|el| match *el {
        PathEl::MoveTo(p) | PathEl::LineTo(p) => is_finite_point(p),
        PathEl::QuadTo(a, b) => is_finite_point(a) && is_finite_point(b),
        PathEl::CurveTo(a, b, c) => is_finite_point(a) && is_finite_point(b) && is_finite_point(c),
        PathEl::ClosePath => true,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/painter.rs"]
mod tests;
