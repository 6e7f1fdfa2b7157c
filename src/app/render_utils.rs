use eframe::egui::{self, Color32, FontId, Painter, Pos2, Rect, Stroke, Vec2, vec2};

use super::labels::LabelArc;
use super::zoom::ViewTransform;

const CANVAS_MARGIN: f32 = 50.0;

/// Square drawing area centered in the allocated canvas. `inner` is the side of
/// the square the focus circle is fitted into after subtracting the margin.
#[derive(Clone, Copy, Debug)]
pub(super) struct CanvasFrame {
    pub(super) outer: Rect,
    pub(super) margin: f32,
    pub(super) inner: f32,
}

impl CanvasFrame {
    pub(super) fn new(rect: Rect) -> Self {
        let side = rect.width().min(rect.height()).max(1.0);
        let margin = CANVAS_MARGIN.min(side / 4.0);
        let outer = Rect::from_center_size(rect.center(), vec2(side, side));
        Self {
            outer,
            margin,
            inner: (side - 2.0 * margin).max(1.0),
        }
    }

    fn inner_origin(&self) -> Pos2 {
        self.outer.min + vec2(self.margin, self.margin)
    }

    pub(super) fn to_screen(&self, view: ViewTransform, x: f64, y: f64) -> Pos2 {
        let (u, v) = view.apply(x, y);
        self.inner_origin() + vec2(u as f32, v as f32) * self.inner
    }

    pub(super) fn radius(&self, view: ViewTransform, r: f64) -> f32 {
        (r * view.scale) as f32 * self.inner
    }

    pub(super) fn legend_origin(&self) -> Pos2 {
        let side = self.outer.width();
        self.outer.min + vec2(self.margin + (side - self.margin) * 0.8, 2.0 * self.margin)
    }
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::WHITE);
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

/// Draws `text` along the lower rim of a circle, one glyph at a time, with the
/// baseline on the arc and glyphs leaning towards the center.
pub(super) fn draw_curved_label(
    painter: &Painter,
    center: Pos2,
    arc: LabelArc,
    pixels_per_unit: f32,
    text: &str,
    font: &FontId,
    color: Color32,
) {
    let screen_arc = LabelArc {
        radius: arc.radius * f64::from(pixels_per_unit),
    };
    if screen_arc.radius < 4.0 {
        return;
    }

    let glyphs = text
        .chars()
        .map(|ch| painter.layout_no_wrap(ch.to_string(), font.clone(), color))
        .collect::<Vec<_>>();
    let advances = glyphs
        .iter()
        .map(|galley| f64::from(galley.size().x))
        .collect::<Vec<_>>();
    let ascent = font.size * 0.8;

    for (galley, point) in glyphs.into_iter().zip(screen_arc.layout_glyphs(&advances)) {
        let angle = point.angle as f32;
        let baseline = center + vec2(point.dx as f32, point.dy as f32);
        let down = Vec2::new(-angle.sin(), angle.cos());
        let top_left = baseline - down * ascent;
        let shape = egui::epaint::TextShape::new(top_left, galley, color).with_angle(angle);
        painter.add(egui::Shape::Text(shape));
    }
}

pub(super) fn draw_tooltip(painter: &Painter, anchor: Pos2, bounds: Rect, text: String) {
    let galley = painter.layout(
        text,
        FontId::proportional(12.5),
        Color32::from_gray(235),
        320.0,
    );
    let padding = vec2(8.0, 6.0);
    let size = galley.size() + padding * 2.0;

    let mut min = anchor + vec2(14.0, 14.0);
    if min.x + size.x > bounds.right() {
        min.x = (anchor.x - size.x - 14.0).max(bounds.left());
    }
    if min.y + size.y > bounds.bottom() {
        min.y = (anchor.y - size.y - 14.0).max(bounds.top());
    }

    let frame = Rect::from_min_size(min, size);
    painter.rect_filled(frame, 4.0, Color32::from_rgba_unmultiplied(30, 34, 40, 235));
    painter.rect_stroke(
        frame,
        4.0,
        Stroke::new(1.0, Color32::from_gray(90)),
        egui::StrokeKind::Inside,
    );
    painter.galley(min + padding, galley, Color32::from_gray(235));
}
