use std::f64::consts::PI;

use crate::repo::Hierarchy;

/// Fraction of the full label path where text starts. The path runs along the
/// lower half-circle and back, so a quarter lands at the bottom of the circle.
pub(super) const LABEL_START_OFFSET: f64 = 0.25;

/// Curved text path for one node, in the same normalized units as the view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct LabelArc {
    pub(super) radius: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct ArcPoint {
    /// Offset from the circle center.
    pub(super) dx: f64,
    pub(super) dy: f64,
    /// Direction of travel along the path, in radians (screen coordinates).
    pub(super) angle: f64,
}

impl LabelArc {
    pub(super) fn path_length(&self) -> f64 {
        2.0 * PI * self.radius
    }

    pub(super) fn start_offset(&self) -> f64 {
        self.path_length() * LABEL_START_OFFSET
    }

    /// Point at arc length `distance` along the lower half-circle, which runs
    /// from nine o'clock through six o'clock to three o'clock.
    pub(super) fn point_at(&self, distance: f64) -> Option<ArcPoint> {
        if self.radius <= 0.0 || distance < 0.0 || distance > PI * self.radius {
            return None;
        }
        let theta = 1.5 * PI - distance / self.radius;
        Some(ArcPoint {
            dx: self.radius * theta.sin(),
            dy: -self.radius * theta.cos(),
            angle: (-theta.sin()).atan2(-theta.cos()),
        })
    }

    /// Places glyphs with the given advances starting at the label offset.
    /// Glyphs that would run past the end of the arc are dropped.
    pub(super) fn layout_glyphs(&self, advances: &[f64]) -> Vec<ArcPoint> {
        let mut placed = Vec::with_capacity(advances.len());
        let mut cursor = self.start_offset();
        for &advance in advances {
            let (Some(anchor), Some(middle)) = (
                self.point_at(cursor),
                self.point_at(cursor + advance / 2.0),
            ) else {
                break;
            };
            placed.push(ArcPoint {
                angle: middle.angle,
                ..anchor
            });
            cursor += advance;
        }
        placed
    }
}

pub(super) fn recalculate_label_arcs(tree: &Hierarchy, scale: f64) -> Vec<LabelArc> {
    tree.nodes()
        .iter()
        .map(|node| LabelArc {
            radius: node.r * scale,
        })
        .collect()
}
