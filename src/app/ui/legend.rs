use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Stroke, vec2};

use super::super::ViewModel;
use super::super::color::author_color;
use super::super::filter::AuthorBucket;
use super::super::render_utils::CanvasFrame;

const DOT_RADIUS: f32 = 10.0;
const ROW_SPACING: f32 = 25.0;
const LABEL_OFFSET: f32 = 25.0;

fn dot_center(frame: &CanvasFrame, row: usize) -> Pos2 {
    frame.legend_origin() + vec2(DOT_RADIUS, DOT_RADIUS + row as f32 * ROW_SPACING)
}

impl ViewModel {
    pub(in crate::app) fn legend_hit(&self, frame: &CanvasFrame, pointer: Pos2) -> Option<AuthorBucket> {
        AuthorBucket::ALL
            .iter()
            .enumerate()
            .find(|(row, _)| dot_center(frame, *row).distance(pointer) <= DOT_RADIUS)
            .map(|(_, bucket)| *bucket)
    }

    pub(in crate::app) fn draw_legend(
        &self,
        painter: &Painter,
        frame: &CanvasFrame,
        hovered: Option<AuthorBucket>,
    ) {
        for (row, bucket) in AuthorBucket::ALL.iter().copied().enumerate() {
            let center = dot_center(frame, row);
            let color = author_color(Some(bucket.value()));

            painter.circle_filled(center, DOT_RADIUS, color);
            if self.filter.is_selected(bucket) {
                painter.circle_stroke(center, DOT_RADIUS + 2.5, Stroke::new(2.0, Color32::from_gray(40)));
            } else if hovered == Some(bucket) {
                painter.circle_stroke(center, DOT_RADIUS, Stroke::new(1.0, Color32::from_gray(90)));
            }

            painter.text(
                center + vec2(LABEL_OFFSET - DOT_RADIUS, 0.0),
                Align2::LEFT_CENTER,
                bucket.label(),
                FontId::proportional(13.0),
                color,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{Rect, vec2};

    use super::super::super::ColorMode;
    use super::*;
    use crate::repo::{LayoutOptions, build_repo_tree};

    #[test]
    fn dots_are_hit_in_legend_order() {
        let tree = build_repo_tree(r#"{"name": "r", "size": 1}"#, LayoutOptions::default())
            .expect("tree");
        let model = ViewModel::new(tree, ColorMode::Authors);
        let frame = CanvasFrame::new(Rect::from_min_size(Pos2::ZERO, vec2(900.0, 900.0)));

        for (row, bucket) in AuthorBucket::ALL.iter().enumerate() {
            assert_eq!(model.legend_hit(&frame, dot_center(&frame, row)), Some(*bucket));
        }
        assert_eq!(model.legend_hit(&frame, Pos2::new(450.0, 450.0)), None);
    }
}
