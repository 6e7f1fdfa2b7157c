use eframe::egui::{self, Color32, FontId, Id, Sense, Stroke, Ui};

use crate::repo::Hierarchy;
use crate::util::{format_lines, format_share};

use super::super::ViewModel;
use super::super::color::node_color;
use super::super::filter::FILTER_TRANSITION_SECS;
use super::super::render_utils::{
    CanvasFrame, blend_color, circle_visible, draw_background, draw_curved_label, draw_tooltip,
};
use super::super::zoom::ZOOM_DURATION_SECS;

const LABEL_COLOR: Color32 = Color32::from_gray(28);

impl ViewModel {
    pub(in crate::app) fn draw_canvas(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());
        let painter = ui.painter_at(rect);
        draw_background(&painter, rect);

        let frame = CanvasFrame::new(rect);
        let now = ui.input(|input| input.time);
        let view = self.zoom.view_at(now);
        if self.zoom.is_animating(now) {
            ui.ctx().request_repaint();
        }

        let legend_visible = self.zoom.is_focused(Hierarchy::ROOT);
        let pointer = response.hover_pos();
        let legend_hover = pointer
            .filter(|_| legend_visible)
            .and_then(|pointer| self.legend_hit(&frame, pointer));
        let hovered = if legend_hover.is_some() {
            None
        } else {
            pointer.and_then(|pointer| self.hit_test(&frame, view, pointer))
        };
        self.hovered = hovered;

        if hovered.is_some() || legend_hover.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        for index in 0..self.tree.len() {
            let node = self.tree.node(index);
            let presence = if node.is_leaf() {
                ui.ctx().animate_bool_with_time(
                    Id::new(("leaf-filter", index)),
                    !self.is_filtered(index),
                    FILTER_TRANSITION_SECS,
                )
            } else {
                1.0
            };

            let radius = frame.radius(view, node.r) * presence;
            if radius < 0.3 {
                continue;
            }
            let center = frame.to_screen(view, node.x, node.y);
            if !circle_visible(rect, center, radius) {
                continue;
            }

            let base = node_color(node, self.color_mode);
            let is_hovered = hovered == Some(index);
            let fill = if is_hovered {
                blend_color(base, Color32::BLACK, 0.08)
            } else {
                base
            };
            painter.circle_filled(center, radius, fill);

            let stroke = if is_hovered {
                Stroke::new(1.5, Color32::from_gray(40))
            } else if node.is_leaf() {
                Stroke::NONE
            } else {
                Stroke::new(1.0, Color32::from_rgb(150, 190, 195))
            };
            if stroke != Stroke::NONE {
                painter.circle_stroke(center, radius, stroke);
            }
        }

        let font = FontId::proportional(11.0);
        for index in 0..self.tree.len() {
            let opacity = ui.ctx().animate_bool_with_time(
                Id::new(("label-lens", index)),
                self.zoom.label_visible(&self.tree, index),
                ZOOM_DURATION_SECS as f32,
            );
            if opacity <= 0.01 || self.is_filtered(index) {
                continue;
            }

            let node = self.tree.node(index);
            let Some(arc) = self.label_arcs.get(index).copied() else {
                continue;
            };
            let center = frame.to_screen(view, node.x, node.y);
            if !circle_visible(rect, center, arc.radius as f32 * frame.inner) {
                continue;
            }

            draw_curved_label(
                &painter,
                center,
                arc,
                frame.inner,
                &node.data.name,
                &font,
                LABEL_COLOR.gamma_multiply(opacity),
            );
        }

        if legend_visible {
            self.draw_legend(&painter, &frame, legend_hover);
        }

        if let (Some(index), Some(pointer)) = (hovered, pointer) {
            draw_tooltip(&painter, pointer, rect, self.hover_text(index));
        }

        if response.clicked() {
            let modifiers = ui.input(|input| input.modifiers);
            let click_pos = response.interact_pointer_pos().or(pointer);
            let legend_click = click_pos
                .filter(|_| legend_visible)
                .and_then(|pos| self.legend_hit(&frame, pos));

            if let Some(bucket) = legend_click {
                self.toggle_bucket(bucket);
            } else {
                let clicked = click_pos.and_then(|pos| self.hit_test(&frame, view, pos));
                self.handle_canvas_click(clicked, modifiers, now);
                ui.ctx().request_repaint();
            }
        }
    }

    pub(in crate::app) fn hover_text(&self, index: usize) -> String {
        let node = self.tree.node(index);
        let mut lines = vec![
            format!("Lines of code: {}", format_lines(node.value)),
            format!("Path: {}", self.paths[index]),
        ];

        if node.is_leaf() {
            lines.push(format!(
                "Authors: {}",
                node.data
                    .author_count
                    .map(|count| count.to_string())
                    .unwrap_or_else(|| "not available".to_owned())
            ));
            lines.push(format!(
                "Code older than 6 months: {}",
                format_share(node.data.fraction_old)
            ));

            let authors = node.data.author_list();
            if authors.is_empty() {
                lines.push("Author(s): not available".to_owned());
            } else {
                lines.push("Author(s):".to_owned());
                lines.extend(authors.into_iter().map(|author| format!("    {author}")));
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::ColorMode;
    use super::*;
    use crate::repo::{LayoutOptions, build_repo_tree};

    fn model() -> ViewModel {
        let tree = build_repo_tree(
            r#"{"name": "repo", "children": [
                {"name": "app.js", "size": 1200, "author_count": 2,
                 "fraction_of_lines_older_6_months": 0.5, "authors": "ann,bob"},
                {"name": "old.js", "size": 30}
            ]}"#,
            LayoutOptions::default(),
        )
        .expect("tree");
        ViewModel::new(tree, ColorMode::Authors)
    }

    #[test]
    fn directory_hover_shows_size_and_path() {
        let model = model();
        assert_eq!(
            model.hover_text(Hierarchy::ROOT),
            "Lines of code: 1,230\nPath: repo"
        );
    }

    #[test]
    fn leaf_hover_lists_authors() {
        let model = model();
        let text = model.hover_text(1);
        assert!(text.contains("Path: repo/app.js"));
        assert!(text.contains("Authors: 2"));
        assert!(text.contains("Code older than 6 months: 50.0%"));
        assert!(text.ends_with("Author(s):\n    ann\n    bob"));
    }

    #[test]
    fn leaf_hover_marks_missing_data() {
        let model = model();
        let text = model.hover_text(2);
        assert!(text.contains("Authors: not available"));
        assert!(text.contains("Code older than 6 months: not available"));
        assert!(text.ends_with("Author(s): not available"));
    }
}
