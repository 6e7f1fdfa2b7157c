use eframe::egui::{Modifiers, Pos2};
use tracing::{debug, info};

use crate::repo::Hierarchy;

use super::super::ViewModel;
use super::super::filter::AuthorBucket;
use super::super::labels::recalculate_label_arcs;
use super::super::render_utils::CanvasFrame;
use super::super::zoom::{ViewTransform, ZoomIntent};

impl ViewModel {
    /// Topmost circle under `pointer`. Deeper nodes are drawn later, so the
    /// search runs backwards through the arena. Filtered leaves never match.
    pub(in crate::app) fn hit_test(
        &self,
        frame: &CanvasFrame,
        view: ViewTransform,
        pointer: Pos2,
    ) -> Option<usize> {
        (0..self.tree.len()).rev().find(|&index| {
            if self.is_filtered(index) {
                return false;
            }
            let node = self.tree.node(index);
            let center = frame.to_screen(view, node.x, node.y);
            center.distance(pointer) <= frame.radius(view, node.r)
        })
    }

    pub(in crate::app) fn is_filtered(&self, index: usize) -> bool {
        let node = self.tree.node(index);
        node.is_leaf() && self.filter.hides(node.data.author_count)
    }

    /// A click on a circle follows the modifier rules; a click on empty canvas
    /// always returns to the root.
    pub(in crate::app) fn handle_canvas_click(
        &mut self,
        clicked: Option<usize>,
        modifiers: Modifiers,
        now: f64,
    ) {
        let target = match clicked {
            Some(index) => {
                self.zoom
                    .resolve_click(&self.tree, index, ZoomIntent::from_modifiers(modifiers))
            }
            None => Hierarchy::ROOT,
        };
        self.zoom_to(target, now);
    }

    pub(in crate::app) fn zoom_to(&mut self, target: usize, now: f64) {
        let previous = self.zoom.focus();
        self.zoom.zoom_to(&self.tree, target, now);
        self.label_arcs = recalculate_label_arcs(&self.tree, self.zoom.target_view().scale);

        let focus = self.zoom.focus();
        debug!(
            from = %self.paths[previous],
            to = %self.paths[focus],
            depth = self.tree.node(focus).depth,
            "zoom"
        );
    }

    pub(in crate::app) fn toggle_bucket(&mut self, bucket: AuthorBucket) {
        let selected = self.filter.toggle(bucket);
        let hidden = (0..self.tree.len())
            .filter(|&index| self.is_filtered(index))
            .count();
        info!(
            bucket = bucket.label(),
            selected,
            active = ?self.filter.selected_labels(),
            hidden_files = hidden,
            "author filter changed"
        );
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{Rect, vec2};

    use super::super::super::ColorMode;
    use super::*;
    use crate::repo::{LayoutOptions, build_repo_tree};

    fn model() -> ViewModel {
        let tree = build_repo_tree(
            r#"{"name": "repo", "children": [
                {"name": "src", "children": [
                    {"name": "lib.rs", "size": 400, "author_count": 1},
                    {"name": "util.rs", "size": 100, "author_count": 4}
                ]},
                {"name": "notes.md", "size": 60, "author_count": 2}
            ]}"#,
            LayoutOptions::default(),
        )
        .expect("tree");
        ViewModel::new(tree, ColorMode::Authors)
    }

    fn index_of(model: &ViewModel, name: &str) -> usize {
        model
            .tree
            .nodes()
            .iter()
            .position(|node| node.data.name == name)
            .expect("node exists")
    }

    fn frame() -> CanvasFrame {
        CanvasFrame::new(Rect::from_min_size(Pos2::ZERO, vec2(800.0, 800.0)))
    }

    #[test]
    fn hit_test_prefers_deepest_circle() {
        let model = model();
        let frame = frame();
        let view = model.zoom.view_at(0.0);
        let lib = index_of(&model, "lib.rs");
        let node = model.tree.node(lib);
        let center = frame.to_screen(view, node.x, node.y);

        assert_eq!(model.hit_test(&frame, view, center), Some(lib));
        assert_eq!(model.hit_test(&frame, view, Pos2::new(1.0, 1.0)), None);
    }

    #[test]
    fn filtered_leaves_are_not_clickable() {
        let mut model = model();
        let frame = frame();
        let view = model.zoom.view_at(0.0);
        let lib = index_of(&model, "lib.rs");
        let src = index_of(&model, "src");
        let node = model.tree.node(lib);
        let center = frame.to_screen(view, node.x, node.y);

        model.toggle_bucket(AuthorBucket::Pair);
        assert!(model.is_filtered(lib));
        assert_eq!(model.hit_test(&frame, view, center), Some(src));

        model.toggle_bucket(AuthorBucket::Pair);
        assert!(!model.is_filtered(lib));
        assert_eq!(model.hit_test(&frame, view, center), Some(lib));
    }

    #[test]
    fn clicks_drive_focus_and_label_paths() {
        let mut model = model();
        let src = index_of(&model, "src");
        let root_arc = model.label_arcs[src];

        model.handle_canvas_click(Some(src), Modifiers::default(), 1.0);
        assert_eq!(model.zoom.focus(), src);
        assert!(model.label_arcs[src].radius > root_arc.radius);
        assert!((model.label_arcs[src].radius - 0.5).abs() < 1e-9);

        model.handle_canvas_click(Some(src), Modifiers::default(), 2.0);
        assert_eq!(model.zoom.focus(), Hierarchy::ROOT);
        assert_eq!(model.label_arcs[src], root_arc);
    }

    #[test]
    fn background_click_returns_to_root() {
        let mut model = model();
        let lib = index_of(&model, "lib.rs");
        model.zoom_to(lib, 0.0);
        model.handle_canvas_click(None, Modifiers::default(), 1.0);
        assert_eq!(model.zoom.focus(), Hierarchy::ROOT);
    }

    #[test]
    fn alt_click_climbs_one_level() {
        let mut model = model();
        let lib = index_of(&model, "lib.rs");
        let src = index_of(&model, "src");
        let alt = Modifiers {
            alt: true,
            ..Modifiers::default()
        };
        model.handle_canvas_click(Some(lib), alt, 0.0);
        assert_eq!(model.zoom.focus(), src);
    }
}
