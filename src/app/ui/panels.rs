use std::path::Path;

use eframe::egui::{self, Align, Context, Layout};

use crate::repo::Hierarchy;

use super::super::labels::recalculate_label_arcs;
use super::super::zoom::ZoomState;
use super::super::{ColorMode, ViewModel};
use super::super::filter::FilterSelection;

impl ViewModel {
    pub(in crate::app) fn new(tree: Hierarchy, color_mode: ColorMode) -> Self {
        let paths = (0..tree.len()).map(|index| tree.path_of(index)).collect();
        let zoom = ZoomState::new(&tree);
        let label_arcs = recalculate_label_arcs(&tree, zoom.target_view().scale);

        Self {
            tree,
            paths,
            zoom,
            label_arcs,
            filter: FilterSelection::default(),
            color_mode,
            search: String::new(),
            search_cache: None,
            focus_stats_cache: None,
            hovered: None,
            navigation_modal_open: false,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        data_path: &Path,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("code-bubbles");
                    ui.separator();
                    ui.label(format!("root: {}", self.tree.root().data.name));
                    ui.label(format!("data: {}", data_path.display()));
                    ui.label(format!("files: {}", self.file_count()));
                    if ui.button("Navigation").clicked() {
                        self.show_modal();
                    }
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload data"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!("focus: {}", self.paths[self.zoom.focus()]));
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(egui::Color32::WHITE))
            .show(ctx, |ui| {
                if is_loading {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Reloading repository layout...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                } else {
                    self.draw_canvas(ui);
                }
            });

        self.draw_navigation_modal(ctx);
    }

    fn file_count(&self) -> usize {
        self.tree.nodes().iter().filter(|node| node.is_leaf()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::{LayoutOptions, build_repo_tree};

    #[test]
    fn new_model_starts_at_root_without_filter() {
        let tree = build_repo_tree(
            r#"{"name": "repo", "children": [
                {"name": "src", "children": [{"name": "a.rs", "size": 4}]},
                {"name": "b.rs", "size": 9}
            ]}"#,
            LayoutOptions::default(),
        )
        .expect("tree");
        let model = ViewModel::new(tree, ColorMode::Code);

        assert!(model.zoom.is_focused(Hierarchy::ROOT));
        assert!(!model.filter.is_active());
        assert_eq!(model.color_mode, ColorMode::Code);
        assert_eq!(model.paths, vec!["repo", "repo/src", "repo/b.rs", "repo/src/a.rs"]);
        assert_eq!(model.label_arcs.len(), model.tree.len());
        assert_eq!(model.file_count(), 2);
    }
}
