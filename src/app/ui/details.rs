use eframe::egui::{self, Align, Layout, RichText, Ui};

use crate::repo::SubtreeStats;
use crate::util::{format_lines, format_share};

use super::super::ViewModel;

const LARGEST_CHILDREN: usize = 12;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Focus Details");
        ui.add_space(6.0);

        let focus = self.zoom.focus();
        let now = ui.input(|input| input.time);
        let mut target = None;

        ui.horizontal_wrapped(|ui| {
            let ancestry = self.tree.ancestry(focus);
            for (position, &index) in ancestry.iter().enumerate() {
                if position > 0 {
                    ui.label("/");
                }
                let name = self.tree.node(index).data.name.as_str();
                if index == focus {
                    ui.label(RichText::new(name).strong());
                } else if ui.link(name).clicked() {
                    target = Some(index);
                }
            }
        });
        ui.add_space(6.0);

        let stats = self.focus_stats(focus);
        ui.label(format!("Lines of code: {}", format_lines(stats.lines)));
        ui.label(format!("Files: {}", stats.files));
        ui.label(format!("Directories: {}", stats.directories));
        ui.label(format!("Distinct authors: {}", stats.distinct_authors));

        ui.separator();
        ui.label(RichText::new("Largest children").strong());
        let children = self.largest_children(focus, LARGEST_CHILDREN);
        if children.is_empty() {
            ui.label("This is a file.");
        } else {
            egui::ScrollArea::vertical()
                .id_salt("largest_children_scroll")
                .max_height(280.0)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    for &index in &children {
                        let node = self.tree.node(index);
                        let clicked = ui
                            .horizontal(|ui| {
                                let name = if node.is_leaf() {
                                    node.data.name.clone()
                                } else {
                                    format!("{}/", node.data.name)
                                };
                                let clicked = ui.link(name).clicked();
                                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                    ui.label(format_lines(node.value));
                                });
                                clicked
                            })
                            .inner;
                        if clicked {
                            target = Some(index);
                        }
                    }
                });
        }

        ui.separator();
        ui.label(RichText::new("Hovered").strong());
        match self.hovered {
            Some(index) => {
                let node = self.tree.node(index);
                ui.label(self.paths[index].as_str());
                if !self.tree.is_within(index, focus) {
                    ui.small("outside the focused directory");
                }
                ui.label(format!("Lines of code: {}", format_lines(node.value)));
                if node.is_leaf() {
                    ui.label(format!(
                        "Old code share: {}",
                        format_share(node.data.fraction_old)
                    ));
                }
            }
            None => {
                ui.label("Point at a circle to inspect it.");
            }
        }

        if let Some(index) = target {
            self.zoom_to(index, now);
        }
    }

    fn focus_stats(&mut self, focus: usize) -> SubtreeStats {
        match self.focus_stats_cache {
            Some((cached, stats)) if cached == focus => stats,
            _ => {
                let stats = self.tree.subtree_stats(focus);
                self.focus_stats_cache = Some((focus, stats));
                stats
            }
        }
    }

    /// Children of `index` ordered by aggregated value, largest first.
    fn largest_children(&self, index: usize, limit: usize) -> Vec<usize> {
        let mut children = self.tree.node(index).children.clone();
        children.sort_by(|&a, &b| {
            self.tree
                .node(b)
                .value
                .total_cmp(&self.tree.node(a).value)
                .then(a.cmp(&b))
        });
        children.truncate(limit);
        children
    }
}
