use eframe::egui::{self, Align, Layout, RichText, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use tracing::debug;

use crate::util::format_lines;

use super::super::color::author_color;
use super::super::filter::AuthorBucket;
use super::super::{ColorMode, SearchCache, SearchHit, ViewModel};

const MAX_SEARCH_HITS: usize = 40;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Best-scoring paths for `query`, highest score first, ties in tree order.
fn search_paths(paths: &[String], query: &str, limit: usize) -> Vec<SearchHit> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();
    let mut hits = paths
        .iter()
        .enumerate()
        .filter_map(|(index, path)| {
            fuzzy_match_score(&matcher, path, query).map(|score| SearchHit { index, score })
        })
        .collect::<Vec<_>>();
    hits.sort_by(|a, b| b.score.cmp(&a.score).then(a.index.cmp(&b.index)));
    hits.truncate(limit);
    hits
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("View Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Color");
        let previous_mode = self.color_mode;
        egui::ComboBox::from_id_salt("color_mode")
            .selected_text(self.color_mode.label())
            .show_ui(ui, |ui| {
                for mode in [ColorMode::Authors, ColorMode::Code] {
                    ui.selectable_value(&mut self.color_mode, mode, mode.label());
                }
            });
        if self.color_mode != previous_mode {
            debug!(mode = ?self.color_mode, "color mode changed");
        }

        ui.separator();
        ui.label(RichText::new("Author filter").strong());
        let mut toggled = None;
        for bucket in AuthorBucket::ALL {
            let text = RichText::new(bucket.label()).color(author_color(Some(bucket.value())));
            if ui
                .selectable_label(self.filter.is_selected(bucket), text)
                .on_hover_text("Same as clicking the legend dot.")
                .clicked()
            {
                toggled = Some(bucket);
            }
        }
        if let Some(bucket) = toggled {
            self.toggle_bucket(bucket);
        }

        if self.filter.is_active() {
            ui.horizontal(|ui| {
                ui.label(format!("showing: {}", self.filter.selected_labels().join(", ")));
                if ui.small_button("Clear").clicked() {
                    for bucket in AuthorBucket::ALL {
                        if self.filter.is_selected(bucket) {
                            self.toggle_bucket(bucket);
                        }
                    }
                }
            });
        } else {
            ui.small("All files shown.");
        }

        ui.separator();
        ui.label("Search files and directories")
            .on_hover_text("Fuzzy match against the full path. Click a hit to zoom to it.");
        ui.text_edit_singleline(&mut self.search);

        let hits = self.search_hits();
        if !self.search.trim().is_empty() && hits.is_empty() {
            ui.small("No matches.");
        }

        let mut target = None;
        egui::ScrollArea::vertical()
            .id_salt("search_hits_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for hit in &hits {
                    let node = self.tree.node(hit.index);
                    let is_focused = self.zoom.is_focused(hit.index);
                    let clicked = ui
                        .horizontal(|ui| {
                            let clicked = ui
                                .selectable_label(is_focused, node.data.name.as_str())
                                .on_hover_text(self.paths[hit.index].as_str())
                                .clicked();
                            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                ui.label(format_lines(node.value));
                            });
                            clicked
                        })
                        .inner;
                    if clicked {
                        target = Some(hit.index);
                    }
                }
            });

        if let Some(index) = target {
            let now = ui.input(|input| input.time);
            self.zoom_to(index, now);
        }
    }

    fn search_hits(&mut self) -> Vec<SearchHit> {
        let stale = self
            .search_cache
            .as_ref()
            .is_none_or(|cache| cache.query != self.search);
        if stale {
            self.search_cache = Some(SearchCache {
                query: self.search.clone(),
                hits: search_paths(&self.paths, &self.search, MAX_SEARCH_HITS),
            });
        }

        self.search_cache
            .as_ref()
            .map(|cache| cache.hits.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::{LayoutOptions, build_repo_tree};

    fn paths() -> Vec<String> {
        ["repo", "repo/src", "repo/src/parser.rs", "repo/docs/README.md", "repo/src/lexer.rs"]
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn empty_query_has_no_hits() {
        assert!(search_paths(&paths(), "   ", 10).is_empty());
    }

    #[test]
    fn fuzzy_query_finds_matching_paths() {
        let hits = search_paths(&paths(), "parser", 10);
        assert_eq!(hits.first().map(|hit| hit.index), Some(2));
        assert!(hits.iter().all(|hit| hit.index != 3));
    }

    #[test]
    fn query_falls_back_to_lowercase() {
        let hits = search_paths(&paths(), "readme", 10);
        assert!(hits.iter().any(|hit| hit.index == 3));
    }

    #[test]
    fn hits_are_capped() {
        let hits = search_paths(&paths(), "r", 2);
        assert_eq!(hits.len(), 2);
        assert!(hits[0].score >= hits[1].score);
    }

    #[test]
    fn search_cache_follows_query() {
        let tree = build_repo_tree(
            r#"{"name": "repo", "children": [{"name": "main.rs", "size": 3}]}"#,
            LayoutOptions::default(),
        )
        .expect("tree");
        let mut model = ViewModel::new(tree, ColorMode::Authors);

        model.search = "main".to_owned();
        assert_eq!(model.search_hits().first().map(|hit| hit.index), Some(1));
        model.search.clear();
        assert!(model.search_hits().is_empty());
        assert_eq!(model.search_cache.as_ref().map(|cache| cache.query.as_str()), Some(""));
    }
}
