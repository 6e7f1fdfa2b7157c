use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use tracing::{error, info};

use crate::repo::{Hierarchy, LayoutOptions, SubtreeStats, load_repo_tree};

mod color;
mod filter;
mod graph;
mod labels;
mod render_utils;
mod ui;
mod zoom;

pub use color::ColorMode;

use filter::FilterSelection;
use labels::LabelArc;
use zoom::ZoomState;

pub struct CodeBubblesApp {
    data_path: PathBuf,
    layout: LayoutOptions,
    initial_color_mode: ColorMode,
    state: AppState,
    reload_rx: Option<Receiver<Result<Hierarchy, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<Hierarchy, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    tree: Hierarchy,
    paths: Vec<String>,
    zoom: ZoomState,
    label_arcs: Vec<LabelArc>,
    filter: FilterSelection,
    color_mode: ColorMode,
    search: String,
    search_cache: Option<SearchCache>,
    focus_stats_cache: Option<(usize, SubtreeStats)>,
    hovered: Option<usize>,
    navigation_modal_open: bool,
}

struct SearchCache {
    query: String,
    hits: Vec<SearchHit>,
}

#[derive(Clone, Copy)]
struct SearchHit {
    index: usize,
    score: i64,
}

impl CodeBubblesApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        data_path: PathBuf,
        layout: LayoutOptions,
        initial_color_mode: ColorMode,
    ) -> Self {
        let state = Self::start_load(data_path.clone(), layout);
        Self {
            data_path,
            layout,
            initial_color_mode,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(data_path: PathBuf, layout: LayoutOptions) -> Receiver<Result<Hierarchy, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_repo_tree(&data_path, layout).map_err(|error| {
                error!(path = %data_path.display(), "failed to load hierarchy: {error:#}");
                format!("{error:#}")
            });
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(data_path: PathBuf, layout: LayoutOptions) -> AppState {
        info!(path = %data_path.display(), "loading hierarchy");
        AppState::Loading {
            rx: Self::spawn_load(data_path, layout),
        }
    }

    fn ready_state(tree: Hierarchy, color_mode: ColorMode) -> AppState {
        info!(
            nodes = tree.len(),
            lines = tree.root().value,
            "hierarchy ready"
        );
        AppState::Ready(Box::new(ViewModel::new(tree, color_mode)))
    }
}

impl eframe::App for CodeBubblesApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(tree)) => {
                        transition = Some(Self::ready_state(tree, self.initial_color_mode));
                    }
                    Ok(Err(error)) => transition = Some(AppState::Error(error)),
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => {
                        transition =
                            Some(AppState::Error("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading repository layout...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load repository layout");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.data_path.clone(), self.layout));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.data_path, &mut reload_requested, is_reloading);
                let color_mode = model.color_mode;

                if reload_requested && self.reload_rx.is_none() {
                    info!(path = %self.data_path.display(), "reloading hierarchy");
                    self.reload_rx = Some(Self::spawn_load(self.data_path.clone(), self.layout));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(tree)) => transition = Some(Self::ready_state(tree, color_mode)),
                        Ok(Err(error)) => transition = Some(AppState::Error(error)),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if matches!(self.state, AppState::Loading { .. }) {
            ctx.request_repaint();
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
