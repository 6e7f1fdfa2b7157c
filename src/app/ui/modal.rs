use eframe::egui::{self, Context, RichText};

use super::super::ViewModel;

const NAVIGATION_HELP: [(&str, &str); 5] = [
    ("Click a circle", "Zoom into that directory or file."),
    ("Click the focused circle", "Zoom back out to the repository root."),
    ("Alt + click", "Zoom out one level."),
    ("Ctrl / Cmd + click", "Jump straight back to the root."),
    ("Click a legend dot", "Show only files with that many authors. Click again to undo."),
];

impl ViewModel {
    pub(in crate::app) fn show_modal(&mut self) {
        self.navigation_modal_open = true;
    }

    pub(in crate::app) fn close_modal(&mut self) {
        self.navigation_modal_open = false;
    }

    pub(in crate::app) fn draw_navigation_modal(&mut self, ctx: &Context) {
        if !self.navigation_modal_open {
            return;
        }

        let modal = egui::Modal::new(egui::Id::new("navigation-modal")).show(ctx, |ui| {
            ui.set_max_width(420.0);
            ui.heading("Navigation");
            ui.add_space(6.0);

            egui::Grid::new("navigation-help")
                .num_columns(2)
                .spacing([16.0, 6.0])
                .show(ui, |ui| {
                    for (gesture, effect) in NAVIGATION_HELP {
                        ui.label(RichText::new(gesture).strong());
                        ui.label(effect);
                        ui.end_row();
                    }
                });

            ui.add_space(6.0);
            ui.label("Circle size is lines of code. Labels show the focused level and the one below it.");
            ui.add_space(10.0);
            ui.button("Close").clicked()
        });

        if modal.inner || modal.should_close() {
            self.close_modal();
        }
    }
}
