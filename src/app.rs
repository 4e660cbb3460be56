use eframe::egui;

use crate::state::AppState;
use crate::ui::{charts, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ListingLensApp {
    pub state: AppState,
}

impl ListingLensApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for ListingLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: widgets ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: the three chart groups ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(views) = self.state.views.clone() else {
                ui.centered_and_justified(|ui| {
                    ui.heading("Nothing to show  (File → Open…)");
                });
                return;
            };

            let mut bar_event = None;
            let mut brush_events = Vec::new();

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.heading("Filtered Scatterplot of Review Scores by Neighborhood");
                    charts::scatter_chart(ui, &views.scatter);
                    egui::CollapsingHeader::new("Listings")
                        .default_open(false)
                        .show(ui, |ui| {
                            charts::scatter_table(ui, &self.state.dataset, &views.scatter);
                        });
                    ui.separator();

                    ui.heading("Linked Bar Graphs of Listings by Neighborhood");
                    bar_event =
                        charts::linked_bar_charts(ui, &views.bars, &self.state.color_map);
                    ui.separator();

                    ui.heading("Coordinated Histograms of Room Characteristics");
                    brush_events = charts::tick_plots(
                        ui,
                        &views.ticks,
                        self.state.selections.ticks.selection(),
                    );
                });

            // Selections flow back into the coordinator after drawing.
            if let Some(event) = bar_event {
                self.state.handle_bar_event(event);
            }
            for event in brush_events {
                self.state.handle_brush_event(event);
            }
        });
    }
}
