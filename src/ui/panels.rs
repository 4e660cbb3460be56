use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::filter::RangeBounds;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel: the host-neighbourhood select box and the
/// review-score range.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_empty() {
        ui.label("The dataset has no listings.");
        return;
    }

    // ---- Neighbourhood select box ----
    ui.strong("Filter by Neighborhood");
    let current = state.widgets.neighbourhood.clone().unwrap_or_default();
    let mut picked: Option<String> = None;
    egui::ComboBox::from_id_salt("host_neighbourhood")
        .selected_text(&current)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for option in &state.options.neighbourhoods {
                if ui.selectable_label(current == *option, option).clicked() {
                    picked = Some(option.clone());
                }
            }
        });
    if let Some(neighbourhood) = picked {
        state.set_neighbourhood(neighbourhood);
    }

    ui.add_space(8.0);

    // ---- Review score range ----
    ui.strong("Select Review Scores Range");
    let limits = state.options.score_limits;
    let mut low = state.widgets.score_range.low;
    let mut high = state.widgets.score_range.high;
    ui.add(
        egui::Slider::new(&mut low, limits.low..=limits.high)
            .step_by(0.1)
            .max_decimals(1)
            .text("min"),
    );
    ui.add(
        egui::Slider::new(&mut high, limits.low..=limits.high)
            .step_by(0.1)
            .max_decimals(1)
            .text("max"),
    );
    // Dragging one handle past the other pushes it along.
    if low != state.widgets.score_range.low && low > high {
        high = low;
    } else if high < low {
        low = high;
    }
    state.set_score_range(RangeBounds::new(low, high));

    ui.separator();
    if let Some(views) = &state.views {
        ui.label(format!("{} listings match", views.scatter.view.len()));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} listings loaded from {}",
            state.dataset.len(),
            state.source.display()
        ));

        if state.coercion_warnings > 0 {
            ui.separator();
            ui.label(
                RichText::new(format!(
                    "{} values could not be read as numbers",
                    state.coercion_warnings
                ))
                .color(Color32::YELLOW),
            );
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open listings")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
