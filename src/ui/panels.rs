use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::metrics::ThresholdMetrics;
use crate::state::AppState;

const FINDINGS: &str = "• Clinic 1 shows a large drop in deaths around 1847 (hand-washing introduction).\n\
                        • Clinic 2 has lower mortality across the period.\n\n\
                        Use the filters above to refine by year or clinic.";

// ---------------------------------------------------------------------------
// Left side panel – controls, findings, quick metrics
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Clinic multiselect ----
            ui.strong(format!(
                "Select clinics  ({}/{})",
                state.criteria.clinics.len(),
                dataset.clinics.len()
            ));
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_clinics();
                }
                if ui.small_button("None").clicked() {
                    state.select_no_clinics();
                }
            });

            for clinic in &dataset.clinics {
                let mut checked = state.criteria.clinics.contains(clinic);
                let mut text = RichText::new(clinic);
                if let Some(cm) = &state.color_map {
                    text = text.color(cm.color_for(clinic));
                }
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_clinic(clinic);
                }
            }
            ui.separator();

            // ---- Year range ----
            if let Some((min, max)) = dataset.year_bounds {
                ui.strong("Year range");
                let (mut lo, mut hi) = state.criteria.years;
                if ui.add(Slider::new(&mut lo, min..=max).text("from")).changed() {
                    state.set_year_start(lo);
                }
                if ui.add(Slider::new(&mut hi, min..=max).text("to")).changed() {
                    state.set_year_end(hi);
                }
                ui.separator();
            }

            // ---- Findings ----
            ui.heading("Findings");
            ui.label(FINDINGS);
            ui.separator();

            if let Some(view) = &state.view {
                quick_metrics(ui, &view.metrics);
            }
        });
}

fn quick_metrics(ui: &mut Ui, metrics: &ThresholdMetrics) {
    ui.strong("Quick metrics (selected clinics & years)");
    ui.add_space(4.0);
    metric(ui, &metrics.pre_label(), &metrics.pre_text(), None);
    ui.add_space(4.0);
    metric(
        ui,
        &metrics.post_label(),
        &metrics.post_text(),
        metrics.delta_text().as_deref(),
    );
}

/// Label, big value, and an optional coloured delta underneath.
fn metric(ui: &mut Ui, label: &str, value: &str, delta: Option<&str>) {
    ui.label(RichText::new(label).small());
    ui.label(RichText::new(value).size(28.0));
    if let Some(delta) = delta {
        let color = if delta.starts_with('-') {
            Color32::from_rgb(255, 75, 75)
        } else {
            Color32::from_rgb(33, 195, 84)
        };
        ui.label(RichText::new(delta).color(color));
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
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
            if ui.button("Clear cache").clicked() {
                state.clear_cache();
                ui.close_menu();
            }
            if ui
                .add_enabled(state.view.is_some(), egui::Button::new("Export chart specs…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(view)) = (&state.dataset, &state.view) {
            ui.label(format!(
                "{}: {} records loaded, {} shown",
                state.data_path.display(),
                ds.len(),
                view.table.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open yearly clinic data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
        if let Some(ds) = &state.dataset {
            log::info!(
                "Showing {} records with clinics {:?}",
                ds.len(),
                ds.clinics
            );
        }
    }
}

fn export_dialog(state: &mut AppState) {
    let dir = rfd::FileDialog::new()
        .set_title("Export chart specifications")
        .pick_folder();

    if let Some(dir) = dir {
        state.export_charts(&dir);
    }
}
