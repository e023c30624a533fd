use eframe::egui::{Color32, RichText, Ui};

use super::{charts, table};
use crate::state::AppState;

pub const TITLE: &str = "Yearly births and deaths by clinic";

const INTRO: &str = "This dashboard visualizes yearly births and deaths from two clinics in the \
                     1840s. The dataset is the classic Semmelweis case used to study how \
                     hand-washing changed outcomes.";

const TIP: &str =
    "Tip: adjust the clinic selection and year range in the sidebar to update the charts.";

// ---------------------------------------------------------------------------
// Central panel – table and charts
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &AppState) {
    ui.heading(RichText::new(TITLE).size(26.0));
    ui.label(INTRO);
    ui.add_space(8.0);

    if let Some(err) = &state.fatal_error {
        ui.label(RichText::new(err).color(Color32::RED).strong());
        return;
    }

    let (Some(view), Some(colors)) = (&state.view, &state.color_map) else {
        ui.label("Open a file to view the dashboard  (File → Open…)");
        return;
    };

    ui.heading("Data sample");
    table::data_table(ui, &view.table);
    ui.separator();

    ui.heading("Deaths over time (line chart)");
    charts::chart(ui, "line_chart", &view.line, colors);
    ui.add_space(12.0);

    ui.heading("Deaths by year and clinic (grouped bars)");
    charts::chart(ui, "bar_chart", &view.bar, colors);
    ui.add_space(12.0);

    ui.heading("Births vs Deaths (scatter)");
    charts::chart(ui, "scatter_chart", &view.scatter, colors);

    ui.separator();
    ui.label(TIP);
}
