use eframe::egui;

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{dashboard, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ClinicDashboardApp {
    pub state: AppState,
    sidebar_width: f32,
}

impl ClinicDashboardApp {
    /// Build the app and load the configured dataset up front.
    pub fn new(config: &DashboardConfig) -> Self {
        let mut state = AppState::new(config.data_path.clone());
        state.load(&config.data_path);

        Self {
            state,
            sidebar_width: config.sidebar.width,
        }
    }
}

impl eframe::App for ClinicDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: controls and metrics ----
        egui::SidePanel::left("control_panel")
            .default_width(self.sidebar_width)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: table and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    dashboard::central_panel(ui, &self.state);
                });
        });
    }
}
