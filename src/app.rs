use eframe::egui;

use crate::state::{AppState, Tab};
use crate::ui::{pages, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar and tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: selections ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| match self.state.tab {
                Tab::Performance => panels::performance_filters(ui, &mut self.state.performance),
                Tab::Survey => panels::survey_filters(ui, &mut self.state),
            });

        // ---- Central panel: results ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.tab {
            Tab::Performance => pages::performance_page(ui, &mut self.state),
            Tab::Survey => pages::survey_page(ui, &mut self.state),
        });
    }
}
