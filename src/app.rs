use eframe::egui;

use crate::data::model::PovertyDataset;
use crate::state::{AppState, ViewTab};
use crate::ui::{charts, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PovertyDashApp {
    pub state: AppState,
}

impl PovertyDashApp {
    pub fn new(cc: &eframe::CreationContext<'_>, dataset: Option<PovertyDataset>) -> Self {
        let mut state = AppState::default();
        if let Some(ds) = dataset {
            state.set_dataset(ds);
        }
        state.theme.apply(&cc.egui_ctx);
        Self { state }
    }
}

impl eframe::App for PovertyDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filter controls ----
        egui::SidePanel::left("control_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::control_panel(ui, &mut self.state);
            });

        // ---- Central panel: tabbed result views ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                for tab in ViewTab::ALL {
                    if ui
                        .selectable_label(self.state.active_tab == tab, tab.label())
                        .clicked()
                    {
                        self.state.active_tab = tab;
                    }
                }
            });
            ui.separator();

            match self.state.active_tab {
                ViewTab::LineChart => charts::line_chart(ui, &self.state),
                ViewTab::BarChart => charts::bar_chart(ui, &self.state),
                ViewTab::Table => table::data_table(ui, &mut self.state),
            }
        });
    }
}
