use eframe::egui;

use crate::state::{AppState, Page};
use crate::ui::{pages, panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LaptopLensApp {
    pub state: AppState,
}

impl LaptopLensApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for LaptopLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: menu and filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: active page ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(snapshot) = &self.state.snapshot else {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a laptop table to begin  (File → Open…)");
                });
                return;
            };

            match self.state.page {
                Page::Home => pages::home_page(ui, snapshot),
                Page::Charts => {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        plot::charts_page(ui, snapshot);
                    });
                }
                Page::Data => pages::data_page(ui, snapshot),
            }
        });
    }
}
