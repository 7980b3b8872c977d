mod app;
mod color;
mod state;
mod ui;

use app::LaptopLensApp;
use clap::Parser;
use eframe::egui;
use laptop_lens::config::Args;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();
    let args = Args::parse();

    let mut state = AppState::new(&args.table);
    match args.source_spec() {
        Ok(Some(spec)) => state.load(&spec),
        Ok(None) => {}
        Err(e) => {
            log::error!("Invalid --source: {e}");
            state.status_message = Some(format!("Error: {e}"));
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Laptop Specifications Analysis Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(LaptopLensApp::new(state)))),
    )
}
