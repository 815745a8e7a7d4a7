mod app;
mod color;
mod data;
mod state;
mod theme;
mod ui;

use std::path::Path;

use app::PovertyDashApp;
use data::model::PovertyDataset;
use eframe::egui;

/// Loaded at startup when present and no path was given on the command line.
const DEFAULT_DATASET: &str = "data/pip_dataset.csv";

fn main() -> eframe::Result {
    env_logger::init();

    let dataset = startup_dataset();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "World Poverty Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(PovertyDashApp::new(cc, dataset)))),
    )
}

/// Resolve the one-time startup load. An explicitly requested file that fails
/// to load is fatal; a missing or broken default file just starts an empty
/// session with File → Open available.
fn startup_dataset() -> Option<PovertyDataset> {
    if let Some(arg) = std::env::args().nth(1) {
        match data::loader::load_file(Path::new(&arg)) {
            Ok(ds) => return Some(ds),
            Err(e) => {
                log::error!("Failed to load {arg}: {e}");
                std::process::exit(1);
            }
        }
    }

    let default = Path::new(DEFAULT_DATASET);
    if !default.exists() {
        return None;
    }
    match data::loader::load_file(default) {
        Ok(ds) => Some(ds),
        Err(e) => {
            log::error!("Failed to load {DEFAULT_DATASET}: {e}");
            None
        }
    }
}
