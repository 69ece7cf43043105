//! Salesboard - CSV Sales Analysis & Chart Dashboard
//!
//! Import a CSV sales dataset, explore grouped revenue as pie or bar charts,
//! and export the current view to a two-sheet Excel workbook.

mod charts;
mod data;
mod gui;
mod xlsx;

use eframe::egui;
use gui::SalesboardApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 700.0])
            .with_min_inner_size([980.0, 620.0])
            .with_title("Salesboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Salesboard",
        options,
        Box::new(|cc| Ok(Box::new(SalesboardApp::new(cc)))),
    )
}
