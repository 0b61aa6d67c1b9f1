#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod api;
mod config;
mod grid;
mod ui;

use eframe::egui;

fn main() -> eframe::Result<()> {
    env_logger::init();
    log::info!("Starting Huddle");

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([900.0, 760.0])
        .with_min_inner_size([720.0, 640.0])
        .with_title("Huddle");

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Huddle",
        options,
        Box::new(|cc| Ok(Box::new(ui::HuddleApp::new(cc)))),
    )
}
