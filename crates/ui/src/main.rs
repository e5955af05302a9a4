mod app;
mod http;
mod pages;

use anyhow::Result;
use simplelog::{Config, LevelFilter, WriteLogger};

fn main() -> Result<()> {
    let log_file = std::fs::File::create("perfdash.log")?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)?;

    let args: Vec<String> = std::env::args().collect();
    let base_url = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| "http://127.0.0.1:5000".to_owned());
    log::info!("profiler endpoint base: {base_url}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([900.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "perfdash",
        options,
        Box::new(move |cc| Ok(Box::new(app::DashApp::new(cc, &base_url)))),
    )
    .map_err(|err| anyhow::anyhow!("failed to start ui: {err}"))
}
