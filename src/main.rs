//! Aqua-Shield - oil/water contamination risk console

mod api;
mod logic;
pub mod constants;

use logic::config::PipelineConfig;

fn main() {
    let config = PipelineConfig::default();
    logic::logging::init(&config.root);

    log::info!(
        "Starting {} v{} (root {})",
        constants::APP_NAME,
        constants::APP_VERSION,
        config.root.display()
    );

    if config.store().exists() {
        log::info!("Trained artifacts found in {}", config.store().model_dir().display());
    } else {
        log::info!("No trained artifacts yet - evaluation menu disabled");
    }

    if let Err(e) = api::menu::run_stdio(&config) {
        log::error!("Console I/O error: {}", e);
        eprintln!("Erro de entrada/saída: {}", e);
        std::process::exit(1);
    }
}
