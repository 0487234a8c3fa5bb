use std::sync::Arc;

use goodvibes_server::config::load_config;
use goodvibes_server::startup;
use goodvibes_server::utils::logger::init_logging;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.logging, &config.app_env);
    info!("Loaded configuration: {:?}", config);

    if let Err(e) = startup::run(Arc::new(config)).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
