use std::process::ExitCode;

use grocery_app::config::AppConfig;
use grocery_app::logging::{self, LogDestination};
use grocery_app::{cancel_on_ctrl_c, pipeline};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("ERROR: {err}");
            return ExitCode::FAILURE;
        }
    };
    logging::initialize(if config.log_to_file {
        LogDestination::Both
    } else {
        LogDestination::Terminal
    });

    match pipeline::task_fetch::run(&config, cancel_on_ctrl_c()).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            println!("ERROR: {err:#}");
            ExitCode::FAILURE
        }
    }
}
