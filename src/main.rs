use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use report_viewer::config::{AppState, Config, DEFAULT_CONFIG_FILE};
use report_viewer::server::{self, Server};
use report_viewer::viewer::{ReportStore, ReportViewer};
use report_viewer::{handler, logger};

fn main() -> ExitCode {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

    match run(&config_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger::log_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: &str) -> report_viewer::Result<()> {
    let config = Config::load_from(config_path)?;
    logger::init(&config.logging)?;

    // Tokio runtime, worker count from config or CPU cores
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = config.server.workers.filter(|&n| n > 0) {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(config))
}

async fn async_main(config: Config) -> report_viewer::Result<()> {
    let store = match &config.viewer.report_path {
        Some(path) => ReportStore::load(path)?,
        None => {
            logger::log_warning("No viewer.report_path configured, serving an empty report");
            ReportStore::new("")
        }
    };
    if !Path::new(&config.viewer.ui_dir).is_dir() {
        logger::log_warning(&format!(
            "Viewer UI directory '{}' does not exist",
            config.viewer.ui_dir
        ));
    }

    let report_name = store.report_name().to_string();
    let artifacts = store.artifact_count();
    let routing = handler::build_routing(&config.viewer);
    let state = Arc::new(AppState::new(config, routing, Arc::new(store)));

    let server = Server::bind(Arc::clone(&state))?;
    logger::log_server_start(&server.local_addr()?, &state.config, &report_name, artifacts);

    server.serve_until(server::shutdown_signal()).await
}
