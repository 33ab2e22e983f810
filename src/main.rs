use std::process::ExitCode;
use std::sync::Arc;

use monocle::config::{AppState, Config};
use monocle::error::ServerError;
use monocle::{logger, server};

fn main() -> ExitCode {
    // Optional config file path (without extension) as the first argument
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config".to_string());

    let cfg = match Config::load_from(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("❌ {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logger::init(&cfg.logging) {
        eprintln!("❌ {e}");
        return ExitCode::FAILURE;
    }
    logger::print_banner();

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let result = runtime_builder
        .build()
        .map_err(ServerError::from)
        .and_then(|runtime| runtime.block_on(async_main(cfg)));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(ServerError::Bind { addr, source }) => {
            logger::log_bind_failed(&addr, &source);
            ExitCode::FAILURE
        }
        Err(e) => {
            logger::log_error(&format!("❌ Server error: {e}"));
            ExitCode::FAILURE
        }
    }
}

async fn async_main(cfg: Config) -> Result<(), ServerError> {
    let addr = cfg.socket_addr()?;
    let listener = server::bind(addr)?;

    logger::log_server_start(&addr, &cfg);
    let state = Arc::new(AppState::new(cfg));

    server::run(listener, state, shutdown_reason()).await
}

async fn shutdown_reason() -> &'static str {
    match server::shutdown_signal().await {
        Ok(signal) => signal,
        Err(e) => {
            logger::log_error(&format!("Failed to install signal handlers: {e}"));
            std::future::pending().await
        }
    }
}
