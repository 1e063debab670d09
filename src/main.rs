use std::process::ExitCode;

use webgl_serve::error::StartupError;
use webgl_serve::server::signal;
use webgl_serve::{logger, Server, ServerConfig};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger::log_startup_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<(), StartupError> {
    let cfg = ServerConfig::load(args)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(StartupError::Runtime)?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: ServerConfig) -> Result<(), StartupError> {
    let server = Server::bind(cfg)?;
    let addr = server.local_addr().map_err(StartupError::Runtime)?;

    logger::log_server_start(&addr, server.config());

    server
        .run_until(async {
            let name = signal::wait_for_shutdown().await;
            logger::log_shutdown(name);
        })
        .await;

    Ok(())
}
