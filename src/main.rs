use std::sync::Arc;

use media_range_server::config::{AppState, Config};
use media_range_server::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = match std::env::args().nth(1) {
        Some(config_path) => Config::load_from(&config_path)?,
        None => Config::load()?,
    };
    logger::init(&cfg)?;

    // One thread drives every connection; file I/O is the only suspend point
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    if !cfg.media.dir.is_dir() {
        logger::log_warning(&format!(
            "Media directory '{}' does not exist; every media request will 404",
            cfg.media.dir.display()
        ));
    }

    logger::log_server_start(&listener.local_addr()?, &cfg);
    let state = Arc::new(AppState::new(&cfg));

    // Use LocalSet for spawn_local support
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::run(listener, state, server::shutdown_signal()))
        .await;

    Ok(())
}
