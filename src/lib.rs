pub mod api;
pub mod config;
pub mod core_state; // Shared stores + config
pub mod crypto;
pub mod models;
pub mod pipeline; // OCR seam, scoring, ranking, export
pub mod store;

use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::api::ApiContext;
use crate::config::PortalConfig;
use crate::core_state::CoreState;
use crate::pipeline::extraction::ProcessOcrEngine;

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),
    #[error("Server error: {0}")]
    Server(#[from] api::ServerError),
    #[error("Signal handler error: {0}")]
    Signal(#[from] std::io::Error),
}

/// Install the global tracing subscriber. `RUST_LOG` overrides the default.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Serve with `config` until Ctrl-C, then drain.
pub async fn run(config: PortalConfig) -> Result<(), StartupError> {
    tracing::info!("{} starting v{}", crate::config::APP_NAME, crate::config::APP_VERSION);

    if !config.ocr_script.exists() {
        tracing::warn!(
            script = %config.ocr_script.display(),
            "OCR script not found, uploads will score zero points"
        );
    }

    let ocr = ProcessOcrEngine::new(
        config.ocr_python.clone(),
        config.ocr_script.clone(),
        config.ocr_timeout(),
    );
    let bind = config.bind;
    let core = Arc::new(CoreState::new(config)?);
    let ctx = ApiContext::new(core, Arc::new(ocr));

    let server = api::start_portal_server(ctx, bind).await?;
    tracing::info!(addr = %server.addr, "Listening");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Ctrl-C received, shutting down");
    server.stop().await;
    Ok(())
}
