//! canary server
//!
//! - HTTP: every request answered with the configured content file
//! - Background: synthetic canary metrics written to Cloud Monitoring
//! - Fatal errors (config, hostname, credentials, content file) exit 1

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, EnvFilter};

use canary_core::error::{CanaryError, Result};
use canary_server::{app_state, config, content, emitter, monitoring, router};

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        tracing::error!(code = e.code().as_str(), error = %e, "canary-server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cfg = config::load()?;
    let listen = cfg.server.listen_addr()?;

    let hostname = std::env::var("HOSTNAME").ok();
    let settings = emitter::EmitterSettings::from_config(&cfg.emitter, hostname.as_deref())?;

    if cfg.emitter.dump_env() {
        for (key, value) in config::env_dump(std::env::vars()) {
            tracing::info!(%key, %value, "env");
        }
    }

    let metadata = Arc::new(monitoring::MetadataClient::new(&cfg.emitter.metadata_endpoint)?);
    let tokens = monitoring::TokenProvider::from_env(Arc::clone(&metadata));
    let sink = monitoring::MonitoringClient::connect(&cfg.emitter, tokens).await?;

    let cancel = CancellationToken::new();
    let emitter_task = emitter::Emitter::new(settings, Arc::new(sink), metadata).spawn(cancel.clone());

    let state = app_state::AppState::new(cfg, content::exit_process());
    let app = router::build_router(state);

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| CanaryError::Internal(format!("bind {listen} failed: {e}")))?;
    tracing::info!(%listen, "canary-server starting");

    let shutdown = cancel.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            shutdown.cancel();
        })
        .await
        .map_err(|e| CanaryError::Internal(format!("server failed: {e}")))?;

    cancel.cancel();
    let _ = emitter_task.await;
    Ok(())
}
