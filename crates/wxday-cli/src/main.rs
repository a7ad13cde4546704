use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use wxday_cli::FileSource;
use wxday_core::ForecastEngine;

#[tokio::main]
async fn main() -> Result<()> {
    // Observability
    wxday_obs::init("wxday");

    // Config
    let cfg = wxday_config::AppConfig::load().context("failed to load configuration")?;
    let settings = cfg
        .engine_settings()
        .context("invalid engine configuration")?;
    tracing::info!(
        timezone = %settings.timezone,
        units = %settings.units,
        "engine configured"
    );
    let engine = ForecastEngine::new(settings, cfg.icon_mapper());

    // Build app and state
    let (app, state) = wxday_cli::build_app(engine)?;

    // Optional startup payload
    if let Some(path) = cfg.payload_path() {
        let mut source = FileSource::new(&path);
        match wxday_cli::load_from_source(&state, &mut source).await {
            Ok(output) => tracing::info!(
                %path,
                noon = output.noon.len(),
                evening = output.evening.len(),
                "startup payload loaded"
            ),
            Err(e) => tracing::error!(error=?e, %path, "failed to load startup payload"),
        }
    }

    // Start HTTP server
    let addr: SocketAddr = cfg
        .http_bind()
        .parse()
        .context("Invalid HTTP bind address")?;
    let listener = TcpListener::bind(addr)
        .await
        .context("failed to bind TCP listener")?;

    // Mark ready just before serving
    wxday_cli::set_ready(&state, true);

    tracing::info!(%addr, "HTTP server listening");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
