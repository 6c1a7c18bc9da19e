use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fin_insights::{logging, router, AppState};
use fin_insights_lib::AppConfig;

#[derive(Parser)]
#[command(name = "fin-insights")]
#[command(about = "Financial Insights API: stock quotes, fin-insight reports and arXiv listings")]
struct Cli {
    /// Bind address (overrides APP_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides APP_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Environment file to load instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("failed to load env file {}", path.display()))?;
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(logging::env_filter(
            std::env::var("RUST_LOG").ok().as_deref(),
        ))
        .with_target(false)
        .init();

    let mut config = AppConfig::from_env()?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    if config.alpha_vantage_api_key.is_none() {
        tracing::warn!("ALPHA_VANTAGE_API_KEY is not set; /stock_quote will answer 500");
    }
    if config.tiingo_api_key.is_none() {
        tracing::warn!("TIINGO_API_KEY is not set; Tiingo fallback and /stock_quote/eod are disabled");
    }

    let state = AppState::from_config(&config)?.shared();
    let app = router(state, &config.cors_origins);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Financial Insights API listening on http://{}", addr);
    tracing::info!("Docs at http://{}/docs and http://{}/redoc", addr, addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
