use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use filedesk_server::api::{AppState, HandlerSettings};
use filedesk_server::config::FiledeskConfig;
use filedesk_server::services::create_services;
use filedesk_server::views::Views;

/// Web front-end for uploading, processing and auditing files.
#[derive(Parser, Debug)]
#[command(name = "filedesk-server", about = "Standalone HTTP server for filedesk")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "filedesk.toml")]
    config: String,

    /// Override the bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration from TOML file, or use defaults if the file does not exist.
    let config_exists = Path::new(&cli.config).exists();
    let config: FiledeskConfig = if config_exists {
        let contents = std::fs::read_to_string(&cli.config)?;
        toml::from_str(&contents)?
    } else {
        FiledeskConfig::default()
    };

    let telemetry_guard = filedesk_server::telemetry::init(&config.telemetry);

    if !config_exists {
        info!(path = %cli.config, "config file not found, using defaults");
    }

    let services = create_services(&config).await?;
    let state = AppState {
        blobs: services.blobs,
        queue: services.queue,
        audit: services.audit,
        views: Arc::new(Views::new()?),
        settings: Arc::new(HandlerSettings::from_config(&config)),
    };

    state.record_audit("Starting", "Started webapp").await?;

    let app = filedesk_server::api::router(state);

    // Resolve the bind address (CLI overrides take precedence).
    let host = cli.host.unwrap_or(config.server.host);
    let port = cli.port.unwrap_or(config.server.port);
    let addr = format!("{host}:{port}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "filedesk-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    telemetry_guard.shutdown();

    info!("filedesk-server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
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
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("received SIGINT"); }
        () = terminate => { info!("received SIGTERM"); }
    }
}
