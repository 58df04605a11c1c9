use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use contactscan::api::{create_router, AppState};
use contactscan::config::Config;
use contactscan::models::Record;
use contactscan::ocr::OcrProvider;
use contactscan::pipeline::ExtractionPipeline;

#[derive(Parser)]
#[command(name = "contactscan")]
#[command(about = "Pull name and phone-number pairs out of images with OCR")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Override CONTACTSCAN_HOST
        #[arg(long)]
        host: Option<String>,
        /// Override PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Extract records from local image files and print them
    Scan {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Print `name - number` lines instead of JSON
        #[arg(long)]
        plain: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();
    init_tracing();

    let mut config = Config::from_env();

    match args.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
    }) {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await
        }
        Command::Scan { files, plain } => scan(config, files, plain).await,
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "contactscan=info,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn init_ocr(config: &Config) -> anyhow::Result<OcrProvider> {
    tracing::info!("Initializing OCR provider: {}...", config.ocr.model);
    let ocr = OcrProvider::new(&config.ocr)?;
    if !ocr.is_available() {
        tracing::warn!("OCR unavailable - /extract will answer 503 until this is fixed");
    }
    Ok(ocr)
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let ocr = init_ocr(&config)?;
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState::new(config, ocr);
    let app = create_router(state);

    tracing::info!("Contactscan starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/health", addr);
    tracing::info!("  API docs:     http://{}/docs", addr);
    tracing::info!("  OpenAPI spec: http://{}/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn scan(config: Config, files: Vec<PathBuf>, plain: bool) -> anyhow::Result<()> {
    let ocr = init_ocr(&config)?;
    if !ocr.is_available() {
        anyhow::bail!("OCR backend '{}' is not available", config.ocr.model);
    }
    let pipeline = ExtractionPipeline::new(ocr);

    let mut records: Vec<Record> = Vec::new();
    for path in &files {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let found = pipeline
            .recognize(&bytes)
            .await
            .with_context(|| format!("failed to scan {}", path.display()))?;
        tracing::info!(file = %path.display(), records = found.len(), "Scanned");
        records.extend(found);
    }

    if plain {
        for record in &records {
            println!("{}", record.to_clipboard_line());
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&records)?);
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received, draining in-flight requests...");
}
