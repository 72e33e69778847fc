use std::io::Read;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use image_text_overlay::application::overlay_service::OverlayService;
use image_text_overlay::config::AppConfig;
use image_text_overlay::domain::object_storage_trait::ObjectStorage;
use image_text_overlay::infrastructure::axum_handler::{router, AppState};
use image_text_overlay::infrastructure::external_image_fetcher::DefaultExternalImageFetcher;
use image_text_overlay::infrastructure::s3_storage::S3ObjectStorage;

#[derive(Parser)]
#[command(name = "image_text_overlay", about = "Draw text annotations onto images")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve POST /invoke (default)
    Serve,
    /// Handle a single request payload and print the response
    Invoke {
        /// JSON file with the request payload, `-` for stdin
        #[arg(long, default_value = "-")]
        event: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // stdout is reserved for `invoke` output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "image_text_overlay=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env().context("invalid configuration")?;

    let storage: Option<Arc<dyn ObjectStorage>> = match &config.storage {
        Some(storage_config) => Some(Arc::new(S3ObjectStorage::new(storage_config).await?)),
        None => {
            tracing::warn!("BUCKET_NAME is not set, return_type 's3' will fail");
            None
        }
    };

    let service = Arc::new(OverlayService::new(
        &config.overlay,
        Arc::new(DefaultExternalImageFetcher::new()),
        storage,
    ));

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config.bind_addr, service).await,
        Command::Invoke { event } => invoke_once(&event, service).await,
    }
}

async fn serve(addr: SocketAddr, service: Arc<OverlayService>) -> anyhow::Result<()> {
    let app = router(AppState {
        overlay_service: service,
    });

    tracing::info!(%addr, "listening");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await
        .context("server error")
}

async fn invoke_once(event: &str, service: Arc<OverlayService>) -> anyhow::Result<()> {
    let raw = if event == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer).context("failed to read payload from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(event).with_context(|| format!("failed to read payload from {}", event))?
    };
    let payload: serde_json::Value = serde_json::from_str(&raw).context("payload is not valid JSON")?;

    let response = tokio::task::spawn_blocking(move || service.handle(payload)).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
