use clap::Parser;
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use suryad::{
    app, config::Config, ocr::SuryaOcr, services::processor::DocumentProcessor,
    storage::StorageLayout, AppState,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "HTTP front end for a subprocess OCR engine", long_about = None)]
struct Args {
    /// Address to bind, overriding SERVER_ADDRESS
    #[arg(short, long)]
    address: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "suryad=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env()?;
    if let Some(address) = args.address {
        config.server_address = address;
    }

    let storage = Arc::new(StorageLayout::new(&config));
    storage.initialize().await?;

    let engine = Arc::new(SuryaOcr::new(config.ocr_command.clone()));
    let processor = DocumentProcessor::new(storage.clone(), engine, config.ocr_language.clone());

    info!(
        ocr_command = %config.ocr_command,
        ocr_language = %config.ocr_language,
        "starting document ingestion service"
    );

    let state = Arc::new(AppState {
        config: config.clone(),
        storage,
        processor,
    });

    let listener = tokio::net::TcpListener::bind(&config.server_address).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;

    Ok(())
}
