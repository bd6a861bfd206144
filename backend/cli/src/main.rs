mod config;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use tradeforge_gateway::{AppState, build_router};
use tradeforge_notify::{ChatworkConfig, ChatworkNotifier};
use tradeforge_pricing::PriceClient;
use tradeforge_recognition::{Recognizer, VisionProvider};
use tradeforge_storage::AssessmentStore;

use config::Config;

#[derive(Parser)]
#[command(name = "tradeforge")]
#[command(about = "TradeForge — device trade-in intake backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TradeForge intake server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Show current server status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            let config = Config {
                port: port.unwrap_or(config.port),
                ..config
            };
            run_server(config).await?;
        }
        Commands::Status => {
            let client = reqwest::Client::new();
            match client
                .get(format!("http://localhost:{}/api/health", config.port))
                .send()
                .await
            {
                Ok(resp) => {
                    let body: serde_json::Value = resp.json().await?;
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                Err(_) => {
                    println!("TradeForge is not running on port {}", config.port);
                }
            }
        }
    }

    Ok(())
}

async fn run_server(config: Config) -> Result<()> {
    info!(
        port = config.port,
        bind = %config.bind_address,
        db = %config.db_path,
        "Starting TradeForge intake backend"
    );

    let store = AssessmentStore::open(&config.db_path)?;

    let recognizer = if let Some(api_key) = &config.openai_api_key {
        info!("Using OpenAI vision provider");
        Some(Recognizer::new(VisionProvider::openai(api_key)))
    } else if let Some(api_key) = &config.gemini_api_key {
        info!("Using Gemini vision provider");
        Some(Recognizer::new(VisionProvider::gemini(api_key)))
    } else {
        info!("No vision provider configured; /api/ocr is disabled");
        None
    };

    let notifier = match (&config.chatwork_api_token, &config.chatwork_room_id) {
        (Some(api_token), Some(room_id)) => {
            info!(room_id = %room_id, "Chatwork notifier enabled");
            Some(ChatworkNotifier::new(ChatworkConfig {
                api_token: api_token.clone(),
                room_id: room_id.clone(),
            }))
        }
        _ => None,
    };

    let state = Arc::new(AppState {
        store,
        recognizer,
        pricing: PriceClient::new(config.catalog_base_url.clone()),
        notifier,
    });

    let app = build_router(state).layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("TradeForge listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
