use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use suggestion_box_api::config::AppConfig;
use suggestion_box_api::database::{DatabaseManager, MemoryStore, PgStore, Store};
use suggestion_box_api::services::submission_link;
use suggestion_box_api::{app, is_development, AppState};

#[derive(Parser)]
#[command(name = "suggestion-box")]
#[command(about = "Anonymous suggestion box service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run the HTTP API")]
    Serve {
        #[arg(long, help = "Keep everything in memory even when DATABASE_URL is set")]
        memory: bool,
    },

    #[command(about = "Create the database tables and exit")]
    Migrate,

    #[command(about = "Print the public submission link for a box")]
    Link { box_id: Uuid },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL, JWT_SECRET etc. are picked up
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("suggestion_box_api=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();
    config.validate()?;

    match cli.command {
        Commands::Serve { memory } => serve(config, memory).await,
        Commands::Migrate => {
            let pool = DatabaseManager::connect(&config.database).await?;
            DatabaseManager::migrate(&pool).await?;
            info!("Schema is up to date");
            Ok(())
        }
        Commands::Link { box_id } => {
            println!("{}", submission_link(&config.server.public_origin, box_id));
            Ok(())
        }
    }
}

async fn serve(config: AppConfig, memory: bool) -> anyhow::Result<()> {
    info!("Starting suggestion box API in {:?} mode", config.environment);
    if is_development!(config) {
        warn!("Development mode: tokens are signed with the built-in secret unless JWT_SECRET is set");
    }

    let store: Arc<dyn Store> = match (&config.database.url, memory) {
        (Some(_), false) => {
            let pool = DatabaseManager::connect(&config.database).await?;
            if config.database.run_migrations {
                DatabaseManager::migrate(&pool).await?;
            }
            Arc::new(PgStore::new(pool))
        }
        _ => {
            warn!("Using the in-memory store; data is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    let bind_addr = config.bind_addr();
    let state = AppState::new(config, store)?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
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
}
