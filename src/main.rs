// src/main.rs
// versus - version-to-version code comparison service

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use versus::api::build_app;
use versus::config::VersusConfig;
use versus::db::{create_pool, run_migrations};
use versus::state::AppState;

#[derive(Parser)]
#[command(name = "versus")]
#[command(about = "Compare analyzed versions of code, issue by issue")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (default)
    Serve {
        /// Address to bind (overrides VERSUS_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides VERSUS_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite database URL (overrides DATABASE_URL)
        #[arg(long)]
        database_url: Option<String>,
    },

    /// Apply database migrations and exit
    Migrate,
}

/// Graceful shutdown signal handler for SIGTERM and Ctrl+C
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
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

    info!("Shutdown signal received, draining connections...");
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = VersusConfig::from_env()?;

    let level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
        database_url: None,
    }) {
        Commands::Migrate => {
            let pool = create_pool(&config.database.url, config.database.max_connections).await?;
            run_migrations(&pool).await?;
            pool.close().await;
        }
        Commands::Serve {
            host,
            port,
            database_url,
        } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(url) = database_url {
                config.database.url = url;
            }
            serve(config).await?;
        }
    }

    Ok(())
}

async fn serve(config: VersusConfig) -> Result<()> {
    info!("Starting versus");

    let pool = create_pool(&config.database.url, config.database.max_connections).await?;
    run_migrations(&pool).await?;

    let app_state = Arc::new(AppState::from_config(pool.clone(), &config.llm));
    let app = build_app(app_state);

    let bind_address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("HTTP server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("Shutdown complete");
    Ok(())
}
