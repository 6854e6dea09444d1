//! tracksync-am - Account Manager microservice
//!
//! Owns the locally registered accounts and their Trakt OAuth credentials,
//! and performs PIN-based authorization against the Trakt API on behalf of
//! the other TrackSync services.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use tracksync_am::trakt::TraktClient;
use tracksync_am::{build_router, AppState};

/// Command-line arguments for tracksync-am
#[derive(Parser, Debug)]
#[command(name = "tracksync-am")]
#[command(about = "Account manager microservice for TrackSync")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5761", env = "TRACKSYNC_AM_PORT")]
    port: u16,

    /// Data folder holding the TrackSync database
    #[arg(short, long, env = "TRACKSYNC_DATA_FOLDER")]
    data_folder: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config first: the logging levels live in it
    let config =
        tracksync_common::config::load_toml_config().context("Failed to load config file")?;

    tracksync_common::logging::init_logging(&config.logging);

    info!("Starting tracksync-am (Account Manager) microservice");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let data_folder =
        tracksync_common::config::resolve_data_folder(args.data_folder.as_deref(), &config);
    tracksync_common::config::ensure_data_folder(&data_folder)
        .context("Failed to initialize data folder")?;

    let db_path = data_folder.join("tracksync.db");
    info!("Database: {}", db_path.display());

    let db = tracksync_common::db::init_database(&db_path).await?;
    info!("Database connection established");

    let app_credentials =
        tracksync_am::config::resolve_trakt_app_credentials(&db, &config).await?;
    let trakt = TraktClient::new(app_credentials).context("Failed to create Trakt client")?;

    let state = AppState::new(db, trakt);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
