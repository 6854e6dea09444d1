//! Trakt application credential resolution
//!
//! Provides multi-tier resolution with Database → ENV → TOML priority. The
//! database is authoritative so that credentials configured at runtime
//! survive restarts without editing files.

use sqlx::SqlitePool;
use tracing::{info, warn};

use tracksync_common::config::TomlConfig;
use tracksync_common::db::settings;
use tracksync_common::{Error, Result};

use crate::trakt::TraktAppCredentials;

pub const CLIENT_ID_ENV: &str = "TRACKSYNC_TRAKT_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "TRACKSYNC_TRAKT_CLIENT_SECRET";

/// Resolve the Trakt application credentials from 3-tier configuration
///
/// Priority: Database → ENV → TOML. A tier only counts when both the
/// client id and the client secret are present and non-blank.
pub async fn resolve_trakt_app_credentials(
    db: &SqlitePool,
    toml_config: &TomlConfig,
) -> Result<TraktAppCredentials> {
    let db_pair = valid_pair(
        settings::get_trakt_client_id(db).await?,
        settings::get_trakt_client_secret(db).await?,
    );

    let env_pair = valid_pair(
        std::env::var(CLIENT_ID_ENV).ok(),
        std::env::var(CLIENT_SECRET_ENV).ok(),
    );

    let toml_pair = valid_pair(
        toml_config.trakt.client_id.clone(),
        toml_config.trakt.client_secret.clone(),
    );

    let mut sources = Vec::new();
    if db_pair.is_some() {
        sources.push("database");
    }
    if env_pair.is_some() {
        sources.push("environment");
    }
    if toml_pair.is_some() {
        sources.push("TOML");
    }

    // Warn if multiple sources (potential misconfiguration)
    if sources.len() > 1 {
        warn!(
            "Trakt application credentials found in multiple sources: {}. Using {} (highest priority).",
            sources.join(", "),
            sources[0]
        );
    }

    if let Some((client_id, client_secret)) = db_pair {
        info!("Trakt application credentials loaded from database");
        return Ok(TraktAppCredentials {
            client_id,
            client_secret,
        });
    }

    if let Some((client_id, client_secret)) = env_pair {
        info!("Trakt application credentials loaded from environment variables");
        return Ok(TraktAppCredentials {
            client_id,
            client_secret,
        });
    }

    if let Some((client_id, client_secret)) = toml_pair {
        info!("Trakt application credentials loaded from TOML config");
        return Ok(TraktAppCredentials {
            client_id,
            client_secret,
        });
    }

    Err(Error::Config(
        "Trakt application credentials not configured. Please configure using one of:\n\
         1. Database: settings keys trakt_client_id / trakt_client_secret\n\
         2. Environment: TRACKSYNC_TRAKT_CLIENT_ID / TRACKSYNC_TRAKT_CLIENT_SECRET\n\
         3. TOML config: [trakt] client_id / client_secret\n\
         \n\
         Register an application at: https://trakt.tv/oauth/applications"
            .to_string(),
    ))
}

fn valid_pair(id: Option<String>, secret: Option<String>) -> Option<(String, String)> {
    match (id, secret) {
        (Some(id), Some(secret)) if !id.trim().is_empty() && !secret.trim().is_empty() => {
            Some((id, secret))
        }
        _ => None,
    }
}
