//! Settings database operations
//!
//! Get/set accessors over the key-value settings table. The Trakt
//! application credentials live here when configured through the database
//! rather than the environment or TOML file.

use crate::{Error, Result};
use sqlx::SqlitePool;

/// Get the Trakt application client id
pub async fn get_trakt_client_id(db: &SqlitePool) -> Result<Option<String>> {
    get_setting::<String>(db, "trakt_client_id").await
}

/// Set the Trakt application client id
pub async fn set_trakt_client_id(db: &SqlitePool, value: String) -> Result<()> {
    set_setting(db, "trakt_client_id", value).await
}

/// Get the Trakt application client secret
pub async fn get_trakt_client_secret(db: &SqlitePool) -> Result<Option<String>> {
    get_setting::<String>(db, "trakt_client_secret").await
}

/// Set the Trakt application client secret
pub async fn set_trakt_client_secret(db: &SqlitePool, value: String) -> Result<()> {
    set_setting(db, "trakt_client_secret", value).await
}

/// Generic setting getter (internal)
async fn get_setting<T>(db: &SqlitePool, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(db)
        .await?;

    match row {
        Some((value,)) => {
            let parsed = value
                .parse::<T>()
                .map_err(|e| Error::Config(format!("Parse setting {} failed: {}", key, e)))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

/// Generic setting setter (internal)
async fn set_setting<T>(db: &SqlitePool, key: &str, value: T) -> Result<()>
where
    T: std::fmt::Display,
{
    sqlx::query(
        "INSERT INTO settings (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value.to_string())
    .execute(db)
    .await?;

    Ok(())
}
