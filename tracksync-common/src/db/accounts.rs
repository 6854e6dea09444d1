//! Account queries

use crate::db::models::Account;
use crate::Result;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

type AccountRow = (String, Option<String>, DateTime<Utc>, DateTime<Utc>);

fn account_from_row(row: AccountRow) -> Account {
    Account {
        guid: row.0,
        username: row.1,
        created_at: row.2,
        updated_at: row.3,
    }
}

/// Insert a newly registered account
pub async fn insert_account(db: &SqlitePool, account: &Account) -> Result<()> {
    sqlx::query(
        "INSERT INTO accounts (guid, username, created_at, updated_at)
         VALUES (?, ?, ?, ?)",
    )
    .bind(&account.guid)
    .bind(&account.username)
    .bind(account.created_at)
    .bind(account.updated_at)
    .execute(db)
    .await?;

    Ok(())
}

/// Fetch one account by guid
pub async fn get_account(db: &SqlitePool, guid: &str) -> Result<Option<Account>> {
    let row: Option<AccountRow> = sqlx::query_as(
        "SELECT guid, username, created_at, updated_at FROM accounts WHERE guid = ?",
    )
    .bind(guid)
    .fetch_optional(db)
    .await?;

    Ok(row.map(account_from_row))
}

/// List all registered accounts, oldest first
pub async fn list_accounts(db: &SqlitePool) -> Result<Vec<Account>> {
    let rows: Vec<AccountRow> = sqlx::query_as(
        "SELECT guid, username, created_at, updated_at FROM accounts
         ORDER BY created_at ASC, rowid ASC",
    )
    .fetch_all(db)
    .await?;

    Ok(rows.into_iter().map(account_from_row).collect())
}

/// Persist an account (insert or overwrite username/updated_at)
pub async fn save_account(db: &SqlitePool, account: &Account) -> Result<()> {
    sqlx::query(
        "INSERT INTO accounts (guid, username, created_at, updated_at)
         VALUES (?, ?, ?, ?)
         ON CONFLICT(guid) DO UPDATE SET
             username = excluded.username,
             updated_at = excluded.updated_at",
    )
    .bind(&account.guid)
    .bind(&account.username)
    .bind(account.created_at)
    .bind(account.updated_at)
    .execute(db)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::create_schema;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        create_schema(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_insert_and_get_account() {
        let pool = setup_test_db().await;

        let account = Account::new();
        insert_account(&pool, &account).await.unwrap();

        let loaded = get_account(&pool, &account.guid).await.unwrap().unwrap();
        assert_eq!(loaded.guid, account.guid);
        assert_eq!(loaded.username, None);
    }

    #[tokio::test]
    async fn test_get_account_missing_returns_none() {
        let pool = setup_test_db().await;

        let loaded = get_account(&pool, "no-such-guid").await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_save_account_updates_username_in_place() {
        let pool = setup_test_db().await;

        let mut account = Account::new();
        insert_account(&pool, &account).await.unwrap();

        account.username = Some("alice".to_string());
        account.updated_at = Utc::now();
        save_account(&pool, &account).await.unwrap();

        let loaded = get_account(&pool, &account.guid).await.unwrap().unwrap();
        assert_eq!(loaded.username, Some("alice".to_string()));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1, "Upsert must not create a second row");
    }

    #[tokio::test]
    async fn test_list_accounts_oldest_first() {
        let pool = setup_test_db().await;

        let mut first = Account::new();
        first.created_at = first.created_at - chrono::Duration::seconds(10);
        let second = Account::new();

        insert_account(&pool, &second).await.unwrap();
        insert_account(&pool, &first).await.unwrap();

        let accounts = list_accounts(&pool).await.unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].guid, first.guid);
        assert_eq!(accounts[1].guid, second.guid);
    }
}
