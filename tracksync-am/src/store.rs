//! SQLite-backed account store

use sqlx::SqlitePool;

use tracksync_common::db::models::{Account, OAuthCredential};
use tracksync_common::db::{accounts, credentials};
use tracksync_common::Result;

use crate::authorizer::AccountStore;

/// [`AccountStore`] over the shared SQLite database
#[derive(Clone)]
pub struct SqliteAccountStore {
    db: SqlitePool,
}

impl SqliteAccountStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

impl AccountStore for SqliteAccountStore {
    async fn current_credential(&self, account: &Account) -> Result<Option<OAuthCredential>> {
        credentials::current_credential(&self.db, &account.guid).await
    }

    async fn save_credential(&self, credential: &OAuthCredential) -> Result<()> {
        credentials::save_credential(&self.db, credential).await
    }

    async fn save_account(&self, account: &Account) -> Result<()> {
        accounts::save_account(&self.db, account).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracksync_common::db::accounts::{get_account, insert_account};
    use tracksync_common::db::init::create_schema;

    #[tokio::test]
    async fn test_store_round_trip() {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        create_schema(&pool).await.unwrap();

        let mut account = Account::new();
        insert_account(&pool, &account).await.unwrap();

        let store = SqliteAccountStore::new(pool.clone());

        assert!(store.current_credential(&account).await.unwrap().is_none());

        let mut credential = OAuthCredential::new(account.guid.clone());
        credential.code = "1234".to_string();
        store.save_credential(&credential).await.unwrap();

        let current = store.current_credential(&account).await.unwrap().unwrap();
        assert_eq!(current.guid, credential.guid);

        account.username = Some("alice".to_string());
        store.save_account(&account).await.unwrap();

        let loaded = get_account(&pool, &account.guid).await.unwrap().unwrap();
        assert_eq!(loaded.username.as_deref(), Some("alice"));
    }
}
