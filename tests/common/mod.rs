#![allow(dead_code)]

use chrono::Duration;
use lockbox::config::TokenPolicy;
use lockbox::db::sqlite::{AccountStore, CredentialStore, SqlitePool, TokenStore};
use lockbox::service::{AuthEngine, CredentialEngine};
use lockbox::types::{Account, AccountRole, Credential};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// A throwaway on-disk database, unique per test invocation.
pub struct TestDb {
    pub pool: SqlitePool,
    path: PathBuf,
}

impl TestDb {
    pub async fn new(tag: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();

        let mut path = std::env::temp_dir();
        path.push(format!(
            "lockbox-{}-{}-{}.sqlite",
            tag,
            std::process::id(),
            nanos
        ));

        let database_url = format!("sqlite:{}", path.display());
        let pool = lockbox::db::connect(&database_url)
            .await
            .expect("failed to open test database");

        Self { pool, path }
    }

    pub fn accounts(&self) -> AccountStore {
        AccountStore::new(self.pool.clone())
    }

    pub fn credentials(&self) -> CredentialStore {
        CredentialStore::new(self.pool.clone())
    }

    pub fn tokens(&self) -> TokenStore {
        TokenStore::new(self.pool.clone())
    }

    pub fn auth_engine(&self, policy: TokenPolicy) -> AuthEngine {
        AuthEngine::new(self.accounts(), self.tokens(), policy)
    }

    pub fn credential_engine(&self, policy: TokenPolicy) -> CredentialEngine {
        CredentialEngine::new(self.auth_engine(policy), self.accounts(), self.credentials())
    }

    pub fn cleanup(&self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// 60 s lifetime / 15 s refresh margin, the stock configuration.
pub fn default_policy() -> TokenPolicy {
    TokenPolicy::new(Duration::seconds(60), Duration::seconds(15))
}

pub fn account(username: &str, password: &str, role: AccountRole) -> Account {
    Account {
        id: None,
        username: username.to_string(),
        password: password.to_string(),
        role,
    }
}

pub fn credential(account_id: i64, url: &str) -> Credential {
    Credential {
        id: None,
        account_id,
        url: url.to_string(),
        username: "user@example.com".to_string(),
        password: "hunter2".to_string(),
        extra: "".to_string(),
    }
}
