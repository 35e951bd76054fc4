use crate::types::{Account, AccountRole, Credential};
use serde::{Deserialize, Serialize};

/// A persisted account row. Unlike [`Account`], the id is always assigned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountRow {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub role: AccountRole,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account {
            id: Some(row.id),
            username: row.username,
            password: row.password,
            role: row.role,
        }
    }
}

/// A persisted credential row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CredentialRow {
    pub id: i64,
    pub account_id: i64,
    pub url: String,
    pub username: String,
    pub password: String,
    pub extra: String,
}

impl From<CredentialRow> for Credential {
    fn from(row: CredentialRow) -> Self {
        Credential {
            id: Some(row.id),
            account_id: row.account_id,
            url: row.url,
            username: row.username,
            password: row.password,
            extra: row.extra,
        }
    }
}
