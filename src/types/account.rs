use serde::{Deserialize, Serialize};

/// Role tier attached to every account. The integer codes are the stored
/// representation and must stay stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountRole {
    User,
    Readonly,
    Admin,
}

impl AccountRole {
    pub fn as_i64(self) -> i64 {
        match self {
            AccountRole::User => 0,
            AccountRole::Readonly => 1,
            AccountRole::Admin => 2,
        }
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(AccountRole::User),
            1 => Some(AccountRole::Readonly),
            2 => Some(AccountRole::Admin),
            _ => None,
        }
    }
}

/// An account as seen by the engines and the API surface.
///
/// `id` is `None` until the row has been persisted; operations that need an
/// existing row resolve the id first and fail with `NotFound` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    pub password: String,
    pub role: AccountRole,
}
