use serde::{Deserialize, Serialize};

/// A stored site credential. `account_id` names the owning account and is
/// immutable once the row exists; `replace` never moves a credential to a
/// different owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "accountId")]
    pub account_id: i64,
    pub url: String,
    pub username: String,
    pub password: String,
    pub extra: String,
}
