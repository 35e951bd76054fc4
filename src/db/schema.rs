//! SQL DDL for initializing the account/credential/token storage.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema with:
/// - `accounts.username` UNIQUE (duplicate usernames surface as constraint
///   violations, never generic failures)
/// - `credentials.account_id` indexed for the per-owner listing
/// - `tokens.account_id` PRIMARY KEY (at most one live token per account,
///   `put` is an upsert on it) and `tokens.identifier` UNIQUE (the
///   verification lookup key)
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    role INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS credentials (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    account_id INTEGER NOT NULL,
    url TEXT NOT NULL,
    username TEXT NOT NULL,
    password TEXT NOT NULL,
    extra TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_credentials_account_id ON credentials(account_id);

CREATE TABLE IF NOT EXISTS tokens (
    account_id INTEGER PRIMARY KEY,
    identifier TEXT NOT NULL UNIQUE,
    expires_at TEXT NOT NULL
);
"#;
