use crate::db::models::{AccountRow, CredentialRow};
use crate::db::schema::SQLITE_INIT;
use crate::error::LockboxError;
use crate::types::{Account, AccountRole, Credential, Token};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;
use uuid::Uuid;

pub type SqlitePool = Pool<Sqlite>;

/// Open (creating if missing) the database and run the bundled DDL.
pub async fn connect(database_url: &str) -> Result<SqlitePool, LockboxError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
    init_schema(&pool).await?;
    Ok(pool)
}

/// Initialize the schema by executing the bundled DDL.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), LockboxError> {
    // execute multiple statements safely (SQLite supports multi-commands but sqlx::query doesn't)
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}

/// Uniqueness violations become the typed duplicate-key failure here, at the
/// store boundary; callers never inspect driver codes.
fn map_constraint(e: sqlx::Error) -> LockboxError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            LockboxError::DuplicateKey(db.message().to_string())
        }
        _ => LockboxError::Database(e),
    }
}

#[derive(Clone)]
pub struct AccountStore {
    pool: SqlitePool,
}

impl AccountStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new account. Returns the assigned row id.
    pub async fn add(&self, account: &Account) -> Result<i64, LockboxError> {
        let res = sqlx::query("INSERT INTO accounts (username, password, role) VALUES (?, ?, ?)")
            .bind(&account.username)
            .bind(&account.password)
            .bind(account.role.as_i64())
            .execute(&self.pool)
            .await
            .map_err(map_constraint)?;
        Ok(res.last_insert_rowid())
    }

    pub async fn remove(&self, id: i64) -> Result<(), LockboxError> {
        let res = sqlx::query("DELETE FROM accounts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(LockboxError::not_found("no account with that id"));
        }
        Ok(())
    }

    /// Overwrite all mutable fields of the row at `id`.
    pub async fn replace(&self, id: i64, account: &Account) -> Result<(), LockboxError> {
        let res = sqlx::query("UPDATE accounts SET username = ?, password = ?, role = ? WHERE id = ?")
            .bind(&account.username)
            .bind(&account.password)
            .bind(account.role.as_i64())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_constraint)?;
        if res.rows_affected() == 0 {
            return Err(LockboxError::not_found("no account with that id"));
        }
        Ok(())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<AccountRow>, LockboxError> {
        let row = sqlx::query("SELECT id, username, password, role FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_to_model).transpose()
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<AccountRow>, LockboxError> {
        let row = sqlx::query("SELECT id, username, password, role FROM accounts WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_to_model).transpose()
    }

    pub async fn list_all(&self) -> Result<Vec<AccountRow>, LockboxError> {
        let rows = sqlx::query("SELECT id, username, password, role FROM accounts ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Self::row_to_model).collect()
    }

    fn row_to_model(row: SqliteRow) -> Result<AccountRow, LockboxError> {
        let id: i64 = row.try_get("id")?;
        let username: String = row.try_get("username")?;
        let password: String = row.try_get("password")?;
        let role_code: i64 = row.try_get("role")?;
        let role = AccountRole::from_i64(role_code).ok_or_else(|| {
            sqlx::Error::Decode(format!("invalid account role code {role_code}").into())
        })?;

        Ok(AccountRow {
            id,
            username,
            password,
            role,
        })
    }
}

#[derive(Clone)]
pub struct CredentialStore {
    pool: SqlitePool,
}

impl CredentialStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn add(&self, credential: &Credential) -> Result<i64, LockboxError> {
        let res = sqlx::query(
            "INSERT INTO credentials (account_id, url, username, password, extra) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(credential.account_id)
        .bind(&credential.url)
        .bind(&credential.username)
        .bind(&credential.password)
        .bind(&credential.extra)
        .execute(&self.pool)
        .await?;
        Ok(res.last_insert_rowid())
    }

    pub async fn remove(&self, id: i64) -> Result<(), LockboxError> {
        let res = sqlx::query("DELETE FROM credentials WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if res.rows_affected() == 0 {
            return Err(LockboxError::not_found("no credential with that id"));
        }
        Ok(())
    }

    /// Overwrite the secret fields of the row at `id`. The owner column is
    /// intentionally not part of the update; ownership never moves.
    pub async fn replace(&self, id: i64, credential: &Credential) -> Result<(), LockboxError> {
        let res = sqlx::query(
            "UPDATE credentials SET url = ?, username = ?, password = ?, extra = ? WHERE id = ?",
        )
        .bind(&credential.url)
        .bind(&credential.username)
        .bind(&credential.password)
        .bind(&credential.extra)
        .bind(id)
        .execute(&self.pool)
        .await?;
        if res.rows_affected() == 0 {
            return Err(LockboxError::not_found("no credential with that id"));
        }
        Ok(())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<CredentialRow>, LockboxError> {
        let row = sqlx::query(
            "SELECT id, account_id, url, username, password, extra FROM credentials WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_model).transpose()
    }

    pub async fn list_by_account(&self, account_id: i64) -> Result<Vec<CredentialRow>, LockboxError> {
        let rows = sqlx::query(
            "SELECT id, account_id, url, username, password, extra FROM credentials WHERE account_id = ? ORDER BY id",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_model).collect()
    }

    pub async fn list_all(&self) -> Result<Vec<CredentialRow>, LockboxError> {
        let rows = sqlx::query(
            "SELECT id, account_id, url, username, password, extra FROM credentials ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_model).collect()
    }

    fn row_to_model(row: SqliteRow) -> Result<CredentialRow, LockboxError> {
        Ok(CredentialRow {
            id: row.try_get("id")?,
            account_id: row.try_get("account_id")?,
            url: row.try_get("url")?,
            username: row.try_get("username")?,
            password: row.try_get("password")?,
            extra: row.try_get("extra")?,
        })
    }
}

#[derive(Clone)]
pub struct TokenStore {
    pool: SqlitePool,
}

impl TokenStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Upsert by account id: each account holds at most one token row.
    /// A clash on the (globally unique) identifier column surfaces as a
    /// duplicate-key failure so the caller can reissue.
    pub async fn put(&self, token: &Token) -> Result<(), LockboxError> {
        sqlx::query(
            r#"
            INSERT INTO tokens (account_id, identifier, expires_at)
            VALUES (?, ?, ?)
            ON CONFLICT(account_id) DO UPDATE SET
                identifier=excluded.identifier,
                expires_at=excluded.expires_at
            "#,
        )
        .bind(token.account_id)
        .bind(token.identifier.to_string())
        .bind(token.expires_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(map_constraint)?;
        Ok(())
    }

    pub async fn get_by_account(&self, account_id: i64) -> Result<Option<Token>, LockboxError> {
        let row = sqlx::query(
            "SELECT account_id, identifier, expires_at FROM tokens WHERE account_id = ?",
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_model).transpose()
    }

    pub async fn get_by_identifier(&self, identifier: Uuid) -> Result<Option<Token>, LockboxError> {
        let row = sqlx::query(
            "SELECT account_id, identifier, expires_at FROM tokens WHERE identifier = ?",
        )
        .bind(identifier.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_model).transpose()
    }

    fn row_to_model(row: SqliteRow) -> Result<Token, LockboxError> {
        let account_id: i64 = row.try_get("account_id")?;
        let identifier_str: String = row.try_get("identifier")?;
        let expires_str: String = row.try_get("expires_at")?;

        let identifier = Uuid::parse_str(&identifier_str)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        let expires_at: DateTime<Utc> = chrono::DateTime::parse_from_rfc3339(&expires_str)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
            .with_timezone(&Utc);

        Ok(Token {
            account_id,
            identifier,
            expires_at,
        })
    }
}
