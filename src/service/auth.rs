use crate::config::TokenPolicy;
use crate::db::models::AccountRow;
use crate::db::sqlite::{AccountStore, TokenStore};
use crate::error::LockboxError;
use crate::service::with_store_retry;
use crate::types::{Account, AccountRole, Token, TokenIssuer};
use chrono::{Duration, Utc};
use subtle::ConstantTimeEq;
use tracing::debug;
use uuid::Uuid;

/// Single comparison point between a presented password and the stored one.
/// Currently a constant-time equality over the raw bytes; swapping in a
/// salted-hash comparison only touches this function.
fn verify_password(candidate: &str, stored: &str) -> bool {
    candidate.as_bytes().ct_eq(stored.as_bytes()).into()
}

/// Authentication and account administration.
///
/// Stateless between calls: every decision is made against the stores, so any
/// number of engine clones may run concurrently. Token timing comes in as an
/// explicit [`TokenPolicy`] at construction.
#[derive(Clone)]
pub struct AuthEngine {
    accounts: AccountStore,
    tokens: TokenStore,
    issuer: TokenIssuer,
    min_time_left: Duration,
}

impl AuthEngine {
    pub fn new(accounts: AccountStore, tokens: TokenStore, policy: TokenPolicy) -> Self {
        Self {
            accounts,
            tokens,
            issuer: TokenIssuer::new(policy.lifetime),
            min_time_left: policy.min_time_left,
        }
    }

    /// Authenticate by username and password.
    ///
    /// Returns `None` for an unknown username and for a wrong password alike;
    /// the two cases are indistinguishable to the caller. On success the
    /// stored token is reused as long as it has more than `min_time_left`
    /// remaining; otherwise a replacement is issued and persisted.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Token>, LockboxError> {
        let Some(account) = self.accounts.get_by_username(username).await? else {
            return Ok(None);
        };
        if !verify_password(password, &account.password) {
            return Ok(None);
        }

        match self.tokens.get_by_account(account.id).await? {
            Some(existing) if !existing.in_refresh_window(self.min_time_left, Utc::now()) => {
                Ok(Some(existing))
            }
            _ => self.persist_fresh_token(account.id).await.map(Some),
        }
    }

    /// Issue and persist a token, drawing a new identifier until the store
    /// accepts it. An identifier clash is a duplicate-key outcome from `put`
    /// and simply triggers a reissue; with 128 bits of randomness a second
    /// iteration is already extraordinary.
    async fn persist_fresh_token(&self, account_id: i64) -> Result<Token, LockboxError> {
        loop {
            let token = self.issuer.issue(account_id);
            match with_store_retry(|| self.tokens.put(&token)).await {
                Ok(()) => return Ok(token),
                Err(LockboxError::DuplicateKey(_)) => {
                    debug!(account_id, "token identifier collision, reissuing");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Resolve a presented token identifier back to its account.
    ///
    /// `None` for an unknown identifier, an expired token, or an owner that
    /// has been deleted since issuance. Never mutates the store.
    pub async fn verify_token(&self, identifier: Uuid) -> Result<Option<AccountRow>, LockboxError> {
        let Some(stored) = self.tokens.get_by_identifier(identifier).await? else {
            return Ok(None);
        };
        if stored.is_expired(Utc::now()) {
            return Ok(None);
        }
        self.accounts.get_by_id(stored.account_id).await
    }

    async fn require_verified(&self, token: Uuid) -> Result<AccountRow, LockboxError> {
        self.verify_token(token)
            .await?
            .ok_or_else(|| LockboxError::denied("failed to verify token"))
    }

    /// List every account. ADMIN only.
    pub async fn list_accounts(&self, token: Uuid) -> Result<Vec<Account>, LockboxError> {
        let caller = self.require_verified(token).await?;
        if caller.role != AccountRole::Admin {
            return Err(LockboxError::denied("insufficient permissions"));
        }
        Ok(self
            .accounts
            .list_all()
            .await?
            .into_iter()
            .map(Account::from)
            .collect())
    }

    /// Create an account. ADMIN only; a taken username propagates as a
    /// duplicate-key failure.
    pub async fn add_account(&self, token: Uuid, account: &Account) -> Result<i64, LockboxError> {
        let caller = self.require_verified(token).await?;
        if caller.role != AccountRole::Admin {
            return Err(LockboxError::denied("insufficient permissions"));
        }
        with_store_retry(|| self.accounts.add(account)).await
    }

    /// Delete an account. ADMIN only; unknown ids propagate as not-found.
    pub async fn remove_account(&self, token: Uuid, account_id: i64) -> Result<(), LockboxError> {
        let caller = self.require_verified(token).await?;
        if caller.role != AccountRole::Admin {
            return Err(LockboxError::denied("insufficient permissions"));
        }
        with_store_retry(|| self.accounts.remove(account_id)).await
    }

    /// Update an account record.
    ///
    /// Rules, checked in order: only the account itself or an ADMIN may
    /// update; READONLY accounts update nothing, themselves included; the
    /// role field only changes under an ADMIN caller.
    pub async fn update_account(&self, token: Uuid, account: &Account) -> Result<(), LockboxError> {
        let caller = self.require_verified(token).await?;
        if account.id != Some(caller.id) && caller.role != AccountRole::Admin {
            return Err(LockboxError::denied("cannot update another account"));
        }
        if caller.role == AccountRole::Readonly {
            return Err(LockboxError::denied("read-only accounts cannot update accounts"));
        }
        if caller.role != account.role && caller.role != AccountRole::Admin {
            return Err(LockboxError::denied(
                "insufficient permissions for changing role",
            ));
        }

        let id = account
            .id
            .ok_or_else(|| LockboxError::not_found("account id missing"))?;
        with_store_retry(|| self.accounts.replace(id, account)).await
    }
}
