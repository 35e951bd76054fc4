use crate::db::models::AccountRow;
use crate::db::sqlite::{AccountStore, CredentialStore};
use crate::error::LockboxError;
use crate::service::auth::AuthEngine;
use crate::types::{AccountRole, Credential};
use uuid::Uuid;

/// Credential CRUD gated by ownership and role.
///
/// Every operation resolves the caller through token verification first.
/// Ownership checks for replace/remove compare against the *stored* row,
/// never the incoming payload, so a forged `account_id` in the body cannot
/// widen access.
#[derive(Clone)]
pub struct CredentialEngine {
    auth: AuthEngine,
    accounts: AccountStore,
    credentials: CredentialStore,
}

impl CredentialEngine {
    pub fn new(auth: AuthEngine, accounts: AccountStore, credentials: CredentialStore) -> Self {
        Self {
            auth,
            accounts,
            credentials,
        }
    }

    async fn require_verified(&self, token: Uuid) -> Result<AccountRow, LockboxError> {
        self.auth
            .verify_token(token)
            .await?
            .ok_or_else(|| LockboxError::denied("failed to verify token"))
    }

    /// All credentials owned by the caller. Always caller-scoped; there is no
    /// global listing, not even for ADMIN.
    pub async fn list(&self, token: Uuid) -> Result<Vec<Credential>, LockboxError> {
        let caller = self.require_verified(token).await?;
        Ok(self
            .credentials
            .list_by_account(caller.id)
            .await?
            .into_iter()
            .map(Credential::from)
            .collect())
    }

    /// Store a new credential under `credential.account_id`. The declared
    /// owner must exist, the caller must be that owner or an ADMIN, and
    /// READONLY callers are rejected outright.
    pub async fn add(&self, token: Uuid, credential: &Credential) -> Result<i64, LockboxError> {
        let caller = self.require_verified(token).await?;
        let Some(owner) = self.accounts.get_by_id(credential.account_id).await? else {
            return Err(LockboxError::denied("invalid credential account"));
        };
        if owner.id != caller.id && caller.role != AccountRole::Admin {
            return Err(LockboxError::denied(
                "cannot add credentials for another account",
            ));
        }
        if caller.role == AccountRole::Readonly {
            return Err(LockboxError::denied(
                "read-only accounts cannot add credentials",
            ));
        }
        self.credentials.add(credential).await
    }

    /// Overwrite an existing credential by id.
    pub async fn replace(&self, token: Uuid, credential: &Credential) -> Result<(), LockboxError> {
        let caller = self.require_verified(token).await?;
        let id = credential
            .id
            .ok_or_else(|| LockboxError::not_found("credential id missing"))?;
        let Some(existing) = self.credentials.get_by_id(id).await? else {
            return Err(LockboxError::not_found("credential does not exist"));
        };
        if existing.account_id != caller.id && caller.role != AccountRole::Admin {
            return Err(LockboxError::denied(
                "cannot edit another account's credentials",
            ));
        }
        if caller.role == AccountRole::Readonly {
            return Err(LockboxError::denied(
                "read-only accounts cannot edit credentials",
            ));
        }
        self.credentials.replace(id, credential).await
    }

    /// Delete a credential by id. Both the credential and its owning account
    /// must still exist.
    pub async fn remove(&self, token: Uuid, credential_id: i64) -> Result<(), LockboxError> {
        let caller = self.require_verified(token).await?;
        let Some(existing) = self.credentials.get_by_id(credential_id).await? else {
            return Err(LockboxError::not_found("couldn't find credential"));
        };
        let Some(owner) = self.accounts.get_by_id(existing.account_id).await? else {
            return Err(LockboxError::not_found("couldn't find credential account"));
        };
        if owner.id != caller.id && caller.role != AccountRole::Admin {
            return Err(LockboxError::denied(
                "cannot remove another account's credentials",
            ));
        }
        if caller.role == AccountRole::Readonly {
            return Err(LockboxError::denied(
                "read-only accounts cannot remove credentials",
            ));
        }
        self.credentials.remove(credential_id).await
    }
}
