use crate::config::TokenPolicy;
use crate::db::sqlite::{AccountStore, CredentialStore, SqlitePool, TokenStore};
use crate::handlers::{auth, credential};
use crate::service::{AuthEngine, CredentialEngine};
use axum::{
    Router,
    routing::{delete, get},
};

/// Shared application state: the two engines, each a cheap clone over the
/// same pool.
#[derive(Clone)]
pub struct LockboxState {
    pub auth: AuthEngine,
    pub credentials: CredentialEngine,
}

impl LockboxState {
    pub fn new(pool: SqlitePool, policy: TokenPolicy) -> Self {
        let accounts = AccountStore::new(pool.clone());
        let tokens = TokenStore::new(pool.clone());
        let credential_store = CredentialStore::new(pool);
        let auth = AuthEngine::new(accounts.clone(), tokens, policy);
        let credentials = CredentialEngine::new(auth.clone(), accounts, credential_store);
        Self { auth, credentials }
    }
}

pub fn lockbox_router(state: LockboxState) -> Router {
    Router::new()
        .route("/auth/authenticate", get(auth::authenticate))
        .route(
            "/auth/accounts",
            get(auth::list_accounts)
                .post(auth::add_account)
                .put(auth::update_account),
        )
        .route("/auth/accounts/{id}", delete(auth::remove_account))
        .route(
            "/credential/credentials",
            get(credential::list_credentials)
                .post(credential::add_credential)
                .put(credential::replace_credential),
        )
        .route(
            "/credential/credentials/{id}",
            delete(credential::remove_credential),
        )
        .with_state(state)
}
