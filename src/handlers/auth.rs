use crate::error::LockboxError;
use crate::middleware::BearerToken;
use crate::router::LockboxState;
use crate::types::Account;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Basic};
use serde_json::json;

/// GET /auth/authenticate -> exchanges Basic credentials for a bearer token.
///
/// Unknown usernames and wrong passwords both answer 403 with the same body.
pub async fn authenticate(
    State(state): State<LockboxState>,
    TypedHeader(Authorization(basic)): TypedHeader<Authorization<Basic>>,
) -> Result<Response, LockboxError> {
    match state
        .auth
        .authenticate(basic.username(), basic.password())
        .await?
    {
        Some(token) => Ok(Json(token).into_response()),
        None => Ok((
            StatusCode::FORBIDDEN,
            Json(json!({"error": "forbidden", "reason": "username or password wrong"})),
        )
            .into_response()),
    }
}

/// GET /auth/accounts -> all accounts (ADMIN only).
pub async fn list_accounts(
    State(state): State<LockboxState>,
    BearerToken(token): BearerToken,
) -> Result<Json<Vec<Account>>, LockboxError> {
    state.auth.list_accounts(token).await.map(Json)
}

/// POST /auth/accounts -> id of the new account (ADMIN only).
pub async fn add_account(
    State(state): State<LockboxState>,
    BearerToken(token): BearerToken,
    Json(account): Json<Account>,
) -> Result<Json<i64>, LockboxError> {
    state.auth.add_account(token, &account).await.map(Json)
}

/// PUT /auth/accounts -> 204 on success.
pub async fn update_account(
    State(state): State<LockboxState>,
    BearerToken(token): BearerToken,
    Json(account): Json<Account>,
) -> Result<StatusCode, LockboxError> {
    state.auth.update_account(token, &account).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /auth/accounts/{id} -> 204 on success (ADMIN only).
pub async fn remove_account(
    State(state): State<LockboxState>,
    BearerToken(token): BearerToken,
    Path(id): Path<i64>,
) -> Result<StatusCode, LockboxError> {
    state.auth.remove_account(token, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
