use crate::error::LockboxError;
use crate::middleware::BearerToken;
use crate::router::LockboxState;
use crate::types::Credential;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

/// GET /credential/credentials -> the caller's credentials.
pub async fn list_credentials(
    State(state): State<LockboxState>,
    BearerToken(token): BearerToken,
) -> Result<Json<Vec<Credential>>, LockboxError> {
    state.credentials.list(token).await.map(Json)
}

/// POST /credential/credentials -> id of the new credential.
pub async fn add_credential(
    State(state): State<LockboxState>,
    BearerToken(token): BearerToken,
    Json(credential): Json<Credential>,
) -> Result<Json<i64>, LockboxError> {
    state.credentials.add(token, &credential).await.map(Json)
}

/// PUT /credential/credentials -> 204 on success.
pub async fn replace_credential(
    State(state): State<LockboxState>,
    BearerToken(token): BearerToken,
    Json(credential): Json<Credential>,
) -> Result<StatusCode, LockboxError> {
    state.credentials.replace(token, &credential).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /credential/credentials/{id} -> 204 on success.
pub async fn remove_credential(
    State(state): State<LockboxState>,
    BearerToken(token): BearerToken,
    Path(id): Path<i64>,
) -> Result<StatusCode, LockboxError> {
    state.credentials.remove(token, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
