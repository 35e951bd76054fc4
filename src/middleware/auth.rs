use axum::Json;
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, StatusCode, request::Parts};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use uuid::Uuid;

/// Pull the token identifier off an inbound request.
/// Accepts either:
/// - Header: `Authorization: Bearer <identifier>`
/// - Header: `X-Auth-Token: <identifier>` (legacy clients)
///
/// A missing or malformed identifier is rejected with 401 before any handler
/// runs; whether the identifier actually verifies is the engines' decision.
pub fn extract_token(headers: &HeaderMap) -> Result<Uuid, Response> {
    // 1) header: Authorization: Bearer <identifier>
    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        let auth = auth.trim();
        if let Some(raw) = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            && let Ok(identifier) = Uuid::parse_str(raw.trim())
        {
            return Ok(identifier);
        }
    }

    // 2) header: X-Auth-Token
    if let Some(raw) = headers.get("x-auth-token").and_then(|v| v.to_str().ok())
        && let Ok(identifier) = Uuid::parse_str(raw.trim())
    {
        return Ok(identifier);
    }

    Err((
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "unauthorized", "reason": "invalid or missing token"})),
    )
        .into_response())
}

#[derive(Debug, Clone, Copy)]
pub struct BearerToken(pub Uuid);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identifier = extract_token(&parts.headers)?;
        Ok(Self(identifier))
    }
}
