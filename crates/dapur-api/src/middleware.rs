use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use uuid::Uuid;

use crate::auth::AppState;
use crate::error::ApiError;

/// Caller identity established by `require_auth`.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: Uuid,
}

/// Extract and validate the bearer token from the Authorization header.
/// Any failure is a plain 401; the cause is not distinguished.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let bearer = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(ApiError::Unauthorized)?;

    let id = state
        .tokens
        .verify_token(bearer.token())
        .map_err(|_| ApiError::Unauthorized)?;

    req.extensions_mut().insert(AuthUser { id });
    Ok(next.run(req).await)
}
