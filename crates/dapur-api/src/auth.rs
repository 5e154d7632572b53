use std::sync::Arc;

use axum::{Extension, Json, extract::State};
use tracing::{error, info};

use dapur_auth::{TokenService, hash_password, verify_password};
use dapur_db::Database;
use dapur_llm::RecipeGenerator;
use dapur_types::api::{LoginRequest, LoginResponse, MeResponse, RegisterRequest, RegisterResponse};
use dapur_types::models::User;

use crate::error::{ApiError, ApiJson, required};
use crate::middleware::AuthUser;
use crate::{blocking, with_db};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub tokens: TokenService,
    pub generator: RecipeGenerator,
}

pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    // Validate input
    let name = required(req.name, "Name is required")?.trim().to_string();
    let email = required(req.email, "Email is required")?.trim().to_string();
    let password = required(req.password, "Password is required")?;

    // Cheap rejection before paying for the hash
    let lookup = email.clone();
    if with_db(&state, move |db| db.find_user_by_email(&lookup))
        .await?
        .is_some()
    {
        return Err(ApiError::DuplicateEmail);
    }

    let password_hash = blocking(move || {
        hash_password(&password).map_err(|e| {
            error!("Password hashing failed: {}", e);
            ApiError::Internal
        })
    })
    .await?;

    // The store re-checks under its lock and the unique index has the final say.
    let user = with_db(&state, move |db| db.create_user(&name, &email, &password_hash)).await?;

    info!("Registered user {}", user.id);
    Ok(Json(RegisterResponse { success: true }))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = required(req.email, "Email is required")?.trim().to_string();
    let password = required(req.password, "Password is required")?;

    let row = with_db(&state, move |db| db.find_user_by_email(&email))
        .await?
        .ok_or(ApiError::NotFound("Email tidak ditemukan."))?;

    // Verify password
    let stored_hash = row.password.clone();
    let valid = blocking(move || Ok(verify_password(&password, &stored_hash))).await?;
    if !valid {
        return Err(ApiError::InvalidPassword);
    }

    let user = User::from(row);
    let token = state.tokens.issue_token(user.id).map_err(|e| {
        error!("Token issue failed for {}: {}", user.id, e);
        ApiError::Internal
    })?;

    info!("User {} logged in", user.id);
    Ok(Json(LoginResponse {
        success: true,
        token,
        user,
    }))
}

/// GET /auth/me: the account behind the presented token.
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<MeResponse>, ApiError> {
    let uid = auth.id.to_string();
    let row = with_db(&state, move |db| db.find_user_by_id(&uid))
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    Ok(Json(MeResponse {
        user: User::from(row),
    }))
}
