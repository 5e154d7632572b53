use axum::{Extension, Json, extract::State};
use tracing::info;

use dapur_types::api::{MessageResponse, RecipesResponse};
use dapur_types::models::Recipe;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::with_db;

/// GET /recipes: generation history, newest first.
pub async fn list_recipes(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<RecipesResponse>, ApiError> {
    let uid = auth.id.to_string();
    let rows = with_db(&state, move |db| db.list_recipes(&uid)).await?;

    Ok(Json(RecipesResponse {
        recipes: rows.into_iter().map(Recipe::from).collect(),
    }))
}

/// DELETE /recipes: clear the caller's history. Succeeds when already empty.
pub async fn delete_all_recipes(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<MessageResponse>, ApiError> {
    let uid = auth.id.to_string();
    let deleted = with_db(&state, move |db| db.delete_all_recipes(&uid)).await?;

    info!("Deleted {} recipes for user {}", deleted, auth.id);
    Ok(Json(MessageResponse {
        message: "All recipes deleted successfully".to_string(),
    }))
}
