use axum::{Extension, Json, body::Bytes, extract::State, http::StatusCode};
use tracing::info;
use uuid::Uuid;

use dapur_db::models::{NewSavedRecipe, SavedRecipeUpdate, Toggled};
use dapur_llm::extract_recipe_name;
use dapur_types::api::{
    CreateSavedRecipeRequest, DeleteSavedRecipeRequest, MessageResponse, SavedRecipeResponse,
    SavedRecipesResponse, ToggleSavedRecipeRequest, ToggleSavedRecipeResponse,
    UpdateSavedRecipeRequest,
};
use dapur_types::models::SavedRecipe;

use crate::auth::AppState;
use crate::error::{ApiError, ApiJson, required};
use crate::middleware::AuthUser;
use crate::with_db;

/// Notes given to bookmarks made from the history view, for the user to fill in.
pub const NOTES_PLACEHOLDER: &str = "[Tambahkan Notes]";

/// Canonical form of a client-supplied id. Anything that is not a UUID
/// cannot name a row, so it reads as not found.
fn parse_id(raw: &str, not_found: &'static str) -> Result<String, ApiError> {
    raw.trim()
        .parse::<Uuid>()
        .map(|id| id.to_string())
        .map_err(|_| ApiError::NotFound(not_found))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// GET /saved-recipes: bookmarks, newest first, with their source recipe.
pub async fn list_saved_recipes(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<SavedRecipesResponse>, ApiError> {
    let uid = auth.id.to_string();
    let rows = with_db(&state, move |db| db.list_saved_recipes(&uid)).await?;

    Ok(Json(SavedRecipesResponse {
        saved_recipes: rows.into_iter().map(SavedRecipe::from).collect(),
    }))
}

/// POST /saved-recipes: bookmark a generated recipe (`recipeId`) or store a
/// custom one (`recipeText`).
pub async fn create_saved_recipe(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(req): ApiJson<CreateSavedRecipeRequest>,
) -> Result<(StatusCode, Json<SavedRecipeResponse>), ApiError> {
    let name = required(req.name, "Name is required")?;
    let recipe_id = non_empty(req.recipe_id)
        .map(|id| parse_id(&id, "Recipe not found"))
        .transpose()?;

    let uid = auth.id.to_string();
    let new_saved = NewSavedRecipe {
        recipe_id,
        name,
        notes: req.notes,
        recipe_text: req.recipe_text,
    };
    let row = with_db(&state, move |db| db.create_saved_recipe(&uid, new_saved)).await?;

    info!("User {} saved recipe {}", auth.id, row.id);
    Ok((
        StatusCode::CREATED,
        Json(SavedRecipeResponse {
            saved_recipe: row.into(),
        }),
    ))
}

/// PUT /saved-recipes: edit name, notes or text of one of the caller's bookmarks.
pub async fn update_saved_recipe(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(req): ApiJson<UpdateSavedRecipeRequest>,
) -> Result<Json<SavedRecipeResponse>, ApiError> {
    let (Some(raw_id), Some(name)) = (non_empty(req.id), non_empty(req.name)) else {
        return Err(ApiError::Validation("ID and name are required".to_string()));
    };
    let id = parse_id(&raw_id, "Saved recipe not found")?;

    let uid = auth.id.to_string();
    let update = SavedRecipeUpdate {
        name,
        notes: req.notes,
        recipe_text: req.recipe_text,
    };
    let row = with_db(&state, move |db| db.update_saved_recipe(&id, &uid, update)).await?;

    Ok(Json(SavedRecipeResponse {
        saved_recipe: row.into(),
    }))
}

/// DELETE /saved-recipes: with `{ "id": ... }` removes one bookmark;
/// with no id (or no body at all) removes every bookmark of the caller.
/// A body that is present but malformed is rejected, never widened to a
/// bulk delete.
pub async fn delete_saved_recipes(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    body: Bytes,
) -> Result<Json<MessageResponse>, ApiError> {
    let req: DeleteSavedRecipeRequest = if body.iter().all(u8::is_ascii_whitespace) {
        DeleteSavedRecipeRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::Validation(format!("Invalid request body: {}", e)))?
    };
    let uid = auth.id.to_string();

    let message = match non_empty(req.id) {
        Some(raw_id) => {
            let id = parse_id(&raw_id, "Saved recipe not found")?;
            with_db(&state, move |db| db.delete_saved_recipe(&id, &uid)).await?;
            "Recipe deleted successfully"
        }
        None => {
            let deleted = with_db(&state, move |db| db.delete_all_saved_recipes(&uid)).await?;
            info!("Deleted {} saved recipes for user {}", deleted, auth.id);
            "All saved recipes deleted successfully"
        }
    };

    Ok(Json(MessageResponse {
        message: message.to_string(),
    }))
}

/// POST /saved-recipes/toggle: the history view's favorite button.
/// Unsaves the recipe if bookmarked, otherwise bookmarks it under the name
/// found in its heading.
pub async fn toggle_saved_recipe(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(req): ApiJson<ToggleSavedRecipeRequest>,
) -> Result<Json<ToggleSavedRecipeResponse>, ApiError> {
    let raw_id = required(req.recipe_id, "recipeId is required")?;
    let recipe_id = parse_id(&raw_id, "Recipe not found")?;

    let uid = auth.id.to_string();
    let toggled = with_db(&state, move |db| {
        db.toggle_saved_recipe(&uid, &recipe_id, |recipe| {
            // Models do not always honour the heading format.
            let name = extract_recipe_name(&recipe.recipe)
                .unwrap_or_else(|| format!("{} ({})", recipe.meal_type, recipe.mood));
            (name, Some(NOTES_PLACEHOLDER.to_string()))
        })
    })
    .await?;

    let response = match toggled {
        Toggled::Saved(row) => ToggleSavedRecipeResponse {
            saved: true,
            saved_recipe: Some(row.into()),
            id: None,
        },
        Toggled::Unsaved { id } => ToggleSavedRecipeResponse {
            saved: false,
            saved_recipe: None,
            id: id.parse().ok(),
        },
    };

    Ok(Json(response))
}
