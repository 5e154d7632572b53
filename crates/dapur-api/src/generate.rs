use axum::{Extension, Json, extract::State};
use tracing::{error, info};

use dapur_db::models::NewRecipe;
use dapur_llm::{GenerationParams, Language};
use dapur_types::api::{GenerateRequest, GenerateResponse};

use crate::auth::AppState;
use crate::error::{ApiError, ApiJson, required};
use crate::middleware::AuthUser;
use crate::with_db;

/// POST /generate: ask the model for a recipe and record it in the
/// caller's history.
pub async fn generate_recipe(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(req): ApiJson<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let params = GenerationParams {
        ingredients: required(req.ingredients, "Ingredients are required")?,
        mood: required(req.mood, "Mood is required")?,
        meal_type: required(req.meal_type, "Meal type is required")?,
        cooking_time: req
            .cooking_time
            .and_then(|c| c.minutes())
            .ok_or_else(|| ApiError::Validation("Cooking time must be a number".to_string()))?,
        language: Language::from_tag(req.language.as_deref()),
    };

    let generation = state.generator.generate(&params).await.map_err(|e| {
        error!("Generation failed for {}: {}", auth.id, e);
        ApiError::Upstream
    })?;

    let uid = auth.id.to_string();
    let new_recipe = NewRecipe {
        ingredients: params.ingredients,
        mood: params.mood,
        meal_type: params.meal_type,
        cooking_time: params.cooking_time,
        language: params.language.as_str().to_string(),
        recipe: generation.recipe.clone(),
    };
    let row = with_db(&state, move |db| db.create_recipe(&uid, new_recipe)).await?;

    info!("Stored recipe {} for user {}", row.id, auth.id);
    Ok(Json(GenerateResponse {
        recipe: generation.recipe,
        name: generation.name,
    }))
}
