//! HTTP handlers for the DapurPintar API.

pub mod auth;
pub mod error;
pub mod generate;
pub mod middleware;
pub mod recipes;
pub mod saved_recipes;

use axum::{
    Json, Router,
    routing::{get, post},
};
use serde_json::{Value, json};
use tracing::error;

use dapur_db::{Database, DbResult};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::require_auth;

/// All routes, without transport layers (CORS, tracing); the binary adds those.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/health", get(health));

    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/generate", post(generate::generate_recipe))
        .route(
            "/recipes",
            get(recipes::list_recipes).delete(recipes::delete_all_recipes),
        )
        .route(
            "/saved-recipes",
            get(saved_recipes::list_saved_recipes)
                .post(saved_recipes::create_saved_recipe)
                .put(saved_recipes::update_saved_recipe)
                .delete(saved_recipes::delete_saved_recipes),
        )
        .route("/saved-recipes/toggle", post(saved_recipes::toggle_saved_recipe))
        .route_layer(axum::middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Run CPU-heavy or blocking work off the async runtime.
pub(crate) async fn blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal
    })?
}

/// Run a store call on the blocking pool.
pub(crate) async fn with_db<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> DbResult<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    blocking(move || f(&state.db).map_err(ApiError::from)).await
}
