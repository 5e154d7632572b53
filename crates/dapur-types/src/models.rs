use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public view of an account. The password hash never leaves the DB layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// One AI generation result. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: Uuid,
    pub user_id: Uuid,
    pub ingredients: String,
    pub mood: String,
    pub meal_type: String,
    pub cooking_time: i64,
    pub language: String,
    pub recipe: String,
    pub created_at: DateTime<Utc>,
}

/// A user-curated bookmark. `recipe_text` is a copy, so editing it never
/// touches the generation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRecipe {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipe_id: Option<Uuid>,
    pub name: String,
    pub notes: Option<String>,
    pub recipe_text: String,
    pub created_at: DateTime<Utc>,
    /// Originating generation, when the entry was saved from history and
    /// that history row still exists.
    pub recipe: Option<Recipe>,
}
