//! Database row types. These map directly to SQLite rows and stay distinct
//! from the dapur-types API models; the `From` impls below do the crossing.

use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use dapur_types::models::{Recipe, SavedRecipe, User};

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct RecipeRow {
    pub id: String,
    pub user_id: String,
    pub ingredients: String,
    pub mood: String,
    pub meal_type: String,
    pub cooking_time: i64,
    pub language: String,
    pub recipe: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct SavedRecipeRow {
    pub id: String,
    pub user_id: String,
    pub recipe_id: Option<String>,
    pub name: String,
    pub notes: Option<String>,
    pub recipe_text: String,
    pub created_at: String,
    /// LEFT JOINed originating recipe, if it still exists.
    pub recipe: Option<RecipeRow>,
}

/// Fields of a generation to persist.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub ingredients: String,
    pub mood: String,
    pub meal_type: String,
    pub cooking_time: i64,
    pub language: String,
    pub recipe: String,
}

/// A bookmark of a generated recipe (`recipe_id` set) or a custom entry.
#[derive(Debug, Clone, Default)]
pub struct NewSavedRecipe {
    pub recipe_id: Option<String>,
    pub name: String,
    pub notes: Option<String>,
    pub recipe_text: Option<String>,
}

/// Edit of a saved recipe. `None` keeps the stored notes/text.
#[derive(Debug, Clone, Default)]
pub struct SavedRecipeUpdate {
    pub name: String,
    pub notes: Option<String>,
    pub recipe_text: Option<String>,
}

/// Outcome of the favorite toggle.
#[derive(Debug)]
pub enum Toggled {
    Saved(SavedRecipeRow),
    Unsaved { id: String },
}

fn parse_uuid(field: &str, value: &str) -> Uuid {
    value.parse().unwrap_or_else(|e| {
        warn!("Corrupt {} '{}': {}", field, value, e);
        Uuid::default()
    })
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    value.parse::<DateTime<Utc>>().unwrap_or_else(|e| {
        warn!("Corrupt created_at '{}': {}", value, e);
        DateTime::default()
    })
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: parse_uuid("user id", &row.id),
            name: row.name,
            email: row.email,
        }
    }
}

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        Self {
            id: parse_uuid("recipe id", &row.id),
            user_id: parse_uuid("recipe user_id", &row.user_id),
            ingredients: row.ingredients,
            mood: row.mood,
            meal_type: row.meal_type,
            cooking_time: row.cooking_time,
            language: row.language,
            recipe: row.recipe,
            created_at: parse_timestamp(&row.created_at),
        }
    }
}

impl From<SavedRecipeRow> for SavedRecipe {
    fn from(row: SavedRecipeRow) -> Self {
        Self {
            id: parse_uuid("saved recipe id", &row.id),
            user_id: parse_uuid("saved recipe user_id", &row.user_id),
            recipe_id: row.recipe_id.as_deref().map(|id| parse_uuid("saved recipe recipe_id", id)),
            name: row.name,
            notes: row.notes,
            recipe_text: row.recipe_text,
            created_at: parse_timestamp(&row.created_at),
            recipe: row.recipe.map(Recipe::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{SecondsFormat, TimeZone};

    #[test]
    fn timestamps_are_rfc3339_only() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let stored = at.to_rfc3339_opts(SecondsFormat::Millis, true);

        assert_eq!(parse_timestamp(&stored), at);
        assert_eq!(parse_timestamp("2024-05-01 12:30:00"), DateTime::<Utc>::default());
        assert_eq!(parse_timestamp("garbage"), DateTime::<Utc>::default());
    }
}
