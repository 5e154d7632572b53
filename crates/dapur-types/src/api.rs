use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Recipe, SavedRecipe, User};

// -- JWT Claims --

/// Bearer token payload. The subject is the only identity carried; name and
/// email are looked up when needed so a token never goes stale on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
}

// -- Errors --

/// Body of every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// -- Auth --

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub success: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: User,
}

// -- Generation --

/// Cooking time as sent by the form: a JSON number or the raw input string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CookingTime {
    Minutes(i64),
    Fractional(f64),
    Text(String),
}

impl CookingTime {
    /// Integer minutes, read leniently: whitespace, an optional sign, then
    /// leading digits (`"30 minutes"` is 30). `None` when nothing parses.
    pub fn minutes(&self) -> Option<i64> {
        match self {
            Self::Minutes(m) => Some(*m),
            Self::Fractional(f) if f.is_finite() => Some(f.trunc() as i64),
            Self::Fractional(_) => None,
            Self::Text(s) => parse_leading_int(s),
        }
    }
}

fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let value: i64 = rest[..digits_end].parse().ok()?;
    Some(if negative { -value } else { value })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerateRequest {
    pub ingredients: Option<String>,
    pub mood: Option<String>,
    pub meal_type: Option<String>,
    pub cooking_time: Option<CookingTime>,
    pub language: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub recipe: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
}

// -- Recipes --

#[derive(Debug, Serialize, Deserialize)]
pub struct RecipesResponse {
    pub recipes: Vec<Recipe>,
}

// -- Saved recipes --

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRecipesResponse {
    pub saved_recipes: Vec<SavedRecipe>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRecipeResponse {
    pub saved_recipe: SavedRecipe,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateSavedRecipeRequest {
    pub recipe_id: Option<String>,
    pub name: Option<String>,
    pub notes: Option<String>,
    pub recipe_text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateSavedRecipeRequest {
    pub id: Option<String>,
    pub name: Option<String>,
    pub notes: Option<String>,
    pub recipe_text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteSavedRecipeRequest {
    pub id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToggleSavedRecipeRequest {
    pub recipe_id: Option<String>,
}

/// Result of the history view's favorite toggle.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleSavedRecipeResponse {
    pub saved: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub saved_recipe: Option<SavedRecipe>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooking_time_reads_leading_digits() {
        let parse = |v: serde_json::Value| {
            serde_json::from_value::<CookingTime>(v).unwrap().minutes()
        };

        assert_eq!(parse(serde_json::json!(45)), Some(45));
        assert_eq!(parse(serde_json::json!(12.9)), Some(12));
        assert_eq!(parse(serde_json::json!("30")), Some(30));
        assert_eq!(parse(serde_json::json!("  30 minutes")), Some(30));
        assert_eq!(parse(serde_json::json!("-5")), Some(-5));
        assert_eq!(parse(serde_json::json!("about 20")), None);
        assert_eq!(parse(serde_json::json!("")), None);
    }

    #[test]
    fn generate_request_uses_camel_case() {
        let req: GenerateRequest = serde_json::from_value(serde_json::json!({
            "ingredients": "egg,rice",
            "mood": "happy",
            "mealType": "dinner",
            "cookingTime": "20",
        }))
        .unwrap();

        assert_eq!(req.meal_type.as_deref(), Some("dinner"));
        assert_eq!(req.cooking_time.and_then(|c| c.minutes()), Some(20));
        assert!(req.language.is_none());
    }
}
