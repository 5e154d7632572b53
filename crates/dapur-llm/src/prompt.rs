//! Recipe prompt construction.
//!
//! The heading formats requested here are what `extract_recipe_name` looks
//! for; keep the two in step.

/// Reply language. Only Indonesian is opt-in; everything else is English.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    English,
    Bahasa,
}

impl Language {
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("Bahasa") => Self::Bahasa,
            _ => Self::English,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Bahasa => "Bahasa",
        }
    }

    fn name_heading(&self) -> &'static str {
        match self {
            Self::English => "**Recipe Name: [Name]**",
            Self::Bahasa => "**Nama Resep: [Name]**",
        }
    }

    fn nutrition_heading(&self) -> &'static str {
        match self {
            Self::English => "**Nutritional Notes:** [Nutritional notes]",
            Self::Bahasa => "**Catatan Nutrisi:** [Nutritional notes]",
        }
    }

    fn instruction(&self) -> &'static str {
        match self {
            Self::English => "Please respond in English.",
            Self::Bahasa => "Please respond in Bahasa Indonesia (Indonesian language).",
        }
    }
}

/// Validated inputs of one generation request.
#[derive(Debug, Clone)]
pub struct GenerationParams {
    pub ingredients: String,
    pub mood: String,
    pub meal_type: String,
    pub cooking_time: i64,
    pub language: Language,
}

pub fn build_prompt(params: &GenerationParams) -> String {
    let lang = params.language;

    format!(
        "Generate a detailed recipe using the following:

Ingredients available: {ingredients}
Mood/Style: {mood}
Meal Type: {meal_type}
Preferred Cooking Time: {cooking_time} minutes

Start your response with the recipe name in the following format:
{name_heading}

Then provide the detailed recipe including:
1. Preparation Time
2. Cooking Time
3. Servings
4. Ingredients List (with exact quantities)
5. Step-by-step Instructions
6. Serving Suggestions
7. End with nutritional notes in the following format:
{nutrition_heading}

Make it practical, delicious, and tailored to the mood and ingredients.

{instruction}",
        ingredients = params.ingredients,
        mood = params.mood,
        meal_type = params.meal_type,
        cooking_time = params.cooking_time,
        name_heading = lang.name_heading(),
        nutrition_heading = lang.nutrition_heading(),
        instruction = lang.instruction(),
    )
}
