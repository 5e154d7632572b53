use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use uuid::Uuid;

use crate::error::is_unique_violation;
use crate::models::{
    NewRecipe, NewSavedRecipe, RecipeRow, SavedRecipeRow, SavedRecipeUpdate, Toggled, UserRow,
};
use crate::{Database, DbError, DbResult};

const RECIPE_COLUMNS: &str =
    "id, user_id, ingredients, mood, meal_type, cooking_time, language, recipe, created_at";

const SAVED_SELECT: &str = "
    SELECT s.id, s.user_id, s.recipe_id, s.name, s.notes, s.recipe_text, s.created_at,
           r.id, r.user_id, r.ingredients, r.mood, r.meal_type, r.cooking_time,
           r.language, r.recipe, r.created_at
    FROM saved_recipes s
    LEFT JOIN recipes r ON r.id = s.recipe_id";

/// Millisecond RFC 3339, so rows sort chronologically as text.
fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl Database {
    // -- Users --

    /// Insert a new account. The unique index on `email` is authoritative,
    /// so a concurrent duplicate still surfaces as `DuplicateEmail`.
    pub fn create_user(&self, name: &str, email: &str, password_hash: &str) -> DbResult<UserRow> {
        self.with_conn(|conn| {
            if query_user_by_email(conn, email)?.is_some() {
                return Err(DbError::DuplicateEmail);
            }

            let row = UserRow {
                id: Uuid::new_v4().to_string(),
                name: name.to_string(),
                email: email.to_string(),
                password: password_hash.to_string(),
                created_at: now_timestamp(),
            };

            conn.execute(
                "INSERT INTO users (id, email, name, password, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![row.id, row.email, row.name, row.password, row.created_at],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DbError::DuplicateEmail
                } else {
                    e.into()
                }
            })?;

            Ok(row)
        })
    }

    pub fn find_user_by_email(&self, email: &str) -> DbResult<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_email(conn, email))
    }

    pub fn find_user_by_id(&self, id: &str) -> DbResult<Option<UserRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, name, email, password, created_at FROM users WHERE id = ?1",
                    [id],
                    user_from_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    // -- Generated recipes --

    pub fn create_recipe(&self, user_id: &str, recipe: NewRecipe) -> DbResult<RecipeRow> {
        self.with_conn(|conn| {
            let row = RecipeRow {
                id: Uuid::new_v4().to_string(),
                user_id: user_id.to_string(),
                ingredients: recipe.ingredients,
                mood: recipe.mood,
                meal_type: recipe.meal_type,
                cooking_time: recipe.cooking_time,
                language: recipe.language,
                recipe: recipe.recipe,
                created_at: now_timestamp(),
            };

            conn.execute(
                &format!("INSERT INTO recipes ({RECIPE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"),
                params![
                    row.id,
                    row.user_id,
                    row.ingredients,
                    row.mood,
                    row.meal_type,
                    row.cooking_time,
                    row.language,
                    row.recipe,
                    row.created_at,
                ],
            )?;

            Ok(row)
        })
    }

    /// All of a user's generations, newest first.
    pub fn list_recipes(&self, user_id: &str) -> DbResult<Vec<RecipeRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {RECIPE_COLUMNS} FROM recipes WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC"
            ))?;

            let rows = stmt
                .query_map([user_id], |row| recipe_from_row(row, 0))?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Owner-scoped lookup; another user's recipe reads as absent.
    pub fn get_recipe(&self, id: &str, user_id: &str) -> DbResult<Option<RecipeRow>> {
        self.with_conn(|conn| query_recipe(conn, id, user_id))
    }

    /// Idempotent bulk delete. Bookmarks of these recipes keep their text
    /// and lose their link (`ON DELETE SET NULL`).
    pub fn delete_all_recipes(&self, user_id: &str) -> DbResult<usize> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM recipes WHERE user_id = ?1", [user_id])?))
    }

    // -- Saved recipes --

    pub fn create_saved_recipe(&self, user_id: &str, saved: NewSavedRecipe) -> DbResult<SavedRecipeRow> {
        self.with_conn(|conn| insert_saved_recipe(conn, user_id, saved))
    }

    /// Edit name/notes/text. Requires both the id and the owner to match.
    pub fn update_saved_recipe(
        &self,
        id: &str,
        user_id: &str,
        update: SavedRecipeUpdate,
    ) -> DbResult<SavedRecipeRow> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE saved_recipes
                 SET name = ?1, notes = COALESCE(?2, notes), recipe_text = COALESCE(?3, recipe_text)
                 WHERE id = ?4 AND user_id = ?5",
                params![update.name, update.notes, update.recipe_text, id, user_id],
            )?;

            if changed == 0 {
                return Err(DbError::SavedRecipeNotFound);
            }

            query_saved_recipe(conn, id, user_id)?.ok_or(DbError::SavedRecipeNotFound)
        })
    }

    pub fn delete_saved_recipe(&self, id: &str, user_id: &str) -> DbResult<()> {
        self.with_conn(|conn| {
            let deleted = conn.execute(
                "DELETE FROM saved_recipes WHERE id = ?1 AND user_id = ?2",
                [id, user_id],
            )?;

            if deleted == 0 {
                return Err(DbError::SavedRecipeNotFound);
            }
            Ok(())
        })
    }

    pub fn delete_all_saved_recipes(&self, user_id: &str) -> DbResult<usize> {
        self.with_conn(|conn| {
            Ok(conn.execute("DELETE FROM saved_recipes WHERE user_id = ?1", [user_id])?)
        })
    }

    /// A user's bookmarks, newest first, each joined with its originating recipe.
    pub fn list_saved_recipes(&self, user_id: &str) -> DbResult<Vec<SavedRecipeRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{SAVED_SELECT} WHERE s.user_id = ?1 ORDER BY s.created_at DESC, s.rowid DESC"
            ))?;

            let rows = stmt
                .query_map([user_id], saved_from_row)?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn find_saved_by_recipe(&self, user_id: &str, recipe_id: &str) -> DbResult<Option<SavedRecipeRow>> {
        self.with_conn(|conn| query_saved_by_recipe(conn, user_id, recipe_id))
    }

    /// Favorite toggle: removes the bookmark of `recipe_id` if one exists,
    /// otherwise bookmarks it with the name and notes `derive` picks from the
    /// recipe. Runs in one transaction under the connection lock.
    pub fn toggle_saved_recipe<F>(&self, user_id: &str, recipe_id: &str, derive: F) -> DbResult<Toggled>
    where
        F: FnOnce(&RecipeRow) -> (String, Option<String>),
    {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;

            let outcome = match query_saved_by_recipe(&tx, user_id, recipe_id)? {
                Some(existing) => {
                    tx.execute(
                        "DELETE FROM saved_recipes WHERE id = ?1 AND user_id = ?2",
                        params![existing.id, user_id],
                    )?;
                    Toggled::Unsaved { id: existing.id }
                }
                None => {
                    let recipe =
                        query_recipe(&tx, recipe_id, user_id)?.ok_or(DbError::RecipeNotFound)?;
                    let (name, notes) = derive(&recipe);
                    let saved = insert_saved_recipe(
                        &tx,
                        user_id,
                        NewSavedRecipe {
                            recipe_id: Some(recipe.id.clone()),
                            name,
                            notes,
                            recipe_text: Some(recipe.recipe.clone()),
                        },
                    )?;
                    Toggled::Saved(saved)
                }
            };

            tx.commit()?;
            Ok(outcome)
        })
    }
}

fn insert_saved_recipe(conn: &Connection, user_id: &str, saved: NewSavedRecipe) -> DbResult<SavedRecipeRow> {
    let recipe_text = match &saved.recipe_id {
        Some(recipe_id) => {
            let recipe = query_recipe(conn, recipe_id, user_id)?.ok_or(DbError::RecipeNotFound)?;

            if query_saved_by_recipe(conn, user_id, recipe_id)?.is_some() {
                return Err(DbError::AlreadySaved);
            }

            // Without an explicit text the bookmark copies the generation.
            saved
                .recipe_text
                .filter(|t| !t.trim().is_empty())
                .unwrap_or(recipe.recipe)
        }
        None => saved
            .recipe_text
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| DbError::Validation("Recipe text is required for custom recipes".into()))?,
    };

    let id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO saved_recipes (id, user_id, recipe_id, name, notes, recipe_text, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            id,
            user_id,
            saved.recipe_id,
            saved.name,
            saved.notes,
            recipe_text,
            now_timestamp(),
        ],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            DbError::AlreadySaved
        } else {
            e.into()
        }
    })?;

    query_saved_recipe(conn, &id, user_id)?.ok_or(DbError::SavedRecipeNotFound)
}

fn query_user_by_email(conn: &Connection, email: &str) -> DbResult<Option<UserRow>> {
    let row = conn
        .query_row(
            "SELECT id, name, email, password, created_at FROM users WHERE email = ?1",
            [email],
            user_from_row,
        )
        .optional()?;
    Ok(row)
}

fn query_recipe(conn: &Connection, id: &str, user_id: &str) -> DbResult<Option<RecipeRow>> {
    let row = conn
        .query_row(
            &format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = ?1 AND user_id = ?2"),
            [id, user_id],
            |row| recipe_from_row(row, 0),
        )
        .optional()?;
    Ok(row)
}

fn query_saved_recipe(conn: &Connection, id: &str, user_id: &str) -> DbResult<Option<SavedRecipeRow>> {
    let row = conn
        .query_row(
            &format!("{SAVED_SELECT} WHERE s.id = ?1 AND s.user_id = ?2"),
            [id, user_id],
            saved_from_row,
        )
        .optional()?;
    Ok(row)
}

fn query_saved_by_recipe(conn: &Connection, user_id: &str, recipe_id: &str) -> DbResult<Option<SavedRecipeRow>> {
    let row = conn
        .query_row(
            &format!("{SAVED_SELECT} WHERE s.user_id = ?1 AND s.recipe_id = ?2"),
            [user_id, recipe_id],
            saved_from_row,
        )
        .optional()?;
    Ok(row)
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn recipe_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<RecipeRow> {
    Ok(RecipeRow {
        id: row.get(offset)?,
        user_id: row.get(offset + 1)?,
        ingredients: row.get(offset + 2)?,
        mood: row.get(offset + 3)?,
        meal_type: row.get(offset + 4)?,
        cooking_time: row.get(offset + 5)?,
        language: row.get(offset + 6)?,
        recipe: row.get(offset + 7)?,
        created_at: row.get(offset + 8)?,
    })
}

fn saved_from_row(row: &Row<'_>) -> rusqlite::Result<SavedRecipeRow> {
    // Columns 7.. are the LEFT JOINed recipe; NULL id means no link.
    let recipe = match row.get::<_, Option<String>>(7)? {
        Some(_) => Some(recipe_from_row(row, 7)?),
        None => None,
    };

    Ok(SavedRecipeRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        recipe_id: row.get(2)?,
        name: row.get(3)?,
        notes: row.get(4)?,
        recipe_text: row.get(5)?,
        created_at: row.get(6)?,
        recipe,
    })
}
