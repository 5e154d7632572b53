use rusqlite::Connection;
use tracing::info;

use crate::DbResult;

pub fn run(conn: &Connection) -> DbResult<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                id          TEXT PRIMARY KEY,
                email       TEXT NOT NULL UNIQUE,
                name        TEXT NOT NULL,
                password    TEXT NOT NULL,
                created_at  TEXT NOT NULL
            );

            CREATE TABLE recipes (
                id              TEXT PRIMARY KEY,
                user_id         TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                ingredients     TEXT NOT NULL,
                mood            TEXT NOT NULL,
                meal_type       TEXT NOT NULL,
                cooking_time    INTEGER NOT NULL,
                language        TEXT NOT NULL,
                recipe          TEXT NOT NULL,
                created_at      TEXT NOT NULL
            );

            CREATE INDEX idx_recipes_user
                ON recipes(user_id, created_at);

            CREATE TABLE saved_recipes (
                id              TEXT PRIMARY KEY,
                user_id         TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                recipe_id       TEXT REFERENCES recipes(id) ON DELETE SET NULL,
                name            TEXT NOT NULL,
                notes           TEXT,
                recipe_text     TEXT NOT NULL,
                created_at      TEXT NOT NULL
            );

            CREATE INDEX idx_saved_recipes_user
                ON saved_recipes(user_id, created_at);

            -- One bookmark per generated recipe per user
            CREATE UNIQUE INDEX idx_saved_recipes_user_recipe
                ON saved_recipes(user_id, recipe_id)
                WHERE recipe_id IS NOT NULL;

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
