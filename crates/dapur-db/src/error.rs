use thiserror::Error;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error("recipe not found")]
    RecipeNotFound,

    #[error("recipe already saved")]
    AlreadySaved,

    #[error("saved recipe not found")]
    SavedRecipeNotFound,

    #[error("{0}")]
    Validation(String),

    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("DB lock poisoned")]
    LockPoisoned,
}

/// True when the statement tripped a UNIQUE constraint.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
