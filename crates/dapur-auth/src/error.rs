use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Any token failure: malformed, bad signature, expired or a bad subject.
    /// Deliberately carries no detail so callers cannot branch on the cause.
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token encoding failed: {0}")]
    TokenEncoding(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}
