//! Password hashing and bearer-token issuing for DapurPintar accounts.
//!
//! Everything here is CPU-bound and free of I/O; callers decide where to run it.

mod error;
pub mod password;
pub mod token;

pub use error::{AuthError, AuthResult};
pub use password::{hash_password, verify_password};
pub use token::TokenService;

/// Bearer tokens are valid for seven days from issue.
pub const TOKEN_VALIDITY_DAYS: i64 = 7;
