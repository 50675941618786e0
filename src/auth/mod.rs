//! Auth gate: a login stub that trusts any known identity, and HS256 bearer tokens.
//!
//! There is no password. A user is identified by name or email alone.

pub mod extractors;
pub mod middleware;
pub mod token;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{db, error::AppError};

pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use token::{Claims, TokenService};

/// Body of `POST /api/auth/login`.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoginRequest {
    /// Required. Matched against names, and against emails when `email` is absent.
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl LoginRequest {
    /// The `(name, email)` pair to look up, or `None` when `username` is blank.
    ///
    /// `email` is only an additional match; it never stands in for a username.
    pub fn identity(&self) -> Option<(&str, &str)> {
        let username = self.username.trim();
        if username.is_empty() {
            return None;
        }

        let email = self
            .email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .unwrap_or(username);
        Some((username, email))
    }
}

/// Response of a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

/// Issues a token for the user named by `request`.
///
/// `BadRequest` when no identifier is given, `Unauthorized` when nobody matches.
pub async fn issue_token(
    pool: &SqlitePool,
    tokens: &TokenService,
    request: &LoginRequest,
) -> Result<String, AppError> {
    let (name, email) = request
        .identity()
        .ok_or_else(|| AppError::BadRequest("Username is required".into()))?;

    let user = db::users::find_by_identity(pool, name, email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".into()))?;

    log::info!("Issuing token for user {}", user.id);
    tokens.issue(&user)
}
