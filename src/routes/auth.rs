use crate::{
    auth::{self, AuthResponse, LoginRequest, TokenService},
    error::AppError,
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::SqlitePool;

/// Login
///
/// Issues a one-hour token for the user whose name (or email) matches. No password is
/// checked.
///
/// ## Responses:
/// - `200 OK`: `{"token": "..."}`.
/// - `400 Bad Request`: No username or email given.
/// - `401 Unauthorized`: No matching user.
#[post("/login")]
pub async fn login(
    pool: web::Data<SqlitePool>,
    tokens: web::Data<TokenService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let token = auth::issue_token(&pool, &tokens, &login_data).await?;
    Ok(HttpResponse::Ok().json(AuthResponse { token }))
}
