use crate::{auth::AuthenticatedUser, db, error::AppError, models::UserInput};
use actix_web::{delete, get, http::header, post, put, web, HttpResponse, Responder};
use sqlx::SqlitePool;

/// Lists all users with their task items.
///
/// ## Responses:
/// - `200 OK`: JSON array of users, each with a nested `taskItems` array.
/// - `401 Unauthorized`: Missing or invalid token.
#[get("")]
pub async fn list_users(
    pool: web::Data<SqlitePool>,
    caller: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    log::debug!("User {} listing users", caller.0.sub);
    let users = db::users::list(&pool).await?;
    Ok(HttpResponse::Ok().json(users))
}

/// Returns a single user with their task items.
///
/// ## Responses:
/// - `200 OK`: The user.
/// - `401 Unauthorized`: Missing or invalid token.
/// - `404 Not Found`: No user with that id.
#[get("/{id}")]
pub async fn get_user(
    pool: web::Data<SqlitePool>,
    user_id: web::Path<i64>,
    caller: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let id = user_id.into_inner();
    log::debug!("User {} reading user {}", caller.0.sub, id);
    let user = db::users::get(&pool, id).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Creates a user, plus any task items given inline under `taskItems`.
///
/// ## Responses:
/// - `201 Created`: The new user, with a `Location` header.
/// - `400 Bad Request`: Missing or blank name, name over 100 characters, malformed email.
/// - `401 Unauthorized`: Missing or invalid token.
#[post("")]
pub async fn create_user(
    pool: web::Data<SqlitePool>,
    user_data: web::Json<UserInput>,
    caller: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let user = db::users::create(&pool, &user_data).await?;
    log::debug!("User {} created user {}", caller.0.sub, user.id);
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/users/{}", user.id)))
        .json(user))
}

/// Replaces name and email of a user.
///
/// ## Responses:
/// - `204 No Content`: Replaced.
/// - `400 Bad Request`: Body `id` differs from the path, or validation failed.
/// - `401 Unauthorized`: Missing or invalid token.
/// - `404 Not Found`: No user with that id.
#[put("/{id}")]
pub async fn replace_user(
    pool: web::Data<SqlitePool>,
    user_id: web::Path<i64>,
    user_data: web::Json<UserInput>,
    caller: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let id = user_id.into_inner();
    if !user_data.matches_id(id) {
        return Err(AppError::BadRequest(format!(
            "Body id does not match path id {}",
            id
        )));
    }

    db::users::replace(&pool, id, &user_data).await?;
    log::debug!("User {} replaced user {}", caller.0.sub, id);
    Ok(HttpResponse::NoContent().finish())
}

/// Deletes a user together with all of their task items.
///
/// ## Responses:
/// - `204 No Content`: Deleted.
/// - `401 Unauthorized`: Missing or invalid token.
/// - `404 Not Found`: No user with that id.
#[delete("/{id}")]
pub async fn delete_user(
    pool: web::Data<SqlitePool>,
    user_id: web::Path<i64>,
    caller: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let id = user_id.into_inner();
    db::users::delete(&pool, id).await?;
    log::info!("User {} deleted user {}", caller.0.sub, id);
    Ok(HttpResponse::NoContent().finish())
}
