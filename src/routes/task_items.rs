//! Task item routes. Unlike the users routes these require no token.

use crate::{db, error::AppError, models::TaskItemInput};
use actix_web::{delete, get, http::header, post, put, web, HttpResponse, Responder};
use sqlx::SqlitePool;

#[get("")]
pub async fn list_task_items(pool: web::Data<SqlitePool>) -> Result<impl Responder, AppError> {
    let items = db::task_items::list(&pool).await?;
    Ok(HttpResponse::Ok().json(items))
}

#[get("/{id}")]
pub async fn get_task_item(
    pool: web::Data<SqlitePool>,
    item_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let item = db::task_items::get(&pool, item_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(item))
}

/// Creates a task item.
///
/// ## Responses:
/// - `201 Created`: The new item, with a `Location` header.
/// - `400 Bad Request`: Missing or overlong title, or `userId` names no existing user.
#[post("")]
pub async fn create_task_item(
    pool: web::Data<SqlitePool>,
    item_data: web::Json<TaskItemInput>,
) -> Result<impl Responder, AppError> {
    let item = db::task_items::create(&pool, &item_data).await?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/taskitems/{}", item.id)))
        .json(item))
}

/// Replaces every field of a task item, owner included.
///
/// ## Responses:
/// - `204 No Content`: Replaced.
/// - `400 Bad Request`: Body `id` differs from the path, validation failed, or unknown owner.
/// - `404 Not Found`: No task item with that id.
#[put("/{id}")]
pub async fn replace_task_item(
    pool: web::Data<SqlitePool>,
    item_id: web::Path<i64>,
    item_data: web::Json<TaskItemInput>,
) -> Result<impl Responder, AppError> {
    let id = item_id.into_inner();
    if !item_data.matches_id(id) {
        return Err(AppError::BadRequest(format!(
            "Body id does not match path id {}",
            id
        )));
    }

    db::task_items::replace(&pool, id, &item_data).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[delete("/{id}")]
pub async fn delete_task_item(
    pool: web::Data<SqlitePool>,
    item_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    db::task_items::delete(&pool, item_id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
