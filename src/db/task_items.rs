use sqlx::{sqlite::SqliteConnection, SqlitePool};
use validator::Validate;

use super::{conflict_or_not_found, exists, TASK_ITEMS_TABLE, USERS_TABLE};
use crate::{
    error::AppError,
    models::{TaskItem, TaskItemInput},
};

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Task item {} not found", id))
}

async fn ensure_owner_exists(conn: &mut SqliteConnection, user_id: i64) -> Result<(), AppError> {
    if exists(conn, USERS_TABLE, user_id).await? {
        Ok(())
    } else {
        Err(AppError::ValidationError(format!(
            "User {} does not exist",
            user_id
        )))
    }
}

pub(crate) async fn list_in(conn: &mut SqliteConnection) -> Result<Vec<TaskItem>, AppError> {
    let items = sqlx::query_as::<_, TaskItem>(
        "SELECT id, title, is_completed, user_id FROM task_items ORDER BY id",
    )
    .fetch_all(conn)
    .await?;
    Ok(items)
}

pub(crate) async fn list_for_owner(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Vec<TaskItem>, AppError> {
    let items = sqlx::query_as::<_, TaskItem>(
        "SELECT id, title, is_completed, user_id FROM task_items WHERE user_id = ? ORDER BY id",
    )
    .bind(user_id)
    .fetch_all(conn)
    .await?;
    Ok(items)
}

pub(crate) async fn insert_in(
    conn: &mut SqliteConnection,
    title: &str,
    is_completed: bool,
    user_id: i64,
) -> Result<TaskItem, AppError> {
    let item = sqlx::query_as::<_, TaskItem>(
        "INSERT INTO task_items (title, is_completed, user_id) VALUES (?, ?, ?) \
         RETURNING id, title, is_completed, user_id",
    )
    .bind(title)
    .bind(is_completed)
    .bind(user_id)
    .fetch_one(conn)
    .await?;
    Ok(item)
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<TaskItem>, AppError> {
    let mut conn = pool.acquire().await?;
    list_in(&mut conn).await
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<TaskItem, AppError> {
    sqlx::query_as::<_, TaskItem>(
        "SELECT id, title, is_completed, user_id FROM task_items WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(id))
}

/// Inserts a task item. Fails with `ValidationError` when the owner does not exist.
pub async fn create(pool: &SqlitePool, input: &TaskItemInput) -> Result<TaskItem, AppError> {
    input.validate()?;

    let mut tx = pool.begin().await?;
    ensure_owner_exists(&mut tx, input.user_id).await?;
    let item = insert_in(&mut tx, &input.title, input.is_completed, input.user_id).await?;
    tx.commit().await?;

    log::info!("Created task item {} for user {}", item.id, item.user_id);
    Ok(item)
}

/// Overwrites every field of task item `id`, including its owner.
pub async fn replace(pool: &SqlitePool, id: i64, input: &TaskItemInput) -> Result<(), AppError> {
    input.validate()?;

    let mut tx = pool.begin().await?;
    ensure_owner_exists(&mut tx, input.user_id).await?;

    let result =
        sqlx::query("UPDATE task_items SET title = ?, is_completed = ?, user_id = ? WHERE id = ?")
            .bind(&input.title)
            .bind(input.is_completed)
            .bind(input.user_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;

    if result.rows_affected() == 0 {
        return Err(conflict_or_not_found(&mut tx, TASK_ITEMS_TABLE, id).await);
    }

    tx.commit().await?;
    log::info!("Replaced task item {}", id);
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM task_items WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }

    log::info!("Deleted task item {}", id);
    Ok(())
}
