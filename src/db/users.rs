use std::collections::HashMap;

use sqlx::SqlitePool;
use validator::Validate;

use super::{conflict_or_not_found, exists, task_items, USERS_TABLE};
use crate::{
    error::AppError,
    models::{TaskItem, User, UserInput, UserRow},
};

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("User {} not found", id))
}

/// All users, each with their task items, ordered by id.
pub async fn list(pool: &SqlitePool) -> Result<Vec<User>, AppError> {
    let mut tx = pool.begin().await?;

    let rows = sqlx::query_as::<_, UserRow>("SELECT id, name, email FROM users ORDER BY id")
        .fetch_all(&mut *tx)
        .await?;
    let items = task_items::list_in(&mut tx).await?;

    tx.commit().await?;

    let mut by_owner: HashMap<i64, Vec<TaskItem>> = HashMap::new();
    for item in items {
        by_owner.entry(item.user_id).or_default().push(item);
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let owned = by_owner.remove(&row.id).unwrap_or_default();
            row.with_task_items(owned)
        })
        .collect())
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<User, AppError> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, UserRow>("SELECT id, name, email FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| not_found(id))?;
    let owned = task_items::list_for_owner(&mut tx, id).await?;

    tx.commit().await?;
    Ok(row.with_task_items(owned))
}

/// Inserts a user and any inline task items in one transaction.
pub async fn create(pool: &SqlitePool, input: &UserInput) -> Result<User, AppError> {
    input.validate()?;

    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, UserRow>(
        "INSERT INTO users (name, email) VALUES (?, ?) RETURNING id, name, email",
    )
    .bind(&input.name)
    .bind(&input.email)
    .fetch_one(&mut *tx)
    .await?;

    let mut owned = Vec::with_capacity(input.task_items.len());
    for new_item in &input.task_items {
        let item = task_items::insert_in(&mut tx, &new_item.title, new_item.is_completed, row.id)
            .await?;
        owned.push(item);
    }

    tx.commit().await?;

    log::info!("Created user {} with {} task items", row.id, owned.len());
    Ok(row.with_task_items(owned))
}

/// Overwrites name and email of user `id`. Owned task items are left alone.
pub async fn replace(pool: &SqlitePool, id: i64, input: &UserInput) -> Result<(), AppError> {
    input.validate()?;

    let mut tx = pool.begin().await?;

    let result = sqlx::query("UPDATE users SET name = ?, email = ? WHERE id = ?")
        .bind(&input.name)
        .bind(&input.email)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(conflict_or_not_found(&mut tx, USERS_TABLE, id).await);
    }

    tx.commit().await?;
    log::info!("Replaced user {}", id);
    Ok(())
}

/// Deletes user `id` and, first, every task item it owns.
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    if !exists(&mut tx, USERS_TABLE, id).await? {
        return Err(not_found(id));
    }

    let removed = sqlx::query("DELETE FROM task_items WHERE user_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    log::info!("Deleted user {} and {} owned task items", id, removed);
    Ok(())
}

/// First user (lowest id) whose name equals `name` or whose email equals `email`.
pub async fn find_by_identity(
    pool: &SqlitePool,
    name: &str,
    email: &str,
) -> Result<Option<UserRow>, AppError> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, name, email FROM users WHERE name = ? OR email = ? ORDER BY id LIMIT 1",
    )
    .bind(name)
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
