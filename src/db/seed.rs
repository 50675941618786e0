use sqlx::SqlitePool;

use super::task_items;
use crate::error::AppError;

struct SeedUser {
    name: &'static str,
    email: &'static str,
    task_items: &'static [(&'static str, bool)],
}

const SEED_USERS: [SeedUser; 3] = [
    SeedUser {
        name: "Alice Johnson",
        email: "alice@example.com",
        task_items: &[
            ("Set up the project structure", true),
            ("Implement RESTful API", false),
        ],
    },
    SeedUser {
        name: "Bob Smith",
        email: "bob@example.com",
        task_items: &[("Design database schema", false)],
    },
    SeedUser {
        name: "Charlie Brown",
        email: "charlie@example.com",
        task_items: &[("Write README documentation", true)],
    },
];

/// Inserts the demo users and their task items when the store has no users.
/// Returns whether anything was inserted.
pub async fn seed_if_empty(pool: &SqlitePool) -> Result<bool, AppError> {
    let mut tx = pool.begin().await?;

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&mut *tx)
        .await?;
    if existing > 0 {
        log::debug!("Store already holds {} users, skipping seed", existing);
        return Ok(false);
    }

    let mut inserted_items = 0;
    for seed in &SEED_USERS {
        let user_id: i64 =
            sqlx::query_scalar("INSERT INTO users (name, email) VALUES (?, ?) RETURNING id")
                .bind(seed.name)
                .bind(seed.email)
                .fetch_one(&mut *tx)
                .await?;

        for (title, is_completed) in seed.task_items {
            task_items::insert_in(&mut tx, title, *is_completed, user_id).await?;
            inserted_items += 1;
        }
    }

    tx.commit().await?;

    log::info!(
        "Seeded {} users and {} task items",
        SEED_USERS.len(),
        inserted_items
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[actix_rt::test]
    async fn test_seed_skipped_when_users_exist() {
        // test_pool has already seeded once.
        let pool = test_pool().await;
        assert!(!seed_if_empty(&pool).await.unwrap());

        let items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM task_items")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(items, 4);
    }

    #[actix_rt::test]
    async fn test_seed_runs_again_after_users_are_removed() {
        let pool = test_pool().await;
        sqlx::query("DELETE FROM task_items").execute(&pool).await.unwrap();
        sqlx::query("DELETE FROM users").execute(&pool).await.unwrap();

        assert!(seed_if_empty(&pool).await.unwrap());
    }
}
