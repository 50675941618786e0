use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::task_item::{NewTaskItem, TaskItem};

/// A user together with the task items they own, ordered by creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub task_items: Vec<TaskItem>,
}

/// A row of the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
}

impl UserRow {
    pub fn with_task_items(self, task_items: Vec<TaskItem>) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            task_items,
        }
    }
}

/// Body of `POST /api/users` and `PUT /api/users/{id}`.
///
/// On create, `taskItems` are inserted along with the user. On replace they are ignored:
/// only name and email are overwritten.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    /// Must equal the path id on replace when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    #[validate(custom(function = "crate::models::not_blank", message = "Name must not be blank"))]
    pub name: String,

    #[validate(email(message = "Email must be a valid email address"))]
    pub email: Option<String>,

    #[serde(default)]
    #[validate]
    pub task_items: Vec<NewTaskItem>,
}

impl UserInput {
    pub fn matches_id(&self, id: i64) -> bool {
        self.id.map_or(true, |body_id| body_id == id)
    }
}
