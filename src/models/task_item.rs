use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A task item as stored in `task_items` and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TaskItem {
    pub id: i64,
    pub title: String,
    pub is_completed: bool,
    /// Owning user. Always resolves to an existing row in `users`.
    pub user_id: i64,
}

/// Body of `POST /api/taskitems` and `PUT /api/taskitems/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskItemInput {
    /// Must equal the path id on replace when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    #[validate(custom(function = "crate::models::not_blank", message = "Title must not be blank"))]
    pub title: String,

    #[serde(default)]
    pub is_completed: bool,

    pub user_id: i64,
}

impl TaskItemInput {
    pub fn matches_id(&self, id: i64) -> bool {
        self.id.map_or(true, |body_id| body_id == id)
    }
}

/// A task item created inline with its owner, see `UserInput::task_items`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTaskItem {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    #[validate(custom(function = "crate::models::not_blank", message = "Title must not be blank"))]
    pub title: String,

    #[serde(default)]
    pub is_completed: bool,
}
