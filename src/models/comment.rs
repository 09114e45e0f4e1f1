use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{new_id, now, required_name, required_text};
use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskComment {
    pub id: String,
    pub task_id: String,
    pub comment: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewComment {
    pub comment: String,
    pub author: String,
}

impl TaskComment {
    pub fn create(task_id: &str, input: NewComment) -> AppResult<Self> {
        Ok(TaskComment {
            id: new_id(),
            task_id: task_id.to_string(),
            comment: required_text("Comment", &input.comment)?,
            author: required_name("Author", &input.author)?,
            created_at: now(),
        })
    }
}
