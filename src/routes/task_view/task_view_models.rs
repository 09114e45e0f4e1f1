use serde::{Deserialize, Serialize};

use crate::models::comment::TaskComment;
use crate::models::task::Task;
use crate::stats::TaskBoard;

#[derive(Deserialize)]
pub struct TaskListQuery {
    /// `all`, blank or absent lists the whole project.
    pub sprint_id: Option<String>,
}

impl TaskListQuery {
    pub fn sprint_filter(&self) -> Option<String> {
        self.sprint_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty() && *id != "all")
            .map(str::to_string)
    }
}

#[derive(Serialize)]
pub struct GetTaskListResponse {
    pub tasks: Vec<Task>,
}

#[derive(Serialize)]
pub struct GetTaskBoardResponse {
    pub board: TaskBoard,
}

#[derive(Serialize)]
pub struct GetTaskDetailResponse {
    pub task: Task,
}

#[derive(Serialize)]
pub struct AddTaskResponse {
    pub success: bool,
    pub message: String,
    pub task: Task,
}

#[derive(Serialize)]
pub struct UpdateTaskResponse {
    pub success: bool,
    pub message: String,
    pub task: Task,
}

#[derive(Serialize)]
pub struct GetCommentListResponse {
    pub comments: Vec<TaskComment>,
}

#[derive(Serialize)]
pub struct AddCommentResponse {
    pub success: bool,
    pub message: String,
    pub comment: TaskComment,
}
