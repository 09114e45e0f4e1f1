//! Row-level CRUD over the `projects`, `sprints`, `tasks` and `task_comments`
//! relations.

pub mod memory;
pub mod mysql;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::comment::TaskComment;
use crate::models::project::Project;
use crate::models::sprint::Sprint;
use crate::models::task::Task;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

/// Filter for task selection. `sprint_id` narrows the project's tasks to one sprint.
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    pub project_id: String,
    pub sprint_id: Option<String>,
}

impl TaskQuery {
    pub fn project(project_id: &str) -> Self {
        TaskQuery {
            project_id: project_id.to_string(),
            sprint_id: None,
        }
    }
}

/// Persistence interface. Lists are ordered newest first except comments,
/// which read oldest first. Update and delete report whether a row matched.
#[async_trait]
pub trait Store: Send + Sync {
    fn store_type(&self) -> &'static str;

    // === Projects ===

    async fn list_projects(&self) -> AppResult<Vec<Project>>;

    async fn get_project(&self, id: &str) -> AppResult<Option<Project>>;

    async fn insert_project(&self, project: &Project) -> AppResult<()>;

    async fn update_project(&self, project: &Project) -> AppResult<bool>;

    /// Also removes the project's sprints, tasks and their comments.
    async fn delete_project(&self, id: &str) -> AppResult<bool>;

    // === Sprints ===

    async fn list_sprints(&self, project_id: &str) -> AppResult<Vec<Sprint>>;

    async fn get_sprint(&self, id: &str) -> AppResult<Option<Sprint>>;

    async fn insert_sprint(&self, sprint: &Sprint) -> AppResult<()>;

    async fn update_sprint(&self, sprint: &Sprint) -> AppResult<bool>;

    /// Tasks of the sprint stay in the project with no sprint.
    async fn delete_sprint(&self, id: &str) -> AppResult<bool>;

    // === Tasks ===

    async fn list_tasks(&self, query: &TaskQuery) -> AppResult<Vec<Task>>;

    async fn get_task(&self, id: &str) -> AppResult<Option<Task>>;

    /// Insert and update answer `AppError::InvalidInput` when `sprint_id`
    /// names a sprint that no longer exists.
    async fn insert_task(&self, task: &Task) -> AppResult<()>;

    async fn update_task(&self, task: &Task) -> AppResult<bool>;

    /// Also removes the task's comments.
    async fn delete_task(&self, id: &str) -> AppResult<bool>;

    // === Comments ===

    async fn list_comments(&self, task_id: &str) -> AppResult<Vec<TaskComment>>;

    async fn insert_comment(&self, comment: &TaskComment) -> AppResult<()>;

    async fn delete_comment(&self, id: &str) -> AppResult<bool>;
}
