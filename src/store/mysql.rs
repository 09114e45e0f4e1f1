use async_trait::async_trait;
use log::info;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;

use super::{Store, TaskQuery};
use crate::error::{AppError, AppResult};
use crate::models::comment::TaskComment;
use crate::models::project::Project;
use crate::models::sprint::Sprint;
use crate::models::task::Task;

const TASK_COLUMNS: &str = "id, project_id, sprint_id, title, description, status, priority, \
     estimated_hours, actual_hours, assigned_to, due_date, created_at, updated_at";

/// A task whose project or sprint vanished since the handler looked it up.
fn dangling_task_ref(err: sqlx::Error, task: &Task) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => AppError::InvalidInput(
            format!("Task {} references a project or sprint that no longer exists", task.id),
        ),
        _ => AppError::Database(err),
    }
}

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> AppResult<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(MySqlStore { pool })
    }

    /// Applies the bundled schema migrations.
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database schema is up to date");
        Ok(())
    }
}

#[async_trait]
impl Store for MySqlStore {
    fn store_type(&self) -> &'static str {
        "mysql"
    }

    async fn list_projects(&self) -> AppResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            "SELECT id, name, description, status, start_date, end_date, created_at, updated_at
             FROM projects
             ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(projects)
    }

    async fn get_project(&self, id: &str) -> AppResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(
            "SELECT id, name, description, status, start_date, end_date, created_at, updated_at
             FROM projects
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(project)
    }

    async fn insert_project(&self, project: &Project) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO projects (id, name, description, status, start_date, end_date, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&project.id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.status)
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_project(&self, project: &Project) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE projects
             SET name = ?, description = ?, status = ?, start_date = ?, end_date = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.status)
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(project.updated_at)
        .bind(&project.id)
        .execute(&self.pool)
        .await?;
        // MySQL reports changed rows, so an identical rewrite counts as zero
        if result.rows_affected() > 0 {
            return Ok(true);
        }
        Ok(self.get_project(&project.id).await?.is_some())
    }

    async fn delete_project(&self, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_sprints(&self, project_id: &str) -> AppResult<Vec<Sprint>> {
        let sprints = sqlx::query_as::<_, Sprint>(
            "SELECT id, project_id, name, description, start_date, end_date, status, created_at
             FROM sprints
             WHERE project_id = ?
             ORDER BY created_at DESC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(sprints)
    }

    async fn get_sprint(&self, id: &str) -> AppResult<Option<Sprint>> {
        let sprint = sqlx::query_as::<_, Sprint>(
            "SELECT id, project_id, name, description, start_date, end_date, status, created_at
             FROM sprints
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(sprint)
    }

    async fn insert_sprint(&self, sprint: &Sprint) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO sprints (id, project_id, name, description, start_date, end_date, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&sprint.id)
        .bind(&sprint.project_id)
        .bind(&sprint.name)
        .bind(&sprint.description)
        .bind(sprint.start_date)
        .bind(sprint.end_date)
        .bind(sprint.status)
        .bind(sprint.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_sprint(&self, sprint: &Sprint) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE sprints
             SET name = ?, description = ?, start_date = ?, end_date = ?, status = ?
             WHERE id = ?",
        )
        .bind(&sprint.name)
        .bind(&sprint.description)
        .bind(sprint.start_date)
        .bind(sprint.end_date)
        .bind(sprint.status)
        .bind(&sprint.id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() > 0 {
            return Ok(true);
        }
        Ok(self.get_sprint(&sprint.id).await?.is_some())
    }

    async fn delete_sprint(&self, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM sprints WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_tasks(&self, query: &TaskQuery) -> AppResult<Vec<Task>> {
        let tasks = match &query.sprint_id {
            Some(sprint_id) => {
                sqlx::query_as::<_, Task>(&format!(
                    "SELECT {} FROM tasks
                     WHERE project_id = ? AND sprint_id = ?
                     ORDER BY created_at DESC",
                    TASK_COLUMNS
                ))
                .bind(&query.project_id)
                .bind(sprint_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Task>(&format!(
                    "SELECT {} FROM tasks
                     WHERE project_id = ?
                     ORDER BY created_at DESC",
                    TASK_COLUMNS
                ))
                .bind(&query.project_id)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(tasks)
    }

    async fn get_task(&self, id: &str) -> AppResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = ?",
            TASK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn insert_task(&self, task: &Task) -> AppResult<()> {
        sqlx::query(&format!(
            "INSERT INTO tasks ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            TASK_COLUMNS
        ))
        .bind(&task.id)
        .bind(&task.project_id)
        .bind(&task.sprint_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .bind(task.priority)
        .bind(task.estimated_hours)
        .bind(task.actual_hours)
        .bind(&task.assigned_to)
        .bind(task.due_date)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| dangling_task_ref(e, task))?;
        Ok(())
    }

    async fn update_task(&self, task: &Task) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE tasks
             SET sprint_id = ?, title = ?, description = ?, status = ?, priority = ?,
                 estimated_hours = ?, actual_hours = ?, assigned_to = ?, due_date = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&task.sprint_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .bind(task.priority)
        .bind(task.estimated_hours)
        .bind(task.actual_hours)
        .bind(&task.assigned_to)
        .bind(task.due_date)
        .bind(task.updated_at)
        .bind(&task.id)
        .execute(&self.pool)
        .await
        .map_err(|e| dangling_task_ref(e, task))?;
        if result.rows_affected() > 0 {
            return Ok(true);
        }
        Ok(self.get_task(&task.id).await?.is_some())
    }

    async fn delete_task(&self, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_comments(&self, task_id: &str) -> AppResult<Vec<TaskComment>> {
        let comments = sqlx::query_as::<_, TaskComment>(
            "SELECT id, task_id, comment, author, created_at
             FROM task_comments
             WHERE task_id = ?
             ORDER BY created_at ASC",
        )
        .bind(task_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(comments)
    }

    async fn insert_comment(&self, comment: &TaskComment) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO task_comments (id, task_id, comment, author, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&comment.id)
        .bind(&comment.task_id)
        .bind(&comment.comment)
        .bind(&comment.author)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_comment(&self, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM task_comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
