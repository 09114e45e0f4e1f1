use std::cmp::Reverse;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Store, TaskQuery};
use crate::error::{AppError, AppResult};
use crate::models::comment::TaskComment;
use crate::models::project::Project;
use crate::models::sprint::Sprint;
use crate::models::task::Task;

#[derive(Default)]
struct Tables {
    projects: Vec<Project>,
    sprints: Vec<Sprint>,
    tasks: Vec<Task>,
    comments: Vec<TaskComment>,
}

/// Process-local store with the same ordering and cascade rules as the SQL schema.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first; among equal timestamps the later insert comes first.
fn newest_first<T, K: Ord>(
    rows: impl DoubleEndedIterator<Item = T>,
    key: impl Fn(&T) -> K,
) -> Vec<T> {
    let mut rows: Vec<T> = rows.rev().collect();
    rows.sort_by_key(|row| Reverse(key(row)));
    rows
}

fn replace<T>(rows: &mut [T], row: &T, same: impl Fn(&T) -> bool) -> bool
where
    T: Clone,
{
    match rows.iter_mut().find(|r| same(r)) {
        Some(slot) => {
            *slot = row.clone();
            true
        }
        None => false,
    }
}

impl Tables {
    /// Mirrors the `fk_tasks_sprint` constraint, checked under the write lock.
    fn check_sprint_ref(&self, task: &Task) -> AppResult<()> {
        match task.sprint_id.as_deref() {
            Some(sprint_id)
                if !self
                    .sprints
                    .iter()
                    .any(|s| s.id == sprint_id && s.project_id == task.project_id) =>
            {
                Err(AppError::InvalidInput(format!(
                    "Sprint {} does not exist in project {}",
                    sprint_id, task.project_id
                )))
            }
            _ => Ok(()),
        }
    }

    fn remove_tasks_where(&mut self, doomed: impl Fn(&Task) -> bool) {
        let task_ids: Vec<String> = self
            .tasks
            .iter()
            .filter(|t| doomed(t))
            .map(|t| t.id.clone())
            .collect();
        self.tasks.retain(|t| !doomed(t));
        self.comments.retain(|c| !task_ids.contains(&c.task_id));
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn store_type(&self) -> &'static str {
        "memory"
    }

    async fn list_projects(&self) -> AppResult<Vec<Project>> {
        let tables = self.tables.read().await;
        Ok(newest_first(tables.projects.iter().cloned(), |p| p.created_at))
    }

    async fn get_project(&self, id: &str) -> AppResult<Option<Project>> {
        let tables = self.tables.read().await;
        Ok(tables.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_project(&self, project: &Project) -> AppResult<()> {
        self.tables.write().await.projects.push(project.clone());
        Ok(())
    }

    async fn update_project(&self, project: &Project) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(replace(&mut tables.projects, project, |p| p.id == project.id))
    }

    async fn delete_project(&self, id: &str) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.projects.len();
        tables.projects.retain(|p| p.id != id);
        if tables.projects.len() == before {
            return Ok(false);
        }
        tables.sprints.retain(|s| s.project_id != id);
        tables.remove_tasks_where(|t| t.project_id == id);
        Ok(true)
    }

    async fn list_sprints(&self, project_id: &str) -> AppResult<Vec<Sprint>> {
        let tables = self.tables.read().await;
        let rows = tables
            .sprints
            .iter()
            .filter(|s| s.project_id == project_id)
            .cloned()
            .collect::<Vec<_>>();
        Ok(newest_first(rows.into_iter(), |s| s.created_at))
    }

    async fn get_sprint(&self, id: &str) -> AppResult<Option<Sprint>> {
        let tables = self.tables.read().await;
        Ok(tables.sprints.iter().find(|s| s.id == id).cloned())
    }

    async fn insert_sprint(&self, sprint: &Sprint) -> AppResult<()> {
        self.tables.write().await.sprints.push(sprint.clone());
        Ok(())
    }

    async fn update_sprint(&self, sprint: &Sprint) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(replace(&mut tables.sprints, sprint, |s| s.id == sprint.id))
    }

    async fn delete_sprint(&self, id: &str) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.sprints.len();
        tables.sprints.retain(|s| s.id != id);
        if tables.sprints.len() == before {
            return Ok(false);
        }
        for task in tables.tasks.iter_mut() {
            if task.sprint_id.as_deref() == Some(id) {
                task.sprint_id = None;
            }
        }
        Ok(true)
    }

    async fn list_tasks(&self, query: &TaskQuery) -> AppResult<Vec<Task>> {
        let tables = self.tables.read().await;
        let rows = tables
            .tasks
            .iter()
            .filter(|t| t.project_id == query.project_id)
            .filter(|t| match &query.sprint_id {
                Some(sprint_id) => t.sprint_id.as_ref() == Some(sprint_id),
                None => true,
            })
            .cloned()
            .collect::<Vec<_>>();
        Ok(newest_first(rows.into_iter(), |t| t.created_at))
    }

    async fn get_task(&self, id: &str) -> AppResult<Option<Task>> {
        let tables = self.tables.read().await;
        Ok(tables.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn insert_task(&self, task: &Task) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        tables.check_sprint_ref(task)?;
        tables.tasks.push(task.clone());
        Ok(())
    }

    async fn update_task(&self, task: &Task) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.tasks.iter().any(|t| t.id == task.id) {
            return Ok(false);
        }
        tables.check_sprint_ref(task)?;
        Ok(replace(&mut tables.tasks, task, |t| t.id == task.id))
    }

    async fn delete_task(&self, id: &str) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.tasks.len();
        tables.remove_tasks_where(|t| t.id == id);
        Ok(tables.tasks.len() != before)
    }

    async fn list_comments(&self, task_id: &str) -> AppResult<Vec<TaskComment>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<TaskComment> = tables
            .comments
            .iter()
            .filter(|c| c.task_id == task_id)
            .cloned()
            .collect();
        rows.sort_by_key(|c| c.created_at);
        Ok(rows)
    }

    async fn insert_comment(&self, comment: &TaskComment) -> AppResult<()> {
        self.tables.write().await.comments.push(comment.clone());
        Ok(())
    }

    async fn delete_comment(&self, id: &str) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.comments.len();
        tables.comments.retain(|c| c.id != id);
        Ok(tables.comments.len() != before)
    }
}
