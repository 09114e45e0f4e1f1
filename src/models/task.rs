use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{
    new_id, non_negative_hours, normalize_ref, now, nullable, optional_text, required_name,
    short_text,
};
use crate::error::AppResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Review,
    Done,
}

text_enum!(TaskStatus {
    Todo => "todo",
    InProgress => "in_progress",
    Review => "review",
    Done => "done",
});

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Review,
        TaskStatus::Done,
    ];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

text_enum!(TaskPriority {
    Low => "low",
    Medium => "medium",
    High => "high",
    Critical => "critical",
});

impl TaskPriority {
    pub const ALL: [TaskPriority; 4] = [
        TaskPriority::Low,
        TaskPriority::Medium,
        TaskPriority::High,
        TaskPriority::Critical,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: String,
    pub project_id: String,
    pub sprint_id: Option<String>,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub estimated_hours: f64,
    pub actual_hours: f64,
    pub assigned_to: String,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub sprint_id: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assigned_to: Option<String>,
    pub estimated_hours: Option<f64>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub sprint_id: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assigned_to: Option<String>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    #[serde(default, deserialize_with = "nullable")]
    pub due_date: Option<Option<NaiveDate>>,
}

impl Task {
    pub fn create(project_id: &str, input: NewTask) -> AppResult<Self> {
        let title = required_name("Task title", &input.title)?;
        let estimated_hours =
            non_negative_hours("Estimated hours", input.estimated_hours.unwrap_or(0.0))?;
        let assigned_to = short_text("Assignee", optional_text(input.assigned_to))?;

        let created_at = now();
        Ok(Task {
            id: new_id(),
            project_id: project_id.to_string(),
            sprint_id: normalize_ref(input.sprint_id),
            title,
            description: optional_text(input.description),
            status: input.status.unwrap_or_default(),
            priority: input.priority.unwrap_or_default(),
            estimated_hours,
            actual_hours: 0.0,
            assigned_to,
            due_date: input.due_date,
            created_at,
            updated_at: created_at,
        })
    }

    pub fn apply(&mut self, update: TaskUpdate) -> AppResult<()> {
        let mut next = self.clone();
        if let Some(title) = update.title {
            next.title = required_name("Task title", &title)?;
        }
        if let Some(description) = update.description {
            next.description = description.trim().to_string();
        }
        if let Some(sprint_id) = update.sprint_id {
            next.sprint_id = normalize_ref(sprint_id);
        }
        if let Some(status) = update.status {
            next.status = status;
        }
        if let Some(priority) = update.priority {
            next.priority = priority;
        }
        if let Some(assigned_to) = update.assigned_to {
            next.assigned_to = short_text("Assignee", assigned_to.trim().to_string())?;
        }
        if let Some(hours) = update.estimated_hours {
            next.estimated_hours = non_negative_hours("Estimated hours", hours)?;
        }
        if let Some(hours) = update.actual_hours {
            next.actual_hours = non_negative_hours("Actual hours", hours)?;
        }
        if let Some(due_date) = update.due_date {
            next.due_date = due_date;
        }

        next.updated_at = now();
        *self = next;
        Ok(())
    }
}
