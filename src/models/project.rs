use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{new_id, now, nullable, optional_text, required_name};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Planning,
    Active,
    OnHold,
    Completed,
}

text_enum!(ProjectStatus {
    Planning => "planning",
    Active => "active",
    OnHold => "on_hold",
    Completed => "completed",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    #[serde(default, deserialize_with = "nullable")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable")]
    pub end_date: Option<Option<NaiveDate>>,
}

fn check_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> AppResult<()> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(AppError::InvalidInput(
                "Project end date precedes its start date".to_string(),
            ));
        }
    }
    Ok(())
}

impl Project {
    pub fn create(input: NewProject) -> AppResult<Self> {
        let name = required_name("Project name", &input.name)?;
        check_dates(input.start_date, input.end_date)?;

        let created_at = now();
        Ok(Project {
            id: new_id(),
            name,
            description: optional_text(input.description),
            status: input.status.unwrap_or_default(),
            start_date: input.start_date,
            end_date: input.end_date,
            created_at,
            updated_at: created_at,
        })
    }

    pub fn apply(&mut self, update: ProjectUpdate) -> AppResult<()> {
        let mut next = self.clone();
        if let Some(name) = update.name {
            next.name = required_name("Project name", &name)?;
        }
        if let Some(description) = update.description {
            next.description = description.trim().to_string();
        }
        if let Some(status) = update.status {
            next.status = status;
        }
        if let Some(start_date) = update.start_date {
            next.start_date = start_date;
        }
        if let Some(end_date) = update.end_date {
            next.end_date = end_date;
        }
        check_dates(next.start_date, next.end_date)?;

        next.updated_at = now();
        *self = next;
        Ok(())
    }
}
