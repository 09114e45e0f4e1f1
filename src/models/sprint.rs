use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{new_id, now, optional_text, required_name};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SprintStatus {
    #[default]
    Planned,
    Active,
    Completed,
}

text_enum!(SprintStatus {
    Planned => "planned",
    Active => "active",
    Completed => "completed",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Sprint {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: SprintStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewSprint {
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: Option<SprintStatus>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SprintUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<SprintStatus>,
}

fn check_dates(start: NaiveDate, end: NaiveDate) -> AppResult<()> {
    if end < start {
        return Err(AppError::InvalidInput(
            "Sprint end date precedes its start date".to_string(),
        ));
    }
    Ok(())
}

impl Sprint {
    pub fn create(project_id: &str, input: NewSprint) -> AppResult<Self> {
        let name = required_name("Sprint name", &input.name)?;
        check_dates(input.start_date, input.end_date)?;

        Ok(Sprint {
            id: new_id(),
            project_id: project_id.to_string(),
            name,
            description: optional_text(input.description),
            start_date: input.start_date,
            end_date: input.end_date,
            status: input.status.unwrap_or_default(),
            created_at: now(),
        })
    }

    pub fn apply(&mut self, update: SprintUpdate) -> AppResult<()> {
        let mut next = self.clone();
        if let Some(name) = update.name {
            next.name = required_name("Sprint name", &name)?;
        }
        if let Some(description) = update.description {
            next.description = description.trim().to_string();
        }
        if let Some(start_date) = update.start_date {
            next.start_date = start_date;
        }
        if let Some(end_date) = update.end_date {
            next.end_date = end_date;
        }
        if let Some(status) = update.status {
            next.status = status;
        }
        check_dates(next.start_date, next.end_date)?;

        *self = next;
        Ok(())
    }
}
