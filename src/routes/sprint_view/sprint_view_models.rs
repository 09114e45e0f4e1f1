use serde::Serialize;

use crate::models::sprint::Sprint;

/// A sprint together with how far its tasks have come.
#[derive(Serialize)]
pub struct SprintOverview {
    #[serde(flatten)]
    pub sprint: Sprint,
    pub completed_tasks: usize,
    pub total_tasks: usize,
    pub progress: u32,
}

#[derive(Serialize)]
pub struct GetSprintListResponse {
    pub sprints: Vec<SprintOverview>,
}

#[derive(Serialize)]
pub struct AddSprintResponse {
    pub success: bool,
    pub message: String,
    pub sprint: Sprint,
}

#[derive(Serialize)]
pub struct UpdateSprintResponse {
    pub success: bool,
    pub message: String,
    pub sprint: Sprint,
}
