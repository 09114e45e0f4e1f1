use serde::Serialize;

use crate::models::project::Project;
use crate::stats::PortfolioStats;

#[derive(Serialize)]
pub struct GetProjectListResponse {
    pub projects: Vec<Project>,
    pub stats: PortfolioStats,
}

#[derive(Serialize)]
pub struct GetProjectDetailResponse {
    pub project: Project,
}

#[derive(Serialize)]
pub struct AddProjectResponse {
    pub success: bool,
    pub message: String,
    pub project: Project,
}

#[derive(Serialize)]
pub struct UpdateProjectResponse {
    pub success: bool,
    pub message: String,
    pub project: Project,
}
