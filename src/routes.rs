pub mod project_view;
pub mod report_view;
pub mod routes;
pub mod sprint_view;
pub mod task_view;

use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::project::Project;
use crate::models::sprint::Sprint;
use crate::models::task::Task;
use crate::store::Store;

#[derive(Serialize)]
pub struct DefaultResponse {
    pub success: bool,
    pub message: String,
}

impl DefaultResponse {
    pub fn ok(message: &str) -> Self {
        DefaultResponse {
            success: true,
            message: message.to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub store: String,
}

pub async fn health(store: web::Data<dyn Store>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        store: store.store_type().to_string(),
    })
}

/// Registers every view plus the JSON/query extractor error handlers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _| AppError::InvalidInput(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _| AppError::InvalidInput(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _| AppError::InvalidInput(err.to_string()).into()),
    )
    .route("/health", web::get().to(health));

    routes::project_view_configure(cfg);
    routes::sprint_view_configure(cfg);
    routes::task_view_configure(cfg);
    routes::report_view_configure(cfg);
}

pub async fn require_project(store: &dyn Store, project_id: &str) -> AppResult<Project> {
    store
        .get_project(project_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project {}", project_id)))
}

pub async fn require_sprint(store: &dyn Store, sprint_id: &str) -> AppResult<Sprint> {
    store
        .get_sprint(sprint_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Sprint {}", sprint_id)))
}

pub async fn require_task(store: &dyn Store, task_id: &str) -> AppResult<Task> {
    store
        .get_task(task_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Task {}", task_id)))
}

/// A task may only point at a sprint of its own project.
pub async fn check_sprint_ref(
    store: &dyn Store,
    project_id: &str,
    sprint_id: Option<&str>,
) -> AppResult<()> {
    let Some(sprint_id) = sprint_id else {
        return Ok(());
    };
    match store.get_sprint(sprint_id).await? {
        Some(sprint) if sprint.project_id == project_id => Ok(()),
        Some(_) => Err(AppError::InvalidInput(format!(
            "Sprint {} belongs to another project",
            sprint_id
        ))),
        None => Err(AppError::InvalidInput(format!(
            "Sprint {} does not exist",
            sprint_id
        ))),
    }
}
