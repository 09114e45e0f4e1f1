use actix_web::{web, HttpResponse};
use log::{error, info};

use super::sprint_view_models::{
    AddSprintResponse, GetSprintListResponse, SprintOverview, UpdateSprintResponse,
};
use crate::error::{AppError, AppResult};
use crate::models::sprint::{NewSprint, Sprint, SprintUpdate};
use crate::routes::{require_project, require_sprint, DefaultResponse};
use crate::stats::SprintProgress;
use crate::store::{Store, TaskQuery};

// Handler to list a project's sprints with their task progress
pub async fn get_sprint_list(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let project_id = path.into_inner();
    require_project(store.get_ref(), &project_id).await?;

    let query = TaskQuery::project(&project_id);
    let (sprints_result, tasks_result) =
        tokio::join!(store.list_sprints(&project_id), store.list_tasks(&query));

    let sprints = sprints_result.map_err(|e| {
        error!("Failed to fetch sprints for project {}: {}", project_id, e);
        e
    })?;
    let tasks = tasks_result.map_err(|e| {
        error!("Failed to fetch tasks for project {}: {}", project_id, e);
        e
    })?;

    let sprints = sprints
        .into_iter()
        .map(|sprint| {
            let progress = SprintProgress::for_sprint(&sprint, &tasks);
            SprintOverview {
                sprint,
                completed_tasks: progress.completed_tasks,
                total_tasks: progress.total_tasks,
                progress: progress.progress,
            }
        })
        .collect();

    Ok(HttpResponse::Ok().json(GetSprintListResponse { sprints }))
}

pub async fn add_sprint(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
    request: web::Json<NewSprint>,
) -> AppResult<HttpResponse> {
    let project = require_project(store.get_ref(), &path).await?;
    let sprint = Sprint::create(&project.id, request.into_inner())?;
    store.insert_sprint(&sprint).await?;

    info!("Sprint {} added to project {}", sprint.name, project.id);
    Ok(HttpResponse::Created().json(AddSprintResponse {
        success: true,
        message: "Sprint added successfully".to_string(),
        sprint,
    }))
}

pub async fn update_sprint(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
    request: web::Json<SprintUpdate>,
) -> AppResult<HttpResponse> {
    let mut sprint = require_sprint(store.get_ref(), &path).await?;
    sprint.apply(request.into_inner())?;

    if !store.update_sprint(&sprint).await? {
        return Err(AppError::NotFound(format!("Sprint {}", sprint.id)));
    }

    info!("Sprint {} updated", sprint.id);
    Ok(HttpResponse::Ok().json(UpdateSprintResponse {
        success: true,
        message: "Sprint updated successfully".to_string(),
        sprint,
    }))
}

pub async fn delete_sprint(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let sprint_id = path.into_inner();
    if !store.delete_sprint(&sprint_id).await? {
        return Err(AppError::NotFound(format!("Sprint {}", sprint_id)));
    }

    info!("Sprint {} deleted, its tasks moved to the backlog", sprint_id);
    Ok(HttpResponse::Ok().json(DefaultResponse::ok("Sprint deleted successfully")))
}
