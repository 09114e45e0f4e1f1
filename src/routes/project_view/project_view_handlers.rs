use actix_web::{web, HttpResponse};
use log::info;

use super::project_view_models::{
    AddProjectResponse, GetProjectDetailResponse, GetProjectListResponse, UpdateProjectResponse,
};
use crate::error::{AppError, AppResult};
use crate::models::project::{NewProject, Project, ProjectUpdate};
use crate::routes::{require_project, DefaultResponse};
use crate::stats::summarize_projects;
use crate::store::Store;

// Handler to list every project with the dashboard counters
pub async fn get_project_list(store: web::Data<dyn Store>) -> AppResult<HttpResponse> {
    let projects = store.list_projects().await?;
    let stats = summarize_projects(&projects);

    Ok(HttpResponse::Ok().json(GetProjectListResponse { projects, stats }))
}

pub async fn get_project_detail(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let project = require_project(store.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(GetProjectDetailResponse { project }))
}

pub async fn add_project(
    store: web::Data<dyn Store>,
    request: web::Json<NewProject>,
) -> AppResult<HttpResponse> {
    let project = Project::create(request.into_inner())?;
    store.insert_project(&project).await?;

    info!("Project {} created with ID: {}", project.name, project.id);
    Ok(HttpResponse::Created().json(AddProjectResponse {
        success: true,
        message: "Project added successfully".to_string(),
        project,
    }))
}

pub async fn update_project(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
    request: web::Json<ProjectUpdate>,
) -> AppResult<HttpResponse> {
    let mut project = require_project(store.get_ref(), &path).await?;
    project.apply(request.into_inner())?;

    if !store.update_project(&project).await? {
        return Err(AppError::NotFound(format!("Project {}", project.id)));
    }

    info!("Project {} updated", project.id);
    Ok(HttpResponse::Ok().json(UpdateProjectResponse {
        success: true,
        message: "Project updated successfully".to_string(),
        project,
    }))
}

pub async fn delete_project(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let project_id = path.into_inner();
    if !store.delete_project(&project_id).await? {
        return Err(AppError::NotFound(format!("Project {}", project_id)));
    }

    info!("Project {} deleted with its sprints and tasks", project_id);
    Ok(HttpResponse::Ok().json(DefaultResponse::ok("Project deleted successfully")))
}
