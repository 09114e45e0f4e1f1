use actix_web::{web, HttpResponse};
use log::{error, info};

use super::report_view_models::GetProjectReportResponse;
use crate::error::AppResult;
use crate::routes::require_project;
use crate::stats::aggregate;
use crate::store::{Store, TaskQuery};

// Handler to compute the statistics page of a project
pub async fn get_project_report(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let project_id = path.into_inner();
    require_project(store.get_ref(), &project_id).await?;

    let query = TaskQuery::project(&project_id);
    let (tasks_result, sprints_result) =
        tokio::join!(store.list_tasks(&query), store.list_sprints(&project_id));

    let tasks = tasks_result.map_err(|e| {
        error!("Failed to fetch tasks for report of project {}: {}", project_id, e);
        e
    })?;
    let sprints = sprints_result.map_err(|e| {
        error!("Failed to fetch sprints for report of project {}: {}", project_id, e);
        e
    })?;

    let report = aggregate(&tasks, &sprints);
    info!(
        "Report for project {}: {} tasks, {} sprints, {}% complete",
        project_id, report.task_stats.total, report.sprint_count, report.task_stats.completion_rate
    );

    Ok(HttpResponse::Ok().json(GetProjectReportResponse { project_id, report }))
}
