use actix_web::web;

use super::project_view::project_view_handlers;

pub fn project_view_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api-projects")
            .route("", web::get().to(project_view_handlers::get_project_list))
            .route("/", web::get().to(project_view_handlers::get_project_list))
            .route("", web::post().to(project_view_handlers::add_project))
            .route("/", web::post().to(project_view_handlers::add_project))
            .route("/{project_id}", web::get().to(project_view_handlers::get_project_detail))
            .route("/{project_id}", web::put().to(project_view_handlers::update_project))
            .route("/{project_id}", web::delete().to(project_view_handlers::delete_project))
    );
}

use super::sprint_view::sprint_view_handlers;

pub fn sprint_view_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api-sprints")
            .route("/project/{project_id}", web::get().to(sprint_view_handlers::get_sprint_list))
            .route("/project/{project_id}", web::post().to(sprint_view_handlers::add_sprint))
            .route("/{sprint_id}", web::put().to(sprint_view_handlers::update_sprint))
            .route("/{sprint_id}", web::delete().to(sprint_view_handlers::delete_sprint))
    );
}

use super::task_view::task_view_handlers;

pub fn task_view_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api-tasks")
            .route("/comments/{comment_id}", web::delete().to(task_view_handlers::delete_comment))
            .route("/project/{project_id}", web::get().to(task_view_handlers::get_task_list))
            .route("/project/{project_id}", web::post().to(task_view_handlers::add_task))
            .route("/project/{project_id}/board", web::get().to(task_view_handlers::get_task_board))
            .route("/{task_id}", web::get().to(task_view_handlers::get_task_detail))
            .route("/{task_id}", web::put().to(task_view_handlers::update_task))
            .route("/{task_id}", web::delete().to(task_view_handlers::delete_task))
            .route("/{task_id}/comments", web::get().to(task_view_handlers::get_comment_list))
            .route("/{task_id}/comments", web::post().to(task_view_handlers::add_comment))
    );
}

use super::report_view::report_view_handlers;

pub fn report_view_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api-reports")
            .route("/project/{project_id}", web::get().to(report_view_handlers::get_project_report))
    );
}
