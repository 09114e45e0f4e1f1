use actix_web::{web, HttpResponse};
use log::info;

use super::task_view_models::{
    AddCommentResponse, AddTaskResponse, GetCommentListResponse, GetTaskBoardResponse,
    GetTaskDetailResponse, GetTaskListResponse, TaskListQuery, UpdateTaskResponse,
};
use crate::error::{AppError, AppResult};
use crate::models::comment::{NewComment, TaskComment};
use crate::models::task::{NewTask, Task, TaskUpdate};
use crate::routes::{check_sprint_ref, require_project, require_task, DefaultResponse};
use crate::stats::TaskBoard;
use crate::store::{Store, TaskQuery};

async fn project_tasks(
    store: &dyn Store,
    project_id: &str,
    filter: &TaskListQuery,
) -> AppResult<Vec<Task>> {
    require_project(store, project_id).await?;
    store
        .list_tasks(&TaskQuery {
            project_id: project_id.to_string(),
            sprint_id: filter.sprint_filter(),
        })
        .await
}

pub async fn get_task_list(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
    filter: web::Query<TaskListQuery>,
) -> AppResult<HttpResponse> {
    let tasks = project_tasks(store.get_ref(), &path, &filter).await?;
    Ok(HttpResponse::Ok().json(GetTaskListResponse { tasks }))
}

// Handler to get the project's tasks split into status columns
pub async fn get_task_board(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
    filter: web::Query<TaskListQuery>,
) -> AppResult<HttpResponse> {
    let tasks = project_tasks(store.get_ref(), &path, &filter).await?;
    Ok(HttpResponse::Ok().json(GetTaskBoardResponse {
        board: TaskBoard::from_tasks(tasks),
    }))
}

pub async fn get_task_detail(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let task = require_task(store.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(GetTaskDetailResponse { task }))
}

pub async fn add_task(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
    request: web::Json<NewTask>,
) -> AppResult<HttpResponse> {
    let project = require_project(store.get_ref(), &path).await?;
    let task = Task::create(&project.id, request.into_inner())?;
    check_sprint_ref(store.get_ref(), &project.id, task.sprint_id.as_deref()).await?;

    store.insert_task(&task).await?;

    info!("Task {} added to project {}", task.id, project.id);
    Ok(HttpResponse::Created().json(AddTaskResponse {
        success: true,
        message: "Task added successfully".to_string(),
        task,
    }))
}

pub async fn update_task(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
    request: web::Json<TaskUpdate>,
) -> AppResult<HttpResponse> {
    let mut task = require_task(store.get_ref(), &path).await?;
    let previous_sprint = task.sprint_id.clone();
    task.apply(request.into_inner())?;

    if task.sprint_id != previous_sprint {
        check_sprint_ref(store.get_ref(), &task.project_id, task.sprint_id.as_deref()).await?;
    }

    if !store.update_task(&task).await? {
        return Err(AppError::NotFound(format!("Task {}", task.id)));
    }

    info!("Task {} updated", task.id);
    Ok(HttpResponse::Ok().json(UpdateTaskResponse {
        success: true,
        message: "Task updated successfully".to_string(),
        task,
    }))
}

pub async fn delete_task(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let task_id = path.into_inner();
    if !store.delete_task(&task_id).await? {
        return Err(AppError::NotFound(format!("Task {}", task_id)));
    }

    info!("Task {} deleted", task_id);
    Ok(HttpResponse::Ok().json(DefaultResponse::ok("Task deleted successfully")))
}

pub async fn get_comment_list(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let task = require_task(store.get_ref(), &path).await?;
    let comments = store.list_comments(&task.id).await?;
    Ok(HttpResponse::Ok().json(GetCommentListResponse { comments }))
}

pub async fn add_comment(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
    request: web::Json<NewComment>,
) -> AppResult<HttpResponse> {
    let task = require_task(store.get_ref(), &path).await?;
    let comment = TaskComment::create(&task.id, request.into_inner())?;
    store.insert_comment(&comment).await?;

    info!("Comment {} by {} added to task {}", comment.id, comment.author, task.id);
    Ok(HttpResponse::Created().json(AddCommentResponse {
        success: true,
        message: "Comment added successfully".to_string(),
        comment,
    }))
}

pub async fn delete_comment(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let comment_id = path.into_inner();
    if !store.delete_comment(&comment_id).await? {
        return Err(AppError::NotFound(format!("Comment {}", comment_id)));
    }

    info!("Comment {} deleted", comment_id);
    Ok(HttpResponse::Ok().json(DefaultResponse::ok("Comment deleted successfully")))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    use crate::routes::configure;
    use crate::routes::test_support::memory_data;

    macro_rules! post_json {
        ($app:expr, $uri:expr, $body:expr $(,)?) => {{
            let req = test::TestRequest::post()
                .uri($uri)
                .set_json($body)
                .to_request();
            let resp = test::call_service($app, req).await;
            let status = resp.status();
            let body: Value = test::read_body_json(resp).await;
            (status, body)
        }};
    }

    macro_rules! put_json {
        ($app:expr, $uri:expr, $body:expr $(,)?) => {{
            let req = test::TestRequest::put()
                .uri($uri)
                .set_json($body)
                .to_request();
            let resp = test::call_service($app, req).await;
            let status = resp.status();
            let body: Value = test::read_body_json(resp).await;
            (status, body)
        }};
    }

    macro_rules! get_json {
        ($app:expr, $uri:expr $(,)?) => {{
            let req = test::TestRequest::get().uri($uri).to_request();
            let resp = test::call_service($app, req).await;
            let status = resp.status();
            let body: Value = test::read_body_json(resp).await;
            (status, body)
        }};
    }

    macro_rules! seed_project {
        ($app:expr, $name:expr) => {{
            let (_, body) = post_json!($app, "/api-projects", json!({ "name": $name }));
            body["project"]["id"].as_str().unwrap().to_string()
        }};
    }

    macro_rules! seed_sprint {
        ($app:expr, $project_id:expr) => {{
            let (_, body) = post_json!(
                $app,
                &format!("/api-sprints/project/{}", $project_id),
                json!({ "name": "Sprint 1", "start_date": "2024-06-03", "end_date": "2024-06-14" })
            );
            body["sprint"]["id"].as_str().unwrap().to_string()
        }};
    }

    #[actix_web::test]
    async fn test_add_task_defaults_and_validation() {
        let app = test::init_service(App::new().app_data(memory_data()).configure(configure)).await;
        let project_id = seed_project!(&app, "Mobile app");

        let (status, body) = post_json!(
            &app,
            &format!("/api-tasks/project/{}", project_id),
            json!({ "title": " Login screen ", "sprint_id": "", "estimated_hours": 4.5 }),
        );
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["task"]["title"], "Login screen");
        assert_eq!(body["task"]["status"], "todo");
        assert_eq!(body["task"]["priority"], "medium");
        assert_eq!(body["task"]["sprint_id"], Value::Null);
        assert_eq!(body["task"]["estimated_hours"], 4.5);
        assert_eq!(body["task"]["actual_hours"], 0.0);

        let (status, body) = post_json!(
            &app,
            &format!("/api-tasks/project/{}", project_id),
            json!({ "title": "" }),
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);

        let (status, _) = post_json!(
            &app,
            "/api-tasks/project/missing",
            json!({ "title": "Orphan" }),
        );
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_task_sprint_must_belong_to_project() {
        let app = test::init_service(App::new().app_data(memory_data()).configure(configure)).await;
        let mobile = seed_project!(&app, "Mobile app");
        let web_site = seed_project!(&app, "Website");
        let web_sprint = seed_sprint!(&app, &web_site);

        let (status, _) = post_json!(
            &app,
            &format!("/api-tasks/project/{}", mobile),
            json!({ "title": "Cross-project", "sprint_id": web_sprint }),
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_update_task_sprint_assignment() {
        let app = test::init_service(App::new().app_data(memory_data()).configure(configure)).await;
        let mobile = seed_project!(&app, "Mobile app");
        let mobile_sprint = seed_sprint!(&app, &mobile);
        let web_site = seed_project!(&app, "Website");
        let web_sprint = seed_sprint!(&app, &web_site);

        let (_, created) = post_json!(
            &app,
            &format!("/api-tasks/project/{}", mobile),
            json!({ "title": "Login screen", "sprint_id": mobile_sprint }),
        );
        let task_uri = format!("/api-tasks/{}", created["task"]["id"].as_str().unwrap());

        let (status, body) = put_json!(&app, &task_uri, json!({ "sprint_id": web_sprint }));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        let (_, detail) = get_json!(&app, &task_uri);
        assert_eq!(detail["task"]["sprint_id"], mobile_sprint.as_str());

        let (status, body) = put_json!(&app, &task_uri, json!({ "priority": "high" }));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["task"]["sprint_id"], mobile_sprint.as_str());
        assert_eq!(body["task"]["priority"], "high");

        let (status, body) = put_json!(&app, &task_uri, json!({ "sprint_id": null }));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["task"]["sprint_id"], Value::Null);
        let (_, detail) = get_json!(&app, &task_uri);
        assert_eq!(detail["task"]["sprint_id"], Value::Null);
    }

    #[actix_web::test]
    async fn test_list_filter_and_board() {
        let app = test::init_service(App::new().app_data(memory_data()).configure(configure)).await;
        let project_id = seed_project!(&app, "Mobile app");
        let sprint_id = seed_sprint!(&app, &project_id);
        let tasks_uri = format!("/api-tasks/project/{}", project_id);

        post_json!(&app, &tasks_uri, json!({ "title": "A", "sprint_id": sprint_id, "status": "done" }));
        post_json!(&app, &tasks_uri, json!({ "title": "B", "sprint_id": sprint_id, "status": "review" }));
        post_json!(&app, &tasks_uri, json!({ "title": "C", "status": "done" }));

        let (_, all) = get_json!(&app, &tasks_uri);
        assert_eq!(all["tasks"].as_array().unwrap().len(), 3);

        let (_, all) = get_json!(&app, &format!("{}?sprint_id=all", tasks_uri));
        assert_eq!(all["tasks"].as_array().unwrap().len(), 3);

        let (_, scoped) = get_json!(&app, &format!("{}?sprint_id={}", tasks_uri, sprint_id));
        assert_eq!(scoped["tasks"].as_array().unwrap().len(), 2);

        let (status, board) = get_json!(&app, &format!("{}/board", tasks_uri));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(board["board"]["done"].as_array().unwrap().len(), 2);
        assert_eq!(board["board"]["review"].as_array().unwrap().len(), 1);
        assert_eq!(board["board"]["todo"].as_array().unwrap().len(), 0);
        assert_eq!(board["board"]["in_progress"].as_array().unwrap().len(), 0);
    }

    #[actix_web::test]
    async fn test_update_task_and_comments() {
        let app = test::init_service(App::new().app_data(memory_data()).configure(configure)).await;
        let project_id = seed_project!(&app, "Mobile app");
        let (_, created) = post_json!(
            &app,
            &format!("/api-tasks/project/{}", project_id),
            json!({ "title": "Login screen" }),
        );
        let task_id = created["task"]["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::put()
            .uri(&format!("/api-tasks/{}", task_id))
            .set_json(json!({ "status": "in_progress", "actual_hours": 2.0, "assigned_to": "Sam" }))
            .to_request();
        let updated: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated["task"]["status"], "in_progress");
        assert_eq!(updated["task"]["assigned_to"], "Sam");

        let req = test::TestRequest::put()
            .uri(&format!("/api-tasks/{}", task_id))
            .set_json(json!({ "actual_hours": -1.0 }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );

        let comments_uri = format!("/api-tasks/{}/comments", task_id);
        let (status, first) = post_json!(
            &app,
            &comments_uri,
            json!({ "comment": "Started", "author": "Sam" }),
        );
        assert_eq!(status, StatusCode::CREATED);
        post_json!(&app, &comments_uri, json!({ "comment": "Almost there", "author": "Sam" }));

        let (status, _) = post_json!(&app, &comments_uri, json!({ "comment": "Anon", "author": "" }));
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, listed) = get_json!(&app, &comments_uri);
        let texts: Vec<&str> = listed["comments"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["comment"].as_str().unwrap())
            .collect();
        assert_eq!(texts.len(), 2);
        assert!(texts.contains(&"Started"));

        let comment_id = first["comment"]["id"].as_str().unwrap();
        let req = test::TestRequest::delete()
            .uri(&format!("/api-tasks/comments/{}", comment_id))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::delete()
            .uri(&format!("/api-tasks/{}", task_id))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let (status, _) = get_json!(&app, &format!("/api-tasks/{}", task_id));
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = get_json!(&app, &comments_uri);
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
