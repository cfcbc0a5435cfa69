use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{info, warn};

use super::super::AppState;
use super::processes::{error_response, tag};

#[derive(serde::Deserialize)]
pub struct TasksQuery {
    pub assignee: Option<String>,
}

pub async fn get_tasks(Query(query): Query<TasksQuery>, State(state): State<AppState>) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();

    let Some(assignee) = query.assignee.filter(|a| !a.trim().is_empty()) else {
        warn!("[{}] Task listing without an assignee", request_id);
        let mut response = (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "success": false,
                "error": "assignee query parameter is required"
            })),
        )
            .into_response();
        tag(&mut response, &request_id);
        return response;
    };
    info!("[{}] Tasks requested for assignee {}", request_id, assignee);

    match state.service.tasks_by_assignee(&assignee).await {
        Ok(tasks) => {
            let mut response =
                Json(serde_json::json!({ "success": true, "tasks": tasks })).into_response();
            tag(&mut response, &request_id);
            response
        }
        Err(e) => error_response(&request_id, e),
    }
}

pub async fn get_task(Path(task_id): Path<String>, State(state): State<AppState>) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    info!("[{}] Task {} requested", request_id, task_id);

    match state.service.task_by_id(&task_id).await {
        Ok(task) => {
            let mut response =
                Json(serde_json::json!({ "success": true, "task": task })).into_response();
            tag(&mut response, &request_id);
            response
        }
        Err(e) => error_response(&request_id, e),
    }
}
