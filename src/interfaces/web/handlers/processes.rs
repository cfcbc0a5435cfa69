use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::{info, warn};

use super::super::AppState;
use crate::core::history::HistoryError;

const REQUEST_ID_HEADER: &str = "x-request-id";

fn status_for(err: &HistoryError) -> StatusCode {
    match err {
        HistoryError::NotFound(_) => StatusCode::NOT_FOUND,
        HistoryError::Composition(_) => StatusCode::BAD_GATEWAY,
        HistoryError::Render(_) | HistoryError::LeafFetch { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub(super) fn error_response(request_id: &str, err: HistoryError) -> Response {
    let status = status_for(&err);
    warn!("[{}] {} ({})", request_id, err, status);
    let mut response = (
        status,
        Json(serde_json::json!({ "success": false, "error": err.to_string() })),
    )
        .into_response();
    tag(&mut response, request_id);
    response
}

pub(super) fn tag(response: &mut Response, request_id: &str) {
    if let Ok(value) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
}

pub async fn get_process_history(
    Path(instance_id): Path<String>,
    State(state): State<AppState>,
) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    info!("[{}] History requested for {}", request_id, instance_id);

    match state.service.get_process_history(&instance_id).await {
        Ok(history) => {
            let mut response =
                Json(serde_json::json!({ "success": true, "history": history })).into_response();
            tag(&mut response, &request_id);
            response
        }
        Err(e) => error_response(&request_id, e),
    }
}

/// Serves the rendered diagram with the renderer's content type. The default
/// renderer emits Graphviz DOT source (`text/vnd.graphviz`), not PNG.
pub async fn get_process_diagram(
    Path(instance_id): Path<String>,
    State(state): State<AppState>,
) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    info!("[{}] Diagram requested for {}", request_id, instance_id);

    match state.service.get_process_diagram(&instance_id).await {
        Ok(diagram) => {
            let mut response = (
                [(header::CONTENT_TYPE, diagram.content_type)],
                diagram.bytes,
            )
                .into_response();
            tag(&mut response, &request_id);
            response
        }
        Err(e) => error_response(&request_id, e),
    }
}
