use axum::{
    Router,
    body::Body,
    http::{HeaderValue, Method, Request, header},
    middleware,
    middleware::Next,
    routing::get,
};
use tower_http::cors::CorsLayer;

use super::AppState;
use super::handlers::{processes, tasks};

fn build_localhost_cors(api_port: u16) -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        format!("http://127.0.0.1:{}", api_port),
        format!("http://localhost:{}", api_port),
    ]
    .iter()
    .filter_map(|o| o.parse().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any)
}

/// `/api/processes/{instance_id}/diagram` returns whatever the configured
/// renderer writes; the default is Graphviz DOT, not PNG.
pub(crate) fn build_api_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/processes/{instance_id}/history",
            get(processes::get_process_history),
        )
        .route(
            "/api/processes/{instance_id}/diagram",
            get(processes::get_process_diagram),
        )
        .route("/api/tasks", get(tasks::get_tasks))
        .route("/api/tasks/{task_id}", get(tasks::get_task))
        .layer(middleware::from_fn(security_headers))
        .layer(build_localhost_cors(state.api_port))
        .with_state(state)
}

async fn security_headers(req: Request<Body>, next: Next) -> axum::response::Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'none'"),
    );
    response
}
