mod handlers;
mod router;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::core::history::HistoryService;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) service: Arc<HistoryService>,
    pub(crate) api_port: u16,
}

pub struct ApiServer {
    service: Arc<HistoryService>,
    api_host: String,
    api_port: u16,
}

impl ApiServer {
    pub fn new(service: Arc<HistoryService>, api_host: String, api_port: u16) -> Self {
        Self {
            service,
            api_host,
            api_port,
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }

    /// Serve until Ctrl+C.
    pub async fn run(self) -> Result<()> {
        let addr = self.address();
        let state = AppState {
            service: self.service,
            api_port: self.api_port,
        };
        let app = router::build_api_router(state);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!("API Server running at http://{addr}");
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                tokio::signal::ctrl_c().await.ok();
            })
            .await?;
        info!("API Server shutting down...");
        Ok(())
    }
}
