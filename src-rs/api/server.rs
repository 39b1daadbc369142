use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers::{
    handle_ai_result, handle_ai_services, handle_ai_tasks, handle_analyze, handle_app_info, handle_config,
    handle_delete_custom_config, handle_difficulty_levels, handle_execute, handle_get_ai_config, handle_health,
    handle_knowledge_points, handle_licenses, handle_list_custom_configs, handle_operation_types, handle_result,
    handle_save_custom_config, handle_tasks, handle_update_ai_config, handle_version,
};
use super::state::AppState;
use crate::config::ServerConfig;

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors_origins);
    Router::new()
        .route("/health", get(handle_health))
        .route("/api/version", get(handle_version))
        .route("/api/app-info", get(handle_app_info))
        .route("/api/config", get(handle_config))
        .route("/api/operation-types", get(handle_operation_types))
        .route("/api/knowledge-points", get(handle_knowledge_points))
        .route("/api/difficulty-levels", get(handle_difficulty_levels))
        .route("/api/licenses", get(handle_licenses))
        .route("/api/ai-services", get(handle_ai_services))
        .route("/execute", post(handle_execute))
        .route("/result/:task_id", get(handle_result))
        .route("/tasks", get(handle_tasks))
        .route("/ai/analyze", post(handle_analyze))
        .route("/ai/result/:task_id", get(handle_ai_result))
        .route("/ai/tasks", get(handle_ai_tasks))
        .route("/ai/config", get(handle_get_ai_config).post(handle_update_ai_config))
        .route("/ai/custom-config", post(handle_save_custom_config))
        .route("/ai/custom-config/:config_id", delete(handle_delete_custom_config))
        .route("/ai/custom-configs", get(handle_list_custom_configs))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wildcard when no origins are configured.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if parsed.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(parsed)
    }
}

pub struct MathServer {
    pub addr: SocketAddr,
    pub state: Arc<AppState>,
}

impl MathServer {
    pub fn new(config: ServerConfig) -> Result<Self, String> {
        let addr: SocketAddr = config
            .bind_address
            .parse()
            .map_err(|err| format!("invalid bind address {}: {}", config.bind_address, err))?;
        Ok(Self {
            addr,
            state: Arc::new(AppState::new(config)),
        })
    }

    pub async fn start(&self) -> Result<(), String> {
        let app = build_router(self.state.clone());
        info!(addr = %self.addr, "math server listening");
        axum::Server::bind(&self.addr)
            .serve(app.into_make_service())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|err| err.to_string())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
