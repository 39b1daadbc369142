use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::state::AppState;
use crate::analysis::{DetailLevel, MathQuestion, StructuredAnalysis};
use crate::config::{AppInfo, Licenses, ServerConfig};
use crate::error::ApiError;
use crate::llm::{AiConfigUpdate, AiConfigView, CustomAiConfig};
use crate::task::TaskStatus;

const DEFAULT_LIST_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct ExecuteRequest {
    pub code: String,
    pub timeout: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub task_id: String,
    pub status: TaskStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TaskResult {
    pub task_id: String,
    pub status: TaskStatus,
    pub result: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub question: MathQuestion,
    pub language: Option<String>,
    pub detail_level: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub task_id: String,
    pub status: TaskStatus,
    pub analysis: Option<StructuredAnalysis>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct TasksQuery {
    pub limit: Option<usize>,
}

pub async fn handle_health() -> Json<Value> {
    Json(json!({"status": "healthy"}))
}

pub async fn handle_version(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({"version": state.config.app.version}))
}

pub async fn handle_app_info(State(state): State<Arc<AppState>>) -> Json<AppInfo> {
    Json(state.config.app.clone())
}

pub async fn handle_config(State(state): State<Arc<AppState>>) -> Json<ServerConfig> {
    Json(state.config.redacted())
}

pub async fn handle_operation_types(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({"operation_types": state.config.math_generation.operation_types}))
}

pub async fn handle_knowledge_points(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({"knowledge_points": state.config.math_generation.knowledge_points}))
}

pub async fn handle_difficulty_levels(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({"difficulty_levels": state.config.math_generation.difficulty_levels}))
}

pub async fn handle_licenses(State(state): State<Arc<AppState>>) -> Json<Licenses> {
    Json(state.config.licenses.clone())
}

pub async fn handle_execute(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExecuteRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    if req.code.trim().is_empty() {
        return Err(ApiError::BadRequest("code required".to_string()));
    }
    let task = state.executions.submit(req.code, req.timeout);
    Ok(Json(SubmitResponse {
        task_id: task.id,
        status: task.status,
    }))
}

pub async fn handle_result(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> Result<Json<TaskResult>, ApiError> {
    let task = state.executions.store().get(&task_id)?;
    Ok(Json(TaskResult {
        task_id: task.id,
        status: task.status,
        result: task.result,
        error: task.error,
    }))
}

pub async fn handle_tasks(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TasksQuery>,
) -> Json<Value> {
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    Json(json!({"tasks": state.executions.store().summaries(limit)}))
}

pub async fn handle_analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    if req.question.expression.trim().is_empty() {
        return Err(ApiError::BadRequest("question.expression required".to_string()));
    }
    let language = req.language.unwrap_or_else(|| "zh-CN".to_string());
    let detail_level = req
        .detail_level
        .as_deref()
        .map(DetailLevel::from_label)
        .unwrap_or_default();
    let task = state.analyses.submit(req.question, language, detail_level);
    Ok(Json(SubmitResponse {
        task_id: task.id,
        status: task.status,
    }))
}

pub async fn handle_ai_result(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let task = state
        .analyses
        .store()
        .get(&task_id)
        .map_err(|_| ApiError::NotFound("analysis task does not exist".to_string()))?;
    Ok(Json(AnalysisResult {
        task_id: task.id,
        status: task.status,
        analysis: task.result,
        error: task.error,
    }))
}

pub async fn handle_ai_tasks(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TasksQuery>,
) -> Json<Value> {
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    Json(json!({"tasks": state.analyses.store().summaries(limit)}))
}

pub async fn handle_get_ai_config(State(state): State<Arc<AppState>>) -> Json<AiConfigView> {
    Json(AiConfigView::from(&state.providers.effective()))
}

pub async fn handle_update_ai_config(
    State(state): State<Arc<AppState>>,
    Json(update): Json<AiConfigUpdate>,
) -> Json<Value> {
    let updated = state.providers.update_default(update);
    tracing::info!(
        api_base = %updated.api_base,
        model = %updated.model,
        has_api_key = !updated.api_key.is_empty(),
        "default AI configuration updated"
    );
    Json(json!({"message": "AI configuration updated"}))
}

pub async fn handle_save_custom_config(
    State(state): State<Arc<AppState>>,
    Json(config): Json<CustomAiConfig>,
) -> Result<Json<Value>, ApiError> {
    if config.id.trim().is_empty() {
        return Err(ApiError::BadRequest("id required".to_string()));
    }
    let id = config.id.clone();
    state.providers.save_custom(config);
    Ok(Json(json!({"message": "custom AI configuration saved", "id": id})))
}

/// Configs keyed by id; stored keys are masked.
pub async fn handle_list_custom_configs(State(state): State<Arc<AppState>>) -> Json<Value> {
    let configs: serde_json::Map<String, Value> = state
        .providers
        .list_custom()
        .into_iter()
        .map(|cfg| (cfg.id.clone(), json!(cfg)))
        .collect();
    Json(json!({"configs": configs}))
}

pub async fn handle_delete_custom_config(
    State(state): State<Arc<AppState>>,
    Path(config_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    match state.providers.delete_custom(&config_id) {
        Some(_) => Ok(Json(json!({"message": "custom AI configuration deleted"}))),
        None => Err(ApiError::NotFound("configuration does not exist".to_string())),
    }
}

pub async fn handle_ai_services(State(state): State<Arc<AppState>>) -> Json<Value> {
    let ai = &state.config.ai;
    let services: serde_json::Map<String, Value> = ai
        .services
        .iter()
        .map(|(name, service)| {
            (
                name.clone(),
                json!({
                    "api_base": service.api_base,
                    "model": service.model,
                    "has_api_key": !service.api_key.is_empty(),
                    "description": service.description,
                }),
            )
        })
        .collect();
    Json(json!({
        "default_service": ai.default_service,
        "timeout": ai.timeout_secs,
        "services": services,
    }))
}
