//! 通用与目录处理器

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::error::ApiResult;
use crate::state::AppState;

/// API根路径处理器
pub async fn api_root() -> impl IntoResponse {
    Json(json!({
        "service": "Clinic Intake API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "health": "/health",
            "catalog": "/api/v1/catalog",
            "intake": "/api/v1/intake",
            "analytics": "/api/v1/analytics"
        }
    }))
}

/// 健康检查处理器
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let (appointments, sessions) = {
        let engine = state.engine.lock().await;
        (engine.total_appointments(), engine.active_sessions())
    };
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "appointments": appointments,
        "active_sessions": sessions,
        "dataset_records": state.dashboard.dataset_len()
    }))
}

/// 科室与医生列表，含当前接诊量
pub async fn list_departments(State(state): State<AppState>) -> impl IntoResponse {
    let engine = state.engine.lock().await;
    let departments = engine.catalog().departments.departments().to_vec();
    Json(json!({
        "departments": departments,
        "total": departments.len()
    }))
}

pub async fn list_lab_tests(State(state): State<AppState>) -> impl IntoResponse {
    let engine = state.engine.lock().await;
    Json(json!({ "lab_tests": engine.catalog().lab_tests.tests() }))
}

#[derive(Debug, Serialize)]
struct SymptomEntry<'a> {
    symptom: &'a str,
    department: &'a str,
}

pub async fn list_symptoms(State(state): State<AppState>) -> impl IntoResponse {
    let engine = state.engine.lock().await;
    let map = &engine.catalog().symptoms;
    let symptoms: Vec<SymptomEntry> = map
        .symptoms()
        .filter_map(|symptom| {
            map.department_for(symptom)
                .map(|department| SymptomEntry { symptom, department })
        })
        .collect();
    Json(json!({ "symptoms": symptoms }))
}

pub async fn department_workload(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<impl IntoResponse> {
    info!("Getting workload for department {}", name);
    let workload = state.engine.lock().await.department_workload(&name)?;
    Ok(Json(json!({
        "department": name,
        "doctors": workload
    })))
}
