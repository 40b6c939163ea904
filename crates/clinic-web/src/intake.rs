//! 登记向导处理器
//!
//! 每个请求对应一个向导事件。校验失败返回 422 与完整错误列表，
//! 当前步骤不允许的事件返回 409，请求体无法解析时返回 400。

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use clinic_core::Result;
use clinic_intake::{
    DoctorSelectionForm, IntakeEngine, LabTestsForm, PatientInfoForm, ScheduleForm, SessionView,
    StepOutcome, SymptomsForm,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::state::AppState;

/// 单步操作的响应：结果加上最新的会话视图
#[derive(Debug, Serialize)]
pub struct StepResponse {
    pub outcome: StepOutcome,
    pub session: SessionView,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionRequest {
    pub symptoms: Vec<String>,
}

/// 在锁内执行一个向导事件并生成响应
async fn step<F>(
    state: &AppState,
    session_id: Uuid,
    event: F,
) -> ApiResult<(StatusCode, Json<StepResponse>)>
where
    F: FnOnce(&mut IntakeEngine) -> Result<StepOutcome>,
{
    let mut engine = state.engine.lock().await;
    let outcome = event(&mut *engine)?;
    let session = engine.session_view(session_id)?;

    let status = if outcome.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    Ok((status, Json(StepResponse { outcome, session })))
}

pub async fn create_session(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let mut engine = state.engine.lock().await;
    let session_id = engine.create_session();
    let view = engine.session_view(session_id)?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let view = state.engine.lock().await.session_view(session_id)?;
    Ok(Json(view))
}

pub async fn close_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state.engine.lock().await.close_session(session_id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn submit_patient_info(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    payload: std::result::Result<Json<PatientInfoForm>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(form) = payload?;
    step(&state, session_id, |engine| engine.submit_patient_info(session_id, &form)).await
}

pub async fn submit_symptoms(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    payload: std::result::Result<Json<SymptomsForm>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(form) = payload?;
    step(&state, session_id, |engine| engine.submit_symptoms(session_id, &form)).await
}

pub async fn select_doctor(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    payload: std::result::Result<Json<DoctorSelectionForm>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(form) = payload?;
    step(&state, session_id, |engine| engine.select_doctor(session_id, &form)).await
}

pub async fn submit_lab_tests(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    payload: std::result::Result<Json<LabTestsForm>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(form) = payload?;
    step(&state, session_id, |engine| engine.submit_lab_tests(session_id, &form)).await
}

pub async fn confirm_appointment(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    payload: std::result::Result<Json<ScheduleForm>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(form) = payload?;
    info!("Confirming appointment for session {}", session_id);
    step(&state, session_id, |engine| engine.confirm_appointment(session_id, &form)).await
}

pub async fn go_back(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    step(&state, session_id, |engine| engine.go_back(session_id)).await
}

pub async fn restart(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    step(&state, session_id, |engine| engine.restart(session_id)).await
}

/// 症状到科室的推荐，不依赖会话
pub async fn suggest_departments(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SuggestionRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = payload?;
    let departments = state
        .engine
        .lock()
        .await
        .suggest_departments(&request.symptoms);
    Ok(Json(json!({
        "symptoms": request.symptoms,
        "departments": departments
    })))
}
