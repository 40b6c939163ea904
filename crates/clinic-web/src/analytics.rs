//! 分析报表处理器
//!
//! 报表基于外部数据集与本进程内已确认的预约。

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};
use chrono::NaiveDate;
use clinic_analytics::{DateRange, PatientFilter, RevenuePeriod};
use clinic_core::{ClinicError, Result};
use serde::Deserialize;
use std::str::FromStr;
use tracing::info;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RevenueQueryParams {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub period: Option<String>,
}

/// 多选条件以逗号分隔
#[derive(Debug, Deserialize)]
pub struct PatientQueryParams {
    pub department: Option<String>,
    pub gender: Option<String>,
    pub patient_type: Option<String>,
    pub q: Option<String>,
}

fn split_param(value: Option<&str>) -> Vec<&str> {
    value
        .map(|v| v.split(',').map(str::trim).filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

fn parse_list<T: FromStr<Err = ClinicError>>(value: Option<&str>) -> Result<Vec<T>> {
    split_param(value).into_iter().map(str::parse).collect()
}

impl PatientQueryParams {
    fn into_filter(self) -> Result<PatientFilter> {
        Ok(PatientFilter {
            departments: split_param(self.department.as_deref())
                .into_iter()
                .map(str::to_string)
                .collect(),
            genders: parse_list(self.gender.as_deref())?,
            patient_types: parse_list(self.patient_type.as_deref())?,
            search: self.q,
        })
    }
}

pub async fn overview(State(state): State<AppState>) -> impl IntoResponse {
    let engine = state.engine.lock().await;
    Json(state.dashboard.overview(engine.appointments()))
}

pub async fn doctors(State(state): State<AppState>) -> impl IntoResponse {
    let engine = state.engine.lock().await;
    Json(state.dashboard.doctors(engine.appointments()))
}

pub async fn doctor_schedule(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let engine = state.engine.lock().await;
    let schedule = state
        .dashboard
        .doctor_schedule(engine.appointments(), &name)
        .ok_or_else(|| ClinicError::NotFound(format!("Doctor {}", name)))?;
    Ok(Json(schedule))
}

pub async fn departments(State(state): State<AppState>) -> impl IntoResponse {
    let engine = state.engine.lock().await;
    Json(state.dashboard.departments(engine.appointments()))
}

pub async fn department_symptoms(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let engine = state.engine.lock().await;
    let symptoms = state
        .dashboard
        .department_symptoms(engine.appointments(), &name)
        .ok_or_else(|| ClinicError::NotFound(format!("Department {}", name)))?;
    Ok(Json(symptoms))
}

pub async fn revenue(
    State(state): State<AppState>,
    Query(params): Query<RevenueQueryParams>,
) -> ApiResult<impl IntoResponse> {
    info!("Getting revenue analytics with query: {:?}", params);

    let range = DateRange::new(params.start, params.end)?;
    let period = params
        .period
        .as_deref()
        .map(RevenuePeriod::from_str)
        .transpose()?
        .unwrap_or_default();

    let engine = state.engine.lock().await;
    Ok(Json(state.dashboard.revenue(engine.appointments(), range, period)))
}

pub async fn trends(State(state): State<AppState>) -> impl IntoResponse {
    let engine = state.engine.lock().await;
    Json(state.dashboard.trends(engine.appointments()))
}

pub async fn patients(
    State(state): State<AppState>,
    Query(params): Query<PatientQueryParams>,
) -> ApiResult<impl IntoResponse> {
    info!("Getting patients with query: {:?}", params);

    let filter = params.into_filter()?;
    let engine = state.engine.lock().await;
    Ok(Json(state.dashboard.patients(engine.appointments(), &filter)))
}
