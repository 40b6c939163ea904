//! HTTP 错误映射

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use clinic_core::ClinicError;
use serde_json::json;

/// 包装领域错误以便作为响应返回
#[derive(Debug)]
pub struct ApiError(pub ClinicError);

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl From<ClinicError> for ApiError {
    fn from(error: ClinicError) -> Self {
        Self(error)
    }
}

/// 请求体无法解析时同样返回 JSON 错误
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(ClinicError::Validation(rejection.body_text()))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ClinicError::NotFound(_) => StatusCode::NOT_FOUND,
            ClinicError::Validation(_) => StatusCode::BAD_REQUEST,
            ClinicError::InvalidStateTransition { .. } => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        }

        let body = Json(json!({
            "error": true,
            "message": self.0.to_string(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let status = |e: ClinicError| ApiError(e).status();

        assert_eq!(status(ClinicError::NotFound("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(status(ClinicError::Validation("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(ClinicError::InvalidStateTransition {
                from: "PatientInfo".into(),
                event: "Back".into()
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(status(ClinicError::Internal("x".into())), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
