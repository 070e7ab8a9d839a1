//! 통합 API 에러 타입.
//!
//! 각 컴포넌트의 에러는 [`AppError`]로 모이고, 경계에서 HTTP 상태 코드와
//! [`ApiErrorResponse`] JSON으로 변환됩니다.
//!
//! | 변형 | 상태 | 코드 |
//! |---|---|---|
//! | `Validation` | 400 | `VALIDATION_ERROR` |
//! | `Unauthorized` | 401 | `UNAUTHORIZED` |
//! | `InvalidCredentials` | 401 | `INVALID_CREDENTIALS` |
//! | `Forbidden` | 403 | `FORBIDDEN` |
//! | `NotFound` | 404 | `NOT_FOUND` |
//! | `Conflict` | 409 | `CONFLICT` |
//! | `Storage` | 500 | `STORAGE_ERROR` |
//! | `Internal` | 500 | `INTERNAL_ERROR` |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use eventhub_core::StoreError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::error;
use utoipa::ToSchema;

use crate::auth::{OwnershipError, PasswordError};

/// 통합 API 에러 응답.
///
/// # 예시
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "이벤트를 찾을 수 없습니다",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "VALIDATION_ERROR", "NOT_FOUND")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 필드별 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::new(code, message)
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// 애플리케이션 에러.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 잘못된 입력 (필드별 상세 포함)
    #[error("잘못된 입력: {message}")]
    Validation {
        message: String,
        details: Option<Value>,
    },

    /// 인증 실패. 사유와 무관하게 동일한 응답입니다.
    #[error("인증이 필요합니다")]
    Unauthorized,

    /// 로그인 실패. 이메일 존재 여부를 드러내지 않습니다.
    #[error("이메일 또는 비밀번호가 올바르지 않습니다")]
    InvalidCredentials,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// 저장소 장애 (타임아웃 포함). 상세는 로그에만 남습니다.
    #[error("저장소 에러: {0}")]
    Storage(String),

    /// 해싱/서명 등 내부 장애. 상세는 로그에만 남습니다.
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, AppError>;

impl AppError {
    /// 단일 메시지 검증 에러.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            details: None,
        }
    }

    /// HTTP 상태 코드.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 에러 코드.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// 클라이언트에 노출할 응답 본문.
    pub fn to_response_body(&self) -> ApiErrorResponse {
        match self {
            AppError::Validation {
                message,
                details: Some(details),
            } => ApiErrorResponse::with_details(self.code(), message.clone(), details.clone()),
            AppError::Validation { message, .. } => ApiErrorResponse::new(self.code(), message.clone()),
            AppError::Storage(_) | AppError::Internal(_) => {
                ApiErrorResponse::new(self.code(), "요청을 처리하지 못했습니다")
            }
            _ => ApiErrorResponse::new(self.code(), self.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Storage(detail) | AppError::Internal(detail) = &self {
            error!(code = self.code(), error = %detail, "Request failed");
        }
        (self.status_code(), Json(self.to_response_body())).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => AppError::NotFound(format!("찾을 수 없습니다: {}", what)),
            StoreError::Conflict(what) => AppError::Conflict(format!("이미 존재합니다: {}", what)),
            StoreError::Backend(detail) => AppError::Storage(detail),
        }
    }
}

impl From<OwnershipError> for AppError {
    fn from(err: OwnershipError) -> Self {
        match err {
            OwnershipError::EventNotFound(_) => AppError::NotFound("이벤트를 찾을 수 없습니다".to_string()),
            OwnershipError::Forbidden => AppError::Forbidden(err.to_string()),
            OwnershipError::Storage(e) => e.into(),
        }
    }
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = serde_json::Map::new();
        for (field, errs) in errors.field_errors() {
            let messages: Vec<String> = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{}: 유효하지 않은 값", field))
                })
                .collect();
            fields.insert(field.to_string(), json!(messages));
        }

        let mut names: Vec<&String> = fields.keys().collect();
        names.sort();
        let message = format!(
            "유효하지 않은 필드: {}",
            names.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
        );

        AppError::Validation {
            message,
            details: Some(Value::Object(fields)),
        }
    }
}
