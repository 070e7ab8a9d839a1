//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/api/v1/auth` - 회원가입/로그인
//! - `/api/v1/events` - 이벤트 및 이벤트 참석자 관리
//! - `/api/v1/attendees` - 사용자 기준 참석 이벤트 조회

pub mod attendees;
pub mod auth;
pub mod events;
pub mod health;

pub use attendees::attendees_router;
pub use auth::{auth_router, LoginRequest, RegisterRequest, TokenResponse};
pub use events::{events_router, EventRequest};
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};

use axum::{extract::rejection::JsonRejection, Json, Router};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        // 헬스 체크 엔드포인트
        .nest("/health", health_router())
        // API v1 엔드포인트
        .nest("/api/v1/auth", auth_router())
        .nest("/api/v1/events", events_router())
        .nest("/api/v1/attendees", attendees_router())
}

/// 경로 식별자 파싱. UUID가 아니면 400.
pub(crate) fn parse_id(field: &str, raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| {
        let mut details = serde_json::Map::new();
        details.insert(field.to_string(), serde_json::json!(["UUID 형식이어야 합니다"]));
        AppError::Validation {
            message: format!("유효하지 않은 식별자: {}", field),
            details: Some(serde_json::Value::Object(details)),
        }
    })
}

/// JSON 본문 추출 결과를 검증하여 요청 값으로 변환.
///
/// 본문 파싱 실패도 `VALIDATION_ERROR` 형식으로 응답합니다.
pub(crate) fn validated<T: Validate>(
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::validation(rejection.body_text()))?;
    request.validate()?;
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id("id", &id.to_string()).unwrap(), id);

        let err = parse_id("user_id", "42").unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
        let body = err.to_response_body();
        assert!(body.details.unwrap().get("user_id").is_some());
    }
}
