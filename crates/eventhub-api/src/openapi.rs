//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use eventhub_core::{Attendee, Event, User};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ApiErrorResponse;
use crate::routes::{
    ComponentHealth, ComponentStatus, EventRequest, HealthResponse, LoginRequest,
    RegisterRequest, TokenResponse,
};

// ==================== OpenAPI 문서 정의 ====================

/// Eventhub API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Eventhub API",
        description = r#"
# Eventhub REST API

이벤트와 참석자를 관리하는 REST API입니다.

## 인증

`POST /api/v1/auth/login`으로 발급받은 토큰을
`Authorization: Bearer <token>` 헤더에 포함하세요. 토큰은 24시간 유효합니다.

## 소유권

이벤트 수정/삭제와 참석자 관리는 이벤트를 만든 사용자만 할 수 있습니다.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "auth", description = "인증 - 회원가입 및 토큰 발급"),
        (name = "events", description = "이벤트 - 생성/조회/수정/삭제"),
        (name = "attendees", description = "참석자 - 이벤트 참석자 관리")
    ),
    modifiers(&SecurityAddon),
    // ==================== 스키마 등록 ====================
    components(
        schemas(
            // ===== Health =====
            HealthResponse,
            ComponentHealth,
            ComponentStatus,

            // ===== Common =====
            ApiErrorResponse,

            // ===== Domain =====
            User,
            Event,
            Attendee,

            // ===== Requests =====
            RegisterRequest,
            LoginRequest,
            TokenResponse,
            EventRequest,
        )
    ),
    // ==================== 경로 등록 ====================
    paths(
        // ===== Health =====
        crate::routes::health::health_check,
        crate::routes::health::health_ready,

        // ===== Auth =====
        crate::routes::auth::register,
        crate::routes::auth::login,

        // ===== Events =====
        crate::routes::events::list_events,
        crate::routes::events::create_event,
        crate::routes::events::get_event,
        crate::routes::events::update_event,
        crate::routes::events::delete_event,

        // ===== Attendees =====
        crate::routes::events::list_attendees,
        crate::routes::events::add_attendee,
        crate::routes::events::remove_attendee,
        crate::routes::attendees::events_for_attendee,
    )
)]
pub struct ApiDoc;

/// `bearer_auth` 보안 스키마 등록.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

// ==================== Swagger UI 라우터 ====================

/// Swagger UI 라우터 생성.
///
/// 다음 경로에 문서 UI를 마운트합니다:
/// - `/swagger-ui` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

// ==================== 테스트 ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_valid() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&spec).unwrap();

        assert!(json.contains("Eventhub API"));

        // 경로 확인
        assert!(json.contains("/health/ready"));
        assert!(json.contains("/api/v1/auth/login"));
        assert!(json.contains("/api/v1/events/{id}/attendees/{user_id}"));
        assert!(json.contains("/api/v1/attendees/{user_id}/events"));

        // 보안 스키마
        assert!(json.contains("bearer_auth"));
    }

    #[test]
    fn test_swagger_ui_router_creates() {
        let _router: Router<()> = swagger_ui_router();
    }

    #[test]
    fn test_user_schema_has_no_password_hash() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_value(&spec).unwrap();

        let user = &json["components"]["schemas"]["User"]["properties"];
        assert!(user.get("email").is_some());
        assert!(user.get("password_hash").is_none());
    }
}
