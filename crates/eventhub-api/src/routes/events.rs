//! Events API 라우트
//!
//! 이벤트와 이벤트 참석자 관리 API를 제공합니다.
//!
//! # 엔드포인트
//!
//! - `GET /api/v1/events` - 이벤트 목록
//! - `POST /api/v1/events` - 이벤트 생성 (인증)
//! - `GET /api/v1/events/{id}` - 이벤트 조회
//! - `PUT /api/v1/events/{id}` - 이벤트 수정 (소유자)
//! - `DELETE /api/v1/events/{id}` - 이벤트 삭제 (소유자)
//! - `GET /api/v1/events/{id}/attendees` - 참석자 목록
//! - `POST /api/v1/events/{id}/attendees/{user_id}` - 참석자 추가 (소유자)
//! - `DELETE /api/v1/events/{id}/attendees/{user_id}` - 참석자 제거 (소유자)

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use eventhub_core::{Attendee, Event, EventDetails, User};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::{parse_id, validated};
use crate::auth::AuthUser;
use crate::error::{ApiErrorResponse, ApiResult, AppError};
use crate::state::AppState;

const DATE_FORMAT: &str = "%Y-%m-%d";

// ================================================================================================
// Request Types
// ================================================================================================

fn validate_date_format(value: &str) -> Result<(), ValidationError> {
    if NaiveDate::parse_from_str(value, DATE_FORMAT).is_err() {
        return Err(ValidationError::new("invalid_date_format")
            .with_message("날짜 형식은 YYYY-MM-DD여야 합니다".into()));
    }
    Ok(())
}

/// 이벤트 생성/수정 요청
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EventRequest {
    /// 이벤트 이름 (3-100자)
    #[validate(length(min = 3, max = 100, message = "이름은 3-100자여야 합니다"))]
    pub name: String,
    /// 설명 (10-500자)
    #[validate(length(min = 10, max = 500, message = "설명은 10-500자여야 합니다"))]
    pub description: String,
    /// 개최일 (YYYY-MM-DD)
    #[validate(custom(function = "validate_date_format"))]
    #[schema(example = "2025-06-01")]
    pub date: String,
    /// 장소 (3-100자)
    #[validate(length(min = 3, max = 100, message = "장소는 3-100자여야 합니다"))]
    pub location: String,
}

impl TryFrom<EventRequest> for EventDetails {
    type Error = AppError;

    fn try_from(request: EventRequest) -> Result<Self, Self::Error> {
        let date = NaiveDate::parse_from_str(&request.date, DATE_FORMAT)
            .map_err(|_| AppError::validation("날짜 형식은 YYYY-MM-DD여야 합니다"))?;
        Ok(EventDetails {
            name: request.name,
            description: request.description,
            date,
            location: request.location,
        })
    }
}

// ================================================================================================
// Event Handlers
// ================================================================================================

/// 이벤트 목록
#[utoipa::path(
    get,
    path = "/api/v1/events",
    responses(
        (status = 200, description = "이벤트 목록", body = Vec<Event>)
    ),
    tag = "events"
)]
pub async fn list_events(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Event>>> {
    Ok(Json(state.events.list().await?))
}

/// 이벤트 생성
#[utoipa::path(
    post,
    path = "/api/v1/events",
    request_body = EventRequest,
    responses(
        (status = 201, description = "생성 성공", body = Event),
        (status = 400, description = "잘못된 입력", body = ApiErrorResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "events"
)]
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    payload: Result<Json<EventRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Event>)> {
    let details = EventDetails::try_from(validated(payload)?)?;
    let event = state.events.create(&actor, details).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// 이벤트 조회
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}",
    params(("id" = String, Path, description = "이벤트 ID (UUID)")),
    responses(
        (status = 200, description = "이벤트", body = Event),
        (status = 400, description = "잘못된 ID", body = ApiErrorResponse),
        (status = 404, description = "이벤트 없음", body = ApiErrorResponse)
    ),
    tag = "events"
)]
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Event>> {
    let id = parse_id("id", &id)?;
    Ok(Json(state.events.get(id).await?))
}

/// 이벤트 수정
#[utoipa::path(
    put,
    path = "/api/v1/events/{id}",
    params(("id" = String, Path, description = "이벤트 ID (UUID)")),
    request_body = EventRequest,
    responses(
        (status = 200, description = "수정 성공", body = Event),
        (status = 400, description = "잘못된 입력", body = ApiErrorResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 403, description = "소유자 아님", body = ApiErrorResponse),
        (status = 404, description = "이벤트 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "events"
)]
pub async fn update_event(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<EventRequest>, JsonRejection>,
) -> ApiResult<Json<Event>> {
    let id = parse_id("id", &id)?;
    let details = EventDetails::try_from(validated(payload)?)?;
    Ok(Json(state.events.update(&actor, id, details).await?))
}

/// 이벤트 삭제
#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}",
    params(("id" = String, Path, description = "이벤트 ID (UUID)")),
    responses(
        (status = 204, description = "삭제 성공"),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 403, description = "소유자 아님", body = ApiErrorResponse),
        (status = 404, description = "이벤트 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "events"
)]
pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id("id", &id)?;
    state.events.delete(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ================================================================================================
// Attendee Handlers
// ================================================================================================

/// 이벤트 참석자 목록
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}/attendees",
    params(("id" = String, Path, description = "이벤트 ID (UUID)")),
    responses(
        (status = 200, description = "참석 사용자 목록", body = Vec<User>),
        (status = 404, description = "이벤트 없음", body = ApiErrorResponse)
    ),
    tag = "attendees"
)]
pub async fn list_attendees(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<User>>> {
    let id = parse_id("id", &id)?;
    Ok(Json(state.events.list_attendees(id).await?))
}

/// 참석자 추가
#[utoipa::path(
    post,
    path = "/api/v1/events/{id}/attendees/{user_id}",
    params(
        ("id" = String, Path, description = "이벤트 ID (UUID)"),
        ("user_id" = String, Path, description = "사용자 ID (UUID)")
    ),
    responses(
        (status = 201, description = "추가 성공", body = Attendee),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 403, description = "소유자 아님", body = ApiErrorResponse),
        (status = 404, description = "이벤트 또는 사용자 없음", body = ApiErrorResponse),
        (status = 409, description = "이미 참석자", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "attendees"
)]
pub async fn add_attendee(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path((id, user_id)): Path<(String, String)>,
) -> ApiResult<(StatusCode, Json<Attendee>)> {
    let event_id = parse_id("id", &id)?;
    let user_id = parse_id("user_id", &user_id)?;
    debug!(%event_id, %user_id, "Adding attendee");

    let attendee = state.events.add_attendee(&actor, event_id, user_id).await?;
    Ok((StatusCode::CREATED, Json(attendee)))
}

/// 참석자 제거
#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}/attendees/{user_id}",
    params(
        ("id" = String, Path, description = "이벤트 ID (UUID)"),
        ("user_id" = String, Path, description = "사용자 ID (UUID)")
    ),
    responses(
        (status = 204, description = "제거 성공"),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 403, description = "소유자 아님", body = ApiErrorResponse),
        (status = 404, description = "이벤트 또는 참석자 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "attendees"
)]
pub async fn remove_attendee(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path((id, user_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let event_id = parse_id("id", &id)?;
    let user_id = parse_id("user_id", &user_id)?;

    state.events.remove_attendee(&actor, event_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 이벤트 라우터 생성.
pub fn events_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route("/{id}", get(get_event).put(update_event).delete(delete_event))
        .route("/{id}/attendees", get(list_attendees))
        .route(
            "/{id}/attendees/{user_id}",
            post(add_attendee).delete(remove_attendee),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(date: &str) -> EventRequest {
        EventRequest {
            name: "Rust Meetup".to_string(),
            description: "Talks about async Rust".to_string(),
            date: date.to_string(),
            location: "Seoul".to_string(),
        }
    }

    #[test]
    fn test_valid_request_converts_to_details() {
        let req = request("2025-06-01");
        assert!(req.validate().is_ok());

        let details = EventDetails::try_from(req).unwrap();
        assert_eq!(details.date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
    }

    #[test]
    fn test_bad_date_rejected() {
        for date in ["2025-13-01", "01/06/2025", "2025-06-01T10:00:00", ""] {
            let errors = request(date).validate().unwrap_err();
            assert!(errors.field_errors().contains_key("date"), "{}", date);
        }
    }

    #[test]
    fn test_length_limits() {
        let mut req = request("2025-06-01");
        req.name = "ab".to_string();
        req.description = "short".to_string();
        req.location = "x".repeat(101);

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("description"));
        assert!(fields.contains_key("location"));
    }

    fn app() -> Router {
        Router::new()
            .nest("/events", events_router())
            .with_state(Arc::new(crate::state::create_test_state()))
    }

    #[tokio::test]
    async fn test_public_reads_and_guarded_writes() {
        use axum::{body::Body, http::Request};
        use tower::ServiceExt;

        let missing = format!("/events/{}", uuid::Uuid::new_v4());
        let response = app()
            .oneshot(Request::builder().uri(&missing).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app()
            .oneshot(Request::builder().uri("/events").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/events")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"name":"Rust Meetup","description":"Talks about async Rust","date":"2025-06-01","location":"Seoul"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
