//! 참석자 기준 조회 라우트.
//!
//! - `GET /api/v1/attendees/{user_id}/events` - 사용자가 참석하는 이벤트 목록

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use eventhub_core::Event;
use std::sync::Arc;

use super::parse_id;
use crate::error::{ApiErrorResponse, ApiResult};
use crate::state::AppState;

/// 사용자가 참석하는 이벤트 목록
#[utoipa::path(
    get,
    path = "/api/v1/attendees/{user_id}/events",
    params(("user_id" = String, Path, description = "사용자 ID (UUID)")),
    responses(
        (status = 200, description = "참석 이벤트 목록", body = Vec<Event>),
        (status = 400, description = "잘못된 ID", body = ApiErrorResponse)
    ),
    tag = "attendees"
)]
pub async fn events_for_attendee(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Vec<Event>>> {
    let user_id = parse_id("user_id", &user_id)?;
    Ok(Json(state.events.events_for_attendee(user_id).await?))
}

/// 참석자 라우터 생성.
pub fn attendees_router() -> Router<Arc<AppState>> {
    Router::new().route("/{user_id}/events", get(events_for_attendee))
}
