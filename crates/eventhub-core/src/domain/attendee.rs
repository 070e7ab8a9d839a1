//! 참석자 도메인 모델.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 한 사용자와 한 이벤트를 잇는 참석 레코드.
///
/// `(event_id, user_id)` 쌍은 고유합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Attendee {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
}
