//! 소유권 기반 권한 검사.
//!
//! 이벤트 또는 그 참석자를 변경하기 전에 대상 이벤트를 조회하여 요청자가
//! 소유자인지 확인합니다. 참석자 변경도 참석자 행이 아니라 이벤트의
//! 소유권으로 판단합니다.
//!
//! ```text
//! Authenticated ──(load event)──┬─ 없음 ──────────> NotFound
//!                               ├─ 소유자 불일치 ─> Forbidden
//!                               └─ 소유자 일치 ──> Authorized → 변경
//! ```
//!
//! 이벤트의 존재 여부는 비밀이 아니므로 `Forbidden`과 `NotFound`를 구분합니다.

use std::sync::Arc;

use eventhub_core::{Event, EventStore, StoreError, User};
use tracing::warn;
use uuid::Uuid;

/// 소유권 검사 실패.
#[derive(Debug, thiserror::Error)]
pub enum OwnershipError {
    #[error("이벤트를 찾을 수 없습니다: {0}")]
    EventNotFound(Uuid),
    #[error("이벤트 소유자만 변경할 수 있습니다")]
    Forbidden,
    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// 소유자와 요청자를 비교합니다.
pub fn ensure_owner(event: &Event, actor: &User) -> Result<(), OwnershipError> {
    if event.is_owned_by(actor.id) {
        Ok(())
    } else {
        warn!(
            event_id = %event.id,
            owner_id = %event.owner_id,
            actor_id = %actor.id,
            "Ownership check denied"
        );
        Err(OwnershipError::Forbidden)
    }
}

/// 이벤트 소유권 검사기.
#[derive(Clone)]
pub struct OwnershipAuthorizer {
    events: Arc<dyn EventStore>,
}

impl OwnershipAuthorizer {
    pub fn new(events: Arc<dyn EventStore>) -> Self {
        Self { events }
    }

    /// 이벤트 변경 권한 확인.
    ///
    /// 권한이 있으면 조회한 이벤트를 반환합니다.
    pub async fn authorize(&self, actor: &User, event_id: Uuid) -> Result<Event, OwnershipError> {
        let event = self
            .events
            .get(event_id)
            .await?
            .ok_or(OwnershipError::EventNotFound(event_id))?;

        ensure_owner(&event, actor)?;
        Ok(event)
    }
}
