//! 저장소 추상화.
//!
//! 관계형 저장소에 대한 좁은 인터페이스입니다. 서비스 계층은 이 trait들만
//! 사용하며, PostgreSQL 구현과 메모리 구현이 함께 제공됩니다.
//!
//! # 계약
//!
//! - 단건 조회는 행이 없으면 `Ok(None)`을 반환합니다. `Err`는 항상 백엔드 장애입니다.
//! - `insert`는 식별자를 부여하고 저장된 레코드를 반환합니다.
//! - 변경 연산(`update`, `delete`)은 소유자 ID를 조건으로 받으며, 적용된 행이
//!   없으면 `StoreError::NotFound`를 반환합니다. 소유권 검사와 쓰기가 한 문장에서
//!   수행되므로 "조회 후 검사 후 쓰기" 사이의 경쟁이 쓰기를 통과시키지 못합니다.
//! - 모든 호출은 구현체가 정한 짧은 제한 시간 안에 끝나며, 초과 시
//!   `StoreError::Backend`를 반환합니다.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Attendee, Event, EventDetails, NewUser, User};
use crate::error::StoreResult;

/// 사용자 자격증명 저장소.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 사용자 저장. 이메일이 이미 있으면 `StoreError::Conflict`.
    async fn insert(&self, user: NewUser) -> StoreResult<User>;

    /// ID로 조회.
    async fn get(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// 이메일로 조회.
    async fn get_by_email(&self, email: &str) -> StoreResult<Option<User>>;
}

/// 이벤트 저장소.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// 이벤트 저장. 소유자는 `owner_id`로 고정됩니다.
    async fn insert(&self, owner_id: Uuid, details: EventDetails) -> StoreResult<Event>;

    /// ID로 조회.
    async fn get(&self, id: Uuid) -> StoreResult<Option<Event>>;

    /// 전체 목록.
    async fn list(&self) -> StoreResult<Vec<Event>>;

    /// `id`와 `owner_id`가 모두 일치하는 이벤트만 수정.
    async fn update(&self, id: Uuid, owner_id: Uuid, details: EventDetails)
        -> StoreResult<Event>;

    /// `id`와 `owner_id`가 모두 일치하는 이벤트만 삭제. 참석자 연결도 함께 삭제됩니다.
    async fn delete(&self, id: Uuid, owner_id: Uuid) -> StoreResult<()>;

    /// 사용자가 참석하는 이벤트 목록.
    async fn list_for_attendee(&self, user_id: Uuid) -> StoreResult<Vec<Event>>;
}

/// 참석자 저장소.
#[async_trait]
pub trait AttendeeStore: Send + Sync {
    /// 참석자 추가.
    ///
    /// 이벤트가 없거나 소유자가 `owner_id`가 아니면 `StoreError::NotFound`,
    /// 같은 `(event_id, user_id)`가 이미 있으면 `StoreError::Conflict`.
    async fn insert(&self, event_id: Uuid, user_id: Uuid, owner_id: Uuid)
        -> StoreResult<Attendee>;

    /// ID로 조회.
    async fn get(&self, id: Uuid) -> StoreResult<Option<Attendee>>;

    /// 이벤트와 사용자로 조회.
    async fn get_by_event_and_user(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<Attendee>>;

    /// 이벤트에 참석하는 사용자 목록.
    async fn list_users_for_event(&self, event_id: Uuid) -> StoreResult<Vec<User>>;

    /// 소속 이벤트의 소유자가 `owner_id`인 경우에만 삭제.
    async fn delete(&self, id: Uuid, owner_id: Uuid) -> StoreResult<()>;
}
