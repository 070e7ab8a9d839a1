//! 이벤트/참석자 서비스.
//!
//! 변경 연산은 모두 같은 순서로 진행됩니다.
//!
//! 1. 인증된 사용자(`actor`)를 인자로 받음
//! 2. [`OwnershipAuthorizer`]로 이벤트 존재 및 소유권 확인 (404 / 403)
//! 3. 소유자 ID를 조건으로 저장소 쓰기
//!
//! 3단계의 조건부 쓰기가 0행에 적용되면(동시 삭제 등) `NotFound`가 됩니다.

use std::sync::Arc;

use eventhub_core::{
    Attendee, AttendeeStore, Event, EventDetails, EventStore, StoreError, User, UserStore,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::OwnershipAuthorizer;
use crate::error::{ApiResult, AppError};

/// 이벤트 서비스.
#[derive(Clone)]
pub struct EventService {
    users: Arc<dyn UserStore>,
    events: Arc<dyn EventStore>,
    attendees: Arc<dyn AttendeeStore>,
    authorizer: OwnershipAuthorizer,
}

fn event_not_found() -> AppError {
    AppError::NotFound("이벤트를 찾을 수 없습니다".to_string())
}

impl EventService {
    pub fn new(
        users: Arc<dyn UserStore>,
        events: Arc<dyn EventStore>,
        attendees: Arc<dyn AttendeeStore>,
    ) -> Self {
        let authorizer = OwnershipAuthorizer::new(events.clone());
        Self {
            users,
            events,
            attendees,
            authorizer,
        }
    }

    // ==================== 이벤트 ====================

    /// 이벤트 생성. 소유자는 요청자입니다.
    #[instrument(skip_all, fields(actor_id = %actor.id))]
    pub async fn create(&self, actor: &User, details: EventDetails) -> ApiResult<Event> {
        let event = self.events.insert(actor.id, details).await?;
        info!(event_id = %event.id, "Event created");
        Ok(event)
    }

    pub async fn list(&self) -> ApiResult<Vec<Event>> {
        Ok(self.events.list().await?)
    }

    pub async fn get(&self, id: Uuid) -> ApiResult<Event> {
        self.events.get(id).await?.ok_or_else(event_not_found)
    }

    /// 이벤트 수정. 소유자만 가능합니다.
    #[instrument(skip_all, fields(actor_id = %actor.id, event_id = %id))]
    pub async fn update(&self, actor: &User, id: Uuid, details: EventDetails) -> ApiResult<Event> {
        self.authorizer.authorize(actor, id).await?;

        let event = self
            .events
            .update(id, actor.id, details)
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => event_not_found(),
                other => other.into(),
            })?;

        info!("Event updated");
        Ok(event)
    }

    /// 이벤트 삭제. 참석자 연결도 함께 삭제됩니다.
    #[instrument(skip_all, fields(actor_id = %actor.id, event_id = %id))]
    pub async fn delete(&self, actor: &User, id: Uuid) -> ApiResult<()> {
        self.authorizer.authorize(actor, id).await?;

        self.events
            .delete(id, actor.id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => event_not_found(),
                other => other.into(),
            })?;

        info!("Event deleted");
        Ok(())
    }

    // ==================== 참석자 ====================

    /// 이벤트 참석자(사용자) 목록.
    pub async fn list_attendees(&self, event_id: Uuid) -> ApiResult<Vec<User>> {
        self.get(event_id).await?;
        Ok(self.attendees.list_users_for_event(event_id).await?)
    }

    /// 참석자 추가. 이벤트 소유자만 가능합니다.
    #[instrument(skip_all, fields(actor_id = %actor.id, event_id = %event_id, user_id = %user_id))]
    pub async fn add_attendee(
        &self,
        actor: &User,
        event_id: Uuid,
        user_id: Uuid,
    ) -> ApiResult<Attendee> {
        self.authorizer.authorize(actor, event_id).await?;

        if self.users.get(user_id).await?.is_none() {
            return Err(AppError::NotFound("사용자를 찾을 수 없습니다".to_string()));
        }

        let attendee = self
            .attendees
            .insert(event_id, user_id, actor.id)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => {
                    AppError::Conflict("이미 참석자로 등록된 사용자입니다".to_string())
                }
                StoreError::NotFound(_) => event_not_found(),
                other => other.into(),
            })?;

        info!(attendee_id = %attendee.id, "Attendee added");
        Ok(attendee)
    }

    /// 참석자 제거. 이벤트 소유자만 가능합니다.
    #[instrument(skip_all, fields(actor_id = %actor.id, event_id = %event_id, user_id = %user_id))]
    pub async fn remove_attendee(&self, actor: &User, event_id: Uuid, user_id: Uuid) -> ApiResult<()> {
        self.authorizer.authorize(actor, event_id).await?;

        let attendee = self
            .attendees
            .get_by_event_and_user(event_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("참석자를 찾을 수 없습니다".to_string()))?;

        self.attendees
            .delete(attendee.id, actor.id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => {
                    AppError::NotFound("참석자를 찾을 수 없습니다".to_string())
                }
                other => other.into(),
            })?;

        info!(attendee_id = %attendee.id, "Attendee removed");
        Ok(())
    }

    /// 사용자가 참석하는 이벤트 목록.
    pub async fn events_for_attendee(&self, user_id: Uuid) -> ApiResult<Vec<Event>> {
        Ok(self.events.list_for_attendee(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryStore;
    use chrono::NaiveDate;
    use eventhub_core::NewUser;

    struct Fixture {
        service: EventService,
        owner: User,
        guest: User,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let mut registered = Vec::new();
        for name in ["Owner", "Guest"] {
            let user = UserStore::insert(
                &*store,
                NewUser {
                    name: name.to_string(),
                    email: format!("{}@example.com", name.to_lowercase()),
                    password_hash: "hash".to_string(),
                },
            )
            .await
            .unwrap();
            registered.push(user);
        }
        let guest = registered.pop().unwrap();
        let owner = registered.pop().unwrap();

        Fixture {
            service: EventService::new(store.clone(), store.clone(), store),
            owner,
            guest,
        }
    }

    fn details(name: &str) -> EventDetails {
        EventDetails {
            name: name.to_string(),
            description: "An evening of talks".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 9, 12).unwrap(),
            location: "Daejeon".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_actor_as_owner() {
        let f = fixture().await;
        let event = f.service.create(&f.owner, details("Meetup")).await.unwrap();
        assert_eq!(event.owner_id, f.owner.id);
        assert_eq!(f.service.get(event.id).await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_non_owner_cannot_mutate() {
        let f = fixture().await;
        let event = f.service.create(&f.owner, details("Meetup")).await.unwrap();

        let update = f.service.update(&f.guest, event.id, details("Mine now")).await;
        assert!(matches!(update, Err(AppError::Forbidden(_))));

        let delete = f.service.delete(&f.guest, event.id).await;
        assert!(matches!(delete, Err(AppError::Forbidden(_))));

        let add = f.service.add_attendee(&f.guest, event.id, f.guest.id).await;
        assert!(matches!(add, Err(AppError::Forbidden(_))));

        // 변경되지 않았는지 확인
        assert_eq!(f.service.get(event.id).await.unwrap().name, "Meetup");
    }

    #[tokio::test]
    async fn test_missing_event_is_not_found_before_ownership() {
        let f = fixture().await;
        let missing = Uuid::new_v4();

        assert!(matches!(
            f.service.update(&f.guest, missing, details("x")).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            f.service.delete(&f.owner, missing).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            f.service.list_attendees(missing).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_attendee_lifecycle() {
        let f = fixture().await;
        let event = f.service.create(&f.owner, details("Meetup")).await.unwrap();

        f.service
            .add_attendee(&f.owner, event.id, f.guest.id)
            .await
            .unwrap();
        let dup = f.service.add_attendee(&f.owner, event.id, f.guest.id).await;
        assert!(matches!(dup, Err(AppError::Conflict(_))));

        let attendees = f.service.list_attendees(event.id).await.unwrap();
        assert_eq!(attendees.iter().map(|u| u.id).collect::<Vec<_>>(), vec![f.guest.id]);

        let attending = f.service.events_for_attendee(f.guest.id).await.unwrap();
        assert_eq!(attending.len(), 1);

        let forbidden = f.service.remove_attendee(&f.guest, event.id, f.guest.id).await;
        assert!(matches!(forbidden, Err(AppError::Forbidden(_))));

        f.service
            .remove_attendee(&f.owner, event.id, f.guest.id)
            .await
            .unwrap();
        let again = f.service.remove_attendee(&f.owner, event.id, f.guest.id).await;
        assert!(matches!(again, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_adding_unknown_user_is_not_found() {
        let f = fixture().await;
        let event = f.service.create(&f.owner, details("Meetup")).await.unwrap();

        let result = f.service.add_attendee(&f.owner, event.id, Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_attendance() {
        let f = fixture().await;
        let event = f.service.create(&f.owner, details("Meetup")).await.unwrap();
        f.service
            .add_attendee(&f.owner, event.id, f.guest.id)
            .await
            .unwrap();

        f.service.delete(&f.owner, event.id).await.unwrap();

        assert!(f.service.events_for_attendee(f.guest.id).await.unwrap().is_empty());
        assert!(matches!(
            f.service.delete(&f.owner, event.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
