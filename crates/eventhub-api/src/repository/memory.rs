//! 메모리 저장소.
//!
//! 데이터베이스가 설정되지 않았을 때와 테스트에서 사용합니다.
//! PostgreSQL 구현과 같은 계약(고유 제약, 소유자 조건, 연쇄 삭제, 정렬)을 따릅니다.
//! 모든 변경은 하나의 쓰기 잠금 안에서 검사와 함께 수행됩니다.

use std::collections::HashMap;

use async_trait::async_trait;
use eventhub_core::{
    Attendee, AttendeeStore, Event, EventDetails, EventStore, NewUser, StoreError, StoreResult,
    User, UserStore,
};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct MemoryData {
    users: HashMap<Uuid, User>,
    events: HashMap<Uuid, Event>,
    attendees: HashMap<Uuid, Attendee>,
}

/// 세 저장소 trait을 모두 구현하는 메모리 저장소.
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<MemoryData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sort_events(events: &mut [Event]) {
    events.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.name.cmp(&b.name)));
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: NewUser) -> StoreResult<User> {
        let mut data = self.data.write().await;
        if data.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(format!("email {}", user.email)));
        }

        let user = user.into_user(Uuid::new_v4());
        data.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.data.read().await.users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let data = self.data.read().await;
        Ok(data.users.values().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn insert(&self, owner_id: Uuid, details: EventDetails) -> StoreResult<Event> {
        let event = details.into_event(Uuid::new_v4(), owner_id);
        self.data.write().await.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<Event>> {
        Ok(self.data.read().await.events.get(&id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<Event>> {
        let mut events: Vec<Event> = self.data.read().await.events.values().cloned().collect();
        sort_events(&mut events);
        Ok(events)
    }

    async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        details: EventDetails,
    ) -> StoreResult<Event> {
        let mut data = self.data.write().await;
        match data.events.get_mut(&id) {
            Some(event) if event.is_owned_by(owner_id) => {
                event.apply(details);
                Ok(event.clone())
            }
            _ => Err(StoreError::NotFound(format!("event {}", id))),
        }
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> StoreResult<()> {
        let mut data = self.data.write().await;
        let owned = data.events.get(&id).is_some_and(|e| e.is_owned_by(owner_id));
        if !owned {
            return Err(StoreError::NotFound(format!("event {}", id)));
        }

        data.events.remove(&id);
        // 참석자 연결 연쇄 삭제
        data.attendees.retain(|_, a| a.event_id != id);
        Ok(())
    }

    async fn list_for_attendee(&self, user_id: Uuid) -> StoreResult<Vec<Event>> {
        let data = self.data.read().await;
        let mut events: Vec<Event> = data
            .attendees
            .values()
            .filter(|a| a.user_id == user_id)
            .filter_map(|a| data.events.get(&a.event_id).cloned())
            .collect();
        sort_events(&mut events);
        Ok(events)
    }
}

#[async_trait]
impl AttendeeStore for MemoryStore {
    async fn insert(&self, event_id: Uuid, user_id: Uuid, owner_id: Uuid) -> StoreResult<Attendee> {
        let mut data = self.data.write().await;

        let owned = data
            .events
            .get(&event_id)
            .is_some_and(|e| e.is_owned_by(owner_id));
        if !owned {
            return Err(StoreError::NotFound(format!("event {}", event_id)));
        }
        if !data.users.contains_key(&user_id) {
            return Err(StoreError::NotFound(format!("user {}", user_id)));
        }
        if data
            .attendees
            .values()
            .any(|a| a.event_id == event_id && a.user_id == user_id)
        {
            return Err(StoreError::Conflict(format!(
                "attendee {} for event {}",
                user_id, event_id
            )));
        }

        let attendee = Attendee {
            id: Uuid::new_v4(),
            event_id,
            user_id,
        };
        data.attendees.insert(attendee.id, attendee.clone());
        Ok(attendee)
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<Attendee>> {
        Ok(self.data.read().await.attendees.get(&id).cloned())
    }

    async fn get_by_event_and_user(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<Attendee>> {
        let data = self.data.read().await;
        Ok(data
            .attendees
            .values()
            .find(|a| a.event_id == event_id && a.user_id == user_id)
            .cloned())
    }

    async fn list_users_for_event(&self, event_id: Uuid) -> StoreResult<Vec<User>> {
        let data = self.data.read().await;
        let mut users: Vec<User> = data
            .attendees
            .values()
            .filter(|a| a.event_id == event_id)
            .filter_map(|a| data.users.get(&a.user_id))
            .map(|u| User {
                password_hash: String::new(),
                ..u.clone()
            })
            .collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> StoreResult<()> {
        let mut data = self.data.write().await;
        let allowed = data.attendees.get(&id).is_some_and(|a| {
            data.events
                .get(&a.event_id)
                .is_some_and(|e| e.is_owned_by(owner_id))
        });
        if !allowed {
            return Err(StoreError::NotFound(format!("attendee {}", id)));
        }

        data.attendees.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    async fn user(store: &MemoryStore, name: &str) -> User {
        UserStore::insert(
            store,
            NewUser {
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                password_hash: "hash".to_string(),
            },
        )
        .await
        .unwrap()
    }

    fn details(name: &str, day: u32) -> EventDetails {
        EventDetails {
            name: name.to_string(),
            description: "Something worth attending".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            location: "Busan".to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        user(&store, "Alice").await;

        let result = UserStore::insert(
            &store,
            NewUser {
                name: "Other".to_string(),
                email: "alice@example.com".to_string(),
                password_hash: "hash".to_string(),
            },
        )
        .await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_events_listed_by_date_then_name() {
        let store = MemoryStore::new();
        let owner = user(&store, "Owner").await;
        EventStore::insert(&store, owner.id, details("Zeta", 1)).await.unwrap();
        EventStore::insert(&store, owner.id, details("Late", 9)).await.unwrap();
        EventStore::insert(&store, owner.id, details("Alpha", 1)).await.unwrap();

        let names: Vec<String> = store.list().await.unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Alpha", "Zeta", "Late"]);
    }

    #[tokio::test]
    async fn test_update_requires_owner() {
        let store = MemoryStore::new();
        let owner = user(&store, "Owner").await;
        let other = user(&store, "Other").await;
        let event = EventStore::insert(&store, owner.id, details("Meetup", 1)).await.unwrap();

        let denied = store.update(event.id, other.id, details("Hijacked", 2)).await;
        assert!(matches!(denied, Err(StoreError::NotFound(_))));

        let updated = store.update(event.id, owner.id, details("Renamed", 2)).await.unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.owner_id, owner.id);
    }

    #[tokio::test]
    async fn test_attendee_rules() {
        let store = MemoryStore::new();
        let owner = user(&store, "Owner").await;
        let guest = user(&store, "Guest").await;
        let event = EventStore::insert(&store, owner.id, details("Meetup", 1)).await.unwrap();

        // 소유자가 아니면 이벤트가 없는 것과 같다
        let denied = AttendeeStore::insert(&store, event.id, guest.id, guest.id).await;
        assert!(matches!(denied, Err(StoreError::NotFound(_))));

        let attendee = AttendeeStore::insert(&store, event.id, guest.id, owner.id)
            .await
            .unwrap();
        let dup = AttendeeStore::insert(&store, event.id, guest.id, owner.id).await;
        assert!(matches!(dup, Err(StoreError::Conflict(_))));

        let missing_user = AttendeeStore::insert(&store, event.id, Uuid::new_v4(), owner.id).await;
        assert!(matches!(missing_user, Err(StoreError::NotFound(_))));

        let users = store.list_users_for_event(event.id).await.unwrap();
        assert_eq!(users.len(), 1);
        assert!(users[0].password_hash.is_empty());

        assert_eq!(
            store
                .get_by_event_and_user(event.id, guest.id)
                .await
                .unwrap()
                .map(|a| a.id),
            Some(attendee.id)
        );
        assert_eq!(store.list_for_attendee(guest.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_event_delete_cascades_attendees() {
        let store = MemoryStore::new();
        let owner = user(&store, "Owner").await;
        let guest = user(&store, "Guest").await;
        let event = EventStore::insert(&store, owner.id, details("Meetup", 1)).await.unwrap();
        let attendee = AttendeeStore::insert(&store, event.id, guest.id, owner.id)
            .await
            .unwrap();

        EventStore::delete(&store, event.id, owner.id).await.unwrap();

        assert!(AttendeeStore::get(&store, attendee.id).await.unwrap().is_none());
        assert!(store.list_for_attendee(guest.id).await.unwrap().is_empty());

        let again = EventStore::delete(&store, event.id, owner.id).await;
        assert!(matches!(again, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_attendee_delete_requires_event_owner() {
        let store = MemoryStore::new();
        let owner = user(&store, "Owner").await;
        let guest = user(&store, "Guest").await;
        let event = EventStore::insert(&store, owner.id, details("Meetup", 1)).await.unwrap();
        let attendee = AttendeeStore::insert(&store, event.id, guest.id, owner.id)
            .await
            .unwrap();

        let denied = AttendeeStore::delete(&store, attendee.id, guest.id).await;
        assert!(matches!(denied, Err(StoreError::NotFound(_))));

        AttendeeStore::delete(&store, attendee.id, owner.id).await.unwrap();
        assert!(AttendeeStore::get(&store, attendee.id).await.unwrap().is_none());
    }
}
