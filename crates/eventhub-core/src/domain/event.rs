//! 이벤트 도메인 모델.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 이벤트.
///
/// `owner_id`는 생성 시 인증된 생성자로 정해지며 이후 바뀌지 않습니다.
/// 소유자만 이벤트를 수정/삭제하거나 참석자를 관리할 수 있습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Event {
    pub id: Uuid,
    /// 소유자 사용자 ID
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    /// 개최일 (시간 없음)
    pub date: NaiveDate,
    pub location: String,
}

/// 이벤트 생성/수정 시 변경 가능한 필드.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetails {
    pub name: String,
    pub description: String,
    pub date: NaiveDate,
    pub location: String,
}

impl EventDetails {
    /// 식별자와 소유자를 부여하여 `Event`로 변환.
    pub fn into_event(self, id: Uuid, owner_id: Uuid) -> Event {
        Event {
            id,
            owner_id,
            name: self.name,
            description: self.description,
            date: self.date,
            location: self.location,
        }
    }
}

impl Event {
    /// 주어진 사용자가 이 이벤트의 소유자인지 확인.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }

    /// 변경 가능한 필드를 덮어씁니다. `id`와 `owner_id`는 유지됩니다.
    pub fn apply(&mut self, details: EventDetails) {
        self.name = details.name;
        self.description = details.description;
        self.date = details.date;
        self.location = details.location;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(name: &str) -> EventDetails {
        EventDetails {
            name: name.to_string(),
            description: "A long enough description".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            location: "Seoul".to_string(),
        }
    }

    #[test]
    fn test_apply_keeps_identity_and_owner() {
        let owner = Uuid::new_v4();
        let id = Uuid::new_v4();
        let mut event = details("Meetup").into_event(id, owner);

        event.apply(details("Renamed"));

        assert_eq!(event.id, id);
        assert_eq!(event.owner_id, owner);
        assert_eq!(event.name, "Renamed");
        assert!(event.is_owned_by(owner));
        assert!(!event.is_owned_by(Uuid::new_v4()));
    }

    #[test]
    fn test_date_serializes_as_calendar_date() {
        let event = details("Meetup").into_event(Uuid::new_v4(), Uuid::new_v4());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["date"], "2025-06-01");
    }
}
