//! Attendees Repository
//!
//! 이벤트 참석자 관련 데이터베이스 연산을 담당합니다.

use std::time::Duration;

use async_trait::async_trait;
use eventhub_core::{Attendee, AttendeeStore, StoreError, StoreResult, User};
use sqlx::PgPool;
use uuid::Uuid;

use super::bounded;

/// PostgreSQL 참석자 저장소.
#[derive(Clone)]
pub struct PgAttendeeRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PgAttendeeRepository {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl AttendeeStore for PgAttendeeRepository {
    async fn insert(&self, event_id: Uuid, user_id: Uuid, owner_id: Uuid) -> StoreResult<Attendee> {
        // 이벤트 소유자 조건을 INSERT ... SELECT 안에서 확인
        bounded(
            "attendees.insert",
            self.timeout,
            sqlx::query_as::<_, Attendee>(
                r#"
                INSERT INTO attendees (id, event_id, user_id)
                SELECT $1, e.id, $3
                FROM events e
                WHERE e.id = $2 AND e.owner_id = $4
                RETURNING id, event_id, user_id
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(event_id)
            .bind(user_id)
            .bind(owner_id)
            .fetch_optional(&self.pool),
        )
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("event {}", event_id)))
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<Attendee>> {
        bounded(
            "attendees.get",
            self.timeout,
            sqlx::query_as::<_, Attendee>("SELECT id, event_id, user_id FROM attendees WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn get_by_event_and_user(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<Attendee>> {
        bounded(
            "attendees.get_by_event_and_user",
            self.timeout,
            sqlx::query_as::<_, Attendee>(
                "SELECT id, event_id, user_id FROM attendees WHERE event_id = $1 AND user_id = $2",
            )
            .bind(event_id)
            .bind(user_id)
            .fetch_optional(&self.pool),
        )
        .await
    }

    async fn list_users_for_event(&self, event_id: Uuid) -> StoreResult<Vec<User>> {
        // 비밀번호 해시는 조회하지 않음
        bounded(
            "attendees.list_users_for_event",
            self.timeout,
            sqlx::query_as::<_, User>(
                r#"
                SELECT u.id, u.name, u.email, '' AS password_hash
                FROM users u
                JOIN attendees a ON a.user_id = u.id
                WHERE a.event_id = $1
                ORDER BY u.name
                "#,
            )
            .bind(event_id)
            .fetch_all(&self.pool),
        )
        .await
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> StoreResult<()> {
        let result = bounded(
            "attendees.delete",
            self.timeout,
            sqlx::query(
                r#"
                DELETE FROM attendees a
                USING events e
                WHERE a.id = $1 AND a.event_id = e.id AND e.owner_id = $2
                "#,
            )
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("attendee {}", id)));
        }
        Ok(())
    }
}
