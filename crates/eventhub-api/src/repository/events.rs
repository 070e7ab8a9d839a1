//! Events Repository
//!
//! 이벤트 관련 데이터베이스 연산을 담당합니다.
//! 수정/삭제는 `owner_id`를 WHERE 조건에 포함하여 소유권 검사와 쓰기를
//! 한 문장으로 수행합니다.

use std::time::Duration;

use async_trait::async_trait;
use eventhub_core::{Event, EventDetails, EventStore, StoreError, StoreResult};
use sqlx::PgPool;
use uuid::Uuid;

use super::bounded;

/// PostgreSQL 이벤트 저장소.
#[derive(Clone)]
pub struct PgEventRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PgEventRepository {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl EventStore for PgEventRepository {
    async fn insert(&self, owner_id: Uuid, details: EventDetails) -> StoreResult<Event> {
        bounded(
            "events.insert",
            self.timeout,
            sqlx::query_as::<_, Event>(
                r#"
                INSERT INTO events (id, owner_id, name, description, date, location)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, owner_id, name, description, date, location
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(owner_id)
            .bind(&details.name)
            .bind(&details.description)
            .bind(details.date)
            .bind(&details.location)
            .fetch_one(&self.pool),
        )
        .await
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<Event>> {
        bounded(
            "events.get",
            self.timeout,
            sqlx::query_as::<_, Event>(
                "SELECT id, owner_id, name, description, date, location FROM events WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool),
        )
        .await
    }

    async fn list(&self) -> StoreResult<Vec<Event>> {
        bounded(
            "events.list",
            self.timeout,
            sqlx::query_as::<_, Event>(
                r#"
                SELECT id, owner_id, name, description, date, location
                FROM events
                ORDER BY date, name
                "#,
            )
            .fetch_all(&self.pool),
        )
        .await
    }

    async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        details: EventDetails,
    ) -> StoreResult<Event> {
        bounded(
            "events.update",
            self.timeout,
            sqlx::query_as::<_, Event>(
                r#"
                UPDATE events
                SET name = $3, description = $4, date = $5, location = $6
                WHERE id = $1 AND owner_id = $2
                RETURNING id, owner_id, name, description, date, location
                "#,
            )
            .bind(id)
            .bind(owner_id)
            .bind(&details.name)
            .bind(&details.description)
            .bind(details.date)
            .bind(&details.location)
            .fetch_optional(&self.pool),
        )
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("event {}", id)))
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> StoreResult<()> {
        // attendees는 ON DELETE CASCADE로 함께 삭제됨
        let result = bounded(
            "events.delete",
            self.timeout,
            sqlx::query("DELETE FROM events WHERE id = $1 AND owner_id = $2")
                .bind(id)
                .bind(owner_id)
                .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("event {}", id)));
        }
        Ok(())
    }

    async fn list_for_attendee(&self, user_id: Uuid) -> StoreResult<Vec<Event>> {
        bounded(
            "events.list_for_attendee",
            self.timeout,
            sqlx::query_as::<_, Event>(
                r#"
                SELECT e.id, e.owner_id, e.name, e.description, e.date, e.location
                FROM events e
                JOIN attendees a ON a.event_id = e.id
                WHERE a.user_id = $1
                ORDER BY e.date, e.name
                "#,
            )
            .bind(user_id)
            .fetch_all(&self.pool),
        )
        .await
    }
}
