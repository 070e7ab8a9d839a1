//! Users Repository
//!
//! 사용자 자격증명 관련 데이터베이스 연산을 담당합니다.

use std::time::Duration;

use async_trait::async_trait;
use eventhub_core::{NewUser, StoreResult, User, UserStore};
use sqlx::PgPool;
use uuid::Uuid;

use super::bounded;

/// PostgreSQL 사용자 저장소.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PgUserRepository {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl UserStore for PgUserRepository {
    async fn insert(&self, user: NewUser) -> StoreResult<User> {
        bounded(
            "users.insert",
            self.timeout,
            sqlx::query_as::<_, User>(
                r#"
                INSERT INTO users (id, name, email, password_hash)
                VALUES ($1, $2, $3, $4)
                RETURNING id, name, email, password_hash
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .fetch_one(&self.pool),
        )
        .await
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<User>> {
        bounded(
            "users.get",
            self.timeout,
            sqlx::query_as::<_, User>(
                "SELECT id, name, email, password_hash FROM users WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool),
        )
        .await
    }

    async fn get_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        bounded(
            "users.get_by_email",
            self.timeout,
            sqlx::query_as::<_, User>(
                "SELECT id, name, email, password_hash FROM users WHERE email = $1",
            )
            .bind(email)
            .fetch_optional(&self.pool),
        )
        .await
    }
}
