//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 모든 API 핸들러에서 공유되는 상태를 관리합니다.
//! Arc로 래핑되어 여러 요청 간에 안전하게 공유됩니다.
//!
//! 서명 비밀키와 저장소는 생성 시 주입되며 전역 변수로 두지 않습니다.
//! 따라서 테스트마다 다른 비밀키와 저장소를 사용할 수 있습니다.

use std::sync::Arc;
use std::time::Duration;

use eventhub_core::{AttendeeStore, EventStore, UserStore};
use sqlx::PgPool;

use crate::auth::{AuthGate, PasswordHasher, TokenService};
use crate::repository::{MemoryStore, PgAttendeeRepository, PgEventRepository, PgUserRepository};
use crate::services::{AccountService, EventService};

/// 애플리케이션 공유 상태.
///
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
#[derive(Clone)]
pub struct AppState {
    /// 인증 게이트 - Bearer 토큰 검증 및 사용자 해석
    pub auth_gate: AuthGate,

    /// 회원가입/로그인
    pub accounts: AccountService,

    /// 이벤트/참석자 관리
    pub events: EventService,

    /// 데이터베이스 연결 풀 (메모리 저장소 사용 시 None)
    pub db_pool: Option<PgPool>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 저장소 구현을 주입하여 생성.
    pub fn new(
        users: Arc<dyn UserStore>,
        events: Arc<dyn EventStore>,
        attendees: Arc<dyn AttendeeStore>,
        tokens: TokenService,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            auth_gate: AuthGate::new(tokens.clone(), users.clone()),
            accounts: AccountService::new(users.clone(), hasher, tokens),
            events: EventService::new(users, events, attendees),
            db_pool: None,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 메모리 저장소 기반 상태.
    pub fn in_memory(tokens: TokenService, hasher: PasswordHasher) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(store.clone(), store.clone(), store, tokens, hasher)
    }

    /// PostgreSQL 저장소 기반 상태.
    ///
    /// `query_timeout`은 모든 저장소 호출에 적용됩니다.
    pub fn postgres(
        pool: PgPool,
        query_timeout: Duration,
        tokens: TokenService,
        hasher: PasswordHasher,
    ) -> Self {
        let mut state = Self::new(
            Arc::new(PgUserRepository::new(pool.clone(), query_timeout)),
            Arc::new(PgEventRepository::new(pool.clone(), query_timeout)),
            Arc::new(PgAttendeeRepository::new(pool.clone(), query_timeout)),
            tokens,
            hasher,
        );
        state.db_pool = Some(pool);
        state
    }

    /// 저장소 종류 ("postgres" 또는 "memory").
    pub fn store_kind(&self) -> &'static str {
        if self.db_pool.is_some() {
            "postgres"
        } else {
            "memory"
        }
    }

    /// 서버 업타임(초) 반환.
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }

    /// 저장소 연결 상태 확인.
    ///
    /// 메모리 저장소는 항상 정상입니다.
    pub async fn is_store_healthy(&self) -> bool {
        match &self.db_pool {
            Some(pool) => tokio::time::timeout(
                Duration::from_secs(3),
                sqlx::query("SELECT 1").fetch_one(pool),
            )
            .await
            .map(|r| r.is_ok())
            .unwrap_or(false),
            None => true,
        }
    }
}

/// 테스트용 AppState 생성 헬퍼.
///
/// 메모리 저장소와 저비용 Argon2 파라미터를 사용합니다.
#[cfg(test)]
pub fn create_test_state() -> AppState {
    use secrecy::SecretString;

    let tokens = TokenService::with_default_ttl(&SecretString::new("test-secret".into()));
    let hasher = PasswordHasher::new(1024, 1, 1).expect("valid argon2 params");
    AppState::in_memory(tokens, hasher)
}
