//! Repository pattern for database operations.
//!
//! `eventhub_core`의 저장소 trait 구현을 제공합니다.
//!
//! - [`PgUserRepository`], [`PgEventRepository`], [`PgAttendeeRepository`]: PostgreSQL
//! - [`MemoryStore`]: 프로세스 내 메모리 (DB 미설정 시 및 테스트용)
//!
//! PostgreSQL 구현의 모든 호출은 [`bounded`]로 감싸져 제한 시간을 넘기면
//! 진행 중인 쿼리 future를 버리고 `StoreError::Backend`를 반환합니다.

pub mod attendees;
pub mod events;
pub mod memory;
pub mod users;

pub use attendees::PgAttendeeRepository;
pub use events::PgEventRepository;
pub use memory::MemoryStore;
pub use users::PgUserRepository;

use std::future::Future;
use std::time::Duration;

use eventhub_core::{StoreError, StoreResult};
use tracing::warn;

/// 제한 시간 안에 sqlx 호출을 실행합니다.
///
/// 시간이 초과되면 future가 drop되어 커넥션이 풀로 반환됩니다.
pub(crate) async fn bounded<T, F>(operation: &'static str, limit: Duration, query: F) -> StoreResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, query).await {
        Ok(result) => result.map_err(StoreError::from),
        Err(_) => {
            warn!(operation, timeout = ?limit, "Store call timed out");
            Err(StoreError::timeout(operation))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_bounded_times_out_as_backend_error() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok::<_, sqlx::Error>(1)
        };

        let result = bounded("events.get", Duration::from_secs(3), slow).await;
        assert!(matches!(result, Err(StoreError::Backend(_))));
    }

    #[tokio::test]
    async fn test_bounded_passes_through_results() {
        let ok = bounded("users.get", Duration::from_secs(3), async { Ok::<_, sqlx::Error>(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let missing = bounded("users.get", Duration::from_secs(3), async {
            Err::<i32, _>(sqlx::Error::RowNotFound)
        })
        .await;
        assert!(matches!(missing, Err(StoreError::NotFound(_))));
    }
}
