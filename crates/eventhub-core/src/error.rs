//! 저장소 계층의 에러 타입.
//!
//! 저장소 구현은 백엔드 에러를 이 타입으로 변환하여 반환합니다.
//! 호출자는 `NotFound`와 `Backend`를 구분하여 404와 500을 결정합니다.

use thiserror::Error;

/// 저장소 에러.
#[derive(Debug, Error)]
pub enum StoreError {
    /// 대상 행이 없음 (삭제/조건부 수정이 0행에 적용된 경우 포함)
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 고유 제약 위반
    #[error("중복: {0}")]
    Conflict(String),

    /// 백엔드 장애 또는 타임아웃
    #[error("저장소 에러: {0}")]
    Backend(String),
}

/// 저장소 작업을 위한 Result 타입.
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// 호출 제한 시간 초과.
    ///
    /// 타임아웃은 다른 백엔드 장애와 구분하지 않습니다.
    pub fn timeout(operation: &str) -> Self {
        StoreError::Backend(format!("{} timed out", operation))
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StoreError::NotFound("row".to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Conflict(db.message().to_string())
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                StoreError::NotFound(db.message().to_string())
            }
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_is_backend_error() {
        let err = StoreError::timeout("events.get");
        assert!(matches!(err, StoreError::Backend(_)));
        assert!(err.to_string().contains("events.get"));
    }
}
