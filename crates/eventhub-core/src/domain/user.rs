//! 사용자 도메인 모델.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 등록된 사용자.
///
/// `password_hash`는 직렬화되지 않으며 `Debug` 출력에서도 가려집니다.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct User {
    /// 서버가 부여한 식별자 (불변)
    pub id: Uuid,
    /// 표시 이름
    pub name: String,
    /// 이메일 (고유)
    pub email: String,
    /// 솔트가 포함된 PHC 형식 해시
    #[serde(skip)]
    pub password_hash: String,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// 저장 전 사용자 입력.
///
/// 비밀번호는 이미 해싱된 상태여야 합니다.
#[derive(Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl NewUser {
    /// 식별자를 부여하여 `User`로 변환.
    pub fn into_user(self, id: Uuid) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        NewUser {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
        }
        .into_user(Uuid::new_v4())
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let json = serde_json::to_string(&sample_user()).unwrap();
        assert!(json.contains("alice@example.com"));
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
    }

    #[test]
    fn test_password_hash_redacted_in_debug() {
        let debug = format!("{:?}", sample_user());
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("argon2"));
    }
}
