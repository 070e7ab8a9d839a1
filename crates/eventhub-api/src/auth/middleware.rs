//! Axum용 인증 게이트.
//!
//! Authorization 헤더에서 Bearer 토큰을 꺼내 검증하고, subject를 저장소에서
//! 사용자로 해석합니다. 해석된 사용자는 [`AuthUser`] 추출기를 통해 핸들러에
//! 인자로 전달되며, 하위 계층은 토큰을 다시 검증하지 않습니다.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use eventhub_core::{User, UserStore};
use tracing::{debug, error, warn};

use super::jwt::{TokenError, TokenService};
use crate::error::AppError;
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// 인증 실패 사유.
///
/// 클라이언트에는 `Storage`를 제외한 모든 사유가 동일한 401로 보입니다.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("인증 토큰이 필요합니다")]
    MissingCredential,
    #[error("유효하지 않은 토큰: {0}")]
    InvalidToken(#[from] TokenError),
    #[error("토큰의 사용자가 존재하지 않습니다")]
    UnknownSubject,
    #[error("사용자 조회 실패: {0}")]
    Storage(String),
}

/// 인증 게이트.
///
/// 토큰 서비스와 사용자 저장소를 생성 시 주입받습니다.
#[derive(Clone)]
pub struct AuthGate {
    tokens: TokenService,
    users: Arc<dyn UserStore>,
}

impl AuthGate {
    pub fn new(tokens: TokenService, users: Arc<dyn UserStore>) -> Self {
        Self { tokens, users }
    }

    /// `Bearer <token>` 형식의 헤더 값에서 토큰을 꺼냅니다.
    pub fn extract_bearer(header: Option<&str>) -> Result<&str, AuthError> {
        header
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingCredential)
    }

    /// Authorization 헤더 값을 인증하고 사용자를 반환합니다.
    pub async fn authenticate(&self, header: Option<&str>) -> Result<User, AuthError> {
        let token = Self::extract_bearer(header)?;
        let subject = self.tokens.verify(token)?;

        match self.users.get(subject).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(AuthError::UnknownSubject),
            Err(e) => Err(AuthError::Storage(e.to_string())),
        }
    }
}

/// 인증된 사용자 추출기.
///
/// # 사용 예시
///
/// ```rust,ignore
/// async fn protected_handler(AuthUser(user): AuthUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        match state.auth_gate.authenticate(header).await {
            Ok(user) => {
                debug!(user_id = %user.id, "Request authenticated");
                Ok(AuthUser(user))
            }
            Err(AuthError::Storage(e)) => {
                error!(error = %e, "Subject lookup failed during authentication");
                Err(AppError::Storage(e))
            }
            Err(e) => {
                warn!(reason = %e, path = %parts.uri.path(), "Authentication rejected");
                Err(AppError::Unauthorized)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryStore;
    use eventhub_core::NewUser;
    use secrecy::SecretString;
    use uuid::Uuid;

    fn tokens(secret: &str) -> TokenService {
        TokenService::with_default_ttl(&SecretString::new(secret.into()))
    }

    async fn gate_with_user() -> (AuthGate, User) {
        let store = Arc::new(MemoryStore::new());
        let user = store
            .insert(NewUser {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        (AuthGate::new(tokens("gate-secret"), store), user)
    }

    #[test]
    fn test_extract_bearer() {
        assert_eq!(AuthGate::extract_bearer(Some("Bearer abc")).unwrap(), "abc");
        assert!(matches!(
            AuthGate::extract_bearer(None),
            Err(AuthError::MissingCredential)
        ));
        assert!(matches!(
            AuthGate::extract_bearer(Some("Bearer ")),
            Err(AuthError::MissingCredential)
        ));
        assert!(matches!(
            AuthGate::extract_bearer(Some("Basic abc")),
            Err(AuthError::MissingCredential)
        ));
        assert!(matches!(
            AuthGate::extract_bearer(Some("bearer abc")),
            Err(AuthError::MissingCredential)
        ));
        assert!(matches!(
            AuthGate::extract_bearer(Some("abc")),
            Err(AuthError::MissingCredential)
        ));
    }

    #[tokio::test]
    async fn test_authenticate_resolves_user() {
        let (gate, user) = gate_with_user().await;
        let token = tokens("gate-secret").issue(user.id).unwrap();

        let resolved = gate
            .authenticate(Some(&format!("Bearer {}", token)))
            .await
            .unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn test_unknown_subject_rejected_despite_valid_signature() {
        let (gate, _) = gate_with_user().await;
        let token = tokens("gate-secret").issue(Uuid::new_v4()).unwrap();

        let result = gate.authenticate(Some(&format!("Bearer {}", token))).await;
        assert!(matches!(result, Err(AuthError::UnknownSubject)));
    }

    #[tokio::test]
    async fn test_foreign_secret_rejected() {
        let (gate, user) = gate_with_user().await;
        let token = tokens("other-secret").issue(user.id).unwrap();

        let result = gate.authenticate(Some(&format!("Bearer {}", token))).await;
        assert!(matches!(
            result,
            Err(AuthError::InvalidToken(TokenError::InvalidSignature))
        ));
    }
}
