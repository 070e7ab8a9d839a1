//! 계정 서비스.
//!
//! 회원가입과 로그인을 처리합니다. 인증 게이트를 거치지 않으며 비밀번호 해셔,
//! 토큰 서비스, 사용자 저장소를 직접 사용합니다.
//!
//! 로그인 실패는 이메일 존재 여부와 무관하게 항상 [`AppError::InvalidCredentials`]
//! 입니다. 해싱/서명 장애만 [`AppError::Internal`]로 구분됩니다. 없는 이메일도
//! 더미 해시로 한 번 검증해 응답 시간이 같은 비용을 치르도록 합니다.

use std::sync::Arc;

use eventhub_core::{NewUser, StoreError, User, UserStore};
use tokio::sync::OnceCell;
use tracing::{info, instrument, warn};

use crate::auth::{PasswordError, PasswordHasher, TokenService};
use crate::error::{ApiResult, AppError};

/// 회원가입 입력.
#[derive(Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// 계정 서비스.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: TokenService,
    dummy_hash: Arc<OnceCell<String>>,
}

/// 표시 이름 최소 길이 (공백 제거 후).
const MIN_NAME_CHARS: usize = 2;

impl AccountService {
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher, tokens: TokenService) -> Self {
        Self {
            users,
            hasher,
            tokens,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// 사용자 등록.
    ///
    /// 이미 등록된 이메일이면 `Conflict`.
    #[instrument(skip_all, fields(email = %registration.email.trim()))]
    pub async fn register(&self, registration: Registration) -> ApiResult<User> {
        let name = registration.name.trim().to_string();
        if name.chars().count() < MIN_NAME_CHARS {
            return Err(AppError::validation("이름은 2자 이상이어야 합니다"));
        }
        let email = registration.email.trim().to_string();
        let password_hash = self.hash_password(registration.password).await?;

        let user = self
            .users
            .insert(NewUser {
                name,
                email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => {
                    AppError::Conflict("이미 등록된 이메일입니다".to_string())
                }
                other => other.into(),
            })?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// 로그인. 성공 시 서명된 토큰을 반환합니다.
    #[instrument(skip_all)]
    pub async fn login(&self, email: &str, password: String) -> ApiResult<String> {
        let Some(user) = self.users.get_by_email(email.trim()).await? else {
            // 결과는 버리고 비용만 치름
            let dummy = self.dummy_hash().await?;
            let _ = self.verify_password(dummy, password).await?;
            warn!("Login rejected");
            return Err(AppError::InvalidCredentials);
        };

        if !self.verify_password(user.password_hash.clone(), password).await? {
            warn!(user_id = %user.id, "Login rejected");
            return Err(AppError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(user.id)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        info!(user_id = %user.id, "User logged in");
        Ok(token)
    }

    // Argon2는 CPU를 오래 점유하므로 블로킹 스레드에서 실행
    async fn hash_password(&self, password: String) -> ApiResult<String> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .map_err(AppError::from)
    }

    async fn dummy_hash(&self) -> ApiResult<String> {
        self.dummy_hash
            .get_or_try_init(|| self.hash_password("eventhub-dummy-password".to_string()))
            .await
            .cloned()
    }

    async fn verify_password(&self, hash: String, password: String) -> ApiResult<bool> {
        let hasher = self.hasher.clone();
        let result = tokio::task::spawn_blocking(move || hasher.verify(&hash, &password))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        match result {
            Ok(matched) => Ok(matched),
            Err(e @ PasswordError::InvalidHashFormat) => {
                warn!("Stored password hash is malformed");
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }
}
