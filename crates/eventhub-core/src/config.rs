//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//! 기본값 → TOML 파일(선택) → `EVENTHUB__` 접두사 환경 변수 순으로 덮어씁니다.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// 서명 키가 설정되지 않았을 때 사용하는 개발용 키.
pub const DEV_JWT_SECRET: &str = "dev-secret-key-change-in-production";

/// 토큰 유효 시간 상한 (1년).
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 데이터베이스 설정
    #[serde(default)]
    pub database: DatabaseConfig,
    /// 인증 설정
    #[serde(default)]
    pub auth: AuthConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// 연결 URL. 없으면 메모리 저장소를 사용합니다.
    #[serde(default)]
    pub url: Option<String>,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 타임아웃 (초)
    pub connect_timeout_secs: u64,
    /// 저장소 호출당 타임아웃 (초)
    pub query_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            connect_timeout_secs: 10,
            query_timeout_secs: 3,
        }
    }
}

impl DatabaseConfig {
    /// 저장소 호출당 타임아웃.
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

/// 인증 설정.
#[derive(Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// 토큰 서명 키 (HS256)
    #[serde(default, skip_serializing)]
    pub jwt_secret: Option<SecretString>,
    /// 토큰 유효 시간 (시간)
    pub token_ttl_hours: i64,
    /// Argon2 메모리 비용 (KiB)
    pub hash_memory_kib: u32,
    /// Argon2 반복 횟수
    pub hash_iterations: u32,
    /// Argon2 병렬도
    pub hash_parallelism: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_hours: 24,
            // Argon2id 권장 기본값 (m=19456, t=2, p=1)
            hash_memory_kib: 19 * 1024,
            hash_iterations: 2,
            hash_parallelism: 1,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("hash_memory_kib", &self.hash_memory_kib)
            .field("hash_iterations", &self.hash_iterations)
            .field("hash_parallelism", &self.hash_parallelism)
            .finish()
    }
}

impl AuthConfig {
    /// 서명 키가 명시적으로 설정되었는지 확인.
    pub fn has_explicit_secret(&self) -> bool {
        self.jwt_secret
            .as_ref()
            .is_some_and(|s| !s.expose_secret().is_empty())
    }

    /// 서명 키. 설정되지 않았으면 개발용 키를 반환합니다.
    pub fn signing_secret(&self) -> SecretString {
        match &self.jwt_secret {
            Some(secret) if !secret.expose_secret().is_empty() => secret.clone(),
            _ => SecretString::from(DEV_JWT_SECRET),
        }
    }

    /// 토큰 유효 시간. 범위는 [`AppConfig::load`]에서 검사합니다.
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.token_ttl_hours.clamp(1, MAX_TOKEN_TTL_HOURS))
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&self.token_ttl_hours) {
            return Err(config::ConfigError::Message(format!(
                "auth.token_ttl_hours must be between 1 and {}, got {}",
                MAX_TOKEN_TTL_HOURS, self.token_ttl_hours
            )));
        }
        Ok(())
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "eventhub_api=info,eventhub_core=info,tower_http=info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let defaults = AppConfig::default();

        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default(
                "database.max_connections",
                i64::from(defaults.database.max_connections),
            )?
            .set_default(
                "database.connect_timeout_secs",
                defaults.database.connect_timeout_secs as i64,
            )?
            .set_default(
                "database.query_timeout_secs",
                defaults.database.query_timeout_secs as i64,
            )?
            .set_default("auth.token_ttl_hours", defaults.auth.token_ttl_hours)?
            .set_default("auth.hash_memory_kib", i64::from(defaults.auth.hash_memory_kib))?
            .set_default("auth.hash_iterations", i64::from(defaults.auth.hash_iterations))?
            .set_default("auth.hash_parallelism", i64::from(defaults.auth.hash_parallelism))?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.format", defaults.logging.format)?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("EVENTHUB")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.auth.validate()?;
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.auth.token_ttl_hours, 24);
        assert_eq!(config.database.query_timeout(), Duration::from_secs(3));
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load("does/not/exist.toml").unwrap();
        assert_eq!(config.auth.token_ttl_hours, 24);
        assert_eq!(config.database.query_timeout_secs, 3);
    }

    #[test]
    fn test_signing_secret_fallback() {
        let mut auth = AuthConfig::default();
        assert!(!auth.has_explicit_secret());
        assert_eq!(auth.signing_secret().expose_secret(), DEV_JWT_SECRET);

        auth.jwt_secret = Some(SecretString::from("configured"));
        assert!(auth.has_explicit_secret());
        assert_eq!(auth.signing_secret().expose_secret(), "configured");
    }

    #[test]
    fn test_auth_debug_redacts_secret() {
        let auth = AuthConfig {
            jwt_secret: Some(SecretString::from("super-secret")),
            ..Default::default()
        };
        let debug = format!("{:?}", auth);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_secret_deserializes_into_secret_string() {
        let auth: AuthConfig = serde_json::from_value(serde_json::json!({
            "jwt_secret": "from-env",
            "token_ttl_hours": 1,
            "hash_memory_kib": 1024,
            "hash_iterations": 1,
            "hash_parallelism": 1
        }))
        .unwrap();
        assert_eq!(auth.signing_secret().expose_secret(), "from-env");
    }

    #[test]
    fn test_token_ttl_range_checked() {
        for hours in [0, -5, MAX_TOKEN_TTL_HOURS + 1, i64::MAX] {
            let auth = AuthConfig {
                token_ttl_hours: hours,
                ..Default::default()
            };
            assert!(auth.validate().is_err(), "{}", hours);
            // 검사를 건너뛴 값도 패닉 없이 범위 안으로 제한
            assert!(auth.token_ttl() >= chrono::Duration::hours(1));
        }

        let auth = AuthConfig::default();
        assert!(auth.validate().is_ok());
        assert_eq!(auth.token_ttl(), chrono::Duration::hours(24));
    }
}
