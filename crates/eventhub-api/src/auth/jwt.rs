//! JWT 토큰 처리.
//!
//! 서명된 Bearer 토큰의 발급/검증 로직. 토큰은 상태가 없으며 만료 전 폐기는
//! 지원하지 않습니다.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT 페이로드.
///
/// 파싱 시 한 번만 검증되는 고정 구조입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - 사용자 ID
    pub sub: Uuid,
    /// Issued At - 토큰 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// Expiration - 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// 발급 시각 `now`와 유효 시간 `ttl`로 Claims 생성.
    pub fn new(subject: Uuid, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: subject,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// `now`가 만료 시각과 같거나 이후이면 만료. 허용 오차는 없습니다.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// JWT 토큰 에러.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("토큰 서명이 올바르지 않습니다")]
    InvalidSignature,
    #[error("토큰이 만료되었습니다")]
    Expired,
    #[error("잘못된 토큰 형식")]
    Malformed,
    #[error("토큰 인코딩 실패: {0}")]
    Encoding(String),
}

/// 토큰 발급/검증 서비스.
///
/// 서명 키는 프로세스 설정에서 생성 시 주입되며 이후 읽기 전용입니다.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &Algorithm::HS256)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// 기본 유효 시간 (24시간).
    pub const DEFAULT_TTL_HOURS: i64 = 24;

    /// 새 토큰 서비스.
    ///
    /// # Arguments
    ///
    /// * `secret` - HS256 서명 키
    /// * `ttl` - 발급 시각부터 만료까지의 시간
    pub fn new(secret: &SecretString, ttl: Duration) -> Self {
        let key = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        // 만료는 `Claims::is_expired_at`에서 허용 오차 없이 직접 판정
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(key),
            decoding_key: DecodingKey::from_secret(key),
            validation,
            ttl,
        }
    }

    /// 기본 유효 시간으로 생성.
    pub fn with_default_ttl(secret: &SecretString) -> Self {
        Self::new(secret, Duration::hours(Self::DEFAULT_TTL_HOURS))
    }

    /// 현재 시각 기준으로 토큰 발급.
    pub fn issue(&self, subject: Uuid) -> Result<String, TokenError> {
        self.issue_at(subject, Utc::now())
    }

    /// 주어진 시각 기준으로 토큰 발급.
    pub fn issue_at(&self, subject: Uuid, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims::new(subject, now, self.ttl);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// 현재 시각 기준으로 토큰 검증, subject 반환.
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// 주어진 시각 기준으로 토큰 검증, subject 반환.
    ///
    /// # Errors
    ///
    /// - `TokenError::Malformed`: 파싱 불가
    /// - `TokenError::InvalidSignature`: 서명 불일치 또는 다른 알고리즘
    /// - `TokenError::Expired`: `now >= exp`
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Uuid, TokenError> {
        let claims = self.decode_claims(token)?;
        if claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }
        Ok(claims.sub)
    }

    /// 서명만 검증하고 Claims 반환. 만료는 확인하지 않습니다.
    pub fn decode_claims(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::InvalidSignature
                }
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

    fn service(secret: &str) -> TokenService {
        TokenService::with_default_ttl(&SecretString::new(secret.into()))
    }

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_issue_and_verify_token() {
        let tokens = service(TEST_SECRET);
        let user_id = Uuid::new_v4();

        let token = tokens.issue(user_id).unwrap();
        assert!(!token.is_empty());
        assert_eq!(tokens.verify(&token).unwrap(), user_id);
    }

    #[test]
    fn test_expiry_is_issue_time_plus_24h() {
        let tokens = service(TEST_SECRET);
        let token = tokens.issue_at(Uuid::new_v4(), issued_at()).unwrap();

        let claims = tokens.decode_claims(&token).unwrap();
        assert_eq!(claims.iat, issued_at().timestamp());
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_expiry_is_exact() {
        let tokens = service(TEST_SECRET);
        let user_id = Uuid::new_v4();
        let t = issued_at();
        let token = tokens.issue_at(user_id, t).unwrap();

        let just_before = t + Duration::hours(24) - Duration::seconds(1);
        assert_eq!(tokens.verify_at(&token, just_before).unwrap(), user_id);

        let at_expiry = t + Duration::hours(24);
        assert_eq!(tokens.verify_at(&token, at_expiry), Err(TokenError::Expired));

        let after = t + Duration::hours(24) + Duration::seconds(1);
        assert_eq!(tokens.verify_at(&token, after), Err(TokenError::Expired));
    }

    #[test]
    fn test_wrong_secret_is_invalid_signature() {
        let token = service(TEST_SECRET).issue(Uuid::new_v4()).unwrap();

        let result = service("wrong-secret-key-for-testing-minimum-32-chars").verify(&token);
        assert_eq!(result, Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_tampered_payload_is_invalid_signature() {
        let tokens = service(TEST_SECRET);
        let token = tokens.issue(Uuid::new_v4()).unwrap();
        let other = tokens.issue(Uuid::new_v4()).unwrap();

        // 다른 토큰의 페이로드를 이 토큰의 서명과 결합
        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        assert_eq!(tokens.verify(&forged), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let tokens = service(TEST_SECRET);
        assert_eq!(tokens.verify("invalid.token.here"), Err(TokenError::Malformed));
        assert_eq!(tokens.verify("not-a-jwt"), Err(TokenError::Malformed));
        assert_eq!(tokens.verify(""), Err(TokenError::Malformed));
    }

    #[test]
    fn test_debug_hides_keys() {
        let debug = format!("{:?}", service(TEST_SECRET));
        assert!(!debug.contains(TEST_SECRET));
    }
}
