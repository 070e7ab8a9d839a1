//! 인증 및 권한 부여.
//!
//! # 구성 요소
//!
//! - [`PasswordHasher`]: Argon2id 비밀번호 해싱/검증
//! - [`TokenService`]: HS256 Bearer 토큰 발급/검증
//! - [`AuthGate`], [`AuthUser`]: 요청 인증 및 핸들러용 추출기
//! - [`OwnershipAuthorizer`]: 이벤트 소유권 검사
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! // 보호된 라우트에서 AuthUser 추출기 사용
//! async fn protected_handler(AuthUser(user): AuthUser) -> impl IntoResponse {
//!     format!("Hello, {}!", user.name)
//! }
//! ```

mod jwt;
mod middleware;
mod ownership;
mod password;

pub use jwt::{Claims, TokenError, TokenService};
pub use middleware::{AuthError, AuthGate, AuthUser};
pub use ownership::{ensure_owner, OwnershipAuthorizer, OwnershipError};
pub use password::{PasswordError, PasswordHasher};
