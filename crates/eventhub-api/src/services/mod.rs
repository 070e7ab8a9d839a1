//! 애플리케이션 서비스 모듈.
//!
//! 라우트 핸들러와 저장소 사이에서 인증된 사용자와 소유권 규칙을 적용합니다.

pub mod accounts;
pub mod events;

pub use accounts::{AccountService, Registration};
pub use events::EventService;
