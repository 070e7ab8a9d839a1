//! 이벤트 관리 REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API
//! - JWT 인증 및 이벤트 소유권 검사
//! - PostgreSQL / 메모리 저장소 구현
//! - 헬스 체크 엔드포인트
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: 비밀번호 해싱, 토큰, 인증 게이트, 소유권 검사
//! - [`services`]: 계정 및 이벤트 서비스
//! - [`repository`]: 저장소 구현
//! - [`openapi`]: OpenAPI 문서 및 Swagger UI

pub mod auth;
pub mod error;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;

pub use auth::{AuthGate, AuthUser, Claims, OwnershipAuthorizer, PasswordHasher, TokenService};
pub use error::{ApiErrorResponse, ApiResult, AppError};
pub use routes::create_api_router;
pub use state::AppState;
