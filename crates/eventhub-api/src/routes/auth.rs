//! 인증 API 라우트.
//!
//! # 엔드포인트
//!
//! - `POST /api/v1/auth/register` - 회원가입
//! - `POST /api/v1/auth/login` - 로그인 (토큰 발급)
//!
//! 두 엔드포인트 모두 인증 게이트를 거치지 않습니다.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use eventhub_core::User;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use utoipa::ToSchema;
use validator::{Validate, ValidateEmail, ValidationError};

use super::validated;
use crate::error::{ApiErrorResponse, ApiResult};
use crate::services::Registration;
use crate::state::AppState;

// ==================== Request/Response Types ====================

// 서비스가 앞뒤 공백을 잘라 저장하므로 잘라낸 값으로 검사
fn validate_display_name(value: &str) -> Result<(), ValidationError> {
    if value.trim().chars().count() < 2 {
        return Err(ValidationError::new("length")
            .with_message("이름은 2자 이상이어야 합니다".into()));
    }
    Ok(())
}

fn validate_trimmed_email(value: &str) -> Result<(), ValidationError> {
    if !value.trim().validate_email() {
        return Err(ValidationError::new("email")
            .with_message("올바른 이메일 형식이 아닙니다".into()));
    }
    Ok(())
}

/// 회원가입 요청
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// 표시 이름 (2자 이상)
    #[validate(custom(function = "validate_display_name"))]
    pub name: String,
    /// 이메일
    #[validate(custom(function = "validate_trimmed_email"))]
    pub email: String,
    /// 비밀번호 (8자 이상)
    #[validate(length(min = 8, message = "비밀번호는 8자 이상이어야 합니다"))]
    pub password: String,
}

/// 로그인 요청
#[derive(Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(custom(function = "validate_trimmed_email"))]
    pub email: String,
    #[validate(length(min = 8, message = "비밀번호는 8자 이상이어야 합니다"))]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// 로그인 응답
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Bearer 토큰 (24시간 유효)
    pub token: String,
}

// ==================== Handlers ====================

/// 회원가입
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "등록 성공", body = User),
        (status = 400, description = "잘못된 입력", body = ApiErrorResponse),
        (status = 409, description = "이미 등록된 이메일", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let request = validated(payload)?;
    debug!(email = %request.email, "POST /auth/register");

    let user = state
        .accounts
        .register(Registration {
            name: request.name,
            email: request.email,
            password: request.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// 로그인
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "토큰 발급", body = TokenResponse),
        (status = 400, description = "잘못된 입력", body = ApiErrorResponse),
        (status = 401, description = "이메일 또는 비밀번호 불일치", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let request = validated(payload)?;
    let token = state.accounts.login(&request.email, request.password).await?;
    Ok(Json(TokenResponse { token }))
}

/// 인증 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}
