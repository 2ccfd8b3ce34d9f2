//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/api/login`, `/api/join` - 로그인 / 회원 가입
//! - `/api/members` - 회원 관리
//! - `/api/reviews` - 취업 후기

pub mod auth;
pub mod health;
pub mod members;
pub mod reviews;

pub use auth::{auth_router, JoinRequest, LoginRequest};
pub use health::{health_router, ComponentStatus, HealthResponse};
pub use members::{members_router, UpdateMemberRequest};
pub use reviews::{
    reviews_router, CreateReviewRequest, PageQuery, ReviewPage, UpdateReviewRequest,
};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
pub fn create_api_router() -> Router<Arc<AppState>> {
    let api = Router::new()
        .merge(auth_router())
        .nest("/members", members_router())
        .nest("/reviews", reviews_router());

    Router::new()
        .nest("/health", health_router())
        .nest("/api", api)
}
