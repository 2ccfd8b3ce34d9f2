//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use campusjob_core::{FieldError, MemberIdentity, ReviewView, Role};

use crate::auth::IssuedToken;
use crate::error::ApiErrorResponse;
use crate::routes::{
    ComponentStatus, CreateReviewRequest, HealthResponse, JoinRequest, LoginRequest, ReviewPage,
    UpdateMemberRequest, UpdateReviewRequest,
};

// ==================== OpenAPI 문서 정의 ====================

/// CampusJob API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "CampusJob API",
        version = "0.1.0",
        description = r#"
# CampusJob 취업 후기 REST API

회원 가입, 로그인, 취업 후기 공유를 위한 REST API입니다.

## 인증

`POST /api/login`으로 받은 Access Token을 `Authorization: Bearer <token>` 헤더로 전달합니다.
토큰은 발급 후 60분 동안 유효합니다.

## 권한

후기 수정/삭제는 작성자만, 회원 수정/탈퇴는 본인만 가능합니다.
"#
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "헬스 체크"),
        (name = "auth", description = "로그인 / 회원 가입"),
        (name = "members", description = "회원 관리"),
        (name = "reviews", description = "취업 후기")
    ),
    components(schemas(
        ApiErrorResponse,
        FieldError,
        HealthResponse,
        ComponentStatus,
        IssuedToken,
        LoginRequest,
        JoinRequest,
        MemberIdentity,
        Role,
        UpdateMemberRequest,
        ReviewView,
        ReviewPage,
        CreateReviewRequest,
        UpdateReviewRequest,
    )),
    paths(
        // ===== Health =====
        crate::routes::health::health_check,
        crate::routes::health::health_ready,

        // ===== Auth =====
        crate::routes::auth::login,
        crate::routes::auth::join,

        // ===== Members =====
        crate::routes::members::get_me,
        crate::routes::members::create_member,
        crate::routes::members::get_member,
        crate::routes::members::update_member,
        crate::routes::members::delete_member,

        // ===== Reviews =====
        crate::routes::reviews::list_reviews,
        crate::routes::reviews::get_review,
        crate::routes::reviews::create_review,
        crate::routes::reviews::update_review,
        crate::routes::reviews::delete_review,
    )
)]
pub struct ApiDoc;

/// Bearer 인증 스킴 등록.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

// ==================== Swagger UI 라우터 ====================

/// Swagger UI 라우터 생성.
///
/// 다음 경로에 문서 UI를 마운트합니다:
/// - `/swagger-ui` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}
