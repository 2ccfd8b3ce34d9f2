//! Member API 라우트
//!
//! 모든 엔드포인트는 Bearer 토큰이 필요합니다.
//!
//! # 엔드포인트
//!
//! - `GET /api/members/me` - 현재 회원 조회
//! - `POST /api/members` - 회원 생성 (가입과 동일)
//! - `GET /api/members/{id}` - 회원 조회
//! - `PUT /api/members/{id}` - 표시 이름 수정 (본인만)
//! - `DELETE /api/members/{id}` - 회원 탈퇴 (본인만, 후기 연쇄 삭제)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use utoipa::ToSchema;
use validator::Validate;

use campusjob_core::{CampusError, MemberId, MemberIdentity, MemberStore};

use crate::auth::CurrentMember;
use crate::error::{ApiErrorResponse, ApiResult};
use crate::routes::auth::{register, JoinRequest};
use crate::state::AppState;
use crate::validation::ValidatedJson;

/// 회원 수정 요청.
///
/// 이름이 없거나 공백뿐이면 변경하지 않습니다.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMemberRequest {
    /// 새 표시 이름
    #[serde(default)]
    #[validate(length(max = 100, message = "이름은 100자 이하여야 합니다"))]
    pub name: Option<String>,
}

/// GET /api/members/me - 현재 회원 조회
#[utoipa::path(
    get,
    path = "/api/members/me",
    tag = "members",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "현재 회원", body = MemberIdentity),
        (status = 401, description = "인증 실패", body = ApiErrorResponse)
    )
)]
pub async fn get_me(CurrentMember(caller): CurrentMember) -> Json<MemberIdentity> {
    Json(caller)
}

/// POST /api/members - 회원 생성
#[utoipa::path(
    post,
    path = "/api/members",
    tag = "members",
    security(("bearer_auth" = [])),
    request_body = JoinRequest,
    responses(
        (status = 201, description = "생성 완료", body = MemberIdentity),
        (status = 400, description = "입력값 오류", body = ApiErrorResponse),
        (status = 401, description = "인증 실패", body = ApiErrorResponse),
        (status = 409, description = "이메일 중복", body = ApiErrorResponse)
    )
)]
pub async fn create_member(
    State(state): State<Arc<AppState>>,
    CurrentMember(_caller): CurrentMember,
    ValidatedJson(request): ValidatedJson<JoinRequest>,
) -> ApiResult<(StatusCode, Json<MemberIdentity>)> {
    register(&state, request).await
}

/// GET /api/members/{id} - 회원 조회
#[utoipa::path(
    get,
    path = "/api/members/{id}",
    tag = "members",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "회원 ID")),
    responses(
        (status = 200, description = "회원 정보", body = MemberIdentity),
        (status = 401, description = "인증 실패", body = ApiErrorResponse),
        (status = 404, description = "회원 없음", body = ApiErrorResponse)
    )
)]
pub async fn get_member(
    State(state): State<Arc<AppState>>,
    CurrentMember(_caller): CurrentMember,
    Path(id): Path<MemberId>,
) -> ApiResult<Json<MemberIdentity>> {
    debug!(member_id = id, "회원 조회");

    let member = state
        .members
        .find_by_id(id)
        .await
        .map_err(CampusError::from)?
        .ok_or_else(CampusError::member_not_found)?;

    Ok(Json(member.identity()))
}

/// PUT /api/members/{id} - 표시 이름 수정
#[utoipa::path(
    put,
    path = "/api/members/{id}",
    tag = "members",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "회원 ID")),
    request_body = UpdateMemberRequest,
    responses(
        (status = 200, description = "수정된 회원", body = MemberIdentity),
        (status = 401, description = "인증 실패", body = ApiErrorResponse),
        (status = 403, description = "본인 아님", body = ApiErrorResponse),
        (status = 404, description = "회원 없음", body = ApiErrorResponse)
    )
)]
pub async fn update_member(
    State(state): State<Arc<AppState>>,
    CurrentMember(caller): CurrentMember,
    Path(id): Path<MemberId>,
    ValidatedJson(request): ValidatedJson<UpdateMemberRequest>,
) -> ApiResult<Json<MemberIdentity>> {
    let updated = state
        .guard
        .update_member(&caller, id, request.name.as_deref())
        .await?;

    Ok(Json(updated))
}

/// DELETE /api/members/{id} - 회원 탈퇴
#[utoipa::path(
    delete,
    path = "/api/members/{id}",
    tag = "members",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "회원 ID")),
    responses(
        (status = 204, description = "삭제 완료"),
        (status = 401, description = "인증 실패", body = ApiErrorResponse),
        (status = 403, description = "본인 아님", body = ApiErrorResponse),
        (status = 404, description = "회원 없음", body = ApiErrorResponse)
    )
)]
pub async fn delete_member(
    State(state): State<Arc<AppState>>,
    CurrentMember(caller): CurrentMember,
    Path(id): Path<MemberId>,
) -> ApiResult<StatusCode> {
    state.guard.remove_member(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Member 라우터 생성
pub fn members_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_member))
        .route("/me", get(get_me))
        .route(
            "/{id}",
            get(get_member).put(update_member).delete(delete_member),
        )
}
