//! Review API 라우트
//!
//! 취업 후기 조회/작성/수정/삭제 API를 제공합니다.
//!
//! # 엔드포인트
//!
//! - `GET /api/reviews?page&size` - 후기 목록 (최신순 페이지)
//! - `GET /api/reviews/{id}` - 후기 상세
//! - `POST /api/reviews` - 후기 작성 (인증 필요)
//! - `PUT /api/reviews/{id}` - 후기 수정 (작성자만)
//! - `DELETE /api/reviews/{id}` - 후기 삭제 (작성자만)

use axum::{
    extract::{Path, Query, State},
    http::{header::LOCATION, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use campusjob_core::{
    CampusError, NewReview, ReviewId, ReviewPatch, ReviewStore, ReviewView, StoreError,
};

use crate::auth::CurrentMember;
use crate::error::{ApiErrorResponse, ApiResult};
use crate::metrics::record_review_mutation;
use crate::state::AppState;
use crate::validation::{not_blank, ValidatedJson};

/// 기본 페이지 크기
pub const DEFAULT_PAGE_SIZE: i64 = 10;
/// 최대 페이지 크기
pub const MAX_PAGE_SIZE: i64 = 100;
/// 최대 페이지 번호 (`page * size`가 i64 범위를 넘지 않도록 제한)
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

// ================================================================================================
// Request/Response Types
// ================================================================================================

/// 목록 조회 쿼리
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 0부터 시작하는 페이지 번호 (기본: 0)
    pub page: Option<i64>,
    /// 페이지 크기 (기본: 10, 1..=100으로 보정)
    pub size: Option<i64>,
}

impl PageQuery {
    /// 보정된 (페이지 번호, 페이지 크기).
    pub fn resolve(&self) -> (i64, i64) {
        let page = self.page.unwrap_or(0).clamp(0, MAX_PAGE);
        let size = self
            .size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        (page, size)
    }
}

/// 후기 페이지 응답
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPage {
    /// 현재 페이지의 후기
    pub content: Vec<ReviewView>,
    /// 페이지 번호 (0부터)
    pub number: i64,
    /// 페이지 크기
    pub size: i64,
    /// 전체 후기 수
    pub total_elements: i64,
    /// 전체 페이지 수
    pub total_pages: i64,
    pub first: bool,
    pub last: bool,
    /// 현재 페이지의 후기 수
    pub number_of_elements: usize,
    pub empty: bool,
}

impl ReviewPage {
    pub fn new(content: Vec<ReviewView>, page: i64, size: i64, total_elements: i64) -> Self {
        let total_pages = if total_elements == 0 {
            0
        } else {
            (total_elements - 1) / size + 1
        };

        Self {
            number_of_elements: content.len(),
            empty: content.is_empty(),
            content,
            number: page,
            size,
            total_elements,
            total_pages,
            first: page == 0,
            last: page >= total_pages.saturating_sub(1),
        }
    }
}

/// 후기 작성 요청
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    /// 회사명
    #[validate(
        custom(function = "not_blank"),
        length(max = 255, message = "회사명은 255자 이하여야 합니다")
    )]
    pub company: String,
    /// 보유 자격증
    #[serde(default)]
    pub certificates: Vec<String>,
    /// 나이
    #[validate(range(min = 0, message = "나이는 0 이상이어야 합니다"))]
    pub age: i32,
    /// 구직 기간 (예: "3 months")
    #[validate(length(max = 100, message = "구직 기간은 100자 이하여야 합니다"))]
    pub seek_period: String,
    /// 조언
    pub tip: String,
}

/// 후기 수정 요청 (회사명은 변경 불가)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewRequest {
    #[serde(default)]
    pub certificates: Vec<String>,
    #[validate(range(min = 0, message = "나이는 0 이상이어야 합니다"))]
    pub age: i32,
    #[validate(length(max = 100, message = "구직 기간은 100자 이하여야 합니다"))]
    pub seek_period: String,
    pub tip: String,
}

impl From<UpdateReviewRequest> for ReviewPatch {
    fn from(r: UpdateReviewRequest) -> Self {
        ReviewPatch {
            certificates: r.certificates,
            age: r.age,
            seek_period: r.seek_period,
            tip: r.tip,
        }
    }
}

// ================================================================================================
// Handlers
// ================================================================================================

/// GET /api/reviews - 후기 목록
#[utoipa::path(
    get,
    path = "/api/reviews",
    tag = "reviews",
    params(PageQuery),
    responses((status = 200, description = "후기 페이지 (최신순)", body = ReviewPage))
)]
pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<ReviewPage>> {
    let (page, size) = query.resolve();
    debug!(page, size, "후기 목록 조회");

    let reviews = state
        .reviews
        .page(page.saturating_mul(size), size)
        .await
        .map_err(CampusError::from)?;
    let total = state.reviews.count().await.map_err(CampusError::from)?;

    let content = reviews.iter().map(|r| r.view()).collect();
    Ok(Json(ReviewPage::new(content, page, size, total)))
}

/// GET /api/reviews/{id} - 후기 상세
#[utoipa::path(
    get,
    path = "/api/reviews/{id}",
    tag = "reviews",
    params(("id" = i64, Path, description = "후기 ID")),
    responses(
        (status = 200, description = "후기", body = ReviewView),
        (status = 404, description = "후기 없음", body = ApiErrorResponse)
    )
)]
pub async fn get_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ReviewId>,
) -> ApiResult<Json<ReviewView>> {
    let review = state
        .reviews
        .find_by_id(id)
        .await
        .map_err(CampusError::from)?
        .ok_or_else(CampusError::review_not_found)?;

    Ok(Json(review.view()))
}

/// POST /api/reviews - 후기 작성
#[utoipa::path(
    post,
    path = "/api/reviews",
    tag = "reviews",
    security(("bearer_auth" = [])),
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "작성 완료 (Location 헤더 포함)", body = ReviewView),
        (status = 400, description = "입력값 오류", body = ApiErrorResponse),
        (status = 401, description = "인증 실패", body = ApiErrorResponse)
    )
)]
pub async fn create_review(
    State(state): State<Arc<AppState>>,
    CurrentMember(caller): CurrentMember,
    ValidatedJson(request): ValidatedJson<CreateReviewRequest>,
) -> ApiResult<(StatusCode, HeaderMap, Json<ReviewView>)> {
    let result = state
        .reviews
        .insert(NewReview {
            member_id: caller.id,
            company: request.company,
            certificates: request.certificates,
            age: request.age,
            seek_period: request.seek_period,
            tip: request.tip,
        })
        .await
        .map_err(|e| match e {
            // 토큰 확인 직후 작성자가 탈퇴한 경우
            StoreError::MissingReference(_) => CampusError::AuthenticationFailed,
            other => CampusError::Store(other),
        });
    record_review_mutation("create", result.is_ok());
    let review = result?;

    info!(review_id = review.id, member_id = caller.id, "Review created");

    let mut headers = HeaderMap::new();
    let location = HeaderValue::from_str(&format!("/api/reviews/{}", review.id))
        .map_err(|e| CampusError::InvalidInput(e.to_string()))?;
    headers.insert(LOCATION, location);

    Ok((StatusCode::CREATED, headers, Json(review.view())))
}

/// PUT /api/reviews/{id} - 후기 수정
#[utoipa::path(
    put,
    path = "/api/reviews/{id}",
    tag = "reviews",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "후기 ID")),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "수정된 후기", body = ReviewView),
        (status = 401, description = "인증 실패", body = ApiErrorResponse),
        (status = 403, description = "작성자 아님", body = ApiErrorResponse),
        (status = 404, description = "후기 없음", body = ApiErrorResponse)
    )
)]
pub async fn update_review(
    State(state): State<Arc<AppState>>,
    CurrentMember(caller): CurrentMember,
    Path(id): Path<ReviewId>,
    ValidatedJson(request): ValidatedJson<UpdateReviewRequest>,
) -> ApiResult<Json<ReviewView>> {
    let result = state.guard.update_review(&caller, id, request.into()).await;
    record_review_mutation("update", result.is_ok());

    Ok(Json(result?.view()))
}

/// DELETE /api/reviews/{id} - 후기 삭제
#[utoipa::path(
    delete,
    path = "/api/reviews/{id}",
    tag = "reviews",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "후기 ID")),
    responses(
        (status = 204, description = "삭제 완료"),
        (status = 401, description = "인증 실패", body = ApiErrorResponse),
        (status = 403, description = "작성자 아님", body = ApiErrorResponse),
        (status = 404, description = "후기 없음", body = ApiErrorResponse)
    )
)]
pub async fn delete_review(
    State(state): State<Arc<AppState>>,
    CurrentMember(caller): CurrentMember,
    Path(id): Path<ReviewId>,
) -> ApiResult<StatusCode> {
    let result = state.guard.remove_review(&caller, id).await;
    record_review_mutation("delete", result.is_ok());
    result?;

    Ok(StatusCode::NO_CONTENT)
}

// ================================================================================================
// Router
// ================================================================================================

/// Review 라우터 생성
pub fn reviews_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_reviews).post(create_review))
        .route(
            "/{id}",
            get(get_review).put(update_review).delete(delete_review),
        )
}
