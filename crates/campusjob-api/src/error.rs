//! 통합 API 에러 응답 타입.
//!
//! 모든 API 엔드포인트에서 일관된 에러 형식을 제공합니다.
//! 도메인 에러([`CampusError`])는 [`ApiError`]를 거쳐 HTTP 상태 코드와
//! [`ApiErrorResponse`] 본문으로 변환됩니다.
//!
//! | 도메인 에러 | 상태 | 코드 |
//! |-------------|------|------|
//! | `Validation` | 400 | `VALIDATION_ERROR` |
//! | `AuthenticationFailed` | 401 | `AUTHENTICATION_FAILED` |
//! | `Forbidden` | 403 | `FORBIDDEN` |
//! | `NotFound` | 404 | `NOT_FOUND` |
//! | `DuplicateEmail` | 409 | `DUPLICATE_EMAIL` |
//! | `InvalidInput` | 500 | `INTERNAL_ERROR` |
//! | `Store` | 500 | `DB_ERROR` |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;
use utoipa::ToSchema;

use campusjob_core::CampusError;

/// 통합 API 에러 응답.
///
/// # 예시
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "후기를 찾을 수 없습니다.",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "VALIDATION_ERROR", "NOT_FOUND", "FORBIDDEN")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (검증 실패 시 필드별 에러 목록)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp, 선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::new(code, message)
        }
    }

    /// 에러 코드 반환.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// 에러 메시지 반환.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

// ==================== ApiError ====================

/// HTTP 상태 코드와 응답 본문을 묶은 핸들러 에러.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ApiErrorResponse::new(code, message),
        }
    }
}

impl From<CampusError> for ApiError {
    fn from(err: CampusError) -> Self {
        let message = err.to_string();

        match err {
            CampusError::Validation(fields) => {
                let details = serde_json::to_value(&fields).unwrap_or(Value::Null);
                Self {
                    status: StatusCode::BAD_REQUEST,
                    body: ApiErrorResponse::with_details("VALIDATION_ERROR", message, details),
                }
            }
            CampusError::AuthenticationFailed => {
                Self::new(StatusCode::UNAUTHORIZED, "AUTHENTICATION_FAILED", message)
            }
            CampusError::Forbidden => Self::new(StatusCode::FORBIDDEN, "FORBIDDEN", message),
            CampusError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message),
            CampusError::DuplicateEmail => {
                Self::new(StatusCode::CONFLICT, "DUPLICATE_EMAIL", message)
            }
            CampusError::InvalidInput(detail) => {
                error!(error = %detail, "Internal invariant violated");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "요청을 처리할 수 없습니다.",
                )
            }
            CampusError::Store(store_err) => {
                error!(error = %store_err, "Store operation failed");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DB_ERROR",
                    "저장소 오류가 발생했습니다.",
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

// ==================== Result Type Alias ====================

/// API 핸들러 Result 타입 별칭.
///
/// # Example
///
/// ```ignore
/// async fn get_review(
///     Path(id): Path<i64>,
///     State(state): State<Arc<AppState>>,
/// ) -> ApiResult<Json<ReviewView>> {
///     let review = state.reviews
///         .find_by_id(id)
///         .await
///         .map_err(CampusError::from)?
///         .ok_or_else(CampusError::review_not_found)?;
///
///     Ok(Json(review.view()))
/// }
/// ```
pub type ApiResult<T> = Result<T, ApiError>;
