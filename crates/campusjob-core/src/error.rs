//! 서비스 에러 타입.
//!
//! 인증/권한 코어와 회원/후기 연산 전반에서 사용되는 에러 분류를 정의합니다.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::StoreError;

/// 필드 단위 검증 에러.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct FieldError {
    /// 필드 이름 (요청 JSON 기준)
    pub field: String,
    /// 사람이 읽을 수 있는 메시지
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// 서비스 에러.
#[derive(Debug, Error)]
pub enum CampusError {
    /// 입력값 검증 실패 (저장소 접근 전 거부)
    #[error("입력값이 올바르지 않습니다")]
    Validation(Vec<FieldError>),

    /// 이메일 중복
    #[error("이미 존재하는 이메일입니다.")]
    DuplicateEmail,

    /// 인증 실패.
    ///
    /// 잘못된 자격증명, 만료/위조 토큰, 존재하지 않는 회원을 구분하지 않습니다.
    #[error("인증에 실패했습니다.")]
    AuthenticationFailed,

    /// 대상 없음
    #[error("{0}")]
    NotFound(String),

    /// 권한 없음
    #[error("권한이 없습니다.")]
    Forbidden,

    /// 잘못된 내부 입력 (손상된 해시 등)
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 저장소 에러
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// 서비스 연산 Result 타입.
pub type CampusResult<T> = Result<T, CampusError>;

impl CampusError {
    /// 회원 없음.
    pub fn member_not_found() -> Self {
        CampusError::NotFound("사용자를 찾을 수 없습니다.".to_string())
    }

    /// 후기 없음.
    pub fn review_not_found() -> Self {
        CampusError::NotFound("후기를 찾을 수 없습니다.".to_string())
    }

    /// 단일 필드 검증 에러.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        CampusError::Validation(vec![FieldError::new(field, message)])
    }

    /// 클라이언트 요청 문제인지 확인합니다.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, CampusError::InvalidInput(_) | CampusError::Store(_))
    }
}
