//! 회원/후기 저장소 추상화.
//!
//! 인증 및 권한 코어는 이 trait들을 통해서만 레코드를 조회/저장합니다.
//! PostgreSQL 구현과 인메모리 구현은 API 크레이트에 있습니다.

use async_trait::async_trait;
use thiserror::Error;

use super::{Member, MemberId, NewMember, NewReview, Review, ReviewId};

// =============================================================================
// 에러 타입
// =============================================================================

/// 저장소 에러.
#[derive(Debug, Error)]
pub enum StoreError {
    /// 유니크 제약 위반 (제약 이름 또는 컬럼)
    #[error("유니크 제약 위반: {0}")]
    UniqueViolation(String),

    /// 참조 대상이 존재하지 않음
    #[error("참조 대상 없음: {0}")]
    MissingReference(String),

    /// 백엔드 에러 (연결 실패, 쿼리 실패 등)
    #[error("저장소 백엔드 에러: {0}")]
    Backend(String),
}

// =============================================================================
// MemberStore Trait
// =============================================================================

/// 회원 저장소.
///
/// 이메일 유니크 제약은 저장소 수준에서 보장해야 합니다.
/// 가입 전 중복 검사는 최적화일 뿐 최종 권한은 `insert`의 제약 검사에 있습니다.
#[async_trait]
pub trait MemberStore: Send + Sync {
    /// ID로 회원 조회.
    async fn find_by_id(&self, id: MemberId) -> Result<Option<Member>, StoreError>;

    /// 이메일로 회원 조회 (대소문자 구분, 정확히 일치).
    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, StoreError>;

    /// 회원 저장.
    ///
    /// # Errors
    ///
    /// - `StoreError::UniqueViolation`: 이미 같은 이메일이 존재
    async fn insert(&self, member: NewMember) -> Result<Member, StoreError>;

    /// 회원 정보 갱신. 대상이 없으면 `false`.
    async fn update(&self, member: &Member) -> Result<bool, StoreError>;

    /// 회원 삭제. 작성한 후기도 함께 삭제됩니다. 대상이 없으면 `false`.
    async fn delete(&self, id: MemberId) -> Result<bool, StoreError>;
}

// =============================================================================
// ReviewStore Trait
// =============================================================================

/// 후기 저장소.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// ID로 후기 조회.
    async fn find_by_id(&self, id: ReviewId) -> Result<Option<Review>, StoreError>;

    /// 후기 저장.
    ///
    /// # Errors
    ///
    /// - `StoreError::MissingReference`: 작성자 회원이 존재하지 않음
    async fn insert(&self, review: NewReview) -> Result<Review, StoreError>;

    /// 후기 갱신. 대상이 없으면 `false`.
    async fn update(&self, review: &Review) -> Result<bool, StoreError>;

    /// 후기 삭제. 대상이 없으면 `false`.
    async fn delete(&self, id: ReviewId) -> Result<bool, StoreError>;

    /// 최신 순(ID 내림차순) 페이지 조회.
    async fn page(&self, offset: i64, limit: i64) -> Result<Vec<Review>, StoreError>;

    /// 전체 후기 수.
    async fn count(&self) -> Result<i64, StoreError>;
}
