//! 리소스 소유권 검사.
//!
//! 변경 연산(삭제/수정) 전에 호출자가 대상의 소유자인지 확인합니다.
//! 역할(`Admin` 포함)에 따른 예외는 없습니다.

use std::sync::Arc;

use tracing::{info, warn};

use campusjob_core::{
    CampusError, CampusResult, MemberId, MemberIdentity, MemberStore, Review, ReviewId,
    ReviewPatch, ReviewStore,
};

/// 권한 가드.
#[derive(Clone)]
pub struct AuthorizationGuard {
    members: Arc<dyn MemberStore>,
    reviews: Arc<dyn ReviewStore>,
}

impl AuthorizationGuard {
    pub fn new(members: Arc<dyn MemberStore>, reviews: Arc<dyn ReviewStore>) -> Self {
        Self { members, reviews }
    }

    /// 후기 삭제.
    ///
    /// # Errors
    ///
    /// - `NotFound`: 후기가 없음 (호출자와 무관)
    /// - `Forbidden`: 작성자 이메일이 호출자 이메일과 다름
    pub async fn remove_review(
        &self,
        caller: &MemberIdentity,
        review_id: ReviewId,
    ) -> CampusResult<()> {
        let review = self.load_owned_review(caller, review_id).await?;

        if !self.reviews.delete(review.id).await? {
            // 검사와 삭제 사이에 다른 요청이 먼저 삭제한 경우
            return Err(CampusError::review_not_found());
        }

        info!(review_id, member_id = caller.id, "Review deleted");
        Ok(())
    }

    /// 후기 수정 (자격증, 나이, 구직 기간, 팁).
    pub async fn update_review(
        &self,
        caller: &MemberIdentity,
        review_id: ReviewId,
        patch: ReviewPatch,
    ) -> CampusResult<Review> {
        let mut review = self.load_owned_review(caller, review_id).await?;
        review.apply(patch);

        if !self.reviews.update(&review).await? {
            return Err(CampusError::review_not_found());
        }

        info!(review_id, member_id = caller.id, "Review updated");
        Ok(review)
    }

    /// 회원 표시 이름 수정.
    ///
    /// 본인만 수정할 수 있습니다. 이름이 없거나 공백뿐이면 아무것도 바꾸지 않고
    /// 현재 정보를 반환합니다.
    pub async fn update_member(
        &self,
        caller: &MemberIdentity,
        member_id: MemberId,
        name: Option<&str>,
    ) -> CampusResult<MemberIdentity> {
        let mut member = self
            .members
            .find_by_id(member_id)
            .await?
            .ok_or_else(CampusError::member_not_found)?;

        Self::ensure_self(caller, member_id)?;

        let changed = name.map(|n| member.rename(n)).unwrap_or(false);
        if changed {
            if !self.members.update(&member).await? {
                return Err(CampusError::member_not_found());
            }
            info!(member_id, "Member renamed");
        }

        Ok(member.identity())
    }

    /// 회원 탈퇴. 본인만 가능하며 작성한 후기도 함께 삭제됩니다.
    pub async fn remove_member(
        &self,
        caller: &MemberIdentity,
        member_id: MemberId,
    ) -> CampusResult<()> {
        if self.members.find_by_id(member_id).await?.is_none() {
            return Err(CampusError::member_not_found());
        }

        Self::ensure_self(caller, member_id)?;

        if !self.members.delete(member_id).await? {
            return Err(CampusError::member_not_found());
        }

        info!(member_id, "Member deleted");
        Ok(())
    }

    async fn load_owned_review(
        &self,
        caller: &MemberIdentity,
        review_id: ReviewId,
    ) -> CampusResult<Review> {
        let review = self
            .reviews
            .find_by_id(review_id)
            .await?
            .ok_or_else(CampusError::review_not_found)?;

        let owner_email = self
            .members
            .find_by_id(review.member_id)
            .await?
            .map(|owner| owner.email);

        if owner_email.as_deref() != Some(caller.email.as_str()) {
            warn!(review_id, member_id = caller.id, "Review ownership check failed");
            return Err(CampusError::Forbidden);
        }

        Ok(review)
    }

    fn ensure_self(caller: &MemberIdentity, member_id: MemberId) -> CampusResult<()> {
        if caller.id != member_id {
            warn!(member_id, caller_id = caller.id, "Member ownership check failed");
            return Err(CampusError::Forbidden);
        }
        Ok(())
    }
}
