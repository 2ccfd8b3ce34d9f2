//! 취업 후기.

use serde::{Deserialize, Serialize};

use super::MemberId;

/// 후기 ID (저장소가 발급).
pub type ReviewId = i64;

/// 취업 후기 레코드.
///
/// `member_id`는 작성자를 가리키는 약한 참조이며 조회 시 회원 저장소에서 해석합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: ReviewId,
    pub member_id: MemberId,
    pub company: String,
    pub certificates: Vec<String>,
    pub age: i32,
    pub seek_period: String,
    pub tip: String,
}

impl Review {
    /// 수정 가능한 필드에 변경 내용 적용.
    ///
    /// 회사명과 작성자는 변경되지 않습니다.
    pub fn apply(&mut self, patch: ReviewPatch) {
        self.certificates = patch.certificates;
        self.age = patch.age;
        self.seek_period = patch.seek_period;
        self.tip = patch.tip;
    }

    /// 작성자 정보를 제외한 응답 형식.
    pub fn view(&self) -> ReviewView {
        ReviewView {
            id: self.id,
            company: self.company.clone(),
            certificates: self.certificates.clone(),
            age: self.age,
            seek_period: self.seek_period.clone(),
            tip: self.tip.clone(),
        }
    }
}

/// 새 후기 입력.
///
/// `member_id`는 항상 인증된 호출자로 채워집니다.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub member_id: MemberId,
    pub company: String,
    pub certificates: Vec<String>,
    pub age: i32,
    pub seek_period: String,
    pub tip: String,
}

/// 후기 수정 내용.
#[derive(Debug, Clone)]
pub struct ReviewPatch {
    pub certificates: Vec<String>,
    pub age: i32,
    pub seek_period: String,
    pub tip: String,
}

/// 후기 응답 형식.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    pub id: ReviewId,
    pub company: String,
    pub certificates: Vec<String>,
    pub age: i32,
    pub seek_period: String,
    pub tip: String,
}
