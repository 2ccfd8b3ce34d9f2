//! 회원 및 역할.
//!
//! 저장소 레코드(`Member`)와 외부로 노출되는 정제된 회원 정보(`MemberIdentity`)를
//! 구분합니다. 비밀번호 해시는 `Member`에만 존재합니다.

use serde::{Deserialize, Serialize};

/// 회원 ID (저장소가 발급).
pub type MemberId = i64;

/// 회원 역할.
///
/// 가입 시 항상 `User`로 생성되며 클라이언트 입력으로 설정되지 않습니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// 일반 회원
    #[default]
    User,
    /// 관리자
    Admin,
}

impl Role {
    /// 저장소/토큰에 기록되는 문자열 표현.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }

    /// 문자열에서 역할 파싱.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "USER" => Some(Role::User),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 저장소에 보관되는 회원 레코드.
///
/// 비밀번호 해시를 포함하므로 직렬화하지 않습니다.
/// 응답에는 항상 [`Member::identity`]를 사용합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
}

impl Member {
    /// 비밀번호 해시를 제외한 회원 정보.
    pub fn identity(&self) -> MemberIdentity {
        MemberIdentity {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }

    /// 표시 이름 변경.
    ///
    /// 공백뿐인 이름은 무시하고 기존 값을 유지합니다. 변경 여부를 반환합니다.
    pub fn rename(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || name == self.name {
            return false;
        }
        self.name = name.to_string();
        true
    }
}

/// 정제된 회원 정보.
///
/// 인증된 호출자 표현이자 회원 API의 응답 형식입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct MemberIdentity {
    pub id: MemberId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// 새 회원 입력.
///
/// 비밀번호는 이미 해싱된 상태여야 합니다.
#[derive(Debug, Clone)]
pub struct NewMember {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
}
