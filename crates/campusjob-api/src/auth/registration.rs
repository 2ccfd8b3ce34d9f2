//! 회원 가입.

use std::sync::Arc;

use tracing::info;

use campusjob_core::{
    CampusError, CampusResult, MemberIdentity, MemberStore, NewMember, Role, StoreError,
};

use super::password::hash_password;

/// 가입 게이트.
///
/// 이메일 중복을 사전 검사한 뒤 해싱된 비밀번호로 회원을 생성합니다.
/// 동시 가입 경합은 저장소의 유니크 제약이 최종적으로 막으며, 그 위반도
/// `DuplicateEmail`로 보고합니다.
#[derive(Clone)]
pub struct RegistrationGate {
    members: Arc<dyn MemberStore>,
}

impl RegistrationGate {
    pub fn new(members: Arc<dyn MemberStore>) -> Self {
        Self { members }
    }

    /// 회원 가입.
    ///
    /// 입력 형식 검증은 호출 전에 끝나 있어야 합니다. 역할은 항상 `User`입니다.
    pub async fn register(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> CampusResult<MemberIdentity> {
        if self.members.find_by_email(email).await?.is_some() {
            return Err(CampusError::DuplicateEmail);
        }

        let password_hash =
            hash_password(password).map_err(|e| CampusError::InvalidInput(e.to_string()))?;

        let member = self
            .members
            .insert(NewMember {
                email: email.to_string(),
                name: name.to_string(),
                password_hash,
                role: Role::User,
            })
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(_) => CampusError::DuplicateEmail,
                other => CampusError::Store(other),
            })?;

        info!(member_id = member.id, "Member registered");
        Ok(member.identity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_password;
    use crate::repository::InMemoryStore;

    #[tokio::test]
    async fn test_register_hashes_password_and_forces_user_role() {
        let store = Arc::new(InMemoryStore::new());
        let gate = RegistrationGate::new(store.clone());

        let identity = gate.register("alice@x.com", "Alice", "1234").await.unwrap();
        assert_eq!(identity.email, "alice@x.com");
        assert_eq!(identity.name, "Alice");
        assert_eq!(identity.role, Role::User);

        let stored = store.find_by_email("alice@x.com").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "1234");
        assert!(verify_password("1234", &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = Arc::new(InMemoryStore::new());
        let gate = RegistrationGate::new(store.clone());

        gate.register("alice@x.com", "Alice", "1234").await.unwrap();
        let second = gate.register("alice@x.com", "Other Alice", "5678").await;

        assert!(matches!(second, Err(CampusError::DuplicateEmail)));
        assert_eq!(store.member_count().await, 1);

        let stored = store.find_by_email("alice@x.com").await.unwrap().unwrap();
        assert_eq!(stored.name, "Alice");
    }

    #[tokio::test]
    async fn test_emails_differing_in_case_are_distinct() {
        let store = Arc::new(InMemoryStore::new());
        let gate = RegistrationGate::new(store.clone());

        gate.register("alice@x.com", "Alice", "1234").await.unwrap();
        gate.register("Alice@x.com", "Alice 2", "1234").await.unwrap();

        assert_eq!(store.member_count().await, 2);
    }

    #[tokio::test]
    async fn test_concurrent_registration_leaves_one_member() {
        let store = Arc::new(InMemoryStore::new());
        let gate = RegistrationGate::new(store.clone());

        let (a, b) = tokio::join!(
            gate.register("race@x.com", "A", "1234"),
            gate.register("race@x.com", "B", "1234"),
        );

        assert!(a.is_ok() != b.is_ok());
        assert_eq!(store.member_count().await, 1);
    }
}
