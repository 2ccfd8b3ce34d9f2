//! 메모리 저장소.
//!
//! `DATABASE_URL`이 없을 때와 테스트에서 사용합니다. 관계형 저장소와 같은
//! 제약(이메일 유니크, 작성자 참조, 회원 삭제 시 후기 연쇄 삭제)을 지킵니다.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use campusjob_core::{
    Member, MemberId, MemberStore, NewMember, NewReview, Review, ReviewId, ReviewStore,
    StoreError,
};

#[derive(Default)]
struct Tables {
    members: BTreeMap<MemberId, Member>,
    reviews: BTreeMap<ReviewId, Review>,
    last_member_id: MemberId,
    last_review_id: ReviewId,
}

/// 회원과 후기를 함께 보관하는 메모리 저장소.
///
/// 두 테이블을 하나의 잠금으로 묶어 연쇄 삭제가 원자적으로 일어납니다.
/// ID는 1부터 단조 증가하며 재사용되지 않습니다.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 저장된 회원 수.
    pub async fn member_count(&self) -> usize {
        self.tables.read().await.members.len()
    }

    /// 저장된 후기 수.
    pub async fn review_count(&self) -> usize {
        self.tables.read().await.reviews.len()
    }
}

#[async_trait]
impl MemberStore for InMemoryStore {
    async fn find_by_id(&self, id: MemberId) -> Result<Option<Member>, StoreError> {
        Ok(self.tables.read().await.members.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.members.values().find(|m| m.email == email).cloned())
    }

    async fn insert(&self, member: NewMember) -> Result<Member, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.members.values().any(|m| m.email == member.email) {
            return Err(StoreError::UniqueViolation("member.email".to_string()));
        }

        tables.last_member_id += 1;
        let stored = Member {
            id: tables.last_member_id,
            email: member.email,
            name: member.name,
            password_hash: member.password_hash,
            role: member.role,
        };
        tables.members.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, member: &Member) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;

        if tables
            .members
            .values()
            .any(|m| m.id != member.id && m.email == member.email)
        {
            return Err(StoreError::UniqueViolation("member.email".to_string()));
        }

        match tables.members.get_mut(&member.id) {
            Some(slot) => {
                *slot = member.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: MemberId) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.members.remove(&id).is_none() {
            return Ok(false);
        }
        tables.reviews.retain(|_, review| review.member_id != id);
        Ok(true)
    }
}

#[async_trait]
impl ReviewStore for InMemoryStore {
    async fn find_by_id(&self, id: ReviewId) -> Result<Option<Review>, StoreError> {
        Ok(self.tables.read().await.reviews.get(&id).cloned())
    }

    async fn insert(&self, review: NewReview) -> Result<Review, StoreError> {
        let mut tables = self.tables.write().await;

        if !tables.members.contains_key(&review.member_id) {
            return Err(StoreError::MissingReference(format!(
                "review.member_id={}",
                review.member_id
            )));
        }

        tables.last_review_id += 1;
        let stored = Review {
            id: tables.last_review_id,
            member_id: review.member_id,
            company: review.company,
            certificates: review.certificates,
            age: review.age,
            seek_period: review.seek_period,
            tip: review.tip,
        };
        tables.reviews.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, review: &Review) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;

        match tables.reviews.get_mut(&review.id) {
            Some(slot) => {
                *slot = review.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: ReviewId) -> Result<bool, StoreError> {
        Ok(self.tables.write().await.reviews.remove(&id).is_some())
    }

    async fn page(&self, offset: i64, limit: i64) -> Result<Vec<Review>, StoreError> {
        let tables = self.tables.read().await;
        let offset = usize::try_from(offset.max(0)).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);

        Ok(tables
            .reviews
            .values()
            .rev()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.tables.read().await.reviews.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusjob_core::Role;

    fn new_member(email: &str) -> NewMember {
        NewMember {
            email: email.to_string(),
            name: "Tester".to_string(),
            password_hash: "$argon2id$unused".to_string(),
            role: Role::User,
        }
    }

    fn new_review(member_id: MemberId, company: &str) -> NewReview {
        NewReview {
            member_id,
            company: company.to_string(),
            certificates: vec![],
            age: 25,
            seek_period: "6 months".to_string(),
            tip: "network".to_string(),
        }
    }

    #[tokio::test]
    async fn test_ids_are_monotonic_and_not_reused() {
        let store = InMemoryStore::new();
        let a = MemberStore::insert(&store, new_member("a@x.com")).await.unwrap();
        let b = MemberStore::insert(&store, new_member("b@x.com")).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        MemberStore::delete(&store, b.id).await.unwrap();
        let c = MemberStore::insert(&store, new_member("c@x.com")).await.unwrap();
        assert_eq!(c.id, 3);
    }

    #[tokio::test]
    async fn test_unique_email() {
        let store = InMemoryStore::new();
        MemberStore::insert(&store, new_member("a@x.com")).await.unwrap();

        let dup = MemberStore::insert(&store, new_member("a@x.com")).await;
        assert!(matches!(dup, Err(StoreError::UniqueViolation(_))));
        assert_eq!(store.member_count().await, 1);
    }

    #[tokio::test]
    async fn test_review_requires_existing_member() {
        let store = InMemoryStore::new();

        let orphan = ReviewStore::insert(&store, new_review(42, "Acme")).await;
        assert!(matches!(orphan, Err(StoreError::MissingReference(_))));
        assert_eq!(store.review_count().await, 0);
    }

    #[tokio::test]
    async fn test_member_delete_cascades_to_reviews() {
        let store = InMemoryStore::new();
        let a = MemberStore::insert(&store, new_member("a@x.com")).await.unwrap();
        let b = MemberStore::insert(&store, new_member("b@x.com")).await.unwrap();
        ReviewStore::insert(&store, new_review(a.id, "Acme")).await.unwrap();
        ReviewStore::insert(&store, new_review(a.id, "Globex")).await.unwrap();
        let kept = ReviewStore::insert(&store, new_review(b.id, "Initech")).await.unwrap();

        assert!(MemberStore::delete(&store, a.id).await.unwrap());

        assert_eq!(ReviewStore::count(&store).await.unwrap(), 1);
        let remaining = ReviewStore::page(&store, 0, 10).await.unwrap();
        assert_eq!(remaining, vec![kept]);
    }

    #[tokio::test]
    async fn test_page_is_newest_first() {
        let store = InMemoryStore::new();
        let a = MemberStore::insert(&store, new_member("a@x.com")).await.unwrap();
        for company in ["A", "B", "C", "D", "E"] {
            ReviewStore::insert(&store, new_review(a.id, company)).await.unwrap();
        }

        let first: Vec<_> = ReviewStore::page(&store, 0, 2)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.company)
            .collect();
        assert_eq!(first, vec!["E", "D"]);

        let last = ReviewStore::page(&store, 4, 2).await.unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].company, "A");

        assert!(ReviewStore::page(&store, 10, 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_returns_false() {
        let store = InMemoryStore::new();
        let a = MemberStore::insert(&store, new_member("a@x.com")).await.unwrap();
        let mut review = ReviewStore::insert(&store, new_review(a.id, "Acme")).await.unwrap();

        ReviewStore::delete(&store, review.id).await.unwrap();
        review.tip = "changed".to_string();
        assert!(!ReviewStore::update(&store, &review).await.unwrap());
    }
}
