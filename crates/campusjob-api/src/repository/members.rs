//! Member Repository
//!
//! 회원 관련 데이터베이스 연산을 담당합니다.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use campusjob_core::{Member, MemberId, MemberStore, NewMember, Role, StoreError};

// ================================================================================================
// Types
// ================================================================================================

/// 회원 레코드
#[derive(Debug, Clone, FromRow)]
struct MemberRecord {
    id: i64,
    email: String,
    name: String,
    password_hash: String,
    role: String,
}

impl MemberRecord {
    fn into_member(self) -> Result<Member, StoreError> {
        let role = Role::parse(&self.role).ok_or_else(|| {
            StoreError::Backend(format!("member {} has unknown role '{}'", self.id, self.role))
        })?;

        Ok(Member {
            id: self.id,
            email: self.email,
            name: self.name,
            password_hash: self.password_hash,
            role,
        })
    }
}

/// sqlx 에러를 저장소 에러로 변환.
pub(crate) fn map_db_error(e: sqlx::Error) -> StoreError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return StoreError::UniqueViolation(
                db_err.constraint().unwrap_or("unique").to_string(),
            );
        }
        if db_err.is_foreign_key_violation() {
            return StoreError::MissingReference(
                db_err.constraint().unwrap_or("foreign key").to_string(),
            );
        }
    }
    StoreError::Backend(e.to_string())
}

// ================================================================================================
// Repository
// ================================================================================================

/// PostgreSQL 회원 저장소
#[derive(Clone)]
pub struct PgMemberStore {
    pool: PgPool,
}

impl PgMemberStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberStore for PgMemberStore {
    async fn find_by_id(&self, id: MemberId) -> Result<Option<Member>, StoreError> {
        sqlx::query_as::<_, MemberRecord>(
            r#"
            SELECT id, email, name, password_hash, role
            FROM member
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .map(MemberRecord::into_member)
        .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Member>, StoreError> {
        sqlx::query_as::<_, MemberRecord>(
            r#"
            SELECT id, email, name, password_hash, role
            FROM member
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .map(MemberRecord::into_member)
        .transpose()
    }

    async fn insert(&self, member: NewMember) -> Result<Member, StoreError> {
        let record = sqlx::query_as::<_, MemberRecord>(
            r#"
            INSERT INTO member (email, name, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, name, password_hash, role
            "#,
        )
        .bind(&member.email)
        .bind(&member.name)
        .bind(&member.password_hash)
        .bind(member.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        record.into_member()
    }

    async fn update(&self, member: &Member) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE member
            SET email = $2, name = $3, password_hash = $4, role = $5
            WHERE id = $1
            "#,
        )
        .bind(member.id)
        .bind(&member.email)
        .bind(&member.name)
        .bind(&member.password_hash)
        .bind(member.role.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    /// 후기는 `ON DELETE CASCADE`로 함께 삭제됩니다.
    async fn delete(&self, id: MemberId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM member WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(role: &str) -> MemberRecord {
        MemberRecord {
            id: 7,
            email: "alice@x.com".to_string(),
            name: "Alice".to_string(),
            password_hash: "$argon2id$unused".to_string(),
            role: role.to_string(),
        }
    }

    #[test]
    fn test_record_into_member() {
        let member = record("ADMIN").into_member().unwrap();
        assert_eq!(member.id, 7);
        assert_eq!(member.role, Role::Admin);
    }

    #[test]
    fn test_unknown_role_is_backend_error() {
        let result = record("SUPERUSER").into_member();
        assert!(matches!(result, Err(StoreError::Backend(_))));
    }

    #[test]
    fn test_non_database_error_maps_to_backend() {
        let mapped = map_db_error(sqlx::Error::RowNotFound);
        assert!(matches!(mapped, StoreError::Backend(_)));
    }
}
