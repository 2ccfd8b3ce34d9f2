//! Review Repository
//!
//! 취업 후기 관련 데이터베이스 연산을 담당합니다.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use campusjob_core::{NewReview, Review, ReviewId, ReviewStore, StoreError};

use super::members::map_db_error;

/// 후기 레코드
#[derive(Debug, Clone, FromRow)]
struct ReviewRecord {
    id: i64,
    member_id: i64,
    company: String,
    certificates: Vec<String>,
    age: i32,
    seek_period: String,
    tip: String,
}

impl From<ReviewRecord> for Review {
    fn from(r: ReviewRecord) -> Self {
        Review {
            id: r.id,
            member_id: r.member_id,
            company: r.company,
            certificates: r.certificates,
            age: r.age,
            seek_period: r.seek_period,
            tip: r.tip,
        }
    }
}

/// PostgreSQL 후기 저장소
#[derive(Clone)]
pub struct PgReviewStore {
    pool: PgPool,
}

impl PgReviewStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewStore for PgReviewStore {
    async fn find_by_id(&self, id: ReviewId) -> Result<Option<Review>, StoreError> {
        let record = sqlx::query_as::<_, ReviewRecord>(
            r#"
            SELECT id, member_id, company, certificates, age, seek_period, tip
            FROM review
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(record.map(Review::from))
    }

    async fn insert(&self, review: NewReview) -> Result<Review, StoreError> {
        let record = sqlx::query_as::<_, ReviewRecord>(
            r#"
            INSERT INTO review (member_id, company, certificates, age, seek_period, tip)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, member_id, company, certificates, age, seek_period, tip
            "#,
        )
        .bind(review.member_id)
        .bind(&review.company)
        .bind(&review.certificates)
        .bind(review.age)
        .bind(&review.seek_period)
        .bind(&review.tip)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(record.into())
    }

    async fn update(&self, review: &Review) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE review
            SET company = $2, certificates = $3, age = $4, seek_period = $5, tip = $6
            WHERE id = $1
            "#,
        )
        .bind(review.id)
        .bind(&review.company)
        .bind(&review.certificates)
        .bind(review.age)
        .bind(&review.seek_period)
        .bind(&review.tip)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: ReviewId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM review WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn page(&self, offset: i64, limit: i64) -> Result<Vec<Review>, StoreError> {
        let records = sqlx::query_as::<_, ReviewRecord>(
            r#"
            SELECT id, member_id, company, certificates, age, seek_period, tip
            FROM review
            ORDER BY id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(records.into_iter().map(Review::from).collect())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM review")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(count)
    }
}
