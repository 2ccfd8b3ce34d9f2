//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 모든 API 핸들러에서 공유되는 상태를 관리합니다.
//! Arc로 래핑되어 여러 요청 간에 안전하게 공유됩니다.

use std::sync::Arc;

use campusjob_core::{AuthConfig, MemberStore, ReviewStore};

use crate::auth::{AuthorizationGuard, Authenticator, RegistrationGate, TokenService};

/// 애플리케이션 공유 상태.
///
/// 이 구조체는 모든 API 핸들러에서 접근할 수 있는 공유 리소스를 포함합니다.
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
#[derive(Clone)]
pub struct AppState {
    /// 회원 저장소
    pub members: Arc<dyn MemberStore>,

    /// 후기 저장소
    pub reviews: Arc<dyn ReviewStore>,

    /// 토큰 발급/검증 서비스
    pub tokens: Arc<TokenService>,

    /// 로그인 및 호출자 확인
    pub authenticator: Authenticator,

    /// 회원 가입
    pub registration: RegistrationGate,

    /// 소유권 검사 후 변경 연산 수행
    pub guard: AuthorizationGuard,

    /// 데이터베이스 연결 풀 (PostgreSQL). 없으면 메모리 저장소 사용 중.
    pub db_pool: Option<sqlx::PgPool>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    ///
    /// # 인자
    /// * `members` - 회원 저장소
    /// * `reviews` - 후기 저장소
    /// * `auth` - 토큰 서명 키 및 유효 시간
    pub fn new(
        members: Arc<dyn MemberStore>,
        reviews: Arc<dyn ReviewStore>,
        auth: &AuthConfig,
    ) -> Self {
        let tokens = Arc::new(TokenService::new(auth));

        Self {
            authenticator: Authenticator::new(members.clone(), tokens.clone()),
            registration: RegistrationGate::new(members.clone()),
            guard: AuthorizationGuard::new(members.clone(), reviews.clone()),
            members,
            reviews,
            tokens,
            db_pool: None,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 데이터베이스 연결 풀 설정 (헬스 체크용).
    pub fn with_db_pool(mut self, pool: sqlx::PgPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// 저장소 백엔드 이름.
    pub fn store_backend(&self) -> &'static str {
        if self.db_pool.is_some() {
            "postgres"
        } else {
            "memory"
        }
    }

    /// 서버 업타임(초) 반환.
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }

    /// 저장소 연결 상태 확인.
    ///
    /// 메모리 저장소는 항상 정상입니다.
    pub async fn is_store_healthy(&self) -> bool {
        match &self.db_pool {
            Some(pool) => sqlx::query("SELECT 1").fetch_one(pool).await.is_ok(),
            None => true,
        }
    }
}

/// 테스트용 AppState 생성 헬퍼.
///
/// 실제 DB 연결 없이 메모리 저장소로 상태를 생성합니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    use crate::repository::InMemoryStore;

    let store = Arc::new(InMemoryStore::new());
    let auth = AuthConfig::new("test-secret-key-for-jwt-testing-minimum-32-chars", 60);
    AppState::new(store.clone(), store, &auth)
}
