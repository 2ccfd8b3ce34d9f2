//! Repository pattern for database operations.
//!
//! 저장소 접근 로직을 라우트 핸들러에서 분리하여 관리합니다.
//! PostgreSQL 구현과 메모리 구현 모두 `campusjob_core`의 저장소 트레이트를 구현합니다.

pub mod members;
pub mod memory;
pub mod reviews;

pub use members::PgMemberStore;
pub use memory::InMemoryStore;
pub use reviews::PgReviewStore;
