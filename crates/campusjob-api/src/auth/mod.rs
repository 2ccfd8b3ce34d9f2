//! 인증 및 권한 부여.
//!
//! JWT 기반 인증과 소유권 기반 접근 제어를 제공합니다.
//!
//! # 구성 요소
//!
//! - [`TokenService`]: Access Token 발급/검증
//! - [`Authenticator`]: 로그인 및 호출자 확인
//! - [`RegistrationGate`]: 회원 가입
//! - [`AuthorizationGuard`]: 소유권 검사 후 변경 연산
//! - [`CurrentMember`]: Axum 핸들러용 인증 추출기
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! async fn protected_handler(
//!     CurrentMember(caller): CurrentMember,
//! ) -> impl IntoResponse {
//!     format!("Hello, {}!", caller.name)
//! }
//! ```

mod guard;
mod jwt;
mod middleware;
mod password;
mod registration;
mod service;

pub use guard::AuthorizationGuard;
pub use jwt::{Claims, IssuedToken, JwtError, TokenService};
pub use middleware::{bearer_token, CurrentMember};
pub use password::{hash_password, verify_password, PasswordError};
pub use registration::RegistrationGate;
pub use service::Authenticator;
