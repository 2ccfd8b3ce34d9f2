//! 취업 후기 서비스의 도메인 모델.

mod member;
mod review;
mod store;

pub use member::*;
pub use review::*;
pub use store::*;
