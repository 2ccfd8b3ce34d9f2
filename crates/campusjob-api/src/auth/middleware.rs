//! Axum용 인증 추출기.
//!
//! `Authorization: Bearer <token>` 헤더를 검증하고 호출자를 확인합니다.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use campusjob_core::{CampusError, MemberIdentity};

use crate::error::ApiError;
use crate::state::AppState;

/// 인증된 호출자 추출기.
///
/// 헤더가 없거나, Bearer 형식이 아니거나, 토큰이 유효하지 않거나,
/// 토큰의 회원이 더 이상 존재하지 않으면 모두 401 `AUTHENTICATION_FAILED`입니다.
///
/// # 사용 예시
///
/// ```rust,ignore
/// async fn me(CurrentMember(caller): CurrentMember) -> Json<MemberIdentity> {
///     Json(caller)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentMember(pub MemberIdentity);

/// 헤더 값에서 Bearer 토큰 추출.
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<Arc<AppState>> for CurrentMember {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(bearer_token)
            .ok_or(CampusError::AuthenticationFailed)?;

        let caller = state.authenticator.resolve_caller(token).await?;
        Ok(CurrentMember(caller))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::create_test_state;
    use axum::http::{Request, StatusCode};

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("abc.def.ghi"), None);
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let state = Arc::new(create_test_state());
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();

        let rejection = CurrentMember::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert_eq!(rejection.status, StatusCode::UNAUTHORIZED);
        assert_eq!(rejection.body.code, "AUTHENTICATION_FAILED");
    }

    #[tokio::test]
    async fn test_valid_token_resolves_member() {
        let state = Arc::new(create_test_state());
        let member = state
            .registration
            .register("alice@x.com", "Alice", "1234")
            .await
            .unwrap();
        let token = state.tokens.issue(&member).unwrap().access_token;

        let (mut parts, _) = Request::builder()
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(())
            .unwrap()
            .into_parts();

        let CurrentMember(caller) = CurrentMember::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(caller, member);
    }
}
