//! 자격증명 및 토큰 인증.

use std::sync::Arc;

use tracing::{debug, info};

use campusjob_core::{CampusError, CampusResult, MemberIdentity, MemberStore};

use super::jwt::{IssuedToken, JwtError, TokenService};
use super::password::{verify_password, PasswordError};

/// 인증기.
///
/// 이메일/비밀번호 검증과 요청마다의 토큰 검증(호출자 확인)을 담당합니다.
/// 어떤 실패도 원인을 구분하지 않고 `CampusError::AuthenticationFailed`로 보고합니다.
#[derive(Clone)]
pub struct Authenticator {
    members: Arc<dyn MemberStore>,
    tokens: Arc<TokenService>,
}

impl Authenticator {
    pub fn new(members: Arc<dyn MemberStore>, tokens: Arc<TokenService>) -> Self {
        Self { members, tokens }
    }

    /// 이메일과 비밀번호 검증.
    ///
    /// 회원이 없거나 비밀번호가 다르면 `Ok(None)`을 반환합니다.
    pub async fn validate_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> CampusResult<Option<MemberIdentity>> {
        let Some(member) = self.members.find_by_email(email).await? else {
            return Ok(None);
        };

        let matches = verify_password(password, &member.password_hash).map_err(|e| match e {
            PasswordError::InvalidHashFormat => {
                CampusError::InvalidInput(format!("회원 {}의 비밀번호 해시가 손상되었습니다", member.id))
            }
            other => CampusError::InvalidInput(other.to_string()),
        })?;

        Ok(matches.then(|| member.identity()))
    }

    /// 로그인 (토큰 발급).
    pub async fn login(&self, email: &str, password: &str) -> CampusResult<IssuedToken> {
        let Some(member) = self.validate_credentials(email, password).await? else {
            debug!("Login rejected");
            return Err(CampusError::AuthenticationFailed);
        };

        let token = self
            .tokens
            .issue(&member)
            .map_err(|e| CampusError::InvalidInput(e.to_string()))?;

        info!(member_id = member.id, "Member logged in");
        Ok(token)
    }

    /// Bearer 토큰으로 호출자 확인.
    ///
    /// 토큰 검증 후 클레임의 이메일로 회원을 다시 조회하므로,
    /// 토큰 발급 이후 삭제된 회원은 인증에 실패합니다.
    pub async fn resolve_caller(&self, token: &str) -> CampusResult<MemberIdentity> {
        let claims = self.tokens.verify(token).map_err(|e| match e {
            JwtError::TokenInvalid | JwtError::Encoding(_) => CampusError::AuthenticationFailed,
        })?;

        let member = self
            .members
            .find_by_email(&claims.email)
            .await?
            .ok_or(CampusError::AuthenticationFailed)?;

        Ok(member.identity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::hash_password;
    use crate::repository::InMemoryStore;
    use campusjob_core::{AuthConfig, NewMember, Role};

    const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

    async fn setup() -> (Arc<InMemoryStore>, Authenticator, Arc<TokenService>) {
        let store = Arc::new(InMemoryStore::new());
        store
            .insert(NewMember {
                email: "alice@x.com".to_string(),
                name: "Alice".to_string(),
                password_hash: hash_password("wonderland").unwrap(),
                role: Role::User,
            })
            .await
            .unwrap();

        let tokens = Arc::new(TokenService::new(&AuthConfig::new(TEST_SECRET, 60)));
        let auth = Authenticator::new(store.clone(), tokens.clone());
        (store, auth, tokens)
    }

    #[tokio::test]
    async fn test_validate_credentials() {
        let (_, auth, _) = setup().await;

        let identity = auth
            .validate_credentials("alice@x.com", "wonderland")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(identity.email, "alice@x.com");
        assert_eq!(identity.name, "Alice");
        assert_eq!(identity.role, Role::User);

        assert!(auth
            .validate_credentials("alice@x.com", "looking-glass")
            .await
            .unwrap()
            .is_none());
        assert!(auth
            .validate_credentials("nobody@x.com", "wonderland")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_email_lookup_is_case_sensitive() {
        let (_, auth, _) = setup().await;

        assert!(auth
            .validate_credentials("Alice@x.com", "wonderland")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_login_token_resolves_to_member() {
        let (_, auth, tokens) = setup().await;

        let issued = auth.login("alice@x.com", "wonderland").await.unwrap();
        let claims = tokens.verify(&issued.access_token).unwrap();
        assert_eq!(claims.email, "alice@x.com");

        let caller = auth.resolve_caller(&issued.access_token).await.unwrap();
        assert_eq!(caller.id, claims.sub);
        assert_eq!(caller.email, "alice@x.com");
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (_, auth, _) = setup().await;

        let wrong_password = auth.login("alice@x.com", "nope").await.unwrap_err();
        let unknown_email = auth.login("ghost@x.com", "wonderland").await.unwrap_err();

        assert!(matches!(wrong_password, CampusError::AuthenticationFailed));
        assert!(matches!(unknown_email, CampusError::AuthenticationFailed));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_resolve_caller_rejects_deleted_member() {
        let (store, auth, _) = setup().await;
        let issued = auth.login("alice@x.com", "wonderland").await.unwrap();
        let caller = auth.resolve_caller(&issued.access_token).await.unwrap();

        store.delete(caller.id).await.unwrap();

        let result = auth.resolve_caller(&issued.access_token).await;
        assert!(matches!(result, Err(CampusError::AuthenticationFailed)));
    }

    #[tokio::test]
    async fn test_resolve_caller_rejects_garbage() {
        let (_, auth, _) = setup().await;

        let result = auth.resolve_caller("not-a-jwt").await;
        assert!(matches!(result, Err(CampusError::AuthenticationFailed)));
    }

    #[tokio::test]
    async fn test_corrupted_hash_is_invalid_input() {
        let store = Arc::new(InMemoryStore::new());
        store
            .insert(NewMember {
                email: "broken@x.com".to_string(),
                name: "Broken".to_string(),
                password_hash: "plaintext".to_string(),
                role: Role::User,
            })
            .await
            .unwrap();
        let tokens = Arc::new(TokenService::new(&AuthConfig::new(TEST_SECRET, 60)));
        let auth = Authenticator::new(store, tokens);

        let result = auth.validate_credentials("broken@x.com", "plaintext").await;
        assert!(matches!(result, Err(CampusError::InvalidInput(_))));
    }
}
