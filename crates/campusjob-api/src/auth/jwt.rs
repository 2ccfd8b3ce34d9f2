//! JWT 토큰 처리.
//!
//! Access Token 발급/검증 로직. Refresh Token은 발급하지 않습니다.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use campusjob_core::{AuthConfig, MemberId, MemberIdentity, Role, MAX_TOKEN_TTL_MINUTES};

/// JWT Access Token 페이로드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - 회원 ID
    pub sub: MemberId,
    /// 회원 이메일
    pub email: String,
    /// 회원 역할
    pub role: Role,
    /// Issued At - 토큰 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// Expiration - 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// 회원 정보로 Claims 생성.
    ///
    /// 발급 시각은 초 단위로 내림하며, 유효 구간은 `[iat, iat + ttl)`입니다.
    /// 따라서 실제 발급 순간부터 재면 최대 1초 미만만큼 짧을 수 있습니다.
    ///
    /// # Arguments
    ///
    /// * `member` - 인증된 회원
    /// * `issued_at` - 발급 시각
    /// * `ttl` - 유효 시간
    pub fn new(member: &MemberIdentity, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        let issued_at = issued_at.trunc_subsecs(0);
        Self {
            sub: member.id,
            email: member.email.clone(),
            role: member.role,
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }

    /// 주어진 시각에 만료되었는지 확인 (`now >= exp`이면 만료).
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// 로그인 응답으로 전달되는 발급 토큰.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct IssuedToken {
    /// Access Token
    pub access_token: String,
    /// 토큰 타입 (항상 "Bearer")
    pub token_type: String,
    /// 만료까지 남은 시간 (초)
    pub expires_in: i64,
}

/// JWT 토큰 에러.
///
/// 검증 실패는 형식 오류, 서명 불일치, 만료를 구분하지 않고 모두 `TokenInvalid`입니다.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("토큰 인코딩 실패: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
    #[error("유효하지 않은 토큰")]
    TokenInvalid,
}

/// 토큰 발급/검증 서비스.
///
/// 시작 시 [`AuthConfig`]로 한 번 생성되고 이후 읽기 전용으로 공유됩니다.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    /// 인증 설정으로 서비스 생성.
    ///
    /// 유효 시간은 `1..=MAX_TOKEN_TTL_MINUTES`분으로 보정됩니다.
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        // 만료는 verify_at에서 leeway 없이 직접 검사
        validation.validate_exp = false;
        validation.required_spec_claims.insert("exp".to_string());

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl: Duration::minutes(config.token_ttl_minutes.clamp(1, MAX_TOKEN_TTL_MINUTES)),
        }
    }

    /// 토큰 유효 시간.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 현재 시각 기준 토큰 발급.
    pub fn issue(&self, member: &MemberIdentity) -> Result<IssuedToken, JwtError> {
        self.issue_at(member, Utc::now())
    }

    /// 지정한 시각 기준 토큰 발급.
    pub fn issue_at(
        &self,
        member: &MemberIdentity,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, JwtError> {
        let claims = Claims::new(member, now, self.ttl);
        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;

        Ok(IssuedToken {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.ttl.num_seconds(),
        })
    }

    /// 현재 시각 기준 토큰 검증.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        self.verify_at(token, Utc::now())
    }

    /// 지정한 시각 기준 토큰 검증.
    ///
    /// 형식, 서명, 만료를 순서대로 검사하며 어느 단계든 실패하면 `TokenInvalid`입니다.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, JwtError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| JwtError::TokenInvalid)?;

        if data.claims.is_expired_at(now) {
            return Err(JwtError::TokenInvalid);
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusjob_core::DEV_JWT_SECRET;

    const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

    fn service(secret: &str) -> TokenService {
        TokenService::new(&AuthConfig::new(secret, 60))
    }

    fn alice() -> MemberIdentity {
        MemberIdentity {
            id: 1,
            name: "Alice".to_string(),
            email: "alice@x.com".to_string(),
            role: Role::User,
        }
    }

    #[test]
    fn test_issue_and_verify_token() {
        let tokens = service(TEST_SECRET);
        let issued = tokens.issue(&alice()).unwrap();

        assert_eq!(issued.token_type, "Bearer");
        assert_eq!(issued.expires_in, 3600);

        let claims = tokens.verify(&issued.access_token).unwrap();
        assert_eq!(claims.sub, 1);
        assert_eq!(claims.email, "alice@x.com");
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expiry_boundary_is_sixty_minutes() {
        let tokens = service(TEST_SECRET);
        let issued_at = Utc::now();
        let token = tokens.issue_at(&alice(), issued_at).unwrap().access_token;

        assert!(tokens
            .verify_at(&token, issued_at + Duration::minutes(59))
            .is_ok());
        assert!(matches!(
            tokens.verify_at(&token, issued_at + Duration::minutes(60)),
            Err(JwtError::TokenInvalid)
        ));
        assert!(matches!(
            tokens.verify_at(&token, issued_at + Duration::minutes(61)),
            Err(JwtError::TokenInvalid)
        ));
    }

    #[test]
    fn test_subsecond_issue_time_is_truncated() {
        let tokens = service(TEST_SECRET);
        let issued_at = DateTime::from_timestamp(1_700_000_000, 999_000_000).unwrap();
        let token = tokens.issue_at(&alice(), issued_at).unwrap().access_token;

        let whole_second = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = tokens.verify_at(&token, whole_second).unwrap();
        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp, 1_700_000_000 + 3600);

        let last_valid = whole_second + Duration::minutes(60) - Duration::milliseconds(1);
        assert!(tokens.verify_at(&token, last_valid).is_ok());
        assert!(matches!(
            tokens.verify_at(&token, whole_second + Duration::minutes(60)),
            Err(JwtError::TokenInvalid)
        ));
    }

    #[test]
    fn test_out_of_range_ttl_does_not_panic() {
        let huge = TokenService::new(&AuthConfig::new(TEST_SECRET, i64::MAX));
        assert_eq!(huge.ttl(), Duration::minutes(MAX_TOKEN_TTL_MINUTES));

        let negative = TokenService::new(&AuthConfig::new(TEST_SECRET, -5));
        assert_eq!(negative.ttl(), Duration::minutes(1));
    }

    #[test]
    fn test_malformed_token() {
        let tokens = service(TEST_SECRET);

        assert!(matches!(
            tokens.verify("invalid.token.here"),
            Err(JwtError::TokenInvalid)
        ));
        assert!(matches!(tokens.verify(""), Err(JwtError::TokenInvalid)));
    }

    #[test]
    fn test_wrong_secret() {
        let token = service(TEST_SECRET).issue(&alice()).unwrap().access_token;

        let result = service(DEV_JWT_SECRET).verify(&token);
        assert!(matches!(result, Err(JwtError::TokenInvalid)));
    }

    #[test]
    fn test_tampered_payload() {
        let tokens = service(TEST_SECRET);
        let token = tokens.issue(&alice()).unwrap().access_token;

        let forged = tokens
            .issue(&MemberIdentity {
                id: 2,
                email: "mallory@x.com".to_string(),
                ..alice()
            })
            .unwrap()
            .access_token;
        let forged_payload = forged.split('.').nth(1).unwrap().to_string();

        let mut parts: Vec<&str> = token.split('.').collect();
        parts[1] = &forged_payload;

        // 다른 페이로드에 원래 서명을 붙이면 검증 실패
        let tampered = parts.join(".");
        assert!(matches!(
            tokens.verify(&tampered),
            Err(JwtError::TokenInvalid)
        ));
    }
}
