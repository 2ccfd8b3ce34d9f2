//! 설정 관리.
//!
//! 기본값 → 설정 파일(선택) → 환경 변수 순서로 덮어쓰며 로드합니다.
//! 로드된 설정은 시작 시 한 번 생성되고 이후 변경되지 않습니다.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// 개발 환경용 JWT 시크릿. 운영 환경에서는 반드시 교체해야 합니다.
pub const DEV_JWT_SECRET: &str = "campusjob-development-secret-change-in-production";

/// JWT 시크릿 최소 길이 (바이트).
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// 토큰 유효 시간 상한 (7일, 분 단위).
pub const MAX_TOKEN_TTL_MINUTES: i64 = 7 * 24 * 60;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 데이터베이스 설정
    pub database: DatabaseConfig,
    /// 인증 설정
    pub auth: AuthConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// CORS 설정
    pub cors: CorsConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// `host:port` 형식의 바인딩 주소.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 데이터베이스 설정.
///
/// `url`이 없으면 인메모리 저장소로 동작합니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostgreSQL 연결 URL
    pub url: Option<String>,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 타임아웃 (초)
    pub connection_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            connection_timeout_secs: 10,
        }
    }
}

/// 인증 설정.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// JWT 서명 비밀 키
    pub jwt_secret: String,
    /// 토큰 유효 시간 (분)
    pub token_ttl_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_minutes: 60,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl_minutes", &self.token_ttl_minutes)
            .finish()
    }
}

impl AuthConfig {
    /// 새 인증 설정 생성.
    pub fn new(jwt_secret: impl Into<String>, token_ttl_minutes: i64) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl_minutes,
        }
    }

    /// 개발용 시크릿 사용 여부.
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }

    /// 설정 유효성 검증.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigValidationError::WeakSecret(self.jwt_secret.len()));
        }
        if !(1..=MAX_TOKEN_TTL_MINUTES).contains(&self.token_ttl_minutes) {
            return Err(ConfigValidationError::InvalidTokenTtl(self.token_ttl_minutes));
        }
        Ok(())
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// CORS 설정.
///
/// `origins`가 비어 있으면 모든 origin을 허용합니다 (개발 모드).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    pub origins: Vec<String>,
}

/// 설정 검증 에러.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("JWT 시크릿은 최소 {MIN_JWT_SECRET_LEN}바이트여야 합니다 (현재 {0}바이트)")]
    WeakSecret(usize),
    #[error("토큰 유효 시간은 1분 이상 {MAX_TOKEN_TTL_MINUTES}분 이하여야 합니다: {0}")]
    InvalidTokenTtl(i64),
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일은 없어도 됩니다. 환경 변수는 `CAMPUSJOB__AUTH__JWT_SECRET`처럼
    /// `CAMPUSJOB` 접두사와 `__` 구분자를 사용합니다.
    /// 접두사 없는 `JWT_SECRET`, `DATABASE_URL`도 비어 있는 항목에 한해 반영합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("CAMPUSJOB")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.origins")
                    .try_parsing(true),
            );

        let mut config: AppConfig = builder.build()?.try_deserialize()?;
        config.apply_plain_env();
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }

    fn apply_plain_env(&mut self) {
        if self.auth.jwt_secret.is_empty() {
            if let Ok(secret) = std::env::var("JWT_SECRET") {
                self.auth.jwt_secret = secret;
            }
        }
        if self.database.url.is_none() {
            self.database.url = std::env::var("DATABASE_URL").ok().filter(|u| !u.is_empty());
        }
        // 경고는 로깅 초기화 이후 `uses_dev_secret`으로 출력
        if self.auth.jwt_secret.is_empty() {
            self.auth.jwt_secret = DEV_JWT_SECRET.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.auth.token_ttl_minutes, 60);
        assert!(config.database.url.is_none());
        assert!(config.cors.origins.is_empty());
    }

    #[test]
    fn test_auth_config_validation() {
        assert!(AuthConfig::new(DEV_JWT_SECRET, 60).validate().is_ok());

        assert_eq!(
            AuthConfig::new("short", 60).validate(),
            Err(ConfigValidationError::WeakSecret(5))
        );
        assert_eq!(
            AuthConfig::new(DEV_JWT_SECRET, 0).validate(),
            Err(ConfigValidationError::InvalidTokenTtl(0))
        );
        assert!(AuthConfig::new(DEV_JWT_SECRET, MAX_TOKEN_TTL_MINUTES).validate().is_ok());
        assert_eq!(
            AuthConfig::new(DEV_JWT_SECRET, i64::MAX).validate(),
            Err(ConfigValidationError::InvalidTokenTtl(i64::MAX))
        );
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = AuthConfig::new("super-secret-value-that-is-long-enough", 60);
        let debug = format!("{:?}", config);

        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_load_without_file_falls_back_to_defaults() {
        let config = AppConfig::load("does/not/exist.toml").unwrap();

        assert!(!config.auth.jwt_secret.is_empty());
        assert!(config.auth.token_ttl_minutes > 0);

        let secret_from_env = std::env::var("JWT_SECRET").is_ok()
            || std::env::var("CAMPUSJOB__AUTH__JWT_SECRET").is_ok();
        if !secret_from_env {
            assert!(config.auth.uses_dev_secret());
        }
    }
}
