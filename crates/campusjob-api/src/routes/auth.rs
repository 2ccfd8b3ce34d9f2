//! 로그인 / 회원 가입 API 라우트
//!
//! # 엔드포인트
//!
//! - `POST /api/login` - 로그인 (Access Token 발급)
//! - `POST /api/join` - 회원 가입

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, HeaderValue, StatusCode},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

use campusjob_core::{CampusError, MemberIdentity};

use crate::auth::IssuedToken;
use crate::error::{ApiErrorResponse, ApiResult};
use crate::metrics::{record_login, record_registration};
use crate::state::AppState;
use crate::validation::{not_blank, ValidatedJson};

// ================================================================================================
// Request Types
// ================================================================================================

/// 로그인 요청
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// 이메일
    #[validate(custom(function = "not_blank"))]
    pub email: String,
    /// 비밀번호
    #[validate(custom(function = "not_blank"))]
    pub password: String,
}

/// 회원 가입 요청
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct JoinRequest {
    /// 이메일 (로그인 ID)
    #[validate(
        email(message = "이메일 형식이 올바르지 않습니다"),
        length(max = 255, message = "이메일은 255자 이하여야 합니다")
    )]
    pub email: String,
    /// 표시 이름
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "이름은 100자 이하여야 합니다")
    )]
    pub name: String,
    /// 비밀번호 (4자 이상)
    #[validate(length(min = 4, message = "비밀번호는 4자 이상이어야 합니다"))]
    pub password: String,
}

// ================================================================================================
// Handlers
// ================================================================================================

/// POST /api/login - 로그인
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "토큰 발급 (Authorization 헤더에도 포함)", body = IssuedToken),
        (status = 400, description = "입력값 오류", body = ApiErrorResponse),
        (status = 401, description = "인증 실패", body = ApiErrorResponse)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<(HeaderMap, Json<IssuedToken>)> {
    let result = state
        .authenticator
        .login(&request.email, &request.password)
        .await;
    record_login(result.is_ok());
    let token = result?;

    let mut headers = HeaderMap::new();
    let bearer = HeaderValue::from_str(&format!("Bearer {}", token.access_token))
        .map_err(|e| CampusError::InvalidInput(e.to_string()))?;
    headers.insert(AUTHORIZATION, bearer);

    Ok((headers, Json(token)))
}

/// POST /api/join - 회원 가입
#[utoipa::path(
    post,
    path = "/api/join",
    tag = "auth",
    request_body = JoinRequest,
    responses(
        (status = 201, description = "가입 완료", body = MemberIdentity),
        (status = 400, description = "입력값 오류", body = ApiErrorResponse),
        (status = 409, description = "이메일 중복", body = ApiErrorResponse)
    )
)]
pub async fn join(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<JoinRequest>,
) -> ApiResult<(StatusCode, Json<MemberIdentity>)> {
    register(&state, request).await
}

/// 가입 처리 (`/api/join`과 `POST /api/members` 공용).
pub(crate) async fn register(
    state: &AppState,
    request: JoinRequest,
) -> ApiResult<(StatusCode, Json<MemberIdentity>)> {
    let result = state
        .registration
        .register(&request.email, &request.name, &request.password)
        .await;
    record_registration(result.is_ok());

    Ok((StatusCode::CREATED, Json(result?)))
}

// ================================================================================================
// Router
// ================================================================================================

/// 인증 라우터 생성
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(login))
        .route("/join", post(join))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::create_test_state;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .nest("/api", auth_router())
            .with_state(Arc::new(create_test_state()))
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_join_then_login() {
        let app = app();

        let joined = app
            .clone()
            .oneshot(post_json(
                "/api/join",
                serde_json::json!({"email": "alice@x.com", "name": "Alice", "password": "1234"}),
            ))
            .await
            .unwrap();
        assert_eq!(joined.status(), StatusCode::CREATED);
        let member = body_json(joined).await;
        assert_eq!(member["email"], "alice@x.com");
        assert_eq!(member["role"], "USER");
        assert!(member.get("password_hash").is_none());
        assert!(member.get("password").is_none());

        let login = app
            .oneshot(post_json(
                "/api/login",
                serde_json::json!({"email": "alice@x.com", "password": "1234"}),
            ))
            .await
            .unwrap();
        assert_eq!(login.status(), StatusCode::OK);

        let header = login
            .headers()
            .get(AUTHORIZATION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let token = body_json(login).await;
        assert_eq!(token["token_type"], "Bearer");
        assert_eq!(header, format!("Bearer {}", token["access_token"].as_str().unwrap()));
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_unauthorized() {
        let app = app();
        app.clone()
            .oneshot(post_json(
                "/api/join",
                serde_json::json!({"email": "alice@x.com", "name": "Alice", "password": "1234"}),
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(post_json(
                "/api/login",
                serde_json::json!({"email": "alice@x.com", "password": "4321"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(AUTHORIZATION).is_none());
        assert_eq!(body_json(response).await["code"], "AUTHENTICATION_FAILED");
    }

    #[tokio::test]
    async fn test_join_validation_errors() {
        let response = app()
            .oneshot(post_json(
                "/api/join",
                serde_json::json!({"email": "not-an-email", "name": " ", "password": "12"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let fields: Vec<_> = body["details"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["field"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(fields, vec!["email", "name", "password"]);
    }

    #[tokio::test]
    async fn test_join_name_longer_than_column_is_rejected() {
        let app = app();

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/join",
                serde_json::json!({"email": "long@x.com", "name": "n".repeat(101), "password": "1234"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["details"][0]["field"], "name");

        let response = app
            .oneshot(post_json(
                "/api/join",
                serde_json::json!({"email": "long@x.com", "name": "n".repeat(100), "password": "1234"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_malformed_body_is_validation_error() {
        let response = app()
            .oneshot(post_json("/api/join", serde_json::json!({"email": "a@x.com"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }
}
