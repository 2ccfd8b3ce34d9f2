//! 요청 단위 Prometheus 계측.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

use crate::metrics::{
    normalize_path, record_http_duration, record_http_request, record_http_response,
};

/// 계측에서 제외하는 경로 접두사 (스크레이프 및 문서 요청).
const UNTRACKED_PREFIXES: &[&str] = &["/metrics", "/swagger-ui", "/api-docs"];

fn is_tracked(path: &str) -> bool {
    !UNTRACKED_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
}

/// `/api/*`, `/health` 요청의 수, 상태 코드, 처리 시간을 기록합니다.
///
/// 후기/회원 ID 같은 숫자 세그먼트는 `:id`로 묶어 라벨 카디널리티를 제한합니다.
pub async fn metrics_layer(request: Request, next: Next) -> Response {
    let raw_path = request.uri().path();
    if !is_tracked(raw_path) {
        return next.run(request).await;
    }

    let path = normalize_path(raw_path);
    let method = request.method().as_str().to_owned();
    record_http_request(&method, &path);

    let started = Instant::now();
    let response = next.run(request).await;

    record_http_response(&method, &path, response.status().as_u16());
    record_http_duration(&method, &path, started.elapsed().as_secs_f64());

    response
}
