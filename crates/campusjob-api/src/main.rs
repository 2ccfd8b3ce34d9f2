//! CampusJob API 서버.
//!
//! 설정을 읽고 저장소를 연결한 뒤 Axum 기반 REST API 서버를 시작합니다.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{http::StatusCode, middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use campusjob_api::metrics::setup_metrics_recorder;
use campusjob_api::middleware::metrics_layer;
use campusjob_api::openapi::swagger_ui_router;
use campusjob_api::repository::{InMemoryStore, PgMemberStore, PgReviewStore};
use campusjob_api::routes::create_api_router;
use campusjob_api::state::AppState;
use campusjob_core::{init_logging, AppConfig, CorsConfig, DatabaseConfig, LogConfig};

/// 저장소 연결 및 AppState 생성.
///
/// `database.url`이 있으면 PostgreSQL에 연결하고 마이그레이션을 실행합니다.
/// 없으면 메모리 저장소를 사용합니다.
async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let Some(url) = config.database.url.as_deref() else {
        warn!("database.url not set, using in-memory store (data is lost on restart)");
        let store = Arc::new(InMemoryStore::new());
        return Ok(AppState::new(store.clone(), store, &config.auth));
    };

    let pool = connect_database(url, &config.database).await?;

    info!("Running database migrations...");
    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .context("데이터베이스 마이그레이션 실패")?;
    info!("Migrations completed successfully");

    let state = AppState::new(
        Arc::new(PgMemberStore::new(pool.clone())),
        Arc::new(PgReviewStore::new(pool.clone())),
        &config.auth,
    )
    .with_db_pool(pool);

    Ok(state)
}

async fn connect_database(url: &str, config: &DatabaseConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout_secs))
        .connect(url)
        .await
        .context("데이터베이스 연결 실패")?;

    sqlx::query("SELECT 1")
        .fetch_one(&pool)
        .await
        .context("데이터베이스 연결 확인 실패")?;
    info!("Connected to PostgreSQL successfully");

    Ok(pool)
}

/// CORS 레이어 생성.
///
/// `cors.origins`가 비어 있으면 모든 origin을 허용합니다 (개발 모드).
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .origins
        .iter()
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    let restricted = !origins.is_empty();
    let allow_origin = if restricted {
        info!("CORS configured with {} allowed origins", origins.len());
        AllowOrigin::list(origins)
    } else {
        warn!("cors.origins not set, allowing any origin (development mode)");
        AllowOrigin::any()
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        // 로그인 응답의 Authorization 헤더를 브라우저에서 읽을 수 있도록 노출
        .expose_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::LOCATION,
        ])
        .allow_credentials(restricted)
        .max_age(Duration::from_secs(3600))
}

/// /metrics 엔드포인트 핸들러.
async fn metrics_handler(
    axum::extract::State(handle): axum::extract::State<PrometheusHandle>,
) -> String {
    handle.render()
}

/// 전체 라우터 생성.
fn create_router(state: Arc<AppState>, metrics_handle: PrometheusHandle, config: &AppConfig) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics_handle);

    Router::new()
        .merge(metrics_router)
        .merge(create_api_router().with_state(state))
        .merge(swagger_ui_router())
        .layer(middleware::from_fn(metrics_layer))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.server.request_timeout_secs),
        ))
        .layer(cors_layer(&config.cors))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    let config = AppConfig::load_default().context("설정 로드 실패")?;

    init_logging(LogConfig::from(&config.logging))
        .map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {e}"))?;

    info!("Starting CampusJob API server...");

    config.auth.validate().context("인증 설정이 올바르지 않습니다")?;
    if config.auth.uses_dev_secret() {
        warn!("Using development JWT secret. Set JWT_SECRET in production.");
    }

    let metrics_handle = setup_metrics_recorder().context("Prometheus 레코더 설치 실패")?;

    let state = Arc::new(create_app_state(&config).await?);
    info!(
        version = %state.version,
        store = state.store_backend(),
        token_ttl_minutes = config.auth.token_ttl_minutes,
        "Application state initialized"
    );

    let app = create_router(state, metrics_handle, &config);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("{addr} 바인딩 실패"))?;

    info!(%addr, "API server listening");
    info!("Swagger UI available at http://{}/swagger-ui", addr);
    info!("Metrics available at http://{}/metrics", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");
    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 반환합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
