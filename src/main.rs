use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use stock_api::build_app;
use stock_api::shared::config::AppConfig;
use stock_api::shared::database::Database;
use stock_api::shared::services::AppState;
use stock_api::shared::telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    // 설정 로드 (환경 변수)
    let config = AppConfig::from_env().context("Failed to load configuration")?;
    telemetry::init(config.log_format);

    if config.using_dev_secret {
        tracing::warn!("JWT_SECRET is not set; using the development secret");
    }

    // DB 연결 + 마이그레이션
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    db.initialize()
        .await
        .context("Failed to initialize database")?;

    // AppState 생성 (모든 Service 초기화)
    let app_state = AppState::new(db, &config);

    // CORS 설정
    let origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS_ORIGIN: {}", config.cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ])
        .allow_credentials(true);

    let app = build_app(app_state).layer(cors);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %config.bind_addr, "server running");
    tracing::info!("Swagger UI available at /api");

    // 서버 실행
    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
