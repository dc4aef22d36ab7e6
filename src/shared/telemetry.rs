// Tracing/logging initialization
// 로그 초기화 (RUST_LOG 로 필터 조정)

use tracing_subscriber::EnvFilter;

use crate::shared::config::LogFormat;

/// 프로세스 전역 로거 초기화
/// Initialize process-wide tracing. Subsequent calls are no-ops.
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    let _ = match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_target(false)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init(),
    };
}
