pub mod api;
pub mod bootstrap;
pub mod error;
pub mod fixture;
pub mod state;
pub mod storage;

use tracing_subscriber::{EnvFilter, fmt::time::ChronoLocal};

/// 默认种子数据文件路径
pub const FIXTURE_PATH: &str = "public/data/hackerIpsum.json";

pub async fn run() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string()))
        .with_env_filter(EnvFilter::from_env("KILOVOLT_LOG"))
        .init();

    let db = storage::init_db_from_env().await;

    bootstrap::bootstrap(&db, FIXTURE_PATH).await;

    let app = state::AppState::new(db);

    api::run_server(app).await
}
