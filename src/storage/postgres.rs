use std::{env, time::Duration};

use sqlx::postgres::PgPoolOptions;

/// 数据库连接池类型
pub type Db = sqlx::PgPool;

/// 从环境变量 `DATABASE_URL` 初始化数据库连接池
pub async fn init_db_from_env() -> Db {
    let conn_url = env::var("DATABASE_URL").expect("环境变量: `DATABASE_URL`: NotPresent");
    new_db_pool(&conn_url)
        .await
        .expect("Failed to connect to PostgreSQL")
}

/// 根据连接 URL 创建新的数据库连接池
///
/// 连接池取代了单一共享连接：每个请求从池中独立获取连接，
/// 用完立即归还。
pub async fn new_db_pool(conn_url: &str) -> Result<Db, sqlx::Error> {
    PgPoolOptions::new()
        .idle_timeout(Duration::from_secs(60))
        .max_lifetime(Duration::from_secs(1500))
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(2))
        .test_before_acquire(true)
        .min_connections(2)
        .connect(conn_url)
        .await
}
