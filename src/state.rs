use axum::extract::FromRef;

use crate::storage::Db;

/// 应用程序上下文
///
/// [`AppState`] 封装了数据库连接池，提供统一访问入口。
#[derive(Clone, FromRef)]
pub struct AppState {
    pool: Db,
}

impl AppState {
    /// 创建一个新的 [`AppState`] 实例
    pub fn new(pool: Db) -> Self {
        Self { pool }
    }

    /// 获取数据库连接池
    pub fn pool(&self) -> &Db {
        &self.pool
    }
}
