use chrono::NaiveDate;
use serde::Serialize;

/// 文章与作者联表后的完整行
///
/// 序列化时字段名与数据库列名保持一致（含 camelCase 引号列）。
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ArticleRow {
    /// 文章 ID
    pub article_id: i32,
    /// 作者 ID（外键）
    pub author_id: i32,
    /// 标题
    pub title: String,
    /// 可选分类
    pub category: Option<String>,
    /// 可选发布日期
    #[serde(rename = "publishedOn")]
    pub published_on: Option<NaiveDate>,
    /// 正文
    pub body: String,
    /// 作者名称
    pub author: String,
    /// 可选作者主页
    #[serde(rename = "authorUrl")]
    pub author_url: Option<String>,
}

/// 写入文章时的字段集合，不含任何 ID
#[derive(Debug)]
pub struct ArticleDraft {
    pub title: String,
    pub category: Option<String>,
    pub published_on: Option<NaiveDate>,
    pub body: String,
}
