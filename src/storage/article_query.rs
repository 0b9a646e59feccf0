use super::{ArticleRow, Db};

/// Trait 用于查询文章相关数据
///
/// 提供联表列表和行数统计的接口。
pub trait ArticleQuery {
    /// 获取 [`Db`] 对象
    fn db(&self) -> &Db;

    /// 查询全部文章，并联表附带作者名称与主页
    ///
    /// 不分页、不过滤，顺序由联表自然产生。
    ///
    /// ```ignore
    /// let db: Db = /* 初始化 Db */;
    /// let rows = db.list_joined().await.unwrap();
    /// ```
    fn list_joined(&self) -> impl Future<Output = Result<Vec<ArticleRow>, sqlx::Error>> + '_ {
        async move {
            let result = sqlx::query_as::<_, ArticleRow>(
                r#"
                SELECT a.article_id, a.author_id, a.title, a.category,
                       a."publishedOn" AS published_on, a.body,
                       au.author,
                       au."authorUrl" AS author_url
                FROM articles a
                INNER JOIN authors au ON a.author_id = au.author_id
                "#,
            )
            .fetch_all(self.db())
            .await?;
            Ok(result)
        }
    }

    /// 统计 `articles` 表的行数
    ///
    /// 种子加载以此判断表是否为空。
    fn count_articles(&self) -> impl Future<Output = Result<i64, sqlx::Error>> + '_ {
        async move {
            sqlx::query_scalar("SELECT COUNT(*) FROM articles")
                .fetch_one(self.db())
                .await
        }
    }
}

impl ArticleQuery for &Db {
    fn db(&self) -> &Db {
        self
    }
}
