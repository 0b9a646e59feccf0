use sqlx::PgExecutor;

use super::ArticleDraft;
use crate::fixture::SeedRecord;

/// 提供文章和作者的数据库写入接口
///
/// 同时为 [`sqlx::PgTransaction`] 和 [`Db`](super::Db) 实现：
/// 多语句写入流程在事务上执行，单语句操作直接在连接池上执行。
pub trait ArticleStorage {
    /// 获取 SQL 执行器，用于 [`sqlx::query()`] 执行
    fn executor<'t>(&'t mut self) -> impl PgExecutor<'t>;

    /// 写入作者，名称冲突时静默跳过
    ///
    /// `author` 列带 UNIQUE 约束，重复名称不报错、不覆盖。
    fn ensure_author(
        &mut self,
        author: &str,
        author_url: Option<&str>,
    ) -> impl Future<Output = Result<(), sqlx::Error>> {
        async move {
            sqlx::query(
                r#"
                INSERT INTO authors (author, "authorUrl")
                VALUES ($1, $2)
                ON CONFLICT (author) DO NOTHING
                "#,
            )
            .bind(author)
            .bind(author_url)
            .execute(self.executor())
            .await?;
            Ok(())
        }
    }

    /// 按名称查询作者 ID
    ///
    /// 作者不存在时返回 `None`。
    fn author_id(
        &mut self,
        author: &str,
    ) -> impl Future<Output = Result<Option<i32>, sqlx::Error>> {
        async move {
            sqlx::query_scalar("SELECT author_id FROM authors WHERE author = $1")
                .bind(author)
                .fetch_optional(self.executor())
                .await
        }
    }

    /// 以已解析的作者 ID 写入一篇文章
    fn insert_article(
        &mut self,
        author_id: i32,
        draft: &ArticleDraft,
    ) -> impl Future<Output = Result<(), sqlx::Error>> {
        async move {
            sqlx::query(
                r#"
                INSERT INTO articles (author_id, title, category, "publishedOn", body)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(author_id)
            .bind(&draft.title)
            .bind(&draft.category)
            .bind(draft.published_on)
            .bind(&draft.body)
            .execute(self.executor())
            .await?;
            Ok(())
        }
    }

    /// 以单条语句写入种子文章，作者 ID 由子查询按名称解析
    ///
    /// 名称无匹配时子查询产生零行，插入零行，静默完成。
    fn seed_article(
        &mut self,
        record: &SeedRecord,
    ) -> impl Future<Output = Result<(), sqlx::Error>> {
        async move {
            sqlx::query(
                r#"
                INSERT INTO articles (author_id, title, category, "publishedOn", body)
                SELECT author_id, $1, $2, $3, $4
                FROM authors
                WHERE author = $5
                "#,
            )
            .bind(&record.title)
            .bind(&record.category)
            .bind(record.published_on)
            .bind(&record.body)
            .bind(&record.author)
            .execute(self.executor())
            .await?;
            Ok(())
        }
    }

    /// 按 ID 更新作者的名称与主页
    fn update_author(
        &mut self,
        author_id: i32,
        author: &str,
        author_url: Option<&str>,
    ) -> impl Future<Output = Result<(), sqlx::Error>> {
        async move {
            sqlx::query(
                r#"
                UPDATE authors
                SET author = $1, "authorUrl" = $2
                WHERE author_id = $3
                "#,
            )
            .bind(author)
            .bind(author_url)
            .bind(author_id)
            .execute(self.executor())
            .await?;
            Ok(())
        }
    }

    /// 按 ID 更新文章内容
    fn update_article(
        &mut self,
        article_id: i32,
        draft: &ArticleDraft,
    ) -> impl Future<Output = Result<(), sqlx::Error>> {
        async move {
            sqlx::query(
                r#"
                UPDATE articles
                SET title = $1, category = $2, "publishedOn" = $3, body = $4
                WHERE article_id = $5
                "#,
            )
            .bind(&draft.title)
            .bind(&draft.category)
            .bind(draft.published_on)
            .bind(&draft.body)
            .bind(article_id)
            .execute(self.executor())
            .await?;
            Ok(())
        }
    }

    /// 删除指定的文章
    ///
    /// ID 无匹配时不报错。
    fn remove(&mut self, article_id: i32) -> impl Future<Output = Result<(), sqlx::Error>> {
        async move {
            sqlx::query("DELETE FROM articles WHERE article_id = $1")
                .bind(article_id)
                .execute(self.executor())
                .await?;
            Ok(())
        }
    }

    /// 清空所有文章
    fn remove_all(&mut self) -> impl Future<Output = Result<(), sqlx::Error>> {
        async {
            sqlx::query("DELETE FROM articles")
                .execute(self.executor())
                .await?;
            Ok(())
        }
    }
}

/// 为 [`sqlx::PgTransaction`] 实现 [`ArticleStorage`]
impl ArticleStorage for sqlx::PgTransaction<'_> {
    fn executor<'t>(&'t mut self) -> impl PgExecutor<'t> {
        self.as_mut()
    }
}

use super::Db;

/// 为 [`Db`] 实现 [`ArticleStorage`]
impl ArticleStorage for &'_ Db {
    fn executor<'t>(&'t mut self) -> impl PgExecutor<'t> {
        *self
    }
}
