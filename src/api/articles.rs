use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{ApiError, Result};
use crate::state::AppState;
use crate::storage::{ArticleDraft, ArticleQuery, ArticleRow, ArticleStorage, Db};

/// 配置文章相关路由。
///
/// 路由包括：
/// - `GET /articles`：联表查询全部文章
/// - `POST /articles`：创建文章（必要时先建作者）
/// - `PUT /articles/{id}`：更新文章及其作者
/// - `DELETE /articles/{id}`：删除单篇文章
/// - `DELETE /articles`：清空文章
pub fn setup_route() -> Router<AppState> {
    Router::new()
        .route(
            "/articles",
            get(articles_list).post(article_create).delete(articles_clear),
        )
        .route(
            "/articles/{id}",
            put(article_update).delete(article_delete),
        )
}

/// 创建文章的请求体
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleCreate {
    pub author: String,
    pub author_url: Option<String>,
    pub title: String,
    pub category: Option<String>,
    pub published_on: Option<NaiveDate>,
    pub body: String,
}

/// 更新文章的请求体
///
/// `author_id` 为 snake_case，与既有客户端发送的键名保持一致。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleUpdate {
    pub author: String,
    pub author_url: Option<String>,
    #[serde(rename = "author_id")]
    pub author_id: i32,
    pub title: String,
    pub category: Option<String>,
    pub published_on: Option<NaiveDate>,
    pub body: String,
}

/// 查询全部文章，联表附带作者名称与主页。
async fn articles_list(State(pool): State<Db>) -> Result<Json<Vec<ArticleRow>>> {
    let rows = (&pool).list_joined().await?;
    Ok(Json(rows))
}

/// 创建一篇文章。
///
/// 三步在同一事务内执行：写入作者（冲突跳过）、按名称解析作者 ID、
/// 写入文章。任一步失败整体回滚，不产生半写入状态。
/// 解析不到作者 ID 时返回 [`ApiError::AuthorNotFound`]。
async fn article_create(
    State(pool): State<Db>,
    Json(data): Json<ArticleCreate>,
) -> Result<&'static str> {
    let ArticleCreate {
        author,
        author_url,
        title,
        category,
        published_on,
        body,
    } = data;

    let draft = ArticleDraft {
        title,
        category,
        published_on,
        body,
    };

    // 开启db事务
    let mut tx = pool.begin().await?;

    let result = async {
        tx.ensure_author(&author, author_url.as_deref()).await?;

        let author_id = tx
            .author_id(&author)
            .await?
            .ok_or_else(|| ApiError::AuthorNotFound(author.clone()))?;

        tx.insert_article(author_id, &draft).await?;

        Result::Ok(())
    }
    .await;

    match result {
        Ok(_) => {
            tx.commit().await?;
            Ok("insert complete")
        }

        Err(e) => {
            tx.rollback().await.ok();
            tracing::error!(?e);
            Err(e)
        }
    }
}

/// 更新文章及其作者。
///
/// 作者更新按请求体中的 `author_id` 定位，文章更新按路径 ID 定位，
/// 两条语句在同一事务内执行，避免只更新一半。
async fn article_update(
    Path(id): Path<i32>,
    State(pool): State<Db>,
    Json(data): Json<ArticleUpdate>,
) -> Result<&'static str> {
    let ArticleUpdate {
        author,
        author_url,
        author_id,
        title,
        category,
        published_on,
        body,
    } = data;

    let draft = ArticleDraft {
        title,
        category,
        published_on,
        body,
    };

    let mut tx = pool.begin().await?;

    let result = async {
        tx.update_author(author_id, &author, author_url.as_deref())
            .await?;

        tx.update_article(id, &draft).await?;

        Result::Ok(())
    }
    .await;

    match result {
        Ok(_) => {
            tx.commit().await?;
            Ok("Update complete")
        }

        Err(e) => {
            tx.rollback().await.ok();
            tracing::error!(?e);
            Err(e)
        }
    }
}

/// 删除单篇文章，ID 无匹配时同样返回成功。
async fn article_delete(Path(id): Path<i32>, State(pool): State<Db>) -> Result<&'static str> {
    let mut conn = &pool;
    conn.remove(id).await?;
    Ok("Delete complete")
}

/// 清空所有文章。
async fn articles_clear(State(pool): State<Db>) -> Result<&'static str> {
    let mut conn = &pool;
    conn.remove_all().await?;
    Ok("Delete complete")
}
