use crate::fixture::{self, SeedRecord};
use crate::storage::{ArticleQuery, ArticleStorage, Db};

/// 引导流程：建表 + 种子填充
///
/// 两条建表语句相互独立，各自失败只记录日志并跳过其
/// 依赖的种子步骤，不中断进程启动。
pub async fn bootstrap(db: &Db, fixture_path: &str) {
    let records = match fixture::load(fixture_path) {
        Ok(records) => records,
        Err(e) => {
            tracing::error!(%e, path = fixture_path, "failed to read seed fixture, skipping seed load");
            Vec::new()
        }
    };

    match create_authors_table(db).await {
        Ok(_) => seed_authors(db, &records).await,
        Err(e) => tracing::error!(%e, "failed to create authors table, skipping author seed"),
    }

    match create_articles_table(db).await {
        Ok(_) => {
            if let Err(e) = seed_articles(db, &records).await {
                tracing::error!(%e, "failed to seed articles");
            }
        }
        Err(e) => tracing::error!(%e, "failed to create articles table, skipping article seed"),
    }
}

/// 幂等创建 `authors` 表
async fn create_authors_table(db: &Db) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS
        authors (
            author_id SERIAL PRIMARY KEY,
            author VARCHAR(255) UNIQUE NOT NULL,
            "authorUrl" VARCHAR(255)
        )
        "#,
    )
    .execute(db)
    .await?;
    Ok(())
}

/// 幂等创建 `articles` 表，外键指向 `authors`
async fn create_articles_table(db: &Db) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS
        articles (
            article_id SERIAL PRIMARY KEY,
            author_id INTEGER NOT NULL REFERENCES authors(author_id),
            title VARCHAR(255) NOT NULL,
            category VARCHAR(20),
            "publishedOn" DATE,
            body TEXT NOT NULL
        )
        "#,
    )
    .execute(db)
    .await?;
    Ok(())
}

/// 填充种子作者
///
/// 名称冲突静默跳过，单条失败记录日志后继续其余记录。
async fn seed_authors(db: &Db, records: &[SeedRecord]) {
    let mut conn = db;
    for record in records {
        if let Err(e) = conn
            .ensure_author(&record.author, record.author_url.as_deref())
            .await
        {
            tracing::error!(%e, author = %record.author, "failed to seed author");
        }
    }
}

/// 填充种子文章
///
/// 仅当 `articles` 表为空时执行；非空直接跳过，
/// 不对部分填充的表做补齐。
async fn seed_articles(db: &Db, records: &[SeedRecord]) -> Result<(), sqlx::Error> {
    if db.count_articles().await? > 0 {
        tracing::info!("articles table is not empty, skipping article seed");
        return Ok(());
    }

    let mut conn = db;
    for record in records {
        // 作者名无匹配时子查询产生零行，静默插入零行
        conn.seed_article(record).await?;
    }

    Ok(())
}
