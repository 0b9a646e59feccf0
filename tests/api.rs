use axum::{
    Router,
    body::{Body, to_bytes},
    extract::Request,
    http::{Response, StatusCode},
};

use kilovolt::{
    api, bootstrap,
    state::AppState,
    storage::{Db, init_db_from_env},
};
use serde_json::json;
use tower::util::ServiceExt;

struct TestApp {
    router: Router,
    db: Db,
}

impl TestApp {
    async fn new() -> Self {
        let db = init_db_from_env().await;

        bootstrap::bootstrap(&db, kilovolt::FIXTURE_PATH).await;

        let router = api::setup_route(AppState::new(db.clone()));

        Self { router, db }
    }

    pub async fn request(&self, req: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(req)
            .await
            .expect("oneshot fail")
    }

    async fn body_text(resp: Response<Body>) -> String {
        let data = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("读取数据失败");
        String::from_utf8(data.to_vec()).expect("读取数据失败")
    }
}

impl TestApp {
    async fn article_list(&self, msg: &str) -> Vec<serde_json::Value> {
        let req = Request::get("/articles")
            .body(Body::empty())
            .expect("请求失败");
        let resp = self.request(req).await;
        assert_eq!(StatusCode::OK, resp.status(), "{}", msg);
        let data = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("读取数据失败");
        let json: Vec<serde_json::Value> = serde_json::from_slice(&data).expect("反序列化失败");
        json
    }

    async fn article_create(&self, payload: serde_json::Value, msg: &str) -> Response<Body> {
        let req = Request::post("/articles")
            .header("Content-Type", "application/json")
            .body(Body::new(payload.to_string()))
            .expect("请求失败");
        let resp = self.request(req).await;
        assert_ne!(
            StatusCode::INTERNAL_SERVER_ERROR,
            resp.status(),
            "{}",
            msg
        );
        resp
    }

    async fn article_update(&self, id: i64, payload: serde_json::Value, msg: &str) {
        let req = Request::put(format!("/articles/{id}"))
            .header("Content-Type", "application/json")
            .body(Body::new(payload.to_string()))
            .expect("请求失败");
        let resp = self.request(req).await;
        assert_eq!(StatusCode::OK, resp.status(), "{}", msg);
        assert_eq!("Update complete", Self::body_text(resp).await, "{}", msg);
    }

    async fn article_delete(&self, id: i64, msg: &str) {
        let req = Request::delete(format!("/articles/{id}"))
            .body(Body::empty())
            .expect("请求失败");
        let resp = self.request(req).await;
        assert_eq!(StatusCode::OK, resp.status(), "{}", msg);
        assert_eq!("Delete complete", Self::body_text(resp).await, "{}", msg);
    }

    async fn articles_clear(&self, msg: &str) {
        let req = Request::delete("/articles")
            .body(Body::empty())
            .expect("请求失败");
        let resp = self.request(req).await;
        assert_eq!(StatusCode::OK, resp.status(), "{}", msg);
        assert_eq!("Delete complete", Self::body_text(resp).await, "{}", msg);
    }

    async fn author_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.db)
            .await
            .expect("统计作者失败")
    }
}

fn payload(author: &str, title: &str) -> serde_json::Value {
    json!({
        "author": author,
        "authorUrl": "http://example.com",
        "title": title,
        "category": "test",
        "publishedOn": "2024-03-01",
        "body": "test body"
    })
}

#[tokio::test]
#[ignore = "API测试 依赖真实数据库"]
async fn test_api() {
    let app = TestApp::new().await;

    // 引导后 fixture 数据可见
    {
        let data = app.article_list("引导后应能查到种子文章").await;
        assert!(!data.is_empty());

        let seeded = data
            .iter()
            .find(|row| row["title"] == "T1")
            .expect("种子文章 T1 应存在");
        assert_eq!(seeded["author"], "A. Hacker");
        assert_eq!(seeded["authorUrl"], "http://x");
        assert_eq!(seeded["publishedOn"], "2020-01-01");
    }

    // 引导幂等：重复执行不改变文章数与作者数
    {
        let articles_before = app.article_list("幂等检查前查询").await.len();
        let authors_before = app.author_count().await;

        bootstrap::bootstrap(&app.db, kilovolt::FIXTURE_PATH).await;

        let articles_after = app.article_list("幂等检查后查询").await.len();
        assert_eq!(articles_before, articles_after, "非空表不应重复填充");
        assert_eq!(authors_before, app.author_count().await, "作者名不应重复");
    }

    // 创建后查询应恰好多出一行，且作者联表正确
    {
        let before = app.article_list("创建前查询").await.len();

        let resp = app
            .article_create(payload("Test Author", "created-by-test"), "创建文章")
            .await;
        assert_eq!(StatusCode::OK, resp.status());
        assert_eq!("insert complete", TestApp::body_text(resp).await);

        let data = app.article_list("创建后查询").await;
        assert_eq!(before + 1, data.len());

        let created: Vec<_> = data
            .iter()
            .filter(|row| row["title"] == "created-by-test")
            .collect();
        assert_eq!(1, created.len(), "应恰好新增一行");
        assert_eq!(created[0]["author"], "Test Author");
    }

    // 相同作者名再创建：不产生重复作者行，复用既有 author_id
    {
        let authors_before = app.author_count().await;

        app.article_create(payload("Test Author", "created-by-test-2"), "复用作者")
            .await;

        assert_eq!(
            authors_before,
            app.author_count().await,
            "不应产生重复作者行"
        );

        let data = app.article_list("复用作者后查询").await;
        let first = data
            .iter()
            .find(|row| row["title"] == "created-by-test")
            .expect("第一篇应存在");
        let second = data
            .iter()
            .find(|row| row["title"] == "created-by-test-2")
            .expect("第二篇应存在");
        assert_eq!(
            first["author_id"], second["author_id"],
            "两篇文章应指向同一作者"
        );
    }

    // 更新文章及其作者
    {
        let data = app.article_list("更新前查询").await;
        let row = data
            .iter()
            .find(|row| row["title"] == "created-by-test")
            .expect("待更新文章应存在");
        let article_id = row["article_id"].as_i64().expect("article_id 应为整数");
        let author_id = row["author_id"].as_i64().expect("author_id 应为整数");

        app.article_update(
            article_id,
            json!({
                "author": "Test Author",
                "authorUrl": "http://example.com/updated",
                "author_id": author_id,
                "title": "updated-by-test",
                "category": "test",
                "publishedOn": "2024-03-02",
                "body": "updated body"
            }),
            "更新文章",
        )
        .await;

        let data = app.article_list("更新后查询").await;
        let updated = data
            .iter()
            .find(|row| row["article_id"].as_i64() == Some(article_id))
            .expect("更新后的文章应存在");
        assert_eq!(updated["title"], "updated-by-test");
        assert_eq!(updated["authorUrl"], "http://example.com/updated");
    }

    // 删除不存在的 ID：成功返回，行数不变
    {
        let before = app.article_list("删除前查询").await.len();
        app.article_delete(999_999_999, "删除不存在的文章").await;
        let after = app.article_list("删除后查询").await.len();
        assert_eq!(before, after, "不存在的 ID 不应影响行数");
    }

    // 按 ID 删除单篇
    {
        let data = app.article_list("单删前查询").await;
        let row = data
            .iter()
            .find(|row| row["title"] == "updated-by-test")
            .expect("待删除文章应存在");
        let article_id = row["article_id"].as_i64().expect("article_id 应为整数");

        app.article_delete(article_id, "删除单篇文章").await;

        let data = app.article_list("单删后查询").await;
        assert!(
            data.iter()
                .all(|row| row["article_id"].as_i64() != Some(article_id)),
            "删除后不应再查到该行"
        );
    }

    // 清空全部文章
    {
        app.articles_clear("清空文章").await;
        let data = app.article_list("清空后查询").await;
        assert!(data.is_empty(), "清空后应返回空数组");
    }

    // 非空表不补齐：只写入一行后再次引导，种子数据不应回填
    {
        app.article_create(payload("Partial Author", "only-row"), "写入单行")
            .await;

        bootstrap::bootstrap(&app.db, kilovolt::FIXTURE_PATH).await;

        let data = app.article_list("再次引导后查询").await;
        assert_eq!(1, data.len(), "非空表不应被补齐");
        assert_eq!(data[0]["title"], "only-row");

        // 收尾恢复种子数据
        app.articles_clear("清空文章").await;
        bootstrap::bootstrap(&app.db, kilovolt::FIXTURE_PATH).await;
    }
}
