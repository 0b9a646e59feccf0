mod article_query;
mod article_storage;
mod models;
mod postgres;

pub use self::{
    article_query::ArticleQuery,
    article_storage::ArticleStorage,
    models::{ArticleDraft, ArticleRow},
    postgres::{Db, init_db_from_env, new_db_pool},
};
