use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::Result;

/// 种子数据记录
///
/// 对应 fixture JSON 数组中的单个对象，键名为 camelCase。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedRecord {
    pub author: String,
    pub author_url: Option<String>,
    pub title: String,
    pub category: Option<String>,
    pub published_on: Option<NaiveDate>,
    pub body: String,
}

/// 从 JSON 文件读取种子记录
///
/// 启动时读取一次，读取或解析失败向上传递给引导层处理。
pub fn load(path: impl AsRef<Path>) -> Result<Vec<SeedRecord>> {
    let content = fs::read_to_string(path)?;
    let records = serde_json::from_str(&content)?;
    Ok(records)
}
