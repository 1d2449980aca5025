//! 种子记录数据模型与分类分组
//! 字段对齐 qBittorrent torrents/info 响应，注释缺失时由 properties 接口回填

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 未设置分类的种子归入的分组名
pub const UNCATEGORIZED: &str = "未分类";

/// 单条种子记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TorrentRecord {
    pub hash: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub ratio: f64,
    #[serde(default)]
    pub save_path: String,
    #[serde(default)]
    pub content_path: String,
    // torrents/info 多数版本不带注释字段，留空待回填
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub num_seeds: i64,
    #[serde(default)]
    pub num_leechs: i64,
    #[serde(default)]
    pub added_on: i64,
}

impl TorrentRecord {
    /// 规范化：空分类写实为「未分类」，content_path 缺省回落到 save_path
    pub fn normalize(mut self) -> Self {
        if self.category.is_empty() {
            self.category = UNCATEGORIZED.to_string();
        }
        if self.content_path.is_empty() {
            self.content_path = self.save_path.clone();
        }
        self
    }
}

/// 按分类分组，供树状列表渲染
/// 分类名按字典序排列，组内按种子名称不区分大小写排序
pub fn group_by_category(records: &[TorrentRecord]) -> BTreeMap<String, Vec<&TorrentRecord>> {
    let mut groups: BTreeMap<String, Vec<&TorrentRecord>> = BTreeMap::new();
    for record in records {
        let key = if record.category.is_empty() {
            UNCATEGORIZED
        } else {
            record.category.as_str()
        };
        groups.entry(key.to_string()).or_default().push(record);
    }

    for list in groups.values_mut() {
        list.sort_by_key(|r| r.name.to_lowercase());
    }

    groups
}
