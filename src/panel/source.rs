//! 种子列表数据源接口与抓取编排
//! 编排逻辑与具体客户端解耦：登录、按分类收集去重、回填缺失注释

use std::collections::HashSet;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::record::TorrentRecord;
use crate::error::QbLookResult;

/// 种子列表数据源（qBittorrent WebUI 实现或测试桩）
#[async_trait]
pub trait TorrentSource: Send + Sync {
    /// 登录/建立会话，可重复调用
    async fn login(&self) -> QbLookResult<()>;

    /// 列出种子，`category` 为 None 时拉全量
    async fn torrents(&self, category: Option<&str>) -> QbLookResult<Vec<TorrentRecord>>;

    /// 取单个种子的注释（properties 接口），无注释时返回空串
    async fn comment(&self, hash: &str) -> QbLookResult<String>;

    /// 列出全部分类名（未排序）
    async fn categories(&self) -> QbLookResult<Vec<String>>;
}

/// 抓取种子列表
///
/// 1. 先登录
/// 2. 无分类过滤时全量拉取；有过滤时逐分类拉取并按hash跨分类去重，
///    「分类不存在」跳过该分类，其余错误中断整体抓取
/// 3. 逐个回填缺失注释：「种子不存在」跳过该种子；网络传输错误提前收尾，
///    保留已取得的数据；其余错误照常上抛
pub async fn fetch_torrents<S: TorrentSource + ?Sized>(
    source: &S,
    categories: Option<&[String]>,
) -> QbLookResult<Vec<TorrentRecord>> {
    source.login().await?;

    // 1. 收集种子
    let mut records: Vec<TorrentRecord> = Vec::new();
    match categories {
        None => {
            records = source.torrents(None).await?;
        }
        Some(cats) => {
            let mut seen: HashSet<String> = HashSet::new();
            for category in cats {
                let subset = match source.torrents(Some(category)).await {
                    Ok(subset) => subset,
                    Err(e) if e.is_not_found() => {
                        debug!("分类 [{}] 不存在，跳过", category);
                        continue;
                    }
                    Err(e) => return Err(e),
                };
                for record in subset {
                    if seen.contains(&record.hash) {
                        continue;
                    }
                    seen.insert(record.hash.clone());
                    records.push(record);
                }
            }
        }
    }

    // 2. 回填缺失注释
    for record in records.iter_mut() {
        if !record.comment.is_empty() {
            continue;
        }
        match source.comment(&record.hash).await {
            Ok(comment) => {
                if !comment.is_empty() {
                    record.comment = comment;
                }
            }
            Err(e) if e.is_not_found() => continue,
            Err(e) if e.is_transport() => {
                warn!("注释回填中断（网络错误）：{}，保留已取得的记录", e);
                break;
            }
            Err(e) => return Err(e),
        }
    }

    debug!("已加载 {} 个任务", records.len());
    Ok(records)
}

/// 列出分类名，不区分大小写排序
pub async fn fetch_categories<S: TorrentSource + ?Sized>(source: &S) -> QbLookResult<Vec<String>> {
    source.login().await?;
    let mut names = source.categories().await?;
    names.sort_by_key(|name| name.to_lowercase());
    Ok(names)
}

// 单元测试
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QbLookError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn record(hash: &str, name: &str, category: &str, comment: &str) -> TorrentRecord {
        TorrentRecord {
            hash: hash.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            state: "uploading".to_string(),
            progress: 1.0,
            ratio: 1.0,
            save_path: "/downloads".to_string(),
            content_path: "/downloads".to_string(),
            comment: comment.to_string(),
            num_seeds: 1,
            num_leechs: 0,
            added_on: 0,
        }
    }

    // 注释接口的预设回复
    enum CommentReply {
        Value(String),
        NotFound,
        Transport,
    }

    fn transport_error() -> QbLookError {
        // 非法URL在构建请求时即报错，借此拿到真实的传输层错误
        let err = reqwest::Client::new().get("http://").build().unwrap_err();
        QbLookError::HttpError(err)
    }

    #[derive(Default)]
    struct StubSource {
        login_fails: bool,
        all: Vec<TorrentRecord>,
        // None 表示该分类返回「不存在」
        by_category: HashMap<String, Option<Vec<TorrentRecord>>>,
        comments: HashMap<String, CommentReply>,
        comment_calls: Mutex<Vec<String>>,
        category_names: Vec<String>,
    }

    #[async_trait]
    impl TorrentSource for StubSource {
        async fn login(&self) -> QbLookResult<()> {
            if self.login_fails {
                return Err(QbLookError::LoginFailed("凭据错误".to_string()));
            }
            Ok(())
        }

        async fn torrents(&self, category: Option<&str>) -> QbLookResult<Vec<TorrentRecord>> {
            match category {
                None => Ok(self.all.clone()),
                Some(cat) => match self.by_category.get(cat) {
                    Some(Some(records)) => Ok(records.clone()),
                    Some(None) | None => Err(QbLookError::NotFound(format!("分类 {}", cat))),
                },
            }
        }

        async fn comment(&self, hash: &str) -> QbLookResult<String> {
            self.comment_calls.lock().unwrap().push(hash.to_string());
            match self.comments.get(hash) {
                Some(CommentReply::Value(comment)) => Ok(comment.clone()),
                Some(CommentReply::NotFound) => Err(QbLookError::NotFound(format!("种子 {}", hash))),
                Some(CommentReply::Transport) => Err(transport_error()),
                None => Ok(String::new()),
            }
        }

        async fn categories(&self) -> QbLookResult<Vec<String>> {
            Ok(self.category_names.clone())
        }
    }

    #[tokio::test]
    async fn test_fetch_all_backfills_missing_comments() {
        // 测试场景：全量拉取后，缺注释的种子经 properties 回填
        let mut source = StubSource::default();
        source.all = vec![
            record("h1", "A", "电影", ""),
            record("h2", "B", "电影", "https://kamept.com/details.php?id=7"),
        ];
        source
            .comments
            .insert("h1".to_string(), CommentReply::Value("4821".to_string()));

        let records = fetch_torrents(&source, None).await.expect("抓取失败");
        assert_eq!(records[0].comment, "4821");
        assert_eq!(records[1].comment, "https://kamept.com/details.php?id=7");
        // 已有注释的种子不再查询
        assert_eq!(source.comment_calls.lock().unwrap().as_slice(), ["h1"]);
    }

    #[tokio::test]
    async fn test_fetch_by_categories_dedupes_and_skips_missing() {
        // 测试场景：逐分类拉取去重，「分类不存在」跳过不报错
        let mut source = StubSource::default();
        source.by_category.insert(
            "电影".to_string(),
            Some(vec![record("h1", "A", "电影", "x"), record("h2", "B", "电影", "y")]),
        );
        source.by_category.insert(
            "合集".to_string(),
            Some(vec![record("h2", "B", "合集", "y"), record("h3", "C", "合集", "z")]),
        );
        source.by_category.insert("已删".to_string(), None);

        let wanted = vec!["电影".to_string(), "合集".to_string(), "已删".to_string()];
        let records = fetch_torrents(&source, Some(&wanted)).await.expect("抓取失败");
        let hashes: Vec<&str> = records.iter().map(|r| r.hash.as_str()).collect();
        assert_eq!(hashes, vec!["h1", "h2", "h3"]);
    }

    #[tokio::test]
    async fn test_backfill_stops_on_transport_error_keeps_records() {
        // 测试场景：回填遇网络错误提前收尾，已取得的记录原样返回
        let mut source = StubSource::default();
        source.all = vec![
            record("h1", "A", "", ""),
            record("h2", "B", "", ""),
        ];
        source
            .comments
            .insert("h1".to_string(), CommentReply::Transport);

        let records = fetch_torrents(&source, None).await.expect("应保留已取得数据");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].comment, "");
        // 中断后不再尝试后续种子
        assert_eq!(source.comment_calls.lock().unwrap().as_slice(), ["h1"]);
    }

    #[tokio::test]
    async fn test_backfill_skips_not_found_torrent() {
        // 测试场景：回填时单个种子404只跳过该种子
        let mut source = StubSource::default();
        source.all = vec![
            record("h1", "A", "", ""),
            record("h2", "B", "", ""),
        ];
        source.comments.insert("h1".to_string(), CommentReply::NotFound);
        source
            .comments
            .insert("h2".to_string(), CommentReply::Value("12345".to_string()));

        let records = fetch_torrents(&source, None).await.expect("抓取失败");
        assert_eq!(records[0].comment, "");
        assert_eq!(records[1].comment, "12345");
    }

    #[tokio::test]
    async fn test_login_failure_propagates() {
        // 测试场景：登录失败时整体抓取报错
        let source = StubSource {
            login_fails: true,
            ..StubSource::default()
        };
        let result = fetch_torrents(&source, None).await;
        assert!(matches!(result, Err(QbLookError::LoginFailed(_))));
    }

    #[tokio::test]
    async fn test_fetch_categories_sorts_case_insensitively() {
        // 测试场景：分类名不区分大小写排序
        let source = StubSource {
            category_names: vec!["beta".to_string(), "Alpha".to_string(), "电影".to_string()],
            ..StubSource::default()
        };
        let names = fetch_categories(&source).await.expect("获取分类失败");
        assert_eq!(names, vec!["Alpha", "beta", "电影"]);
    }
}
