//! 后台刷新协调器
//! 同一时刻至多一次抓取在途，结果以事件送回调用方

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use super::record::TorrentRecord;
use super::source::{TorrentSource, fetch_torrents};
use crate::error::QbLookError;

/// 一次刷新的结局，两者有且仅有其一
#[derive(Debug)]
pub enum RefreshEvent {
    /// 抓取成功，携带整份种子列表
    Loaded(Vec<TorrentRecord>),
    /// 抓取失败，携带原因
    Failed(QbLookError),
}

/// 刷新协调器
pub struct Refresher {
    source: Arc<dyn TorrentSource>,
    events: UnboundedSender<RefreshEvent>,
    in_flight: Arc<AtomicBool>,
}

impl Refresher {
    /// 创建协调器，返回配套的事件接收端
    pub fn new(source: Arc<dyn TorrentSource>) -> (Self, UnboundedReceiver<RefreshEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let refresher = Self {
            source,
            events: tx,
            in_flight: Arc::new(AtomicBool::new(false)),
        };
        (refresher, rx)
    }

    /// 是否有抓取在途
    pub fn is_refreshing(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// 发起一次刷新，按 `categories` 过滤分类（None 为全量）
    /// 已有抓取在途时忽略本次请求并返回 false，不排队
    pub fn request(&self, categories: Option<Vec<String>>) -> bool {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("已有抓取在途，忽略本次刷新请求");
            return false;
        }

        let source = Arc::clone(&self.source);
        let events = self.events.clone();
        let in_flight = Arc::clone(&self.in_flight);
        tokio::spawn(async move {
            let event = match fetch_torrents(source.as_ref(), categories.as_deref()).await {
                Ok(records) => {
                    debug!("✅ 已加载 {} 个任务", records.len());
                    RefreshEvent::Loaded(records)
                }
                Err(e) => {
                    warn!("拉取失败：{}", e);
                    RefreshEvent::Failed(e)
                }
            };
            // 先清在途标记，再投递事件
            in_flight.store(false, Ordering::SeqCst);
            if events.send(event).is_err() {
                debug!("事件接收端已关闭，丢弃刷新结果");
            }
        });
        true
    }
}

// 单元测试
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QbLookResult;
    use async_trait::async_trait;
    use tokio::sync::Notify;

    fn record(hash: &str, name: &str) -> TorrentRecord {
        TorrentRecord {
            hash: hash.to_string(),
            name: name.to_string(),
            category: "电影".to_string(),
            state: "uploading".to_string(),
            progress: 1.0,
            ratio: 1.0,
            save_path: "/downloads".to_string(),
            content_path: "/downloads".to_string(),
            comment: "4821".to_string(),
            num_seeds: 1,
            num_leechs: 0,
            added_on: 0,
        }
    }

    // 放行时机由 Notify 控制的数据源
    struct GatedSource {
        gate: Arc<Notify>,
        fail: bool,
    }

    #[async_trait]
    impl TorrentSource for GatedSource {
        async fn login(&self) -> QbLookResult<()> {
            Ok(())
        }

        async fn torrents(&self, _category: Option<&str>) -> QbLookResult<Vec<TorrentRecord>> {
            self.gate.notified().await;
            if self.fail {
                return Err(QbLookError::LoginFailed("会话失效".to_string()));
            }
            Ok(vec![record("h1", "A")])
        }

        async fn comment(&self, _hash: &str) -> QbLookResult<String> {
            Ok(String::new())
        }

        async fn categories(&self) -> QbLookResult<Vec<String>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_second_request_ignored_while_in_flight() {
        // 测试场景：在途期间的重复请求被忽略，完成后可再次发起
        let gate = Arc::new(Notify::new());
        let source = Arc::new(GatedSource {
            gate: Arc::clone(&gate),
            fail: false,
        });
        let (refresher, mut rx) = Refresher::new(source);

        assert!(refresher.request(None));
        assert!(refresher.is_refreshing());
        assert!(!refresher.request(None));

        gate.notify_one();
        let event = rx.recv().await.expect("事件通道关闭");
        assert!(matches!(event, RefreshEvent::Loaded(ref records) if records.len() == 1));

        // 事件送达时在途标记已清，立即可再发起
        assert!(refresher.request(None));
        gate.notify_one();
        let event = rx.recv().await.expect("事件通道关闭");
        assert!(matches!(event, RefreshEvent::Loaded(_)));
    }

    #[tokio::test]
    async fn test_failed_event_on_fetch_error() {
        // 测试场景：抓取失败投递 Failed 事件且不再在途
        let gate = Arc::new(Notify::new());
        let source = Arc::new(GatedSource {
            gate: Arc::clone(&gate),
            fail: true,
        });
        let (refresher, mut rx) = Refresher::new(source);

        assert!(refresher.request(Some(vec!["电影".to_string()])));
        gate.notify_one();
        let event = rx.recv().await.expect("事件通道关闭");
        assert!(matches!(event, RefreshEvent::Failed(QbLookError::LoginFailed(_))));
        assert!(!refresher.is_refreshing());
    }
}
