//! 面板模块：种子数据的抓取编排、后台刷新与页面指令生成
pub mod record;
pub mod source;
pub mod qbweb;
pub mod refresher;
pub mod view;

// 导出核心接口
pub use self::record::{TorrentRecord, UNCATEGORIZED, group_by_category};
pub use self::source::{TorrentSource, fetch_categories, fetch_torrents};
pub use self::qbweb::QbWebClient;
pub use self::refresher::{RefreshEvent, Refresher};
pub use self::view::{PageDirective, diagnostic_message, page_directive};
