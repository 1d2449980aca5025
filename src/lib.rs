//! qblook - qBittorrent 注释面板核心引擎：按可配置正则模式把种子注释解析为站点详情页URL

// 导出全局错误类型
pub use self::error::{QbLookError, QbLookResult};

// 导出配置模块
pub use self::config::{
    ConfigDocument, ConfigManager, CustomConfigBuilder, DEFAULT_CONFIG_PATH, QbConnection, UiPrefs,
};

// 导出规则模块核心接口
pub use self::rule::{ConfigLoader, WebMode, WebModeSpec, WebModeStore};

// 导出解析模块核心接口
pub use self::resolver::{
    CommentResolver, CookieDirective, Resolution, ScopedCookie, TemplateExpander,
};

// 导出面板模块核心接口
pub use self::panel::{
    PageDirective, QbWebClient, RefreshEvent, Refresher, TorrentRecord, TorrentSource,
    UNCATEGORIZED, diagnostic_message, fetch_categories, fetch_torrents, group_by_category,
    page_directive,
};

// 声明所有子模块
pub mod config;
pub mod error;
pub mod rule;
pub mod resolver;
pub mod panel;
