//! 全局配置文档,存储所有可持久化配置项

use serde::{Deserialize, Serialize};

use crate::rule::model::WebModeSpec;

/// 默认配置文件路径（工作目录下）
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// qBittorrent 连接配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QbConnection {
    // WebUI地址，可带协议前缀
    #[serde(default = "default_host")]
    pub host: String,
    // WebUI端口
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_password")]
    pub password: String,
    // 是否校验HTTPS证书
    #[serde(default)]
    pub verify_ssl: bool,
}

impl Default for QbConnection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            username: default_username(),
            password: default_password(),
            verify_ssl: false,
        }
    }
}

impl QbConnection {
    /// 拼出 WebUI 根地址（host 未带协议时补全 http://）
    pub fn base_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if host.contains("://") {
            format!("{}:{}", host, self.port)
        } else {
            format!("http://{}:{}", host, self.port)
        }
    }
}

fn default_host() -> String {
    "http://127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_password() -> String {
    "adminadmin".to_string()
}

/// 面板行为配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiPrefs {
    // 自动刷新间隔（秒），0表示仅手动刷新
    #[serde(default)]
    pub refresh_interval_sec: u64,
    // 是否要求先选分类再抓取
    #[serde(default)]
    pub require_category_selection: bool,
}

impl Default for UiPrefs {
    fn default() -> Self {
        Self {
            refresh_interval_sec: 0,
            require_category_selection: false,
        }
    }
}

/// 完整配置文档（整份读写，未知字段在加载时忽略）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(default)]
    pub qbittorrent: QbConnection,
    #[serde(default)]
    pub web_modes: Vec<WebModeSpec>,
    #[serde(default)]
    pub ui: UiPrefs,
    #[serde(default)]
    pub active_web_mode: Option<String>,
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self {
            qbittorrent: QbConnection::default(),
            web_modes: vec![
                WebModeSpec {
                    name: "KamePT".to_string(),
                    pattern: r"https?://kamept\.com/details\.php\?id=\d+".to_string(),
                    template: "{value}".to_string(),
                    description: "注释里直接放完整的KamePT详情链接".to_string(),
                    cookie: String::new(),
                    categories: Vec::new(),
                },
                WebModeSpec {
                    name: "M-Team".to_string(),
                    pattern: r"(?P<tid>\d{3,})".to_string(),
                    template: "https://kp.m-team.cc/detail/{tid}".to_string(),
                    description: "注释里只填数字ID，自动拼接M-Team详情页".to_string(),
                    cookie: String::new(),
                    categories: Vec::new(),
                },
            ],
            ui: UiPrefs::default(),
            active_web_mode: None,
        }
    }
}

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 获取默认配置文档
    pub fn get_default() -> ConfigDocument {
        ConfigDocument::default()
    }

    /// 自定义配置
    pub fn custom() -> CustomConfigBuilder {
        CustomConfigBuilder::new()
    }
}

/// 配置构建器（便于自定义配置）
#[derive(Debug, Clone)]
pub struct CustomConfigBuilder {
    config: ConfigDocument,
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ConfigDocument::default(),
        }
    }

    pub fn host(mut self, host: String) -> Self {
        self.config.qbittorrent.host = host;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.qbittorrent.port = port;
        self
    }

    pub fn username(mut self, username: String) -> Self {
        self.config.qbittorrent.username = username;
        self
    }

    pub fn password(mut self, password: String) -> Self {
        self.config.qbittorrent.password = password;
        self
    }

    pub fn verify_ssl(mut self, verify_ssl: bool) -> Self {
        self.config.qbittorrent.verify_ssl = verify_ssl;
        self
    }

    pub fn web_modes(mut self, modes: Vec<WebModeSpec>) -> Self {
        self.config.web_modes = modes;
        self
    }

    pub fn active_web_mode(mut self, name: Option<String>) -> Self {
        self.config.active_web_mode = name;
        self
    }

    pub fn build(self) -> ConfigDocument {
        self.config
    }
}

impl Default for CustomConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
