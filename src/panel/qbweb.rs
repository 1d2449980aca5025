//! qBittorrent WebUI v2 接口客户端
//! Cookie 会话制：登录成功后由 reqwest 的 cookie_store 自动携带 SID

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use tracing::debug;

use super::record::TorrentRecord;
use super::source::TorrentSource;
use crate::config::QbConnection;
use crate::error::{QbLookError, QbLookResult};

/// 单次请求超时（秒）
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// qBittorrent WebUI 客户端
pub struct QbWebClient {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl QbWebClient {
    /// 按连接配置构建客户端（verify_ssl 为 false 时不校验证书）
    pub fn new(conn: &QbConnection) -> QbLookResult<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .danger_accept_invalid_certs(!conn.verify_ssl)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: conn.base_url(),
            username: conn.username.clone(),
            password: conn.password.clone(),
        })
    }

    /// 拼接 WebUI v2 接口地址
    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/v2/{}", self.base_url, path)
    }

    /// GET 并统一检查状态码：404 映射 NotFound，其余非 2xx 映射 ApiStatus
    async fn get_checked(&self, path: &str, query: &[(&str, &str)]) -> QbLookResult<Response> {
        let response = self
            .client
            .get(self.endpoint(path))
            .query(query)
            .send()
            .await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(QbLookError::NotFound(format!("接口 {} 返回404", path)));
        }
        if !status.is_success() {
            return Err(QbLookError::ApiStatus {
                endpoint: path.to_string(),
                status,
            });
        }
        Ok(response)
    }

    /// 从 torrents/properties 的回包中取注释字段
    fn parse_comment(props: &Value) -> String {
        props
            .get("comment")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    /// 从 torrents/categories 的回包（对象，键为分类名）中取全部分类名
    fn parse_categories(payload: &Value) -> Vec<String> {
        payload
            .as_object()
            .map(|obj| obj.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TorrentSource for QbWebClient {
    async fn login(&self) -> QbLookResult<()> {
        let response = self
            .client
            .post(self.endpoint("auth/login"))
            .form(&[
                ("username", self.username.as_str()),
                ("password", self.password.as_str()),
            ])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(QbLookError::LoginFailed(format!("HTTP {}", status)));
        }
        // WebUI 登录接口以 200 + "Fails." 表示凭据错误
        let body = response.text().await?;
        if !body.to_ascii_lowercase().contains("ok") {
            return Err(QbLookError::LoginFailed("用户名或密码错误".to_string()));
        }
        debug!("✅ 已登录 {}", self.base_url);
        Ok(())
    }

    async fn torrents(&self, category: Option<&str>) -> QbLookResult<Vec<TorrentRecord>> {
        let query: Vec<(&str, &str)> = match category {
            Some(cat) => vec![("category", cat)],
            None => Vec::new(),
        };
        let response = self.get_checked("torrents/info", &query).await?;
        let records: Vec<TorrentRecord> = response.json().await?;
        let records: Vec<TorrentRecord> =
            records.into_iter().map(TorrentRecord::normalize).collect();
        debug!(
            "torrents/info 返回 {} 条（分类：{}）",
            records.len(),
            category.unwrap_or("全部")
        );
        Ok(records)
    }

    async fn comment(&self, hash: &str) -> QbLookResult<String> {
        let response = self
            .get_checked("torrents/properties", &[("hash", hash)])
            .await?;
        let props: Value = response.json().await?;
        Ok(Self::parse_comment(&props))
    }

    async fn categories(&self) -> QbLookResult<Vec<String>> {
        let response = self.get_checked("torrents/categories", &[]).await?;
        let payload: Value = response.json().await?;
        Ok(Self::parse_categories(&payload))
    }
}
