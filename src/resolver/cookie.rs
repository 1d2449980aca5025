//! Cookie指令构建工具
//! 把模式配置的原始Cookie串解析为键值对，并定域到解析出的URL host
//! 指令本身不做任何网络或存储动作，仅供外部浏览器组件安装

use tracing::{debug, warn};
use url::Url;

/// 定域后的单条Cookie（name/value/domain三元组）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
}

/// Cookie指令解析工具
pub struct CookieDirective;

impl CookieDirective {
    /// 把原始Cookie串拆成键值对
    ///
    /// 按 `;` 分段，段内按首个 `=` 切分，名称与值各自去除前后空白；
    /// 空段或不含 `=` 的段静默跳过，不算错误
    pub fn parse_pairs(raw: &str) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for segment in raw.split(';') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let Some((name, value)) = segment.split_once('=') else {
                continue;
            };
            pairs.push((name.trim().to_string(), value.trim().to_string()));
        }
        pairs
    }

    /// 按解析出的URL构建完整Cookie指令（每条Cookie定域到URL的host）
    ///
    /// 模式未配置Cookie、URL无法解析或解析不出host时返回空指令
    pub fn for_url(raw_cookie: &str, url: &str) -> Vec<ScopedCookie> {
        if raw_cookie.trim().is_empty() {
            return Vec::new();
        }

        let domain = match Url::parse(url) {
            Ok(parsed) => match parsed.host_str() {
                Some(host) => host.to_string(),
                None => {
                    debug!("URL无host，跳过Cookie注入：{}", url);
                    return Vec::new();
                }
            },
            Err(e) => {
                warn!("URL解析失败，跳过Cookie注入：{}（{}）", url, e);
                return Vec::new();
            }
        };

        Self::parse_pairs(raw_cookie)
            .into_iter()
            .map(|(name, value)| ScopedCookie {
                name,
                value,
                domain: domain.clone(),
            })
            .collect()
    }
}
