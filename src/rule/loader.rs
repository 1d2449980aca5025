//! 配置文档读写管理
//! 负责配置文件的首次生成、整份加载与整份保存

use std::path::Path;
use tracing::debug;

use crate::config::ConfigDocument;
use crate::error::QbLookResult;

/// 配置文档加载管理器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 加载配置文档；文件不存在时先写出默认文档
    pub async fn ensure(path: &Path) -> QbLookResult<ConfigDocument> {
        if !path.exists() {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
            let doc = ConfigDocument::default();
            Self::save(path, &doc).await?;
            debug!("配置文件不存在，已写出默认配置：{}", path.display());
            return Ok(doc);
        }
        Self::load(path).await
    }

    /// 整份加载配置文档
    pub async fn load(path: &Path) -> QbLookResult<ConfigDocument> {
        let raw = tokio::fs::read_to_string(path).await?;
        let doc: ConfigDocument = serde_json::from_str(&raw)?;

        debug!(
            "配置文档加载成功，Web模式数：{}，活动模式：{:?}",
            doc.web_modes.len(),
            doc.active_web_mode
        );

        Ok(doc)
    }

    /// 整份保存配置文档（缩进JSON）
    pub async fn save(path: &Path, doc: &ConfigDocument) -> QbLookResult<()> {
        let data = serde_json::to_string_pretty(doc)?;
        tokio::fs::write(path, data).await?;

        debug!("配置文档已保存：{}", path.display());
        Ok(())
    }
}
