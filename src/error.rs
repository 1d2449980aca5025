//! 全局错误类型定义

use thiserror::Error;
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;

#[derive(Error, Debug)]
pub enum QbLookError {
    // 规则相关错误
    #[error("模式 {name} 的正则无效：{reason}")]
    InvalidPattern { name: String, reason: String },

    // 配置相关错误
    #[error("配置解析失败：{0}")]
    JsonError(#[from] SerdeJsonError),
    #[error("IO操作失败：{0}")]
    IoError(#[from] IoError),

    // qBittorrent接口错误
    #[error("qBittorrent登录失败：{0}")]
    LoginFailed(String),
    #[error("资源不存在：{0}")]
    NotFound(String),
    #[error("接口 {endpoint} 返回状态码 {status}")]
    ApiStatus {
        endpoint: String,
        status: reqwest::StatusCode,
    },
    #[error("网络请求失败：{0}")]
    HttpError(#[from] reqwest::Error),
}

impl QbLookError {
    /// 是否为「资源不存在」（抓取编排中按分类/种子跳过，不中断整体流程）
    pub fn is_not_found(&self) -> bool {
        matches!(self, QbLookError::NotFound(_))
    }

    /// 是否为网络传输层错误（注释回填遇到时提前收尾，保留已取得的数据）
    pub fn is_transport(&self) -> bool {
        matches!(self, QbLookError::HttpError(_))
    }
}

// 全局Result类型
pub type QbLookResult<T> = Result<T, QbLookError>;
