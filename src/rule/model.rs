//! Web模式数据模型定义
//! 仅存储配置文档中的规则数据，无任何业务逻辑，支持序列化/反序列化

use std::fmt;
use serde::{Deserialize, Serialize};

/// Web模式定义（配置文档 web_modes 列表的单项）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebModeSpec {
    /// 模式名称（活动模式按名称查找；允许重名，重名时列表序靠前者生效）
    #[serde(default)]
    pub name: String,
    /// 匹配注释文本的正则表达式，构建 Store 时即时编译
    #[serde(default)]
    pub pattern: String,
    /// URL模板：{value} 引用整体匹配，命名分组按 {组名} 引用；留空等价于 "{value}"
    #[serde(default)]
    pub template: String,
    /// 备注说明，仅展示用
    #[serde(default)]
    pub description: String,
    /// 注入浏览器的原始Cookie串（name=value; name=value），留空表示不注入
    #[serde(default)]
    pub cookie: String,
    /// 适用的种子分类白名单，空列表表示对所有分类生效
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

impl WebModeSpec {
    /// 从名称、正则、模板快速创建（其余字段取默认值）
    pub fn new(
        name: impl Into<String>,
        pattern: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            template: template.into(),
            description: String::new(),
            cookie: String::new(),
            categories: Vec::new(),
        }
    }

    /// 展示名称（空名称显示为「未命名」）
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "未命名"
        } else {
            &self.name
        }
    }
}

// ======== 为 WebModeSpec 实现 Display trait（用于 CLI 输出） ========
impl fmt::Display for WebModeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            write!(f, "{}", self.display_name())
        } else {
            write!(f, "{}（{}）", self.display_name(), self.description)
        }
    }
}
